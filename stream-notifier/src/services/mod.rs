pub mod osascript;
pub mod profile_image;
