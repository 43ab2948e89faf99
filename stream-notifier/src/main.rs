//! Stream notifier binary.
//!
//! Prompts for a broadcaster, then polls Twitch and raises a desktop
//! notification whenever that broadcaster goes live. Type `q` or press
//! Ctrl+C to stop.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use stream_notifier_lib::console;
use stream_notifier_lib::lifecycle::LifecycleController;
use stream_notifier_lib::notification::{NotificationFormat, ScriptNotifier};
use stream_notifier_lib::prompt;
use stream_notifier_lib::services::osascript::OsaScript;
use stream_notifier_lib::services::profile_image::ProfileImageStore;
use stream_notifier_lib::shutdown;
use stream_notifier_lib::terminal::{self, ScriptTerminal, TerminalHost};
use twitch_client::api::TwitchApiClient;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run in the current terminal instead of opening a new window
    #[arg(long)]
    no_terminal: bool,

    /// Broadcaster login to monitor (skips the prompt)
    #[arg(short, long)]
    login: Option<String>,

    /// Notification method: Notification or Dialog (skips the prompt)
    #[arg(short, long, value_parser = parse_format)]
    format: Option<NotificationFormat>,
}

fn parse_format(value: &str) -> Result<NotificationFormat, String> {
    value.parse()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Step 1: Tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Step 2: Foundation
    let config = stream_notifier_lib::init_foundation()?;
    let runner = OsaScript::new(config.osascript_path.clone(), config.script_dir());
    let host = ScriptTerminal::new(runner.clone(), config.base_dir.clone());
    let packaged = terminal::running_packaged();

    // Step 3: Relaunch inside a terminal window
    if packaged && !args.no_terminal {
        host.launch().await.context("Failed to launch terminal")?;
        return Ok(());
    }

    // Step 4: Monitoring settings
    let Some(request) = prompt::monitoring_request(args.login, args.format).await? else {
        tracing::info!("No monitoring settings given, exiting");
        return Ok(());
    };

    // Step 5: Session
    let client = TwitchApiClient::new(config.client_config())?;
    let controller = Arc::new(LifecycleController::new(
        Arc::new(client),
        Arc::new(ScriptNotifier::new(runner)),
        Arc::new(ProfileImageStore::new(config.resources_dir())),
        config.poller_config(),
    ));

    let c = controller.clone();
    let signals = tokio::spawn(async move {
        shutdown::wait_for_signal().await;
        console::say("\nPlease wait a moment, terminating the application...");
        c.request_shutdown();
    });

    let outcome = controller
        .run(request, BufReader::new(tokio::io::stdin()))
        .await;
    controller.wait_cleanup_complete().await;
    signals.abort();
    tracing::info!(?outcome, "Monitoring session ended");

    // Step 6: Close the host terminal
    if packaged {
        if let Err(e) = host.close().await {
            tracing::warn!("Failed to close terminal window: {e}");
        }
    }

    // The blocking stdin reader would keep the runtime from shutting down.
    std::process::exit(if outcome.is_failure() { 1 } else { 0 });
}
