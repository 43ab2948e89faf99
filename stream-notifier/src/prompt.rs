//! Interactive monitoring settings.

use anyhow::Context;
use inquire::validator::Validation;
use inquire::{InquireError, Select, Text};

use crate::config::validation::validate_login;
use crate::lifecycle::MonitorRequest;
use crate::notification::NotificationFormat;

/// Resolve the login and notification format, prompting for whatever was
/// not given on the command line. `None` when the user aborts a prompt.
pub async fn monitoring_request(
    login: Option<String>,
    format: Option<NotificationFormat>,
) -> anyhow::Result<Option<MonitorRequest>> {
    let login = match login {
        Some(login) => {
            let login = login.trim().to_string();
            validate_login(&login).map_err(anyhow::Error::msg)?;
            login
        }
        None => {
            let answer = tokio::task::spawn_blocking(prompt_login)
                .await
                .context("Login prompt task failed")?
                .context("Failed to read login")?;
            match answer {
                Some(login) => login,
                None => return Ok(None),
            }
        }
    };

    let format = match format {
        Some(format) => format,
        None => {
            let answer = tokio::task::spawn_blocking(prompt_format)
                .await
                .context("Format prompt task failed")?
                .context("Failed to select notification method")?;
            match answer {
                Some(format) => format,
                None => return Ok(None),
            }
        }
    };

    Ok(Some(MonitorRequest { login, format }))
}

fn prompt_login() -> Result<Option<String>, InquireError> {
    let answer = Text::new("Which streamer do you want to monitor?")
        .with_help_message("Enter username, not display name")
        .with_validator(|input: &str| {
            Ok(match validate_login(input.trim()) {
                Ok(()) => Validation::Valid,
                Err(message) => Validation::Invalid(message.into()),
            })
        })
        .prompt()
        .map(|login| login.trim().to_string());
    aborted_as_none(answer)
}

fn prompt_format() -> Result<Option<NotificationFormat>, InquireError> {
    let answer = Select::new(
        "Which notification method do you want to use?",
        NotificationFormat::ALL.to_vec(),
    )
    .with_help_message("Use arrows to move, type to filter")
    .prompt();
    aborted_as_none(answer)
}

/// Esc and Ctrl+C end the prompt without an answer.
fn aborted_as_none<T>(answer: Result<T, InquireError>) -> Result<Option<T>, InquireError> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e),
    }
}
