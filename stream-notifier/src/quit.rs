//! Quit command listener.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::lifecycle::RunState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitEvent {
    /// The user typed the quit command.
    Requested,
    /// The session ended for another reason.
    Cancelled,
}

pub fn is_quit_command(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("q")
}

/// Read lines from `input` until the quit command arrives or the session is
/// cancelled. A closed input parks the listener until cancellation.
pub async fn listen_for_quit<R>(input: R, run: &RunState) -> QuitEvent
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        let line = tokio::select! {
            _ = run.cancelled() => return QuitEvent::Cancelled,
            line = lines.next_line() => line,
        };

        match line {
            Ok(Some(line)) if is_quit_command(&line) => {
                tracing::info!("Quit requested from input");
                return QuitEvent::Requested;
            }
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::debug!("Quit input closed, waiting for shutdown");
                break;
            }
            Err(e) => {
                tracing::warn!("Failed to read quit input: {e}");
                break;
            }
        }
    }

    run.cancelled().await;
    QuitEvent::Cancelled
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_quit_command() {
        assert!(is_quit_command("q"));
        assert!(is_quit_command("Q"));
        assert!(is_quit_command(" q \r"));
        assert!(!is_quit_command("quit"));
        assert!(!is_quit_command(""));
    }

    #[tokio::test]
    async fn quit_line_after_other_input() {
        let run = RunState::new();
        let event = listen_for_quit(&b"hello\n\nq\n"[..], &run).await;
        assert_eq!(event, QuitEvent::Requested);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_input_waits_for_cancellation() {
        let run = RunState::new();
        let task_run = run.clone();
        let handle = tokio::spawn(async move { listen_for_quit(tokio::io::empty(), &task_run).await });

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert!(!handle.is_finished());

        run.stop();
        assert_eq!(handle.await.unwrap(), QuitEvent::Cancelled);
    }
}
