//! Transient user alerts for halfway and completion events

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::NotifyError;

/// Delivers a short alert message to the user
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

/// Writes alerts to the log only
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        info!("ALERT: {}", message);
        Ok(())
    }
}

/// Runs an external program with the message as its last argument,
/// e.g. `notify-send`
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    program: String,
    args: Vec<String>,
}

impl CommandNotifier {
    /// Split a command line such as `"notify-send -u critical"` into program
    /// and leading arguments
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait]
impl Notifier for CommandNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        debug!("Running {} for alert", self.program);

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(message)
            .output()
            .await
            .map_err(|source| NotifyError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(NotifyError::Failed {
                program: self.program.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

pub fn halfway_message(name: &str) -> String {
    format!("{} is halfway done!", name)
}

pub fn completion_message(name: &str) -> String {
    format!("Whoooshh! {} time is completed!", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_line() {
        let notifier = CommandNotifier::from_command_line("notify-send -u critical").unwrap();
        assert_eq!(notifier.program, "notify-send");
        assert_eq!(notifier.args, vec!["-u", "critical"]);
        assert!(CommandNotifier::from_command_line("   ").is_none());
    }

    #[tokio::test]
    async fn missing_program_is_an_error() {
        let notifier =
            CommandNotifier::from_command_line("definitely-not-a-real-program-xyz").unwrap();
        let err = notifier.notify("hello").await.unwrap_err();
        assert!(matches!(err, NotifyError::Spawn { .. }));
    }

    #[test]
    fn messages() {
        assert_eq!(halfway_message("Tea"), "Tea is halfway done!");
        assert_eq!(completion_message("Tea"), "Whoooshh! Tea time is completed!");
    }
}
