use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::config::SuspendConfig;
use crate::error::SuspendError;

/// Host power control used by the `/suspend` command.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SystemController: Send + Sync {
    /// Asks the host to suspend. Returns once the request has been issued.
    async fn suspend(&self) -> Result<(), SuspendError>;
}

/// Suspends the host by launching an external program.
///
/// The child is spawned and not awaited: once it does its job nobody is left to
/// read the exit status.
#[derive(Debug, Clone)]
pub struct CommandSystemController {
    program: String,
    args: Vec<String>,
}

impl CommandSystemController {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl From<&SuspendConfig> for CommandSystemController {
    fn from(config: &SuspendConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }
}

#[async_trait]
impl SystemController for CommandSystemController {
    async fn suspend(&self) -> Result<(), SuspendError> {
        if self.program.trim().is_empty() {
            return Err(SuspendError::NotConfigured);
        }

        let child = Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(false)
            .spawn()
            .map_err(|e| SuspendError::spawn(&self.program, e))?;

        info!(program = %self.program, args = ?self.args, pid = ?child.id(), "suspend requested");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_program_is_not_configured() {
        let controller = CommandSystemController::new("  ", vec![]);
        assert!(matches!(controller.suspend().await, Err(SuspendError::NotConfigured)));
    }

    #[tokio::test]
    async fn missing_program_fails_to_spawn() {
        let controller = CommandSystemController::new("seekserve-no-such-program", vec!["now".to_string()]);
        let result = controller.suspend().await;
        assert!(matches!(result, Err(SuspendError::Spawn { ref program, .. }) if program == "seekserve-no-such-program"));
    }

    #[test]
    fn built_from_config() {
        let config = SuspendConfig { program: "systemctl".to_string(), args: vec!["suspend".to_string()] };
        let controller = CommandSystemController::from(&config);
        assert_eq!(controller.program(), "systemctl");
        assert_eq!(controller.args(), ["suspend".to_string()]);
    }
}
