//! Shell command execution, plain and elevated.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use chatsh_core::collaborator::{
    CollaboratorResult, Credential, ProcessExecutor, SystemAction,
};

use crate::process::{ProcessEnv, combined_output};

/// Runs command lines through `sh -c`.
///
/// Elevation goes through `sudo -S -p ""`: the credential is written to the
/// child's stdin and never becomes part of an argument or command string.
pub struct ShellExecutor {
    env: ProcessEnv,
    shell: String,
    sudo: String,
}

impl ShellExecutor {
    pub fn new(env: ProcessEnv) -> Self {
        Self {
            env,
            shell: "sh".to_string(),
            sudo: "sudo".to_string(),
        }
    }

    /// Replaces the elevation program (`sudo` by default).
    pub fn with_sudo(mut self, sudo: impl Into<String>) -> Self {
        self.sudo = sudo.into();
        self
    }

    fn shell_command(&self, command: &str) -> Command {
        let mut cmd = self.env.command(&self.shell);
        cmd.arg("-c").arg(command);
        cmd
    }

    fn sudo_command<I, S>(&self, argv: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = self.env.command(&self.sudo);
        cmd.args(["-S", "-p", ""]).args(argv);
        cmd
    }
}

#[async_trait]
impl ProcessExecutor for ShellExecutor {
    async fn run(&self, command: &str) -> CollaboratorResult<String> {
        info!(command = %command, "Running shell command");
        let output = self.env.run(self.shell_command(command), None).await?;
        if !output.status.success() {
            warn!(command = %command, status = %output.status, "Shell command exited unsuccessfully");
        }
        Ok(combined_output(&output))
    }

    async fn run_elevated(
        &self,
        command: &str,
        credential: &Credential,
    ) -> CollaboratorResult<String> {
        info!(command = %command, "Running elevated shell command");
        let cmd = self.sudo_command([self.shell.as_str(), "-c", command]);
        let output = self.env.run(cmd, Some(credential.expose())).await?;
        Ok(combined_output(&output))
    }

    async fn run_system_action(
        &self,
        action: SystemAction,
        credential: &Credential,
    ) -> CollaboratorResult<String> {
        info!(action = ?action, "Running system action");
        let cmd = self.sudo_command(action.argv());
        let output = self.env.run(cmd, Some(credential.expose())).await?;
        Ok(combined_output(&output))
    }
}
