//! AI queries delegated to an external command-line client.

use async_trait::async_trait;
use tracing::info;

use chatsh_core::collaborator::{AiQuery, CollaboratorResult};

use crate::process::{ProcessEnv, require_success, split_argv};

/// Runs the configured client with `--` and then the prompt as its last
/// arguments, and returns its standard output.
pub struct CommandAiQuery {
    env: ProcessEnv,
    argv: Vec<String>,
}

impl CommandAiQuery {
    pub fn new(env: ProcessEnv, argv: Vec<String>) -> Self {
        Self { env, argv }
    }
}

#[async_trait]
impl AiQuery for CommandAiQuery {
    async fn ask(&self, prompt: &str) -> CollaboratorResult<String> {
        let (program, args) = split_argv(&self.argv, "AI query")?;
        info!(program = %program, prompt_len = prompt.len(), "Delegating to AI client");

        let mut cmd = self.env.command(program);
        cmd.args(args).arg("--").arg(prompt);
        let output = self.env.run(cmd, None).await?;
        require_success(program, &output)?;

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatsh_core::collaborator::CollaboratorError;

    fn print_args_client() -> CommandAiQuery {
        CommandAiQuery::new(
            ProcessEnv::default(),
            vec![
                "sh".to_string(),
                "-c".to_string(),
                r#"for a; do printf "[%s]" "$a"; done"#.to_string(),
                "client".to_string(),
                "-m".to_string(),
                "small".to_string(),
            ],
        )
    }

    #[tokio::test]
    async fn test_prompt_is_last_argument() {
        let ai = print_args_client();
        assert_eq!(
            ai.ask("what time is it").await.unwrap(),
            "[-m][small][--][what time is it]"
        );
    }

    #[tokio::test]
    async fn test_prompt_starting_with_dash_is_not_an_option() {
        let ai = print_args_client();
        assert_eq!(ai.ask("--help").await.unwrap(), "[-m][small][--][--help]");
    }

    #[tokio::test]
    async fn test_client_failure_is_an_error() {
        let ai = CommandAiQuery::new(
            ProcessEnv::default(),
            vec![
                "sh".to_string(),
                "-c".to_string(),
                "echo 'quota exceeded' >&2; exit 2".to_string(),
                "client".to_string(),
            ],
        );
        assert_eq!(
            ai.ask("hi").await.unwrap_err(),
            CollaboratorError::Failed("quota exceeded".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_argv_is_not_configured() {
        let ai = CommandAiQuery::new(ProcessEnv::default(), Vec::new());
        assert!(matches!(
            ai.ask("hi").await,
            Err(CollaboratorError::NotConfigured(_))
        ));
    }
}
