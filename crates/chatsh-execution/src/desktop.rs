//! Desktop channels: notifications and speech.

use async_trait::async_trait;
use tracing::info;

use chatsh_core::collaborator::{CollaboratorResult, Language, Notifier, SpeechSynthesizer};
use chatsh_infrastructure::dto::SpeechConfig;

use crate::process::{ProcessEnv, combined_output};

/// Shows notifications with `notify-send` (or a compatible program).
pub struct NotifySendNotifier {
    env: ProcessEnv,
    program: String,
}

impl NotifySendNotifier {
    pub fn new(env: ProcessEnv, program: impl Into<String>) -> Self {
        Self {
            env,
            program: program.into(),
        }
    }
}

#[async_trait]
impl Notifier for NotifySendNotifier {
    async fn notify(&self, text: &str) -> CollaboratorResult<String> {
        info!(program = %self.program, "Sending desktop notification");
        let mut cmd = self.env.command(&self.program);
        cmd.arg("--").arg(text);
        let output = self.env.run(cmd, None).await?;
        Ok(combined_output(&output))
    }
}

/// Speaks text with `espeak`.
pub struct EspeakSynthesizer {
    env: ProcessEnv,
    config: SpeechConfig,
}

impl EspeakSynthesizer {
    pub fn new(env: ProcessEnv, config: SpeechConfig) -> Self {
        Self { env, config }
    }

    /// Arguments following the program name; the text comes last, after `--`.
    pub fn args(&self, text: &str, language: Language) -> Vec<String> {
        let voice = match language {
            Language::English => &self.config.english_voice,
            Language::Spanish => &self.config.spanish_voice,
        };
        vec![
            "-v".to_string(),
            voice.clone(),
            "-p".to_string(),
            self.config.pitch.to_string(),
            "-s".to_string(),
            self.config.speed.to_string(),
            "--".to_string(),
            text.to_string(),
        ]
    }
}

#[async_trait]
impl SpeechSynthesizer for EspeakSynthesizer {
    async fn speak(&self, text: &str, language: Language) -> CollaboratorResult<String> {
        info!(language = ?language, "Speaking text");
        let mut cmd = self.env.command(&self.config.program);
        cmd.args(self.args(text, language));
        let output = self.env.run(cmd, None).await?;
        Ok(combined_output(&output))
    }
}
