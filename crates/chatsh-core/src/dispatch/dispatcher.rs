//! Routes parsed verbs to collaborators and turns their results into replies.

use std::fmt::Write as _;

use tracing::{debug, warn};

use crate::alias::AliasStore;
use crate::collaborator::{CollaboratorError, Collaborators, Credential};
use crate::config::{EngineConfig, FallbackPolicy};
use crate::dispatch::reply::{Reply, truncate_utf8};
use crate::dispatch::verb::{GRAMMAR, Verb};

/// Reply for a line that matches no verb and has nowhere to go.
pub const UNKNOWN_COMMAND: &str = "Unknown command. Send 'help' to list commands.";

/// Executes verbs for authorized sessions.
pub struct Dispatcher {
    collaborators: Collaborators,
    sudo_password: Option<Credential>,
    max_reply_bytes: usize,
    fallback: FallbackPolicy,
    help_text: Option<String>,
}

impl Dispatcher {
    pub fn new(config: &EngineConfig, collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            sudo_password: config.sudo_password.clone(),
            max_reply_bytes: config.max_reply_bytes,
            fallback: config.fallback,
            help_text: config.help_text.clone(),
        }
    }

    /// Parses and executes one resolved line.
    ///
    /// Never fails: usage errors and collaborator failures come back as text.
    pub async fn dispatch(&self, aliases: &mut AliasStore, line: &str) -> Reply {
        let verb = match Verb::parse(line) {
            Ok(verb) => verb,
            Err(e) => return self.text(e.to_string()),
        };
        debug!(?verb, "Dispatching");

        match verb {
            Verb::ListAliases => self.text(format_aliases(aliases)),
            Verb::DefineAlias { name, template } => match aliases.create_or_update(name, template) {
                Ok(()) if aliases.builtin().contains(name) => self.text(format!(
                    "Alias '{}' saved, but the built-in alias of the same name takes precedence.",
                    name.to_lowercase()
                )),
                Ok(()) => self.text(format!("Alias '{}' saved.", name.to_lowercase())),
                Err(e) => self.text(e.to_string()),
            },
            Verb::Describe { name, text } => match aliases.set_description(name, text) {
                Ok(()) => self.text(format!("Description of '{}' saved.", name.to_lowercase())),
                Err(e) => self.text(e.to_string()),
            },
            Verb::LoadAliases => {
                aliases.reload();
                self.text(format!(
                    "Aliases loaded: {} built-in, {} user.",
                    aliases.builtin().len(),
                    aliases.user().len()
                ))
            }
            Verb::Help => self.help(aliases),
            Verb::Sys(command) => {
                self.output(self.collaborators.executor.run(command).await)
            }
            Verb::Sudo(command) => match &self.sudo_password {
                Some(credential) => self.output(
                    self.collaborators
                        .executor
                        .run_elevated(command, credential)
                        .await,
                ),
                None => self.output(Err(CollaboratorError::NotConfigured("Elevated credential"))),
            },
            Verb::System(action) => match &self.sudo_password {
                Some(credential) => self.output(
                    self.collaborators
                        .executor
                        .run_system_action(action, credential)
                        .await,
                ),
                None => self.output(Err(CollaboratorError::NotConfigured("Elevated credential"))),
            },
            Verb::Notify(text) => match &self.collaborators.notifier {
                Some(notifier) => self.output(notifier.notify(text).await),
                None => self.output(Err(CollaboratorError::NotConfigured("Notification channel"))),
            },
            Verb::Say { text, language } => match &self.collaborators.speech {
                Some(speech) => self.output(speech.speak(text, language).await),
                None => self.output(Err(CollaboratorError::NotConfigured("Voice channel"))),
            },
            Verb::Photo => match &self.collaborators.camera {
                Some(camera) => Reply::from_image(camera.capture().await, self.max_reply_bytes),
                None => self.output(Err(CollaboratorError::NotConfigured("Camera"))),
            },
            Verb::Screen => match &self.collaborators.screen {
                Some(screen) => Reply::from_image(screen.capture().await, self.max_reply_bytes),
                None => self.output(Err(CollaboratorError::NotConfigured("Display"))),
            },
            Verb::Fallback(text) => self.fallback(text).await,
        }
    }

    /// Full help for an authorized session.
    pub fn help(&self, aliases: &AliasStore) -> Reply {
        match &self.help_text {
            Some(text) => self.text(text.clone()),
            None => self.text(format!("{}\n{}", format_grammar(), format_aliases(aliases))),
        }
    }

    /// Greets an authorized session with the account the shell runs as.
    pub async fn greet(&self) -> Reply {
        match self.collaborators.executor.run("whoami").await {
            Ok(name) if !name.trim().is_empty() => self.text(format!("Hi {}", name.trim())),
            Ok(_) => self.text("Hi"),
            Err(e) => {
                warn!(error = %e, "Failed to look up the account name");
                self.text("Hi")
            }
        }
    }

    async fn fallback(&self, text: &str) -> Reply {
        match (self.fallback, &self.collaborators.ai) {
            (FallbackPolicy::Ai, Some(ai)) => self.output(ai.ask(text).await),
            _ => self.text(UNKNOWN_COMMAND),
        }
    }

    fn output(&self, result: Result<String, CollaboratorError>) -> Reply {
        if let Err(e) = &result {
            warn!(error = %e, "Action failed");
        }
        Reply::from_output(result, self.max_reply_bytes)
    }

    fn text(&self, text: impl AsRef<str>) -> Reply {
        Reply::text(truncate_utf8(text.as_ref(), self.max_reply_bytes))
    }
}

fn format_grammar() -> String {
    let mut out = String::from("Commands:\n");
    for rule in GRAMMAR {
        let _ = write!(out, "  {}", rule.usage);
        if rule.keywords.len() > 1 {
            let _ = write!(out, " (also: {})", rule.keywords[1..].join(", "));
        }
        out.push('\n');
    }
    out.push_str("  hi\n  logout\n  restart\n");
    out
}

fn format_aliases(aliases: &AliasStore) -> String {
    if aliases.builtin().is_empty() && aliases.user().is_empty() {
        return "No aliases defined.".to_string();
    }
    let mut out = String::new();
    for (title, table) in [("Built-in aliases", aliases.builtin()), ("User aliases", aliases.user())] {
        if table.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}:", title);
        for (name, entry) in table.iter() {
            let _ = write!(out, "  {} -> {}", name, entry.command);
            if let Some(description) = &entry.description {
                let _ = write!(out, " ({})", description);
            }
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::{AliasEntry, AliasRepository, AliasTable};
    use crate::collaborator::{
        AiQuery, CollaboratorResult, ImageCapture, Language, ProcessExecutor, SpeechSynthesizer,
        SystemAction,
    };
    use crate::error::Result;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingExecutor {
        calls: Mutex<Vec<String>>,
        output: String,
    }

    #[async_trait]
    impl ProcessExecutor for RecordingExecutor {
        async fn run(&self, command: &str) -> CollaboratorResult<String> {
            self.calls.lock().unwrap().push(format!("run:{}", command));
            Ok(self.output.clone())
        }

        async fn run_elevated(
            &self,
            command: &str,
            credential: &Credential,
        ) -> CollaboratorResult<String> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("sudo:{}:{}", credential.expose(), command));
            Ok(self.output.clone())
        }

        async fn run_system_action(
            &self,
            action: SystemAction,
            _credential: &Credential,
        ) -> CollaboratorResult<String> {
            self.calls.lock().unwrap().push(format!("system:{:?}", action));
            Ok(String::new())
        }
    }

    struct EchoSpeech;

    #[async_trait]
    impl SpeechSynthesizer for EchoSpeech {
        async fn speak(&self, text: &str, language: Language) -> CollaboratorResult<String> {
            Ok(format!("{:?}:{}", language, text))
        }
    }

    struct BrokenCamera;

    #[async_trait]
    impl ImageCapture for BrokenCamera {
        async fn capture(&self) -> CollaboratorResult<Vec<u8>> {
            Err(CollaboratorError::Unavailable("streamer: command not found".into()))
        }
    }

    struct Oracle;

    #[async_trait]
    impl AiQuery for Oracle {
        async fn ask(&self, prompt: &str) -> CollaboratorResult<String> {
            Ok(format!("answer to {}", prompt))
        }
    }

    struct NullRepository;

    impl AliasRepository for NullRepository {
        fn load_builtin(&self) -> Result<AliasTable> {
            Ok([("up", AliasEntry::with_description("uptime", "load"))]
                .into_iter()
                .collect())
        }

        fn load_user(&self) -> Result<AliasTable> {
            Ok(AliasTable::new())
        }

        fn save_user(&self, _table: &AliasTable) -> Result<()> {
            Ok(())
        }
    }

    fn aliases() -> AliasStore {
        AliasStore::load(Arc::new(NullRepository))
    }

    fn dispatcher(executor: Arc<RecordingExecutor>, sudo: bool) -> Dispatcher {
        let mut config = EngineConfig::new(Credential::new("pw"));
        config.max_reply_bytes = 64;
        if sudo {
            config.sudo_password = Some(Credential::new("root-pw"));
        }
        Dispatcher::new(&config, Collaborators::new(executor))
    }

    #[tokio::test]
    async fn test_sys_runs_command_and_acknowledges_empty_output() {
        let executor = Arc::new(RecordingExecutor::default());
        let dispatcher = dispatcher(executor.clone(), false);

        let reply = dispatcher.dispatch(&mut aliases(), "sys touch /tmp/x").await;

        assert_eq!(reply, Reply::text("Done."));
        assert_eq!(*executor.calls.lock().unwrap(), vec!["run:touch /tmp/x"]);
    }

    #[tokio::test]
    async fn test_long_output_is_truncated() {
        let executor = Arc::new(RecordingExecutor {
            output: "ñ".repeat(100),
            ..Default::default()
        });
        let dispatcher = dispatcher(executor, false);

        let reply = dispatcher.dispatch(&mut aliases(), "sys cat big").await;

        let text = reply.as_text().unwrap();
        assert_eq!(text.len(), 64);
        assert_eq!(text, "ñ".repeat(32));
    }

    #[tokio::test]
    async fn test_sudo_without_credential_is_not_configured() {
        let executor = Arc::new(RecordingExecutor::default());
        let dispatcher = dispatcher(executor.clone(), false);

        let reply = dispatcher.dispatch(&mut aliases(), "sudo apt update").await;
        assert_eq!(reply.as_text(), Some("Elevated credential is not configured."));
        let reply = dispatcher.dispatch(&mut aliases(), "reboot").await;
        assert_eq!(reply.as_text(), Some("Elevated credential is not configured."));
        assert!(executor.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sudo_passes_credential_separately() {
        let executor = Arc::new(RecordingExecutor::default());
        let dispatcher = dispatcher(executor.clone(), true);

        dispatcher.dispatch(&mut aliases(), "sudo whoami").await;
        dispatcher.dispatch(&mut aliases(), "shutdown").await;

        assert_eq!(
            *executor.calls.lock().unwrap(),
            vec!["sudo:root-pw:whoami", "system:Shutdown"]
        );
    }

    #[tokio::test]
    async fn test_optional_channels_report_missing_configuration() {
        let dispatcher = dispatcher(Arc::new(RecordingExecutor::default()), false);
        let mut aliases = aliases();

        assert_eq!(
            dispatcher.dispatch(&mut aliases, "notify hi").await.as_text(),
            Some("Notification channel is not configured.")
        );
        assert_eq!(
            dispatcher.dispatch(&mut aliases, "say hi").await.as_text(),
            Some("Voice channel is not configured.")
        );
        assert_eq!(
            dispatcher.dispatch(&mut aliases, "photo").await.as_text(),
            Some("Camera is not configured.")
        );
    }

    #[tokio::test]
    async fn test_capture_failure_is_surfaced_as_text() {
        let mut collaborators = Collaborators::new(Arc::new(RecordingExecutor::default()));
        collaborators.camera = Some(Arc::new(BrokenCamera));
        let dispatcher = Dispatcher::new(&EngineConfig::new(Credential::new("pw")), collaborators);

        let reply = dispatcher.dispatch(&mut aliases(), "foto").await;
        assert_eq!(reply.as_text(), Some("streamer: command not found"));
    }

    #[tokio::test]
    async fn test_speech_language_from_verb() {
        let mut collaborators = Collaborators::new(Arc::new(RecordingExecutor::default()));
        collaborators.speech = Some(Arc::new(EchoSpeech));
        let dispatcher = Dispatcher::new(&EngineConfig::new(Credential::new("pw")), collaborators);

        let reply = dispatcher.dispatch(&mut aliases(), "decir Hola").await;
        assert_eq!(reply.as_text(), Some("Spanish:Hola"));
    }

    #[tokio::test]
    async fn test_fallback_policy() {
        let mut collaborators = Collaborators::new(Arc::new(RecordingExecutor::default()));
        collaborators.ai = Some(Arc::new(Oracle));
        let mut config = EngineConfig::new(Credential::new("pw"));
        let ai = Dispatcher::new(&config, collaborators.clone());
        config.fallback = FallbackPolicy::Unknown;
        let unknown = Dispatcher::new(&config, collaborators);

        assert_eq!(
            ai.dispatch(&mut aliases(), "Why is the sky blue?").await.as_text(),
            Some("answer to Why is the sky blue?")
        );
        assert_eq!(
            unknown.dispatch(&mut aliases(), "Why is the sky blue?").await.as_text(),
            Some(UNKNOWN_COMMAND)
        );
    }

    #[tokio::test]
    async fn test_alias_verbs() {
        let dispatcher = dispatcher(Arc::new(RecordingExecutor::default()), false);
        let mut aliases = aliases();

        let reply = dispatcher.dispatch(&mut aliases, "alias Greet echo ?").await;
        assert_eq!(reply.as_text(), Some("Alias 'greet' saved."));

        let reply = dispatcher.dispatch(&mut aliases, "alias sudo echo").await;
        assert!(reply.as_text().unwrap().contains("reserved"));

        let reply = dispatcher.dispatch(&mut aliases, "describe nope text").await;
        assert_eq!(reply.as_text(), Some("alias 'nope' not found"));

        let reply = dispatcher.dispatch(&mut aliases, "describe greet hello").await;
        assert_eq!(reply.as_text(), Some("Description of 'greet' saved."));
    }

    #[tokio::test]
    async fn test_help_lists_grammar_and_aliases() {
        let dispatcher = Dispatcher::new(
            &EngineConfig::new(Credential::new("pw")),
            Collaborators::new(Arc::new(RecordingExecutor::default())),
        );
        let reply = dispatcher.dispatch(&mut aliases(), "help").await;
        let text = reply.as_text().unwrap();
        assert!(text.contains("sys <command>"));
        assert!(text.contains("up -> uptime (load)\n"));
        assert!(text.contains("  hi\n"));
    }

    #[tokio::test]
    async fn test_greet_names_the_shell_account() {
        let executor = Arc::new(RecordingExecutor {
            output: "operator\n".to_string(),
            ..Default::default()
        });
        let dispatcher = dispatcher(executor.clone(), false);

        assert_eq!(dispatcher.greet().await, Reply::text("Hi operator"));
        assert_eq!(*executor.calls.lock().unwrap(), vec!["run:whoami"]);
    }

    #[tokio::test]
    async fn test_greet_without_account_name() {
        let dispatcher = dispatcher(Arc::new(RecordingExecutor::default()), false);
        assert_eq!(dispatcher.greet().await, Reply::text("Hi"));
    }
}
