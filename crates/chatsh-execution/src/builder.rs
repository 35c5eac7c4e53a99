//! Assembles collaborators from the application configuration.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use chatsh_core::Collaborators;
use chatsh_infrastructure::dto::AppConfig;

use crate::ai::CommandAiQuery;
use crate::capture::{CameraCapture, ScreenCapture};
use crate::desktop::{EspeakSynthesizer, NotifySendNotifier};
use crate::process::ProcessEnv;
use crate::shell::ShellExecutor;

/// Builds the collaborator set for `config`.
///
/// Channels whose configuration is absent are left out, so the dispatcher
/// reports them as not configured:
/// - speech and screen capture need `desktop.display`
/// - notifications need `desktop.display` and `desktop.notifications`
/// - the camera needs `capture.camera`
/// - AI queries need a non-empty `ai.command`
///
/// Every launched program is killed after `engine.action_timeout_secs`.
pub fn build_collaborators(config: &AppConfig) -> Collaborators {
    let env = ProcessEnv::with_display(config.desktop.display.clone())
        .with_timeout(Duration::from_secs(config.engine.action_timeout_secs));
    let has_display = config.desktop.display.is_some();

    let mut collaborators = Collaborators::new(Arc::new(ShellExecutor::new(env.clone())));

    if has_display {
        collaborators.speech = Some(Arc::new(EspeakSynthesizer::new(
            env.clone(),
            config.speech.clone(),
        )));
        collaborators.screen = Some(Arc::new(ScreenCapture::new(
            env.clone(),
            config.capture.clone(),
        )));
        if config.desktop.notifications {
            collaborators.notifier = Some(Arc::new(NotifySendNotifier::new(
                env.clone(),
                config.desktop.notify_program.clone(),
            )));
        }
    }

    if config.capture.camera {
        collaborators.camera = Some(Arc::new(CameraCapture::new(
            env.clone(),
            config.capture.clone(),
        )));
    }

    if !config.ai.command.is_empty() {
        collaborators.ai = Some(Arc::new(CommandAiQuery::new(env, config.ai.command.clone())));
    }

    info!(
        display = has_display,
        notifier = collaborators.notifier.is_some(),
        camera = collaborators.camera.is_some(),
        ai = collaborators.ai.is_some(),
        "Collaborators ready"
    );
    collaborators
}
