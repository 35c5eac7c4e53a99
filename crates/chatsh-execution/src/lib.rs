//! External actions for chatsh: shell execution, desktop channels, image
//! capture and AI queries, each implemented by launching a program.

pub mod ai;
pub mod builder;
pub mod capture;
pub mod desktop;
pub mod process;
pub mod shell;

pub use ai::CommandAiQuery;
pub use builder::build_collaborators;
pub use capture::{CameraCapture, ScreenCapture};
pub use desktop::{EspeakSynthesizer, NotifySendNotifier};
pub use process::ProcessEnv;
pub use shell::ShellExecutor;
