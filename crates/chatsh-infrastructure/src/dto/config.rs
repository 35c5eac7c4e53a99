//! Application configuration file format (`config.toml`).
//!
//! Every section is optional; missing keys take the defaults below.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use chatsh_core::FallbackPolicy;
use chatsh_core::dispatch::reply::DEFAULT_MAX_REPLY_BYTES;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineSection,
    pub desktop: DesktopConfig,
    pub speech: SpeechConfig,
    pub capture: CaptureConfig,
    pub ai: AiConfig,
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSection {
    pub max_reply_bytes: usize,
    pub fallback: FallbackPolicy,
    /// Seconds an external action may run before it is killed
    pub action_timeout_secs: u64,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            max_reply_bytes: DEFAULT_MAX_REPLY_BYTES,
            fallback: FallbackPolicy::default(),
            action_timeout_secs: 120,
        }
    }
}

/// The graphical session that speech, notifications and screenshots use.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DesktopConfig {
    /// X display, e.g. `:0.0`; absent means no display or voice channel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Enables `notify`; also requires `display`
    pub notifications: bool,
    /// Program used for notifications
    pub notify_program: String,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            display: None,
            notifications: false,
            notify_program: "notify-send".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    pub program: String,
    pub english_voice: String,
    pub spanish_voice: String,
    pub pitch: u32,
    pub speed: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            program: "espeak".to_string(),
            english_voice: "mb/mb-en1".to_string(),
            spanish_voice: "mb/mb-es2".to_string(),
            pitch: 45,
            speed: 160,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Enables `photo`
    pub camera: bool,
    /// Camera grabber argv; `-o <file>` is appended
    pub camera_program: Vec<String>,
    /// Frames grabbed per photo; the last one is sent
    pub frames: u32,
    /// Screenshot argv; the output file is appended
    pub screen_program: Vec<String>,
    /// Converter argv; input and output files are appended
    pub convert_program: Vec<String>,
    /// Directory for intermediate image files; system temp dir when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            camera: false,
            camera_program: vec![
                "streamer".to_string(),
                "-t".to_string(),
                "4".to_string(),
                "-r".to_string(),
                "2".to_string(),
            ],
            frames: 4,
            screen_program: vec![
                "import".to_string(),
                "-window".to_string(),
                "root".to_string(),
            ],
            convert_program: vec!["convert".to_string()],
            work_dir: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    /// AI client argv; the query is appended as the last argument
    pub command: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to a daily file under the log directory
    pub file: bool,
    /// Filter directive for the log file
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: false,
            level: "info".to_string(),
        }
    }
}
