//! On-disk representations of chatsh state and configuration.

pub mod alias;
pub mod config;
pub mod secret;

pub use alias::AliasFile;
pub use config::{
    AiConfig, AppConfig, CaptureConfig, DesktopConfig, EngineSection, LoggingConfig, SpeechConfig,
};
pub use secret::SecretConfig;
