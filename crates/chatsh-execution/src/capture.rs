//! Camera and screen capture.
//!
//! Both captures write intermediate files into a work directory under
//! unique names and remove them once the image bytes are read.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use chatsh_core::collaborator::{CollaboratorError, CollaboratorResult, ImageCapture};
use chatsh_infrastructure::dto::CaptureConfig;

use crate::process::{ProcessEnv, combined_output, require_success, split_argv};

fn work_dir(config: &CaptureConfig) -> PathBuf {
    config.work_dir.clone().unwrap_or_else(std::env::temp_dir)
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        debug!(path = %path.display(), error = %e, "Failed to remove capture file");
    }
}

/// Grabs frames from a webcam and returns the last one.
///
/// The grabber is given `-o <stem>00.jpeg` and numbers the frames itself;
/// the first frames are usually underexposed.
pub struct CameraCapture {
    env: ProcessEnv,
    config: CaptureConfig,
}

impl CameraCapture {
    pub fn new(env: ProcessEnv, config: CaptureConfig) -> Self {
        Self { env, config }
    }

    fn frame_path(dir: &Path, stem: &str, index: u32) -> PathBuf {
        dir.join(format!("{}{:02}.jpeg", stem, index))
    }
}

#[async_trait]
impl ImageCapture for CameraCapture {
    async fn capture(&self) -> CollaboratorResult<Vec<u8>> {
        let (program, args) = split_argv(&self.config.camera_program, "Camera")?;
        let dir = work_dir(&self.config);
        tokio::fs::create_dir_all(&dir).await?;

        let stem = format!("chatsh-photo-{}-", Uuid::new_v4());
        let first = Self::frame_path(&dir, &stem, 0);
        let frames = self.config.frames.max(1);

        info!(program = %program, frames, "Capturing camera frames");
        let mut cmd = self.env.command(program);
        cmd.args(args).arg("-o").arg(&first);
        let output = self.env.run(cmd, None).await?;

        let last = Self::frame_path(&dir, &stem, frames - 1);
        let image = tokio::fs::read(&last).await;
        for index in 0..frames {
            remove_quietly(&Self::frame_path(&dir, &stem, index)).await;
        }

        match image {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                warn!(error = %e, "Camera produced no frame");
                require_success(program, &output)?;
                let detail = combined_output(&output);
                Err(CollaboratorError::Failed(if detail.trim().is_empty() {
                    "Camera produced no image.".to_string()
                } else {
                    detail.trim().to_string()
                }))
            }
        }
    }
}

/// Captures the whole screen and converts it to JPEG.
pub struct ScreenCapture {
    env: ProcessEnv,
    config: CaptureConfig,
}

impl ScreenCapture {
    pub fn new(env: ProcessEnv, config: CaptureConfig) -> Self {
        Self { env, config }
    }

    async fn capture_into(&self, png: &Path, jpg: &Path) -> CollaboratorResult<Vec<u8>> {
        let (grabber, grab_args) = split_argv(&self.config.screen_program, "Display")?;
        let (converter, convert_args) = split_argv(&self.config.convert_program, "Display")?;

        let mut grab = self.env.command(grabber);
        grab.args(grab_args).arg(png);
        let output = self.env.run(grab, None).await?;
        require_success(grabber, &output)?;

        let mut convert = self.env.command(converter);
        convert.args(convert_args).arg(png).arg(jpg);
        let output = self.env.run(convert, None).await?;
        require_success(converter, &output)?;

        Ok(tokio::fs::read(jpg).await?)
    }
}

#[async_trait]
impl ImageCapture for ScreenCapture {
    async fn capture(&self) -> CollaboratorResult<Vec<u8>> {
        let dir = work_dir(&self.config);
        tokio::fs::create_dir_all(&dir).await?;

        let id = Uuid::new_v4();
        let png = dir.join(format!("chatsh-screen-{}.png", id));
        let jpg = dir.join(format!("chatsh-screen-{}.jpg", id));

        info!("Capturing screen");
        let result = self.capture_into(&png, &jpg).await;
        remove_quietly(&png).await;
        remove_quietly(&jpg).await;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn config(dir: &TempDir) -> CaptureConfig {
        CaptureConfig {
            work_dir: Some(dir.path().to_path_buf()),
            ..CaptureConfig::default()
        }
    }

    #[tokio::test]
    async fn test_camera_returns_last_frame_and_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        // Writes frames 00..03 next to the `-o` path, each holding its index.
        let script = r#"out="$2"; base="${out%00.jpeg}"; for i in 0 1 2 3; do printf "frame$i" > "${base}0$i.jpeg"; done"#;
        let mut config = config(&temp_dir);
        config.camera_program = argv(&["sh", "-c", script, "grabber"]);

        let camera = CameraCapture::new(ProcessEnv::default(), config);
        let bytes = camera.capture().await.unwrap();

        assert_eq!(bytes, b"frame3");
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_camera_without_frames_reports_output() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config(&temp_dir);
        config.camera_program = argv(&["sh", "-c", "echo no device", "grabber"]);

        let err = CameraCapture::new(ProcessEnv::default(), config)
            .capture()
            .await
            .unwrap_err();
        assert_eq!(err, CollaboratorError::Failed("no device".to_string()));
    }

    #[tokio::test]
    async fn test_screen_grabs_and_converts() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config(&temp_dir);
        config.screen_program = argv(&["sh", "-c", "printf png > \"$1\"", "grab"]);
        config.convert_program = argv(&["cp"]);

        let bytes = ScreenCapture::new(ProcessEnv::default(), config)
            .capture()
            .await
            .unwrap();

        assert_eq!(bytes, b"png");
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_screen_failure_is_surfaced() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config(&temp_dir);
        config.screen_program = argv(&["sh", "-c", "echo 'unable to open X server' >&2; exit 1", "grab"]);

        let err = ScreenCapture::new(ProcessEnv::default(), config)
            .capture()
            .await
            .unwrap_err();
        assert_eq!(err, CollaboratorError::Failed("unable to open X server".to_string()));
    }
}
