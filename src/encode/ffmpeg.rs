use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context as _;

use crate::encode::sink::Encoder;
use crate::foundation::core::Fps;
use crate::foundation::error::{TacticError, TacticResult};

static WORKDIR_SEQ: AtomicU64 = AtomicU64::new(0);

/// Encoder that stages stills in a private scratch directory and runs the system `ffmpeg`.
///
/// Every instance owns its own directory, so concurrent exports never share file names.
/// The directory is removed on drop.
pub struct FfmpegEncoder {
    workdir: PathBuf,
    created: bool,
}

impl FfmpegEncoder {
    /// Encoder whose scratch directory lives under the system temp dir.
    pub fn new() -> Self {
        Self::in_dir(std::env::temp_dir())
    }

    /// Encoder whose scratch directory lives under `root`.
    pub fn in_dir(root: impl AsRef<Path>) -> Self {
        let seq = WORKDIR_SEQ.fetch_add(1, Ordering::Relaxed);
        let stamp = chrono::Utc::now().timestamp_micros();
        let workdir = root.as_ref().join(format!(
            "tacticboard-export-{}-{stamp}-{seq}",
            std::process::id()
        ));
        Self {
            workdir,
            created: false,
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn path_of(&self, name: &str) -> TacticResult<PathBuf> {
        if !self.created {
            return Err(TacticError::export("ffmpeg encoder not loaded"));
        }
        // Names are flat; refuse anything that could escape the scratch dir.
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(TacticError::validation(format!("invalid asset name '{name}'")));
        }
        Ok(self.workdir.join(name))
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for FfmpegEncoder {
    fn load(&mut self) -> TacticResult<()> {
        if !is_ffmpeg_on_path() {
            return Err(TacticError::export(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }
        std::fs::create_dir_all(&self.workdir).with_context(|| {
            format!(
                "failed to create export scratch directory '{}'",
                self.workdir.display()
            )
        })?;
        self.created = true;
        tracing::debug!(workdir = %self.workdir.display(), "ffmpeg encoder ready");
        Ok(())
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> TacticResult<()> {
        let path = self.path_of(name)?;
        std::fs::write(&path, data)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        Ok(())
    }

    fn encode(&mut self, fps: Fps, input_pattern: &str, output: &str) -> TacticResult<()> {
        let out_path = self.path_of(output)?;
        let result = Command::new("ffmpeg")
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .args(["-y", "-loglevel", "error", "-framerate"])
            .arg(fps.to_ffmpeg_arg())
            .args(["-i", input_pattern])
            .args([
                "-c:v",
                "libx264",
                "-preset",
                "ultrafast",
                "-pix_fmt",
                "yuv420p",
            ])
            .arg(&out_path)
            .output()
            .map_err(|e| {
                TacticError::export(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(TacticError::export(format!(
                "ffmpeg exited with status {}: {}",
                result.status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn read_file(&mut self, name: &str) -> TacticResult<Vec<u8>> {
        let path = self.path_of(name)?;
        let bytes =
            std::fs::read(&path).with_context(|| format!("failed to read '{}'", path.display()))?;
        Ok(bytes)
    }

    fn delete_file(&mut self, name: &str) -> TacticResult<()> {
        let path = self.path_of(name)?;
        std::fs::remove_file(&path)
            .with_context(|| format!("failed to delete '{}'", path.display()))?;
        Ok(())
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        if self.created
            && let Err(e) = std::fs::remove_dir_all(&self.workdir)
        {
            tracing::warn!(workdir = %self.workdir.display(), error = %e, "failed to remove export scratch directory");
        }
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> TacticResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
