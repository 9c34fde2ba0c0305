use std::collections::BTreeMap;

use crate::foundation::core::Fps;
use crate::foundation::error::{TacticError, TacticResult};

/// Input pattern handed to the encoder; matches [`frame_file_name`].
pub const FRAME_PATTERN: &str = "frame_%04d.png";

/// Zero-padded, gapless still name for export step `i` (`frame_0000.png`, `frame_0001.png`, ...).
pub fn frame_file_name(i: u64) -> String {
    format!("frame_{i:04}.png")
}

/// Encoder contract used by the export scheduler.
///
/// Ordering contract: `write_file` is called for `frame_0000`, `frame_0001`, ... in strictly
/// increasing order with no gaps. Encoders locate stills by pattern, so a gap truncates the video.
pub trait Encoder {
    /// Make the encoder ready (locate binaries, create scratch space). Called once per export.
    fn load(&mut self) -> TacticResult<()>;
    /// Store a named asset.
    fn write_file(&mut self, name: &str, data: &[u8]) -> TacticResult<()>;
    /// Multiplex the stills matching `input_pattern` at `fps` into `output` (H.264, yuv420p).
    fn encode(&mut self, fps: Fps, input_pattern: &str, output: &str) -> TacticResult<()>;
    /// Read back a named asset.
    fn read_file(&mut self, name: &str) -> TacticResult<Vec<u8>>;
    /// Delete a named asset.
    fn delete_file(&mut self, name: &str) -> TacticResult<()>;
}

/// In-memory encoder for tests and dry runs.
///
/// `encode` does not produce a real video: the output is a small text manifest listing the
/// frame rate and the gapless still count found for the pattern.
#[derive(Debug, Default)]
pub struct MemoryEncoder {
    files: BTreeMap<String, Vec<u8>>,
    /// Every name passed to `write_file`, in call order.
    pub(crate) written: Vec<String>,
    /// Every name passed to `delete_file`, in call order.
    pub(crate) deleted: Vec<String>,
    loaded: bool,
    fail_load: bool,
    fail_write_at: Option<usize>,
    fail_encode: bool,
    fail_delete: bool,
}

impl MemoryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `load` fail, as if the encoder binary were missing.
    pub fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    /// Make the `n`-th `write_file` call (0-based) fail.
    pub fn failing_write_at(mut self, n: usize) -> Self {
        self.fail_write_at = Some(n);
        self
    }

    /// Make `encode` fail.
    pub fn failing_encode(mut self) -> Self {
        self.fail_encode = true;
        self
    }

    /// Make every `delete_file` fail (cleanup errors must not be fatal).
    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn written(&self) -> &[String] {
        &self.written
    }

    pub fn deleted(&self) -> &[String] {
        &self.deleted
    }

    /// Names currently stored.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    fn count_sequential(&self, input_pattern: &str) -> TacticResult<u64> {
        if input_pattern != FRAME_PATTERN {
            return Err(TacticError::export(format!(
                "unsupported input pattern '{input_pattern}'"
            )));
        }
        let mut n = 0u64;
        while self.files.contains_key(&frame_file_name(n)) {
            n += 1;
        }
        Ok(n)
    }
}

impl Encoder for MemoryEncoder {
    fn load(&mut self) -> TacticResult<()> {
        if self.fail_load {
            return Err(TacticError::export("memory encoder configured to fail on load"));
        }
        self.loaded = true;
        Ok(())
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> TacticResult<()> {
        if !self.loaded {
            return Err(TacticError::export("encoder not loaded"));
        }
        if self.fail_write_at == Some(self.written.len()) {
            return Err(TacticError::export(format!("failed to write '{name}'")));
        }
        self.written.push(name.to_owned());
        self.files.insert(name.to_owned(), data.to_vec());
        Ok(())
    }

    fn encode(&mut self, fps: Fps, input_pattern: &str, output: &str) -> TacticResult<()> {
        if !self.loaded {
            return Err(TacticError::export("encoder not loaded"));
        }
        if self.fail_encode {
            return Err(TacticError::export("memory encoder configured to fail on encode"));
        }
        let count = self.count_sequential(input_pattern)?;
        if count == 0 {
            return Err(TacticError::export(format!(
                "no input stills match '{input_pattern}'"
            )));
        }
        let manifest = format!("fps={} frames={count}\n", fps.to_ffmpeg_arg());
        self.files.insert(output.to_owned(), manifest.into_bytes());
        Ok(())
    }

    fn read_file(&mut self, name: &str) -> TacticResult<Vec<u8>> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| TacticError::export(format!("no such file '{name}'")))
    }

    fn delete_file(&mut self, name: &str) -> TacticResult<()> {
        self.deleted.push(name.to_owned());
        if self.fail_delete {
            return Err(TacticError::export(format!("failed to delete '{name}'")));
        }
        self.files.remove(name);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
