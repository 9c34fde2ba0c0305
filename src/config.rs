use std::path::Path;

use anyhow::Context as _;

use crate::export::ExportOptions;
use crate::foundation::core::Fps;
use crate::foundation::error::{TacticError, TacticResult};
use crate::render::court::DEFAULT_PIXEL_RATIO;
use crate::timeline::builder::TimingConfig;

/// Tunables shared by the preview and export commands. Every field is optional in JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    pub timing: TimingConfig,
    pub export: ExportSettings,
}

/// Video export settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSettings {
    pub fps: Fps,
    pub pixel_ratio: f64,
    pub output_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            pixel_ratio: DEFAULT_PIXEL_RATIO,
            output_name: "out.mp4".to_owned(),
        }
    }
}

impl BoardConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: &Path) -> TacticResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(s: &str) -> TacticResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| TacticError::serde(format!("config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> TacticResult<()> {
        self.timing.validate()?;
        let fps = self.export.fps;
        Fps::new(fps.num, fps.den)?;
        if !self.export.pixel_ratio.is_finite() || self.export.pixel_ratio <= 0.0 {
            return Err(TacticError::validation(
                "export pixel_ratio must be finite and > 0",
            ));
        }
        if self.export.output_name.trim().is_empty() {
            return Err(TacticError::validation("export output_name must not be empty"));
        }
        Ok(())
    }

    /// Export options for the scheduler.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            fps: self.export.fps,
            timing: self.timing,
            output_name: self.export.output_name.clone(),
        }
    }
}
