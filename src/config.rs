use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scoring::ScoringScheme;
use crate::{AlignerError, Result};

/// Pacing and presentation of the matrix replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub frame_delay_ms: u64,
    pub min_frame_delay_ms: u64,
    pub speedup_step_ms: u64,
    pub color: bool,
    /// When false only the finished matrix is shown.
    pub show_trace: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            frame_delay_ms: 500,
            min_frame_delay_ms: 100,
            speedup_step_ms: 100,
            color: true,
            show_trace: true,
        }
    }
}

impl ReplayConfig {
    /// Shortens the frame delay by one step, down to the configured floor.
    pub fn accelerate(&mut self) -> u64 {
        self.frame_delay_ms = self
            .frame_delay_ms
            .saturating_sub(self.speedup_step_ms)
            .max(self.min_frame_delay_ms);
        self.frame_delay_ms
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scoring: ScoringScheme,
    pub replay: ReplayConfig,
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| AlignerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AlignerError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        let replay = &self.replay;
        if replay.min_frame_delay_ms > replay.frame_delay_ms {
            return Err(AlignerError::Config(format!(
                "min_frame_delay_ms ({}) exceeds frame_delay_ms ({})",
                replay.min_frame_delay_ms, replay.frame_delay_ms
            )));
        }
        Ok(())
    }
}
