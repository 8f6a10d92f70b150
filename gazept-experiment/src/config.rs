use std::path::Path;

use gazept_core::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    pub target_count: u32,
    pub ring_radius: f32,
    /// Target diameter, in the same units as the ring radius
    pub target_width: f32,
    pub screen_center: Vec2,
    pub trial_timeout_s: f32,
    pub max_samples_per_trial: usize,
    /// Start the target sequence at a random ring position
    pub randomize_start: bool,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            target_count: 13,
            ring_radius: 300.0,
            target_width: 60.0,
            screen_center: Vec2::new(960.0, 540.0),
            trial_timeout_s: 5.0,
            max_samples_per_trial: 10_000,
            randomize_start: false,
        }
    }
}

impl RecorderConfig {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json_str(&text)?)
    }
}
