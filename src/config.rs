//! Editor configuration.
//!
//! Every field has a default, so hosts only pass the keys they want to
//! change (e.g. `{"percentage_step": 0.1}` from the FFI side).

use serde::{Deserialize, Serialize};

use crate::error::EditorResult;

/// Tunables for the width controls and the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Step applied by the +/- buttons, as a factor (0.05 = 5%).
    pub percentage_step: f64,
    /// Accepted per-measure text input, in percent (inclusive).
    pub measure_input_range: PercentRange,
    /// Accepted sheet-wide text input, in percent (inclusive).
    /// Stricter at the low end: very small sheet factors break layout.
    pub sheet_input_range: PercentRange,
    /// Opacity of the current-area highlight.
    pub highlight_alpha: f64,
    /// Export filename when the host has none.
    pub fallback_filename: String,
}

/// Inclusive percentage bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentRange {
    pub min: f64,
    pub max: f64,
}

impl PercentRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, percent: f64) -> bool {
        percent >= self.min && percent <= self.max
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            percentage_step: 0.05,
            measure_input_range: PercentRange::new(10.0, 500.0),
            sheet_input_range: PercentRange::new(50.0, 500.0),
            highlight_alpha: 0.1,
            fallback_filename: "sample.musicxml".to_string(),
        }
    }
}

impl EditorConfig {
    /// Build a config from a JSON object, falling back to defaults for
    /// missing keys.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
