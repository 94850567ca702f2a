//! Runtime configuration for the supermarket engine.
//!
//! Every knob has a default so the engine runs without a config file at all;
//! a TOML file can override any subset of fields.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration, one table per concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub product: ProductConfig,
    pub autocomplete: AutocompleteConfig,
    pub clock: ClockConfig,
}

/// Product placement and replacement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    /// Most modifiers honored on a single product; extras are ignored.
    pub max_modifiers: usize,
    /// Volume assigned when an add carries no volume clause, in dB.
    pub base_volume_db: f32,
    /// Pause between tearing a product down and building its replacement, in ms.
    pub settle_ms: u64,
    /// Fade handed to the sound bank on teardown, in ms.
    pub fade_ms: u64,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            max_modifiers: 3,
            base_volume_db: -12.0,
            settle_ms: 60,
            fade_ms: 50,
        }
    }
}

/// Completion behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    /// Cap on suggestions returned per query.
    pub max_suggestions: usize,
    /// Typing pause before the suggestion context is recomputed, in ms.
    pub debounce_ms: u64,
    /// Minimum partial-word length before suggestions appear on a fresh line.
    pub min_chars_to_trigger: usize,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 8,
            debounce_ms: 100,
            min_chars_to_trigger: 2,
        }
    }
}

/// Performance clock settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub bpm: f32,
    pub beats_per_bar: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            beats_per_bar: 4,
        }
    }
}

impl StoreConfig {
    /// Load settings from a TOML file; unset fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("could not read config {}: {}", path.display(), e))?;
        toml::from_str(&text)
            .map_err(|e| format!("could not parse config {}: {}", path.display(), e))
    }
}
