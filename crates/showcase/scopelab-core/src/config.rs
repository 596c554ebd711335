//! Core configuration for scopelab-core.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Session-wide tunables. Every field has a default, so partial JSON objects
/// (or `undefined` from JS) are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum entries retained per log surface before oldest-first eviction.
    pub log_capacity: usize,
    /// Log surface used when the caller does not name one.
    pub default_log_surface: String,

    /// Delay between animation steps in a sequence run.
    pub step_delay_ms: u64,
    /// Duration a single `trigger` animation keeps its marker.
    pub animation_duration_ms: u64,
    /// Duration of a background color transition.
    pub color_transition_ms: u64,

    /// Time after hiding a modal before its content is reset.
    pub modal_animation_ms: u64,
    /// Loader text when none is given.
    pub loader_message: String,

    /// Upper bound (in characters) for `validate_and_process_input`.
    pub max_input_length: usize,

    /// Seed for random animation selection; `None` derives one from the clock.
    pub rng_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_capacity: 10,
            default_log_surface: "results".to_string(),
            step_delay_ms: 1000,
            animation_duration_ms: 1000,
            color_transition_ms: 500,
            modal_animation_ms: 300,
            loader_message: "Loading...".to_string(),
            max_input_length: 100,
            rng_seed: None,
        }
    }
}

impl Config {
    /// Parse a config from JSON text; missing fields take defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(text)?;
        Ok(cfg)
    }
}
