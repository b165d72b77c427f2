//! Board configuration loading

use defmt::*;
use keyquiz_core::config::{parse_config, AppConfig};

/// Parse the embedded configuration, falling back to defaults
///
/// build.rs has already validated the file, so a failure here means the
/// build-time and runtime parsers disagree.
pub fn load(source: &str) -> AppConfig {
    match parse_config(source) {
        Ok(config) => {
            info!(
                "Config: {} chip(s), {}x{} keypad, budget {}ms",
                config.display.cascade_size,
                config.keypad.rows.len(),
                config.keypad.cols.len(),
                config.quiz.initial_budget_ms
            );
            config
        }
        Err(e) => {
            warn!("Embedded config rejected ({}), using defaults", e);
            AppConfig::default()
        }
    }
}
