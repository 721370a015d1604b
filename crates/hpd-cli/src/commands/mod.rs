//! Command handler modules for hpd-cli.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod report;

use anyhow::{Context, Result};
use hpd_config::{LoadedConfig, UnusedKeyPolicy};
use tracing::warn;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load layered config from `paths`, or an empty config when none are given.
///
/// Unused keys are logged, or fatal with `policy == Fail`.
pub fn load_config(paths: &[String], policy: UnusedKeyPolicy) -> Result<LoadedConfig> {
    let loaded = if paths.is_empty() {
        hpd_config::load_layered_yaml_from_strings(&[])?
    } else {
        let refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
        hpd_config::load_layered_yaml(&refs).context("config load failed")?
    };

    let unused = hpd_config::report_unused_keys(&loaded.config_json, policy)?;
    for ptr in &unused.unused_leaf_pointers {
        warn!(pointer = %ptr, "unused config key");
    }

    Ok(loaded)
}

/// Honour the NO_COLOR convention (any non-empty value disables colour).
pub fn no_color_env() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
}
