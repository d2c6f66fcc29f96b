use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_PRINTS_FILE, DEFAULT_SETS, DEFAULT_TIMEOUT_SECS};
use crate::utils::get_data_dir;

/// Supply-resolution mode for a pipeline run.
///
/// Also selects the matched fetch strategy: rarity-keyed supply pairs with
/// the bulk paginated search, explicit counts pair with targeted per-card
/// lookups driven by the same reference entries. The two modes are never
/// mixed within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyMode {
    /// Estimated counts looked up by rarity tag; cards come from bulk search
    Rarity,
    /// Authoritative per-card counts; cards come from targeted lookups
    Explicit,
}

impl SupplyMode {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "rarity" => Ok(SupplyMode::Rarity),
            "explicit" => Ok(SupplyMode::Explicit),
            _ => Err(format!(
                "Invalid mode: {}. Valid options: rarity, explicit",
                s
            )),
        }
    }
}

/// One set to crawl: display name, catalog set code, and the key its supply
/// data lives under in the rarity-keyed reference file
#[derive(Debug, Clone)]
pub struct SetConfig {
    pub name: String,
    pub catalog_code: String,
    pub supply_key: String,
}

/// Configuration for one pipeline run. Built in the command layer from CLI
/// flags plus compiled defaults; components receive it explicitly instead of
/// reading ambient state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub sets: Vec<SetConfig>,
    pub mode: SupplyMode,
    pub prints_file: PathBuf,
    pub output_dir: PathBuf,
    pub timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sets: DEFAULT_SETS
                .iter()
                .map(|(name, code, key)| SetConfig {
                    name: name.to_string(),
                    catalog_code: code.to_string(),
                    supply_key: key.to_string(),
                })
                .collect(),
            mode: SupplyMode::Rarity,
            prints_file: PathBuf::from(DEFAULT_PRINTS_FILE),
            output_dir: get_data_dir(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PipelineConfig {
    /// Restrict the run to a comma-separated subset of the configured sets
    pub fn filter_sets(&mut self, selection: &str) -> Result<(), String> {
        let wanted: Vec<String> = selection
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        for name in &wanted {
            if !self.sets.iter().any(|s| &s.name == name) {
                let known: Vec<&str> = self.sets.iter().map(|s| s.name.as_str()).collect();
                return Err(format!(
                    "Unknown set: {}. Valid options: {}",
                    name,
                    known.join(", ")
                ));
            }
        }

        self.sets.retain(|s| wanted.contains(&s.name));
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Per-set outcome of a run
#[derive(Debug, Clone)]
pub struct SetRunSummary {
    pub name: String,
    /// Cards emitted into the snapshot
    pub cards: usize,
    /// Cards with a known market cap
    pub capped: usize,
    pub total_market_cap: f64,
}

/// Structured result of one pipeline run, returned to the command layer
/// instead of accumulating state in globals
#[derive(Debug, Clone)]
pub struct RunReport {
    pub rate: f64,
    pub rate_is_fallback: bool,
    pub sets: Vec<SetRunSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supply_mode_from_str() {
        assert_eq!(SupplyMode::from_str("rarity").unwrap(), SupplyMode::Rarity);
        assert_eq!(
            SupplyMode::from_str("EXPLICIT").unwrap(),
            SupplyMode::Explicit
        );
        assert!(SupplyMode::from_str("both").is_err());
    }

    #[test]
    fn test_default_config_covers_all_compiled_sets() {
        let config = PipelineConfig::default();
        assert_eq!(config.sets.len(), 3);
        assert_eq!(config.sets[0].name, "alpha");
        assert_eq!(config.sets[0].catalog_code, "lea");
        assert_eq!(config.sets[0].supply_key, "Alpha");
    }

    #[test]
    fn test_filter_sets_keeps_selection_order_stable() {
        let mut config = PipelineConfig::default();
        config.filter_sets("beta, alpha").unwrap();

        let names: Vec<&str> = config.sets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"], "configured order is preserved");
    }

    #[test]
    fn test_filter_sets_rejects_unknown_names() {
        let mut config = PipelineConfig::default();
        let err = config.filter_sets("gamma").unwrap_err();
        assert!(err.contains("Unknown set"));
    }
}
