use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::Weights;

fn default_threshold() -> f64 {
    0.3
}

fn default_jobs_dir() -> PathBuf {
    PathBuf::from("scrappedjobs")
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

/// User settings stored as `config.json` in the data directory. Every field
/// has a default so partial files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_threshold")]
    pub default_threshold: f64,

    /// Maximum rows printed by `filter`; 0 prints everything.
    #[serde(default)]
    pub result_limit: usize,

    #[serde(default = "default_jobs_dir")]
    pub jobs_dir: PathBuf,

    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    #[serde(default)]
    pub weights: Weights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_threshold: default_threshold(),
            result_limit: 0,
            jobs_dir: default_jobs_dir(),
            export_dir: default_export_dir(),
            weights: Weights::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"result_limit": 25, "weights": {"exact": 0.5}}"#).unwrap();
        assert_eq!(config.result_limit, 25);
        assert_eq!(config.default_threshold, 0.3);
        assert_eq!(config.jobs_dir, PathBuf::from("scrappedjobs"));
        assert_eq!(config.weights.exact, 0.5);
        assert_eq!(config.weights.overlap, Weights::default().overlap);
    }

    #[test]
    fn test_empty_config_equals_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }
}
