//! Planner Configuration
//!
//! Static knobs for the cost-based plan helpers. Loaded by the embedding
//! application from its own config source; nothing here is measured.

use serde::{Deserialize, Serialize};

/// Configuration for the cost-based planner helpers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Scan-count threshold for the cheap index-scan proxy.
    /// An index scan is chosen iff the estimated scan count is below it.
    pub ix_scan_limit: f64,
    /// When index and sequential scan costs are equal, pick the index scan.
    pub prefer_ix_on_tie: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            ix_scan_limit: 1024.0,
            prefer_ix_on_tie: false, // strict `<`
        }
    }
}

impl PlannerConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Set the scan-count threshold.
    pub fn with_ix_scan_limit(mut self, limit: f64) -> Self {
        self.ix_scan_limit = limit;
        self
    }

    /// Set the tie-break rule.
    pub fn with_prefer_ix_on_tie(mut self, prefer: bool) -> Self {
        self.prefer_ix_on_tie = prefer;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = PlannerConfig::default();
        assert_eq!(config.ix_scan_limit, 1024.0);
        assert!(!config.prefer_ix_on_tie);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = PlannerConfig::from_json(r#"{"ix_scan_limit": 10.0}"#).unwrap();
        assert_eq!(config.ix_scan_limit, 10.0);
        assert!(!config.prefer_ix_on_tie);
    }

    #[test]
    fn test_config_rejects_bad_json() {
        assert!(PlannerConfig::from_json(r#"{"ix_scan_limit": "many"}"#).is_err());
    }

    #[test]
    fn test_builder() {
        let config = PlannerConfig::default()
            .with_ix_scan_limit(3.0)
            .with_prefer_ix_on_tie(true);
        assert_eq!(config.ix_scan_limit, 3.0);
        assert!(config.prefer_ix_on_tie);
    }
}
