//! Cost model for plan selection.
//!
//! All figures are caller estimates; nothing is measured here. A scan
//! estimate is a scan count and a per-scan latency in any consistent unit,
//! and its cost is their product.

use serde::{Deserialize, Serialize};

/// Estimated scan count and per-scan latency.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScanEstimate {
    /// Estimated number of scans.
    pub scans: f64,
    /// Estimated latency of one scan.
    pub latency_per_scan: f64,
}

impl ScanEstimate {
    /// Creates a new estimate.
    pub const fn new(scans: f64, latency_per_scan: f64) -> Self {
        Self {
            scans,
            latency_per_scan,
        }
    }

    /// Estimated cost: scans x latency.
    pub fn cost(&self) -> f64 {
        self.scans * self.latency_per_scan
    }

    /// Cheap proxy ignoring latency: index scan iff `scans < limit`.
    pub fn use_ix_scan_by_count(&self, limit: f64) -> bool {
        self.scans < limit
    }
}

/// Index-scan estimate paired with a sequential-scan estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScanEstimates {
    /// Index scan
    pub ix: ScanEstimate,
    /// Sequential scan
    pub sq: ScanEstimate,
}

impl ScanEstimates {
    pub const fn new(ix: ScanEstimate, sq: ScanEstimate) -> Self {
        Self { ix, sq }
    }

    /// Full comparison: index scan iff it is strictly cheaper.
    pub fn use_ix_scan(&self) -> bool {
        self.ix.cost() < self.sq.cost()
    }

    /// As `use_ix_scan`, with an explicit tie-break.
    pub fn use_ix_scan_or_tie(&self, prefer_ix_on_tie: bool) -> bool {
        if prefer_ix_on_tie {
            self.ix.cost() <= self.sq.cost()
        } else {
            self.use_ix_scan()
        }
    }
}
