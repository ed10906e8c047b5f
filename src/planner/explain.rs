//! Explain output for plan selection
//!
//! Records both per-call decisions and the estimates that drove them.
//! Output is deterministic: the same decisions always render the same text.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cost::ScanEstimates;
use super::plan::{ScanPlan, ScanShape};
use super::pushdown::{FilterPlacement, Pushdown};

/// Explain plan output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainPlan {
    /// Direct or indirect scan
    pub shape: ScanShape,
    /// Local or remote filter
    pub placement: FilterPlacement,
    /// Estimates behind the decisions, if any were used
    pub estimates: Option<ScanEstimates>,
}

impl ExplainPlan {
    pub fn new(shape: ScanShape, placement: FilterPlacement) -> Self {
        Self {
            shape,
            placement,
            estimates: None,
        }
    }

    /// Evaluates both decisions for a filter without doing any I/O.
    pub fn decide<F, P, Q>(plan: &P, pushdown: &Q, filter: &F) -> Self
    where
        F: ?Sized,
        P: ScanPlan<F> + ?Sized,
        Q: Pushdown<F> + ?Sized,
    {
        Self::new(
            ScanShape::from_direct_scan(plan.direct_scan(filter)),
            FilterPlacement::from_pushdown(pushdown.use_remote_filter(filter)),
        )
    }

    pub fn with_estimates(mut self, estimates: ScanEstimates) -> Self {
        self.estimates = Some(estimates);
        self
    }

    /// JSON form for log or API output
    pub fn to_json(&self) -> serde_json::Value {
        let mut json = serde_json::json!({
            "shape": self.shape.as_str(),
            "placement": self.placement.as_str(),
        });
        if let Some(estimates) = &self.estimates {
            json["ix_cost"] = serde_json::json!(estimates.ix.cost());
            json["sq_cost"] = serde_json::json!(estimates.sq.cost());
        }
        json
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN SCAN ===")?;
        writeln!(f, "Scan Shape: {}", self.shape)?;
        writeln!(f, "Filter Placement: {}", self.placement)?;
        if let Some(estimates) = &self.estimates {
            writeln!(
                f,
                "Index Scan: {} scans x {} = {}",
                estimates.ix.scans,
                estimates.ix.latency_per_scan,
                estimates.ix.cost()
            )?;
            writeln!(
                f,
                "Sequential Scan: {} scans x {} = {}",
                estimates.sq.scans,
                estimates.sq.latency_per_scan,
                estimates.sq.cost()
            )?;
        }
        Ok(())
    }
}
