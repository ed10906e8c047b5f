//! Plan selection for aeroscan
//!
//! Two independent decisions are taken per call, before any I/O, as pure
//! functions of the caller's filter:
//!
//! - Scan shape: direct (one full or range scan) vs indirect (keys, then
//!   get-by-key). See `ScanPlan` and `WithPlan`.
//! - Filter placement: local (fetch all, filter here) vs remote (pushed to
//!   the backend). See `Pushdown` and `crate::filter::filter_remote`.
//!
//! Cost figures are caller estimates. Nothing is measured here.

mod cost;
mod explain;
mod plan;
mod pushdown;
mod retrieve;

pub use cost::{ScanEstimate, ScanEstimates};
pub use explain::ExplainPlan;
pub use plan::{PlanByCost, PlanByIxScanLimit, ScanPlan, ScanShape, WithPlan};
pub use pushdown::{
    FilterPlacement, Pushdown, PushdownAnd, PushdownByCost, PushdownByIxScanLimit,
};
pub use retrieve::{CursorScan, Retrieve};
