//! aeroscan - backend-agnostic scan pipelines with cost-based plan selection
//!
//! Records stored in named buckets of an external store are fetched by
//! caller-supplied collaborators, decoded, expanded into entries, filtered
//! at two precision levels and streamed into a consumer that may stop early.
//!
//! # Layout
//!
//! - `iter`: cursor driver, consumer protocol and pipeline stages
//! - `codec`: decode, unpack and unnest stages
//! - `filter`: local filters and remote/local placement
//! - `indirect`: key listing and get-by-key (two-phase fetch)
//! - `planner`: scan shape, filter placement and the cost model
//!
//! All calls are synchronous. Nothing persists across calls.

pub mod bucket;
pub mod codec;
pub mod config;
pub mod context;
pub mod errors;
pub mod filter;
pub mod indirect;
pub mod iter;
pub mod observability;
pub mod planner;
pub mod source;

pub use bucket::Bucket;
pub use config::PlannerConfig;
pub use context::ScanContext;
pub use errors::{BoxError, ScanError, ScanErrorCode, ScanResult};
pub use iter::{Consumer, Cursor, FilteredConsumer, Flow};
pub use planner::{ExplainPlan, Retrieve, ScanEstimate, ScanEstimates};
pub use source::{GetAll, GetFiltered};
