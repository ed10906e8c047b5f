//! Observability for aeroscan
//!
//! Pipelines report through `tracing` and never install a subscriber.
//! Every record carries an `event` field naming one `Event` variant, and a
//! `request_id` wherever a `ScanContext` is in scope.
//!
//! Plan decisions and skipped buckets log at `debug`.
//! Per-record outcomes (missing keys, early stop) log at `trace`. An aborted
//! plan logs at `warn` with its error code.
//!
//! # Usage
//!
//! ```ignore
//! use aeroscan::observability::Event;
//!
//! tracing::debug!(event = %Event::ScanShapeSelected, shape = "DIRECT_SCAN");
//! ```

mod events;

pub use events::Event;
