//! Observability events for aeroscan
//!
//! Every tracing record emitted by the pipeline carries one of these in
//! its `event` field. Events are explicit and typed.

use std::fmt;

/// Observable events in a scan call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Plan selection
    /// Direct or indirect scan shape chosen
    ScanShapeSelected,
    /// Local or remote filter placement chosen
    FilterPlacementSelected,

    // Key-index retrieval
    /// Bucket gate rejected a bucket; key retrieval skipped
    BucketSkipped,
    /// Key list fetched
    KeysFetched,
    /// Key missing or filtered after decode; skipped
    KeyNotFound,

    // Loop termination
    /// Consumer asked to stop
    ScanStopped,
    /// Call aborted by an error
    ScanAborted,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ScanShapeSelected => "SCAN_SHAPE_SELECTED",
            Event::FilterPlacementSelected => "FILTER_PLACEMENT_SELECTED",

            Event::BucketSkipped => "BUCKET_SKIPPED",
            Event::KeysFetched => "KEYS_FETCHED",
            Event::KeyNotFound => "KEY_NOT_FOUND",

            Event::ScanStopped => "SCAN_STOPPED",
            Event::ScanAborted => "SCAN_ABORTED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
