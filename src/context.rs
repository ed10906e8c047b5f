//! Scan Context
//!
//! Context threaded unchanged through every collaborator call.
//! The pipeline never reads it; collaborators doing I/O use it to honour
//! cancellation and deadlines.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use uuid::Uuid;

/// Context carried through one scan call
#[derive(Debug, Clone)]
pub struct ScanContext {
    /// Request ID for tracing
    pub request_id: Uuid,

    /// Metadata for observability
    pub metadata: HashMap<String, Value>,

    /// Shared with every clone; set once by `cancel`
    cancelled: Arc<AtomicBool>,

    /// Optional deadline for collaborator I/O
    deadline: Option<Instant>,

    /// Start time for duration tracking
    started_at: Instant,
}

impl ScanContext {
    /// Create a new context with no deadline
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            metadata: HashMap::new(),
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
            started_at: Instant::now(),
        }
    }

    /// Set a deadline relative to now. A timeout past the clock's range
    /// means no deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Instant::now().checked_add(timeout);
        self
    }

    /// Add metadata for observability
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Request cancellation; visible to every clone of this context
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Check if the deadline (if any) has passed
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Cancelled or past the deadline
    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.is_expired()
    }

    /// Time left before the deadline, if one is set
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }
}

impl Default for ScanContext {
    fn default() -> Self {
        Self::new()
    }
}
