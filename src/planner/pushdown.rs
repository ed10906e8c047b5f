//! Filter placement: local (fetch all, filter here) vs remote (push the
//! filter to the backend).
//!
//! A pushdown decision is a pure function of the caller's filter, taken
//! once per call before any I/O.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;

use super::cost::{ScanEstimate, ScanEstimates};

/// Where the filter runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterPlacement {
    /// Fetch everything, filter client-side
    Local,
    /// Push the filter to the backend
    Remote,
}

impl FilterPlacement {
    pub fn from_pushdown(use_remote_filter: bool) -> Self {
        if use_remote_filter {
            FilterPlacement::Remote
        } else {
            FilterPlacement::Local
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterPlacement::Local => "LOCAL_FILTER",
            FilterPlacement::Remote => "REMOTE_FILTER",
        }
    }
}

impl fmt::Display for FilterPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decides whether a filter is pushed to the backend.
pub trait Pushdown<F: ?Sized> {
    fn use_remote_filter(&self, filter: &F) -> bool;

    /// Push down only when both decisions say so.
    fn and<O>(self, other: O) -> PushdownAnd<Self, O>
    where
        Self: Sized,
        O: Pushdown<F>,
    {
        PushdownAnd::new(self, other)
    }
}

impl<F: ?Sized, P> Pushdown<F> for P
where
    P: Fn(&F) -> bool,
{
    fn use_remote_filter(&self, filter: &F) -> bool {
        self(filter)
    }
}

/// Conjunction of two pushdown decisions
#[derive(Debug, Clone, Copy)]
pub struct PushdownAnd<A, B> {
    first: A,
    second: B,
}

impl<A, B> PushdownAnd<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<F: ?Sized, A, B> Pushdown<F> for PushdownAnd<A, B>
where
    A: Pushdown<F>,
    B: Pushdown<F>,
{
    fn use_remote_filter(&self, filter: &F) -> bool {
        let first = self.first.use_remote_filter(filter);
        let second = self.second.use_remote_filter(filter);
        first && second
    }
}

/// Pushes the filter down iff the estimated scan count is below a limit.
#[derive(Debug, Clone)]
pub struct PushdownByIxScanLimit<M> {
    estimate: M,
    limit: f64,
}

impl<M> PushdownByIxScanLimit<M> {
    pub fn new(estimate: M, limit: f64) -> Self {
        Self { estimate, limit }
    }

    pub fn from_config(estimate: M, config: &PlannerConfig) -> Self {
        Self::new(estimate, config.ix_scan_limit)
    }
}

impl<F: ?Sized, M> Pushdown<F> for PushdownByIxScanLimit<M>
where
    M: Fn(&F) -> ScanEstimate,
{
    fn use_remote_filter(&self, filter: &F) -> bool {
        (self.estimate)(filter).use_ix_scan_by_count(self.limit)
    }
}

/// Pushes the filter down iff the index scan is estimated cheaper than the
/// sequential scan.
#[derive(Debug, Clone)]
pub struct PushdownByCost<M> {
    estimate: M,
    prefer_ix_on_tie: bool,
}

impl<M> PushdownByCost<M> {
    pub fn new(estimate: M) -> Self {
        Self {
            estimate,
            prefer_ix_on_tie: false,
        }
    }

    pub fn from_config(estimate: M, config: &PlannerConfig) -> Self {
        Self {
            estimate,
            prefer_ix_on_tie: config.prefer_ix_on_tie,
        }
    }
}

impl<F: ?Sized, M> Pushdown<F> for PushdownByCost<M>
where
    M: Fn(&F) -> ScanEstimates,
{
    fn use_remote_filter(&self, filter: &F) -> bool {
        (self.estimate)(filter).use_ix_scan_or_tie(self.prefer_ix_on_tie)
    }
}
