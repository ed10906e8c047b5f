//! Scan-shape selection
//!
//! Direct: one full or range scan over the bucket. Indirect: fetch the
//! candidate keys, then each value by key. The shape is a pure function of
//! the filter, decided once per call before any I/O; there is no
//! re-planning mid-scan.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bucket::Bucket;
use crate::config::PlannerConfig;
use crate::context::ScanContext;
use crate::errors::ScanResult;
use crate::iter::{FilteredConsumer, Flow};
use crate::observability::Event;

use super::cost::{ScanEstimate, ScanEstimates};
use super::retrieve::Retrieve;

/// Scan shape chosen for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanShape {
    /// Single full or range scan
    Direct,
    /// Keys first, then get-by-key
    Indirect,
}

impl ScanShape {
    pub fn from_direct_scan(direct_scan: bool) -> Self {
        if direct_scan {
            ScanShape::Direct
        } else {
            ScanShape::Indirect
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanShape::Direct => "DIRECT_SCAN",
            ScanShape::Indirect => "INDIRECT_SCAN",
        }
    }
}

impl fmt::Display for ScanShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decides the scan shape for a filter.
pub trait ScanPlan<F: ?Sized> {
    /// True for a direct scan, false for keys-then-fetch.
    fn direct_scan(&self, filter: &F) -> bool;
}

impl<F: ?Sized, P> ScanPlan<F> for P
where
    P: Fn(&F) -> bool,
{
    fn direct_scan(&self, filter: &F) -> bool {
        self(filter)
    }
}

/// Indirect scan iff the estimated index scan count is below a limit.
#[derive(Debug, Clone)]
pub struct PlanByIxScanLimit<M> {
    estimate: M,
    limit: f64,
}

impl<M> PlanByIxScanLimit<M> {
    pub fn new(estimate: M, limit: f64) -> Self {
        Self { estimate, limit }
    }

    pub fn from_config(estimate: M, config: &PlannerConfig) -> Self {
        Self::new(estimate, config.ix_scan_limit)
    }
}

impl<F: ?Sized, M> ScanPlan<F> for PlanByIxScanLimit<M>
where
    M: Fn(&F) -> ScanEstimate,
{
    fn direct_scan(&self, filter: &F) -> bool {
        !(self.estimate)(filter).use_ix_scan_by_count(self.limit)
    }
}

/// Indirect scan iff the index scan is estimated cheaper than the
/// sequential scan.
#[derive(Debug, Clone)]
pub struct PlanByCost<M> {
    estimate: M,
    prefer_ix_on_tie: bool,
}

impl<M> PlanByCost<M> {
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

impl<F: ?Sized, M> ScanPlan<F> for PlanByCost<M>
where
    M: Fn(&F) -> ScanEstimates,
{
    fn direct_scan(&self, filter: &F) -> bool {
        !(self.estimate)(filter).use_ix_scan_or_tie(self.prefer_ix_on_tie)
    }
}

/// Dispatches each call to the direct or the indirect retrieval.
pub struct WithPlan<I, D, P> {
    indirect: I,
    direct: D,
    plan: P,
}

impl<I, D, P> WithPlan<I, D, P> {
    pub fn new(indirect: I, direct: D, plan: P) -> Self {
        Self {
            indirect,
            direct,
            plan,
        }
    }
}

impl<C, V, F, I, D, P> Retrieve<C, V, F> for WithPlan<I, D, P>
where
    C: ?Sized,
    F: ?Sized,
    I: Retrieve<C, V, F>,
    D: Retrieve<C, V, F>,
    P: ScanPlan<F>,
{
    fn retrieve(
        &mut self,
        ctx: &ScanContext,
        conn: &mut C,
        bucket: &Bucket,
        filter: &F,
        consumer: &mut dyn FilteredConsumer<V, F>,
    ) -> ScanResult<Flow> {
        let shape = ScanShape::from_direct_scan(self.plan.direct_scan(filter));
        debug!(
            event = %Event::ScanShapeSelected,
            request_id = %ctx.request_id,
            bucket = %bucket,
            shape = %shape,
        );

        let result = match shape {
            ScanShape::Direct => self.direct.retrieve(ctx, conn, bucket, filter, consumer),
            ScanShape::Indirect => self.indirect.retrieve(ctx, conn, bucket, filter, consumer),
        };
        if let Err(err) = &result {
            warn!(
                event = %Event::ScanAborted,
                request_id = %ctx.request_id,
                bucket = %bucket,
                shape = %shape,
                code = %err.code(),
                transport = err.code().is_transport(),
                elapsed_ms = ctx.elapsed_ms() as u64,
                error = %err,
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScanError;

    struct Filter {
        ix_scans: f64,
    }

    fn by_ix_scans(f: &Filter) -> ScanEstimate {
        ScanEstimate::new(f.ix_scans, 1.0)
    }

    fn ix_vs_sq(f: &Filter) -> ScanEstimates {
        ScanEstimates::new(ScanEstimate::new(f.ix_scans, 10.0), ScanEstimate::new(50.0, 2.0))
    }

    fn source(
        tag: &'static str,
    ) -> impl FnMut(&ScanContext, &mut Vec<&'static str>, &Bucket, &Filter, &mut dyn FilteredConsumer<u32, Filter>) -> ScanResult<Flow>
    {
        move |_: &ScanContext,
              calls: &mut Vec<&'static str>,
              _: &Bucket,
              filter: &Filter,
              consumer: &mut dyn FilteredConsumer<u32, Filter>| {
            calls.push(tag);
            consumer.consume_filtered(&(filter.ix_scans as u32), filter)
        }
    }

    #[test]
    fn test_shape_strings() {
        assert_eq!(ScanShape::from_direct_scan(true), ScanShape::Direct);
        assert_eq!(ScanShape::from_direct_scan(false).to_string(), "INDIRECT_SCAN");
    }

    #[test]
    fn test_plan_by_ix_scan_limit() {
        let plan = PlanByIxScanLimit::new(by_ix_scans, 10.0);
        assert!(!plan.direct_scan(&Filter { ix_scans: 9.0 }));
        assert!(plan.direct_scan(&Filter { ix_scans: 10.0 }));

        let plan = PlanByIxScanLimit::from_config(by_ix_scans, &PlannerConfig::default());
        assert!(!plan.direct_scan(&Filter { ix_scans: 1023.0 }));
        assert!(plan.direct_scan(&Filter { ix_scans: 1024.0 }));
    }

    #[test]
    fn test_plan_by_cost() {
        let plan = PlanByCost::new(ix_vs_sq);
        // 90 < 100
        assert!(!plan.direct_scan(&Filter { ix_scans: 9.0 }));
        // 100 == 100
        assert!(plan.direct_scan(&Filter { ix_scans: 10.0 }));

        let config = PlannerConfig::default().with_prefer_ix_on_tie(true);
        let plan = PlanByCost::from_config(ix_vs_sq, &config);
        assert!(!plan.direct_scan(&Filter { ix_scans: 10.0 }));
    }

    #[test]
    fn test_with_plan_dispatches_per_call() {
        let plan = |f: &Filter| f.ix_scans > 100.0;
        let mut with_plan = WithPlan::new(source("indirect"), source("direct"), plan);

        let mut calls = Vec::new();
        let mut seen = Vec::new();
        let mut sink = |value: &u32, _: &Filter| -> ScanResult<Flow> {
            seen.push(*value);
            Ok(Flow::Continue)
        };
        let ctx = ScanContext::new();
        let bucket = Bucket::new("b");

        with_plan
            .retrieve(&ctx, &mut calls, &bucket, &Filter { ix_scans: 500.0 }, &mut sink)
            .unwrap();
        with_plan
            .retrieve(&ctx, &mut calls, &bucket, &Filter { ix_scans: 5.0 }, &mut sink)
            .unwrap();

        assert_eq!(calls, vec!["direct", "indirect"]);
        assert_eq!(seen, vec![500, 5]);
    }

    #[test]
    fn test_with_plan_propagates_error() {
        let failing = |_: &ScanContext,
                       _: &mut (),
                       _: &Bucket,
                       _: &Filter,
                       _: &mut dyn FilteredConsumer<u32, Filter>|
         -> ScanResult<Flow> { Err(ScanError::fetch("index offline")) };
        let untouched = |_: &ScanContext,
                         _: &mut (),
                         _: &Bucket,
                         _: &Filter,
                         _: &mut dyn FilteredConsumer<u32, Filter>|
         -> ScanResult<Flow> { panic!("direct scan not planned") };
        let mut with_plan = WithPlan::new(failing, untouched, |_: &Filter| false);
        let mut sink = |_: &u32, _: &Filter| -> ScanResult<Flow> { Ok(Flow::Continue) };

        let result = with_plan.retrieve(
            &ScanContext::new(),
            &mut (),
            &Bucket::new("b"),
            &Filter { ix_scans: 1.0 },
            &mut sink,
        );
        assert!(matches!(result, Err(ScanError::Fetch(_))));
        assert!(result.unwrap_err().code().is_transport());
    }
}
