//! Remote-or-local filter selection
//!
//! The placement is decided once per call, before any I/O. A remotely
//! filtered result is trusted as-is; no local filter is applied on top.

use std::marker::PhantomData;

use tracing::debug;

use crate::bucket::Bucket;
use crate::context::ScanContext;
use crate::errors::ScanResult;
use crate::observability::Event;
use crate::planner::{FilterPlacement, Pushdown};
use crate::source::{GetAll, GetFiltered};

use super::local::{filter_local, LocalFilter};

/// Fetches the filtered records of a bucket, either remotely or by
/// fetching everything and filtering here.
pub fn filter_remote<V, F, A, R, L, P>(
    ctx: &ScanContext,
    bucket: &Bucket,
    filter: &F,
    all: &A,
    remote: &R,
    local: &L,
    pushdown: &P,
) -> ScanResult<Vec<V>>
where
    F: ?Sized,
    A: GetAll<V> + ?Sized,
    R: GetFiltered<V, F> + ?Sized,
    L: LocalFilter<V, F> + ?Sized,
    P: Pushdown<F> + ?Sized,
{
    let placement = FilterPlacement::from_pushdown(pushdown.use_remote_filter(filter));
    debug!(
        event = %Event::FilterPlacementSelected,
        request_id = %ctx.request_id,
        bucket = %bucket,
        placement = %placement,
    );

    match placement {
        FilterPlacement::Remote => remote.get_filtered(ctx, bucket, filter),
        FilterPlacement::Local => {
            let values = all.get_all(ctx, bucket)?;
            Ok(filter_local(local, values, filter))
        }
    }
}

/// `GetFiltered` that picks the filter placement per call.
pub struct FilterRemote<A, R, L, P, V> {
    all: A,
    remote: R,
    local: L,
    pushdown: P,
    _value: PhantomData<fn() -> V>,
}

impl<A, R, L, P, V> FilterRemote<A, R, L, P, V> {
    pub fn new(all: A, remote: R, local: L, pushdown: P) -> Self {
        Self {
            all,
            remote,
            local,
            pushdown,
            _value: PhantomData,
        }
    }
}

impl<A, R, L, P, V, F> GetFiltered<V, F> for FilterRemote<A, R, L, P, V>
where
    F: ?Sized,
    A: GetAll<V>,
    R: GetFiltered<V, F>,
    L: LocalFilter<V, F>,
    P: Pushdown<F>,
{
    fn get_filtered(&self, ctx: &ScanContext, bucket: &Bucket, filter: &F) -> ScanResult<Vec<V>> {
        filter_remote(
            ctx,
            bucket,
            filter,
            &self.all,
            &self.remote,
            &self.local,
            &self.pushdown,
        )
    }
}
