//! Two-phase fetch: candidate keys first, then one get-by-key per key, in
//! key order.
//!
//! Keys that are not found are skipped silently. A consumer stop ends the
//! loop successfully; any error ends the call.

use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::bucket::Bucket;
use crate::codec::Unnest;
use crate::context::ScanContext;
use crate::errors::ScanResult;
use crate::filter::LocalFilter;
use crate::iter::{FilteredConsumer, Flow};
use crate::observability::Event;
use crate::planner::Retrieve;

use super::by_key::GetByKey;
use super::keys::GetKeys;

/// Fetches each key in order into `buf` and feeds every found value to the
/// consumer.
#[allow(clippy::too_many_arguments)]
pub fn fetch_keys<C, K, V, F, G, Cons>(
    ctx: &ScanContext,
    conn: &mut C,
    bucket: &Bucket,
    keys: &[K],
    get_by_key: &mut G,
    buf: &mut V,
    filter: &F,
    consumer: &mut Cons,
) -> ScanResult<Flow>
where
    C: ?Sized,
    F: ?Sized,
    G: GetByKey<C, K, V, F> + ?Sized,
    Cons: FilteredConsumer<V, F> + ?Sized,
{
    for (position, key) in keys.iter().enumerate() {
        if !get_by_key.get_by_key(ctx, conn, bucket, key, buf, filter)? {
            trace!(event = %Event::KeyNotFound, bucket = %bucket, position);
            continue;
        }
        if consumer.consume_filtered(buf, filter)?.is_stop() {
            trace!(event = %Event::ScanStopped, bucket = %bucket, position);
            return Ok(Flow::Stop);
        }
    }
    Ok(Flow::Continue)
}

fn log_keys_fetched(ctx: &ScanContext, bucket: &Bucket, count: usize) {
    debug!(
        event = %Event::KeysFetched,
        request_id = %ctx.request_id,
        bucket = %bucket,
        count,
    );
}

/// Indirect retrieval: `GetKeys` once, then `GetByKey` per key.
pub struct KeyedFetch<GK, GB, K, V> {
    get_keys: GK,
    get_by_key: GB,
    buf: V,
    _key: PhantomData<fn() -> K>,
}

impl<GK, GB, K, V> KeyedFetch<GK, GB, K, V> {
    /// `buf` receives each fetched value before it reaches the consumer.
    pub fn new(get_keys: GK, get_by_key: GB, buf: V) -> Self {
        Self {
            get_keys,
            get_by_key,
            buf,
            _key: PhantomData,
        }
    }
}

impl<C, K, V, F, GK, GB> Retrieve<C, V, F> for KeyedFetch<GK, GB, K, V>
where
    C: ?Sized,
    F: ?Sized,
    GK: GetKeys<C, K, F>,
    GB: GetByKey<C, K, V, F>,
{
    fn retrieve(
        &mut self,
        ctx: &ScanContext,
        conn: &mut C,
        bucket: &Bucket,
        filter: &F,
        consumer: &mut dyn FilteredConsumer<V, F>,
    ) -> ScanResult<Flow> {
        let keys = self.get_keys.get_keys(ctx, conn, bucket, filter)?;
        log_keys_fetched(ctx, bucket, keys.len());
        fetch_keys(
            ctx,
            conn,
            bucket,
            &keys,
            &mut self.get_by_key,
            &mut self.buf,
            filter,
            consumer,
        )
    }
}

/// Indirect retrieval of nested records.
///
/// Each found record passes a packed-level filter, is unnested, and every
/// entry passing the unpacked-level filter goes to the consumer. An unnest
/// failure on any key aborts the whole call, unlike a missing key.
pub struct KeyedUnnestFetch<GK, GB, Un, KP, KU, K, P, U> {
    get_keys: GK,
    get_by_key: GB,
    unnest: Un,
    keep_packed: KP,
    keep_unpacked: KU,
    buf: P,
    _types: PhantomData<fn() -> (K, U)>,
}

impl<GK, GB, Un, KP, KU, K, P, U> KeyedUnnestFetch<GK, GB, Un, KP, KU, K, P, U> {
    pub fn new(
        get_keys: GK,
        get_by_key: GB,
        unnest: Un,
        keep_packed: KP,
        keep_unpacked: KU,
        buf: P,
    ) -> Self {
        Self {
            get_keys,
            get_by_key,
            unnest,
            keep_packed,
            keep_unpacked,
            buf,
            _types: PhantomData,
        }
    }

    /// Runs the per-key loop over an explicit key list.
    pub fn fetch_keys<C, F>(
        &mut self,
        ctx: &ScanContext,
        conn: &mut C,
        bucket: &Bucket,
        keys: &[K],
        filter: &F,
        consumer: &mut dyn FilteredConsumer<U, F>,
    ) -> ScanResult<Flow>
    where
        C: ?Sized,
        F: ?Sized,
        GB: GetByKey<C, K, P, F>,
        Un: Unnest<P, U>,
        KP: LocalFilter<P, F>,
        KU: LocalFilter<U, F>,
    {
        for (position, key) in keys.iter().enumerate() {
            let found = self
                .get_by_key
                .get_by_key(ctx, conn, bucket, key, &mut self.buf, filter)?;
            if !found {
                trace!(event = %Event::KeyNotFound, bucket = %bucket, position);
                continue;
            }
            if !self.keep_packed.keep(&self.buf, filter) {
                continue;
            }

            let entries = self.unnest.unnest(&self.buf)?;
            for entry in &entries {
                if !self.keep_unpacked.keep(entry, filter) {
                    continue;
                }
                if consumer.consume_filtered(entry, filter)?.is_stop() {
                    trace!(event = %Event::ScanStopped, bucket = %bucket, position);
                    return Ok(Flow::Stop);
                }
            }
        }
        Ok(Flow::Continue)
    }
}

impl<C, U, F, GK, GB, Un, KP, KU, K, P> Retrieve<C, U, F>
    for KeyedUnnestFetch<GK, GB, Un, KP, KU, K, P, U>
where
    C: ?Sized,
    F: ?Sized,
    GK: GetKeys<C, K, F>,
    GB: GetByKey<C, K, P, F>,
    Un: Unnest<P, U>,
    KP: LocalFilter<P, F>,
    KU: LocalFilter<U, F>,
{
    fn retrieve(
        &mut self,
        ctx: &ScanContext,
        conn: &mut C,
        bucket: &Bucket,
        filter: &F,
        consumer: &mut dyn FilteredConsumer<U, F>,
    ) -> ScanResult<Flow> {
        let keys = self.get_keys.get_keys(ctx, conn, bucket, filter)?;
        log_keys_fetched(ctx, bucket, keys.len());
        self.fetch_keys(ctx, conn, bucket, &keys, filter, consumer)
    }
}
