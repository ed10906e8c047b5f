//! Get-by-key retrieval
//!
//! A missing key is `Ok(false)`, never an error, so stale index entries are
//! skipped by the caller. The value buffer is only meaningful after
//! `Ok(true)`.

use crate::bucket::Bucket;
use crate::codec::Decode;
use crate::context::ScanContext;
use crate::errors::ScanResult;
use crate::filter::LocalFilter;

/// Gets one value by key into `value`. Returns whether it was found.
pub trait GetByKey<C: ?Sized, K, V, F: ?Sized> {
    fn get_by_key(
        &mut self,
        ctx: &ScanContext,
        conn: &mut C,
        bucket: &Bucket,
        key: &K,
        value: &mut V,
        filter: &F,
    ) -> ScanResult<bool>;
}

impl<C, K, V, F, G> GetByKey<C, K, V, F> for G
where
    C: ?Sized,
    F: ?Sized,
    G: FnMut(&ScanContext, &mut C, &Bucket, &K, &mut V, &F) -> ScanResult<bool>,
{
    fn get_by_key(
        &mut self,
        ctx: &ScanContext,
        conn: &mut C,
        bucket: &Bucket,
        key: &K,
        value: &mut V,
        filter: &F,
    ) -> ScanResult<bool> {
        self(ctx, conn, bucket, key, value, filter)
    }
}

/// Decodes an encoded get-by-key result and applies a post-decode filter.
///
/// A decode failure is an error. A value the filter rejects is reported as
/// not found.
pub struct DecodedByKey<G, Dec, Keep, E> {
    get_encoded: G,
    decoder: Dec,
    keep: Keep,
    buf: E,
}

impl<G, Dec, Keep, E> DecodedByKey<G, Dec, Keep, E> {
    /// `buf` receives each encoded value before it is decoded.
    pub fn new(get_encoded: G, decoder: Dec, keep: Keep, buf: E) -> Self {
        Self {
            get_encoded,
            decoder,
            keep,
            buf,
        }
    }
}

impl<C, K, D, F, G, Dec, Keep, E> GetByKey<C, K, D, F> for DecodedByKey<G, Dec, Keep, E>
where
    C: ?Sized,
    F: ?Sized,
    G: GetByKey<C, K, E, F>,
    Dec: Decode<E, D>,
    Keep: LocalFilter<D, F>,
{
    fn get_by_key(
        &mut self,
        ctx: &ScanContext,
        conn: &mut C,
        bucket: &Bucket,
        key: &K,
        value: &mut D,
        filter: &F,
    ) -> ScanResult<bool> {
        let found = self
            .get_encoded
            .get_by_key(ctx, conn, bucket, key, &mut self.buf, filter)?;
        if !found {
            return Ok(false);
        }

        let decoded = self.decoder.decode(&self.buf)?;
        if !self.keep.keep(&decoded, filter) {
            return Ok(false);
        }
        *value = decoded;
        Ok(true)
    }
}
