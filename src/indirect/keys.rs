//! Candidate key retrieval
//!
//! `GetKeys` lists the keys of a bucket that may match a filter. A bucket
//! gate in front of it can rule a whole bucket out before any key I/O.

use tracing::debug;

use crate::bucket::Bucket;
use crate::context::ScanContext;
use crate::errors::ScanResult;
use crate::observability::Event;

/// Gets the candidate keys of a bucket.
pub trait GetKeys<C: ?Sized, K, F: ?Sized> {
    fn get_keys(
        &self,
        ctx: &ScanContext,
        conn: &mut C,
        bucket: &Bucket,
        filter: &F,
    ) -> ScanResult<Vec<K>>;

    /// Checks the bucket first; a rejected bucket yields no keys and
    /// `get_keys` is never called for it.
    fn with_bucket_filter<B>(self, check: B) -> BucketGated<Self, B>
    where
        Self: Sized,
        B: CheckBucket<C, F>,
    {
        BucketGated::new(self, check)
    }
}

impl<C, K, F, G> GetKeys<C, K, F> for G
where
    C: ?Sized,
    F: ?Sized,
    G: Fn(&ScanContext, &mut C, &Bucket, &F) -> ScanResult<Vec<K>>,
{
    fn get_keys(
        &self,
        ctx: &ScanContext,
        conn: &mut C,
        bucket: &Bucket,
        filter: &F,
    ) -> ScanResult<Vec<K>> {
        self(ctx, conn, bucket, filter)
    }
}

/// Cheap bucket-level predicate: false means the bucket cannot match.
pub trait CheckBucket<C: ?Sized, F: ?Sized> {
    fn check_bucket(&self, ctx: &ScanContext, conn: &mut C, bucket: &Bucket, filter: &F) -> bool;
}

impl<C, F, B> CheckBucket<C, F> for B
where
    C: ?Sized,
    F: ?Sized,
    B: Fn(&ScanContext, &mut C, &Bucket, &F) -> bool,
{
    fn check_bucket(&self, ctx: &ScanContext, conn: &mut C, bucket: &Bucket, filter: &F) -> bool {
        self(ctx, conn, bucket, filter)
    }
}

/// `GetKeys` behind a bucket gate
#[derive(Debug, Clone)]
pub struct BucketGated<G, B> {
    get_keys: G,
    check: B,
}

impl<G, B> BucketGated<G, B> {
    pub fn new(get_keys: G, check: B) -> Self {
        Self { get_keys, check }
    }
}

impl<C, K, F, G, B> GetKeys<C, K, F> for BucketGated<G, B>
where
    C: ?Sized,
    F: ?Sized,
    G: GetKeys<C, K, F>,
    B: CheckBucket<C, F>,
{
    fn get_keys(
        &self,
        ctx: &ScanContext,
        conn: &mut C,
        bucket: &Bucket,
        filter: &F,
    ) -> ScanResult<Vec<K>> {
        if !self.check.check_bucket(ctx, conn, bucket, filter) {
            debug!(
                event = %Event::BucketSkipped,
                request_id = %ctx.request_id,
                bucket = %bucket,
            );
            return Ok(Vec::new());
        }
        self.get_keys.get_keys(ctx, conn, bucket, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScanError;
    use std::cell::Cell;

    #[test]
    fn test_closure_get_keys() {
        let get_keys = |_: &ScanContext, conn: &mut Vec<u64>, _: &Bucket, min: &u64| -> ScanResult<Vec<u64>> {
            Ok(conn.iter().copied().filter(|k| k >= min).collect())
        };
        let keys = get_keys
            .get_keys(&ScanContext::new(), &mut vec![1, 5, 10], &Bucket::new("b"), &5)
            .unwrap();
        assert_eq!(keys, vec![5, 10]);
    }

    #[test]
    fn test_bucket_gate_rejects_without_fetching() {
        let fetched = Cell::new(0);
        let get_keys = |_: &ScanContext, _: &mut (), _: &Bucket, _: &()| -> ScanResult<Vec<u64>> {
            fetched.set(fetched.get() + 1);
            Ok(vec![1, 2, 3])
        };
        let only_2024 = |_: &ScanContext, _: &mut (), bucket: &Bucket, _: &()| bucket.as_str() == "2024";
        let gated = get_keys.with_bucket_filter(only_2024);

        let keys = gated
            .get_keys(&ScanContext::new(), &mut (), &Bucket::new("2023"), &())
            .unwrap();
        assert!(keys.is_empty());
        assert_eq!(fetched.get(), 0);

        let keys = gated
            .get_keys(&ScanContext::new(), &mut (), &Bucket::new("2024"), &())
            .unwrap();
        assert_eq!(keys, vec![1, 2, 3]);
        assert_eq!(fetched.get(), 1);
    }

    #[test]
    fn test_bucket_gate_passes_error_through() {
        let get_keys = |_: &ScanContext, _: &mut (), _: &Bucket, _: &()| -> ScanResult<Vec<u64>> {
            Err(ScanError::fetch("index unavailable"))
        };
        let open = |_: &ScanContext, _: &mut (), _: &Bucket, _: &()| true;
        let gated = BucketGated::new(get_keys, open);

        let result = gated.get_keys(&ScanContext::new(), &mut (), &Bucket::new("b"), &());
        assert!(matches!(result, Err(ScanError::Fetch(_))));
    }
}
