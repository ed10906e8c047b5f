//! Batch retrieval collaborators
//!
//! Shapes of the embedding application's bulk fetch functions. Closures with
//! the matching signature implement these traits directly.

use crate::bucket::Bucket;
use crate::context::ScanContext;
use crate::errors::ScanResult;

/// Gets every record in a bucket.
pub trait GetAll<V> {
    fn get_all(&self, ctx: &ScanContext, bucket: &Bucket) -> ScanResult<Vec<V>>;
}

impl<V, G> GetAll<V> for G
where
    G: Fn(&ScanContext, &Bucket) -> ScanResult<Vec<V>>,
{
    fn get_all(&self, ctx: &ScanContext, bucket: &Bucket) -> ScanResult<Vec<V>> {
        self(ctx, bucket)
    }
}

/// Gets the records of a bucket matching a filter, filtered by the backend.
pub trait GetFiltered<V, F: ?Sized> {
    fn get_filtered(&self, ctx: &ScanContext, bucket: &Bucket, filter: &F) -> ScanResult<Vec<V>>;
}

impl<V, F: ?Sized, G> GetFiltered<V, F> for G
where
    G: Fn(&ScanContext, &Bucket, &F) -> ScanResult<Vec<V>>,
{
    fn get_filtered(&self, ctx: &ScanContext, bucket: &Bucket, filter: &F) -> ScanResult<Vec<V>> {
        self(ctx, bucket, filter)
    }
}
