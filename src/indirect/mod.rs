//! Key-index retrieval
//!
//! Indirect scans run in two phases: list the candidate keys of a bucket,
//! then get each value by key. A bucket gate can skip the key listing for
//! buckets known to be irrelevant, and keys whose value is gone are skipped
//! without error.

mod by_key;
mod fetch;
mod keys;

pub use by_key::{DecodedByKey, GetByKey};
pub use fetch::{fetch_keys, KeyedFetch, KeyedUnnestFetch};
pub use keys::{BucketGated, CheckBucket, GetKeys};
