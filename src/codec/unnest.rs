//! Unnest stage
//!
//! Same contract as `Unpack`, used on the per-key retrieval path: one
//! fetched and decoded record expands into N logical entries.

use crate::errors::ScanResult;

/// Expands one fetched record into its logical entries.
pub trait Unnest<P: ?Sized, U> {
    fn unnest(&self, packed: &P) -> ScanResult<Vec<U>>;
}

impl<P: ?Sized, U, X> Unnest<P, U> for X
where
    X: Fn(&P) -> ScanResult<Vec<U>>,
{
    fn unnest(&self, packed: &P) -> ScanResult<Vec<U>> {
        self(packed)
    }
}
