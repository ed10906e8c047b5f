//! Unpack stage
//!
//! Expands one packed record into zero or more entries. The batch forms
//! concatenate each record's entries in record order and abort on the first
//! failure.

use std::marker::PhantomData;

use crate::bucket::Bucket;
use crate::context::ScanContext;
use crate::errors::ScanResult;
use crate::source::{GetAll, GetFiltered};

/// Expands a packed record into its entries.
pub trait Unpack<P: ?Sized, U> {
    fn unpack(&self, packed: &P) -> ScanResult<Vec<U>>;
}

impl<P: ?Sized, U, X> Unpack<P, U> for X
where
    X: Fn(&P) -> ScanResult<Vec<U>>,
{
    fn unpack(&self, packed: &P) -> ScanResult<Vec<U>> {
        self(packed)
    }
}

/// Unpacks every record and concatenates the entries in record order.
pub fn unpack_all<P, U, Up>(unpack: &Up, packed: &[P]) -> ScanResult<Vec<U>>
where
    Up: Unpack<P, U> + ?Sized,
{
    let mut unpacked = Vec::with_capacity(packed.len());
    for item in packed {
        unpacked.extend(unpack.unpack(item)?);
    }
    Ok(unpacked)
}

/// `GetAll` over unpacked entries, backed by a `GetAll` over packed records.
pub struct UnpackAll<S, Up, P> {
    source: S,
    unpack: Up,
    _packed: PhantomData<fn() -> P>,
}

impl<S, Up, P> UnpackAll<S, Up, P> {
    pub fn new(source: S, unpack: Up) -> Self {
        Self {
            source,
            unpack,
            _packed: PhantomData,
        }
    }
}

impl<S, Up, P, U> GetAll<U> for UnpackAll<S, Up, P>
where
    S: GetAll<P>,
    Up: Unpack<P, U>,
{
    fn get_all(&self, ctx: &ScanContext, bucket: &Bucket) -> ScanResult<Vec<U>> {
        let packed = self.source.get_all(ctx, bucket)?;
        unpack_all(&self.unpack, &packed)
    }
}

/// `GetFiltered` over unpacked entries; the backend filters packed records
/// and the survivors are unpacked here.
pub struct RemoteUnpacked<S, Up, P> {
    remote: S,
    unpack: Up,
    _packed: PhantomData<fn() -> P>,
}

impl<S, Up, P> RemoteUnpacked<S, Up, P> {
    pub fn new(remote: S, unpack: Up) -> Self {
        Self {
            remote,
            unpack,
            _packed: PhantomData,
        }
    }
}

impl<S, Up, P, U, F> GetFiltered<U, F> for RemoteUnpacked<S, Up, P>
where
    F: ?Sized,
    S: GetFiltered<P, F>,
    Up: Unpack<P, U>,
{
    fn get_filtered(&self, ctx: &ScanContext, bucket: &Bucket, filter: &F) -> ScanResult<Vec<U>> {
        let packed = self.remote.get_filtered(ctx, bucket, filter)?;
        unpack_all(&self.unpack, &packed)
    }
}
