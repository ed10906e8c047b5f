//! Retrieval shared by both scan shapes
//!
//! Direct and indirect retrieval take the same arguments and feed the same
//! consumer, so the plan can swap one for the other without the caller
//! noticing. Scratch buffers belong to the retrieval value and are reused
//! across records.

use tracing::trace;

use crate::bucket::Bucket;
use crate::codec::Decode;
use crate::context::ScanContext;
use crate::errors::ScanResult;
use crate::filter::{KeepAll, LocalFilter};
use crate::iter::{drive, Cursor, FilteredConsumer, Flow};

/// Streams the values of a bucket matching a filter into a consumer.
pub trait Retrieve<C: ?Sized, V, F: ?Sized> {
    fn retrieve(
        &mut self,
        ctx: &ScanContext,
        conn: &mut C,
        bucket: &Bucket,
        filter: &F,
        consumer: &mut dyn FilteredConsumer<V, F>,
    ) -> ScanResult<Flow>;
}

impl<C, V, F, R> Retrieve<C, V, F> for R
where
    C: ?Sized,
    F: ?Sized,
    R: FnMut(&ScanContext, &mut C, &Bucket, &F, &mut dyn FilteredConsumer<V, F>) -> ScanResult<Flow>,
{
    fn retrieve(
        &mut self,
        ctx: &ScanContext,
        conn: &mut C,
        bucket: &Bucket,
        filter: &F,
        consumer: &mut dyn FilteredConsumer<V, F>,
    ) -> ScanResult<Flow> {
        self(ctx, conn, bucket, filter, consumer)
    }
}

/// Direct scan: opens a cursor over the bucket, decodes the records the
/// coarse filter keeps and hands the ones the fine filter keeps to the
/// consumer.
///
/// Both filters default to `KeepAll`. Give the direct scan the same fine
/// filter as the indirect side so both shapes return the same values.
pub struct CursorScan<O, Dec, E, Coarse = KeepAll, Fine = KeepAll> {
    open: O,
    decoder: Dec,
    coarse: Coarse,
    fine: Fine,
    buf: E,
}

impl<O, Dec, E> CursorScan<O, Dec, E> {
    /// `buf` is the scratch record every read overwrites.
    pub fn new(open: O, decoder: Dec, buf: E) -> Self {
        Self {
            open,
            decoder,
            coarse: KeepAll,
            fine: KeepAll,
            buf,
        }
    }
}

impl<O, Dec, E, Coarse, Fine> CursorScan<O, Dec, E, Coarse, Fine> {
    /// Replaces both filters. `coarse` runs on the encoded record before
    /// decode, `fine` on the decoded value.
    pub fn with_filters<C2, F2>(self, coarse: C2, fine: F2) -> CursorScan<O, Dec, E, C2, F2> {
        CursorScan {
            open: self.open,
            decoder: self.decoder,
            coarse,
            fine,
            buf: self.buf,
        }
    }
}

impl<C, V, F, O, Dec, E, Cur, Coarse, Fine> Retrieve<C, V, F> for CursorScan<O, Dec, E, Coarse, Fine>
where
    C: ?Sized,
    F: ?Sized,
    O: FnMut(&ScanContext, &mut C, &Bucket, &F) -> ScanResult<Cur>,
    Cur: Cursor<E>,
    Dec: Decode<E, V>,
    Coarse: LocalFilter<E, F>,
    Fine: LocalFilter<V, F>,
{
    fn retrieve(
        &mut self,
        ctx: &ScanContext,
        conn: &mut C,
        bucket: &Bucket,
        filter: &F,
        consumer: &mut dyn FilteredConsumer<V, F>,
    ) -> ScanResult<Flow> {
        let mut cursor = (self.open)(ctx, conn, bucket, filter)?;
        trace!(request_id = %ctx.request_id, bucket = %bucket, "cursor opened");

        let coarse = &self.coarse;
        let decoder = &self.decoder;
        let fine = &self.fine;
        let mut decode_then_consume = |encoded: &E, filter: &F| -> ScanResult<Flow> {
            if !coarse.keep(encoded, filter) {
                return Ok(Flow::Continue);
            }
            let decoded = decoder.decode(encoded)?;
            if !fine.keep(&decoded, filter) {
                return Ok(Flow::Continue);
            }
            consumer.consume_filtered(&decoded, filter)
        };
        drive(&mut cursor, &mut self.buf, filter, &mut decode_then_consume)
    }
}
