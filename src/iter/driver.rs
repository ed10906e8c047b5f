//! Iteration adapter
//!
//! Every loop here is `drive`: advance, read into the caller's buffer, hand
//! the record to a filtered consumer. An explicit stop returns at once and
//! leaves `final_error` uncalled; the cursor is still the caller's to close.
//! Otherwise the loop ends with `final_error`.

use tracing::trace;

use crate::codec::{Decode, Unnest};
use crate::errors::ScanResult;
use crate::filter::LocalFilter;
use crate::observability::Event;

use super::consumer::{consume_filtered_many, Consumer, FilteredConsumer, Flow};
use super::cursor::Cursor;

/// Drives a cursor into a filtered consumer.
///
/// Returns `Flow::Stop` if the consumer stopped, `Flow::Continue` if the
/// cursor ran out.
pub fn drive<P, F, Cur, C>(
    cursor: &mut Cur,
    buf: &mut P,
    filter: &F,
    consumer: &mut C,
) -> ScanResult<Flow>
where
    P: ?Sized,
    F: ?Sized,
    Cur: Cursor<P> + ?Sized,
    C: FilteredConsumer<P, F> + ?Sized,
{
    let mut consumed: u64 = 0;
    while cursor.advance() {
        cursor.read(buf)?;
        consumed += 1;
        if consumer.consume_filtered(buf, filter)?.is_stop() {
            trace!(event = %Event::ScanStopped, records = consumed);
            return Ok(Flow::Stop);
        }
    }
    cursor.final_error()?;
    Ok(Flow::Continue)
}

/// Reads every record and converts it 1:1. Any failure discards the list.
pub fn collect_converted<P, D, Cur, Conv>(
    cursor: &mut Cur,
    buf: &mut P,
    convert: &Conv,
) -> ScanResult<Vec<D>>
where
    P: ?Sized,
    Cur: Cursor<P> + ?Sized,
    Conv: Decode<P, D> + ?Sized,
{
    let mut converted = Vec::new();
    let mut push = |record: &P, _: &()| -> ScanResult<Flow> {
        converted.push(convert.decode(record)?);
        Ok(Flow::Continue)
    };
    drive(cursor, buf, &(), &mut push)?;
    Ok(converted)
}

/// As `collect_converted`, with a coarse filter before the conversion and a
/// fine one after it.
pub fn collect_converted_filtered<P, D, F, Cur, Coarse, Conv, Fine>(
    cursor: &mut Cur,
    buf: &mut P,
    filter: &F,
    coarse: &Coarse,
    convert: &Conv,
    fine: &Fine,
) -> ScanResult<Vec<D>>
where
    P: ?Sized,
    F: ?Sized,
    Cur: Cursor<P> + ?Sized,
    Coarse: LocalFilter<P, F> + ?Sized,
    Conv: Decode<P, D> + ?Sized,
    Fine: LocalFilter<D, F> + ?Sized,
{
    let mut converted = Vec::new();
    let mut push = |record: &P, filter: &F| -> ScanResult<Flow> {
        if !coarse.keep(record, filter) {
            return Ok(Flow::Continue);
        }
        let value = convert.decode(record)?;
        if fine.keep(&value, filter) {
            converted.push(value);
        }
        Ok(Flow::Continue)
    };
    drive(cursor, buf, filter, &mut push)?;
    Ok(converted)
}

/// Feeds the records a single filter keeps to the consumer.
pub fn iter_to_consumer_filtered<P, F, Cur, K, C>(
    cursor: &mut Cur,
    buf: &mut P,
    filter: &F,
    keep: &K,
    consumer: &mut C,
) -> ScanResult<Flow>
where
    P: ?Sized,
    F: ?Sized,
    Cur: Cursor<P> + ?Sized,
    K: LocalFilter<P, F> + ?Sized,
    C: Consumer<P> + ?Sized,
{
    let mut stage = |record: &P, filter: &F| -> ScanResult<Flow> {
        if !keep.keep(record, filter) {
            return Ok(Flow::Continue);
        }
        consumer.consume(record)
    };
    drive(cursor, buf, filter, &mut stage)
}

/// Coarse filter, 1:1 conversion, fine filter, consumer.
pub fn iter_to_consumer_converted<P, D, F, Cur, Coarse, Conv, Fine, C>(
    cursor: &mut Cur,
    buf: &mut P,
    filter: &F,
    coarse: &Coarse,
    convert: &Conv,
    fine: &Fine,
    consumer: &mut C,
) -> ScanResult<Flow>
where
    P: ?Sized,
    F: ?Sized,
    Cur: Cursor<P> + ?Sized,
    Coarse: LocalFilter<P, F> + ?Sized,
    Conv: Decode<P, D> + ?Sized,
    Fine: LocalFilter<D, F> + ?Sized,
    C: Consumer<D> + ?Sized,
{
    let mut stage = |record: &P, filter: &F| -> ScanResult<Flow> {
        if !coarse.keep(record, filter) {
            return Ok(Flow::Continue);
        }
        let value = convert.decode(record)?;
        if !fine.keep(&value, filter) {
            return Ok(Flow::Continue);
        }
        consumer.consume(&value)
    };
    drive(cursor, buf, filter, &mut stage)
}

/// Coarse filter, 1:N unnest, fine filter per entry, consumer.
pub fn iter_to_consumer_unnested<P, U, F, Cur, Coarse, Un, Fine, C>(
    cursor: &mut Cur,
    buf: &mut P,
    filter: &F,
    coarse: &Coarse,
    unnest: &Un,
    fine: &Fine,
    consumer: &mut C,
) -> ScanResult<Flow>
where
    P: ?Sized,
    F: ?Sized,
    Cur: Cursor<P> + ?Sized,
    Coarse: LocalFilter<P, F> + ?Sized,
    Un: Unnest<P, U> + ?Sized,
    Fine: LocalFilter<U, F> + ?Sized,
    C: Consumer<U> + ?Sized,
{
    let mut stage = |record: &P, filter: &F| -> ScanResult<Flow> {
        if !coarse.keep(record, filter) {
            return Ok(Flow::Continue);
        }
        let entries = unnest.unnest(record)?;
        consume_filtered_many(&mut *consumer, &entries, fine, filter)
    };
    drive(cursor, buf, filter, &mut stage)
}
