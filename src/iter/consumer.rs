//! Consumer protocol
//!
//! A consumer is called once per qualifying entry, in production order, and
//! answers `Flow::Continue` or `Flow::Stop`. An `Err` halts the loop and
//! propagates; it always wins over a stop since a consumer can return only
//! one of the two. After a stop or an error the consumer is not called
//! again within the same invocation.

use std::marker::PhantomData;

use crate::codec::Unpack;
use crate::errors::ScanResult;
use crate::filter::{KeepAll, LocalFilter};

/// Loop control returned by a consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Produce the next entry
    #[default]
    Continue,
    /// Halt successfully; nothing more is produced
    Stop,
}

impl Flow {
    pub fn is_stop(&self) -> bool {
        matches!(self, Flow::Stop)
    }

    /// `Stop` iff `stop` is true.
    pub fn stop_if(stop: bool) -> Self {
        if stop {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }
}

/// Per-entry sink.
pub trait Consumer<T: ?Sized> {
    fn consume(&mut self, item: &T) -> ScanResult<Flow>;
}

impl<T: ?Sized, C> Consumer<T> for C
where
    C: FnMut(&T) -> ScanResult<Flow>,
{
    fn consume(&mut self, item: &T) -> ScanResult<Flow> {
        self(item)
    }
}

/// Per-entry sink that also sees the caller's filter.
pub trait FilteredConsumer<T: ?Sized, F: ?Sized> {
    fn consume_filtered(&mut self, item: &T, filter: &F) -> ScanResult<Flow>;
}

impl<T: ?Sized, F: ?Sized, C> FilteredConsumer<T, F> for C
where
    C: FnMut(&T, &F) -> ScanResult<Flow>,
{
    fn consume_filtered(&mut self, item: &T, filter: &F) -> ScanResult<Flow> {
        self(item, filter)
    }
}

/// Feeds the items the filter keeps to the consumer, in order.
///
/// Returns as soon as the consumer stops or fails; the remaining items are
/// not looked at.
pub fn consume_filtered_many<T, F, K, C>(
    consumer: &mut C,
    items: &[T],
    keep: &K,
    filter: &F,
) -> ScanResult<Flow>
where
    F: ?Sized,
    K: LocalFilter<T, F> + ?Sized,
    C: Consumer<T> + ?Sized,
{
    for item in items {
        if !keep.keep(item, filter) {
            continue;
        }
        if consumer.consume(item)?.is_stop() {
            return Ok(Flow::Stop);
        }
    }
    Ok(Flow::Continue)
}

/// Feeds every entry to a filtered consumer, in order, until it stops.
pub fn consume_entries<T, F, C>(consumer: &mut C, entries: &[T], filter: &F) -> ScanResult<Flow>
where
    F: ?Sized,
    C: FilteredConsumer<T, F> + ?Sized,
{
    for entry in entries {
        if consumer.consume_filtered(entry, filter)?.is_stop() {
            return Ok(Flow::Stop);
        }
    }
    Ok(Flow::Continue)
}

/// Record-level consumer built from an entry-level one: each record is
/// unpacked and its entries are delivered in order until the consumer stops.
pub struct PackedConsumer<Up, C, U> {
    unpack: Up,
    consumer: C,
    _entry: PhantomData<fn() -> U>,
}

impl<Up, C, U> PackedConsumer<Up, C, U> {
    pub fn new(unpack: Up, consumer: C) -> Self {
        Self {
            unpack,
            consumer,
            _entry: PhantomData,
        }
    }

    pub fn into_inner(self) -> C {
        self.consumer
    }
}

impl<P, U, Up, C> Consumer<P> for PackedConsumer<Up, C, U>
where
    P: ?Sized,
    Up: Unpack<P, U>,
    C: Consumer<U>,
{
    fn consume(&mut self, packed: &P) -> ScanResult<Flow> {
        let entries = self.unpack.unpack(packed)?;
        consume_filtered_many(&mut self.consumer, &entries, &KeepAll, &())
    }
}
