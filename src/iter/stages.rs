//! Consumer stages
//!
//! Each stage wraps a downstream `FilteredConsumer` and is itself one, so a
//! pipeline reads outside-in: coarse filter, decode or expand, fine filter,
//! sink.

use std::marker::PhantomData;

use crate::codec::{Decode, Unnest, Unpack};
use crate::errors::ScanResult;
use crate::filter::LocalFilter;

use super::consumer::{consume_entries, Consumer, FilteredConsumer, Flow};

/// Lifts an entry consumer into a filtered one; the filter is ignored.
pub struct Unfiltered<C>(C);

impl<C> Unfiltered<C> {
    pub fn new(consumer: C) -> Self {
        Self(consumer)
    }

    pub fn into_inner(self) -> C {
        self.0
    }
}

impl<T, F, C> FilteredConsumer<T, F> for Unfiltered<C>
where
    T: ?Sized,
    F: ?Sized,
    C: Consumer<T>,
{
    fn consume_filtered(&mut self, item: &T, _filter: &F) -> ScanResult<Flow> {
        self.0.consume(item)
    }
}

/// Skips the items a local filter rejects.
pub struct Filtered<K, C> {
    keep: K,
    consumer: C,
}

impl<K, C> Filtered<K, C> {
    pub fn new(keep: K, consumer: C) -> Self {
        Self { keep, consumer }
    }
}

impl<T, F, K, C> FilteredConsumer<T, F> for Filtered<K, C>
where
    T: ?Sized,
    F: ?Sized,
    K: LocalFilter<T, F>,
    C: FilteredConsumer<T, F>,
{
    fn consume_filtered(&mut self, item: &T, filter: &F) -> ScanResult<Flow> {
        if !self.keep.keep(item, filter) {
            return Ok(Flow::Continue);
        }
        self.consumer.consume_filtered(item, filter)
    }
}

/// Decodes each record, then delegates. A decode error aborts.
pub struct Decoded<Dec, C, D> {
    decoder: Dec,
    consumer: C,
    _decoded: PhantomData<fn() -> D>,
}

impl<Dec, C, D> Decoded<Dec, C, D> {
    pub fn new(decoder: Dec, consumer: C) -> Self {
        Self {
            decoder,
            consumer,
            _decoded: PhantomData,
        }
    }
}

impl<E, D, F, Dec, C> FilteredConsumer<E, F> for Decoded<Dec, C, D>
where
    E: ?Sized,
    F: ?Sized,
    Dec: Decode<E, D>,
    C: FilteredConsumer<D, F>,
{
    fn consume_filtered(&mut self, encoded: &E, filter: &F) -> ScanResult<Flow> {
        let decoded = self.decoder.decode(encoded)?;
        self.consumer.consume_filtered(&decoded, filter)
    }
}

/// Unpacks each record and delegates every entry in order until the
/// downstream consumer stops.
pub struct Unpacked<Up, C, U> {
    unpack: Up,
    consumer: C,
    _entry: PhantomData<fn() -> U>,
}

impl<Up, C, U> Unpacked<Up, C, U> {
    pub fn new(unpack: Up, consumer: C) -> Self {
        Self {
            unpack,
            consumer,
            _entry: PhantomData,
        }
    }
}

impl<P, U, F, Up, C> FilteredConsumer<P, F> for Unpacked<Up, C, U>
where
    P: ?Sized,
    F: ?Sized,
    Up: Unpack<P, U>,
    C: FilteredConsumer<U, F>,
{
    fn consume_filtered(&mut self, packed: &P, filter: &F) -> ScanResult<Flow> {
        let entries = self.unpack.unpack(packed)?;
        consume_entries(&mut self.consumer, &entries, filter)
    }
}

/// As `Unpacked`, expanding through `Unnest`.
pub struct Unnested<Un, C, U> {
    unnest: Un,
    consumer: C,
    _entry: PhantomData<fn() -> U>,
}

impl<Un, C, U> Unnested<Un, C, U> {
    pub fn new(unnest: Un, consumer: C) -> Self {
        Self {
            unnest,
            consumer,
            _entry: PhantomData,
        }
    }
}

impl<P, U, F, Un, C> FilteredConsumer<P, F> for Unnested<Un, C, U>
where
    P: ?Sized,
    F: ?Sized,
    Un: Unnest<P, U>,
    C: FilteredConsumer<U, F>,
{
    fn consume_filtered(&mut self, packed: &P, filter: &F) -> ScanResult<Flow> {
        let entries = self.unnest.unnest(packed)?;
        consume_entries(&mut self.consumer, &entries, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScanError;
    use std::cell::{Cell, RefCell};

    fn parse(raw: &str) -> ScanResult<u32> {
        raw.parse::<u32>().map_err(ScanError::decode)
    }

    fn digits(n: &u32) -> ScanResult<Vec<u32>> {
        Ok(n.to_string().bytes().map(|b| u32::from(b - b'0')).collect())
    }

    #[test]
    fn test_unfiltered_ignores_filter() {
        let seen = RefCell::new(Vec::new());
        let sink = |item: &u32| -> ScanResult<Flow> {
            seen.borrow_mut().push(*item);
            Ok(Flow::Continue)
        };
        let mut stage = Unfiltered::new(sink);
        stage.consume_filtered(&4, &"ignored").unwrap();
        assert_eq!(*seen.borrow(), vec![4]);
    }

    #[test]
    fn test_coarse_decode_fine_pipeline() {
        let seen = RefCell::new(Vec::new());
        let sink = |item: &u32| -> ScanResult<Flow> {
            seen.borrow_mut().push(*item);
            Ok(Flow::Continue)
        };
        let decoded_count = Cell::new(0);
        let decoder = |raw: &str| -> ScanResult<u32> {
            decoded_count.set(decoded_count.get() + 1);
            parse(raw)
        };
        // coarse: short strings only; fine: value at most the filter
        let coarse = |raw: &str, _: &u32| raw.len() <= 2;
        let fine = |value: &u32, max: &u32| *value <= *max;

        let mut pipeline: Filtered<_, Decoded<_, _, u32>> = Filtered::new(
            coarse,
            Decoded::new(decoder, Filtered::new(fine, Unfiltered::new(sink))),
        );

        for raw in ["7", "123", "42", "99"] {
            pipeline.consume_filtered(raw, &50).unwrap();
        }
        assert_eq!(*seen.borrow(), vec![7, 42]);
        // "123" never reached the decoder
        assert_eq!(decoded_count.get(), 3);
    }

    #[test]
    fn test_decoded_error_aborts() {
        let sink = |_: &u32, _: &()| -> ScanResult<Flow> { Ok(Flow::Continue) };
        let mut stage: Decoded<_, _, u32> = Decoded::new(parse, sink);
        let result = stage.consume_filtered("x1", &());
        assert!(matches!(result, Err(ScanError::Decode(_))));
    }

    #[test]
    fn test_unpacked_stops_mid_record() {
        let seen = RefCell::new(Vec::new());
        let sink = |digit: &u32, stop_at: &u32| -> ScanResult<Flow> {
            seen.borrow_mut().push(*digit);
            Ok(Flow::stop_if(digit == stop_at))
        };
        let mut stage: Unpacked<_, _, u32> = Unpacked::new(digits, sink);

        assert_eq!(stage.consume_filtered(&12, &9).unwrap(), Flow::Continue);
        assert_eq!(stage.consume_filtered(&3945, &9).unwrap(), Flow::Stop);
        assert_eq!(*seen.borrow(), vec![1, 2, 3, 9]);
    }

    #[test]
    fn test_unnested_with_fine_filter() {
        let seen = RefCell::new(Vec::new());
        let sink = |digit: &u32| -> ScanResult<Flow> {
            seen.borrow_mut().push(*digit);
            Ok(Flow::Continue)
        };
        let odd = |digit: &u32, _: &()| digit % 2 == 1;
        let mut stage: Unnested<_, _, u32> =
            Unnested::new(digits, Filtered::new(odd, Unfiltered::new(sink)));

        stage.consume_filtered(&12345, &()).unwrap();
        assert_eq!(*seen.borrow(), vec![1, 3, 5]);
    }
}
