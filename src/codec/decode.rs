//! Decode stage
//!
//! One encoded record in, one decoded record out. The batch forms fetch
//! every encoded record first and decode in order; the first failure
//! aborts the batch and nothing decoded so far is returned.

use std::marker::PhantomData;

use crate::bucket::Bucket;
use crate::context::ScanContext;
use crate::errors::ScanResult;
use crate::source::{GetAll, GetFiltered};

/// Converts an encoded record into a decoded one.
pub trait Decode<E: ?Sized, D> {
    fn decode(&self, encoded: &E) -> ScanResult<D>;
}

impl<E: ?Sized, D, P> Decode<E, D> for P
where
    P: Fn(&E) -> ScanResult<D>,
{
    fn decode(&self, encoded: &E) -> ScanResult<D> {
        self(encoded)
    }
}

/// Decodes every record in order. All or nothing.
pub fn decode_all<E, D, Dec>(decoder: &Dec, encoded: &[E]) -> ScanResult<Vec<D>>
where
    Dec: Decode<E, D> + ?Sized,
{
    encoded.iter().map(|item| decoder.decode(item)).collect()
}

/// `GetAll` over decoded records, backed by a `GetAll` over encoded ones.
pub struct DecodeAll<S, Dec, E> {
    source: S,
    decoder: Dec,
    _encoded: PhantomData<fn() -> E>,
}

impl<S, Dec, E> DecodeAll<S, Dec, E> {
    pub fn new(source: S, decoder: Dec) -> Self {
        Self {
            source,
            decoder,
            _encoded: PhantomData,
        }
    }
}

impl<S, Dec, E, D> GetAll<D> for DecodeAll<S, Dec, E>
where
    S: GetAll<E>,
    Dec: Decode<E, D>,
{
    fn get_all(&self, ctx: &ScanContext, bucket: &Bucket) -> ScanResult<Vec<D>> {
        let encoded = self.source.get_all(ctx, bucket)?;
        decode_all(&self.decoder, &encoded)
    }
}

/// `GetFiltered` over decoded records; the filter is passed to the backend
/// untouched and the records it returns are decoded in order.
pub struct RemoteDecoded<S, Dec, E> {
    remote: S,
    decoder: Dec,
    _encoded: PhantomData<fn() -> E>,
}

impl<S, Dec, E> RemoteDecoded<S, Dec, E> {
    pub fn new(remote: S, decoder: Dec) -> Self {
        Self {
            remote,
            decoder,
            _encoded: PhantomData,
        }
    }
}

impl<S, Dec, E, D, F> GetFiltered<D, F> for RemoteDecoded<S, Dec, E>
where
    F: ?Sized,
    S: GetFiltered<E, F>,
    Dec: Decode<E, D>,
{
    fn get_filtered(&self, ctx: &ScanContext, bucket: &Bucket, filter: &F) -> ScanResult<Vec<D>> {
        let encoded = self.remote.get_filtered(ctx, bucket, filter)?;
        decode_all(&self.decoder, &encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScanError;
    use std::cell::Cell;

    #[derive(Debug, Clone)]
    struct EncodedRow {
        key: Vec<u8>,
        val: Vec<u8>,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct DecodedRow {
        key: u8,
        val: u64,
    }

    fn decode_row(row: &EncodedRow) -> ScanResult<DecodedRow> {
        let key = match row.key.as_slice() {
            [k] => *k,
            _ => return Err(ScanError::decode("invalid key")),
        };
        let val: [u8; 8] = row
            .val
            .as_slice()
            .try_into()
            .map_err(|_| ScanError::decode("invalid val"))?;
        Ok(DecodedRow {
            key,
            val: u64::from_be_bytes(val),
        })
    }

    fn valid(key: u8, val: u64) -> EncodedRow {
        EncodedRow {
            key: vec![key],
            val: val.to_be_bytes().to_vec(),
        }
    }

    #[test]
    fn test_decode_single_row() {
        let decoded = decode_row(&valid(0x42, 0x0123_4567_89ab_cdef)).unwrap();
        assert_eq!(decoded.key, 0x42);
        assert_eq!(decoded.val, 0x0123_4567_89ab_cdef);
    }

    #[test]
    fn test_decode_invalid_key() {
        let row = EncodedRow {
            key: vec![],
            val: vec![0; 8],
        };
        assert!(matches!(decode_row(&row), Err(ScanError::Decode(_))));
    }

    #[test]
    fn test_decode_all_empty() {
        let decoded: Vec<DecodedRow> = decode_all(&decode_row, &[] as &[EncodedRow]).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_all_keeps_order() {
        let rows = vec![valid(3, 30), valid(1, 10), valid(2, 20)];
        let decoded = decode_all(&decode_row, &rows).unwrap();
        let keys: Vec<u8> = decoded.iter().map(|d| d.key).collect();
        assert_eq!(keys, vec![3, 1, 2]);
    }

    #[test]
    fn test_decode_all_aborts_on_first_error() {
        let calls = Cell::new(0);
        let counting = |row: &EncodedRow| -> ScanResult<DecodedRow> {
            calls.set(calls.get() + 1);
            decode_row(row)
        };
        let short = EncodedRow {
            key: vec![0x42],
            val: vec![0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef],
        };
        let rows = vec![valid(1, 1), short, valid(3, 3)];

        let result = decode_all(&counting, &rows);
        assert!(matches!(result, Err(ScanError::Decode(_))));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_decode_all_source() {
        let source = |_: &ScanContext, _: &Bucket| -> ScanResult<Vec<EncodedRow>> {
            Ok(vec![valid(0x42, 0x0123_4567_89ab_cdef)])
        };
        let all: DecodeAll<_, _, EncodedRow> = DecodeAll::new(source, decode_row);

        let decoded: Vec<DecodedRow> = all.get_all(&ScanContext::new(), &Bucket::new("")).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].key, 0x42);
    }

    #[test]
    fn test_decode_all_source_error_passes_through() {
        let source = |_: &ScanContext, _: &Bucket| -> ScanResult<Vec<EncodedRow>> {
            Err(ScanError::fetch("connection refused"))
        };
        let all: DecodeAll<_, _, EncodedRow> = DecodeAll::new(source, decode_row);

        let result: ScanResult<Vec<DecodedRow>> = all.get_all(&ScanContext::new(), &Bucket::new(""));
        assert!(matches!(result, Err(ScanError::Fetch(_))));
    }

    #[test]
    fn test_remote_decoded_empty() {
        let remote =
            |_: &ScanContext, _: &Bucket, _: &u16| -> ScanResult<Vec<u16>> { Ok(Vec::new()) };
        let decoder = |_: &u16| -> ScanResult<[u8; 2]> { Ok([0, 0]) };
        let decoded: RemoteDecoded<_, _, u16> = RemoteDecoded::new(remote, decoder);

        let items: Vec<[u8; 2]> = decoded
            .get_filtered(&ScanContext::new(), &Bucket::new(""), &0x00)
            .unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_remote_decoded_single_item() {
        let remote = |_: &ScanContext, _: &Bucket, filter: &u16| -> ScanResult<Vec<u16>> {
            Ok(vec![*filter])
        };
        let decoder = |encoded: &u16| -> ScanResult<[u8; 2]> { Ok(encoded.to_be_bytes()) };
        let decoded: RemoteDecoded<_, _, u16> = RemoteDecoded::new(remote, decoder);

        let items: Vec<[u8; 2]> = decoded
            .get_filtered(&ScanContext::new(), &Bucket::new(""), &0x0042)
            .unwrap();
        assert_eq!(items, vec![[0x00, 0x42]]);
    }
}
