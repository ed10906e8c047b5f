//! Cursor-like resources
//!
//! A cursor is driven through three primitives: `advance`, `read` into a
//! caller-owned buffer, and `final_error` once the loop ends. Opening and
//! closing the underlying resource stays with the caller.

use crate::errors::{ScanError, ScanResult};

/// Pull-style record source.
pub trait Cursor<P: ?Sized> {
    /// Moves to the next record. False once exhausted.
    fn advance(&mut self) -> bool;

    /// Reads the current record into `buf`, overwriting it.
    fn read(&mut self, buf: &mut P) -> ScanResult<()>;

    /// Error that ended the iteration, if any.
    fn final_error(&mut self) -> ScanResult<()>;
}

/// Cursor assembled from three closures over an arbitrary state.
pub struct FnCursor<S, A, R, E> {
    state: S,
    advance: A,
    read: R,
    final_error: E,
}

impl<S, A, R, E> FnCursor<S, A, R, E> {
    pub fn new(state: S, advance: A, read: R, final_error: E) -> Self {
        Self {
            state,
            advance,
            read,
            final_error,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }
}

impl<S, A, R, E, P> Cursor<P> for FnCursor<S, A, R, E>
where
    P: ?Sized,
    A: FnMut(&mut S) -> bool,
    R: FnMut(&mut S, &mut P) -> ScanResult<()>,
    E: FnMut(&mut S) -> ScanResult<()>,
{
    fn advance(&mut self) -> bool {
        (self.advance)(&mut self.state)
    }

    fn read(&mut self, buf: &mut P) -> ScanResult<()> {
        (self.read)(&mut self.state, buf)
    }

    fn final_error(&mut self) -> ScanResult<()> {
        (self.final_error)(&mut self.state)
    }
}

/// Cursor over an iterator of fallible records.
///
/// An `Err` item fails the `read` for that position; `final_error` always
/// succeeds.
pub struct IterCursor<I, P> {
    iter: I,
    current: Option<ScanResult<P>>,
}

impl<I, P> IterCursor<I, P>
where
    I: Iterator<Item = ScanResult<P>>,
{
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            iter: iter.into_iter(),
            current: None,
        }
    }
}

impl<I, P> Cursor<P> for IterCursor<I, P>
where
    I: Iterator<Item = ScanResult<P>>,
{
    fn advance(&mut self) -> bool {
        self.current = self.iter.next();
        self.current.is_some()
    }

    fn read(&mut self, buf: &mut P) -> ScanResult<()> {
        match self.current.take() {
            Some(Ok(record)) => {
                *buf = record;
                Ok(())
            }
            Some(Err(err)) => Err(err),
            None => Err(ScanError::read("no current record")),
        }
    }

    fn final_error(&mut self) -> ScanResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_cursor_counts_down() {
        let mut cursor = FnCursor::new(
            3u8,
            |left: &mut u8| {
                if *left == 0 {
                    return false;
                }
                *left -= 1;
                true
            },
            |left: &mut u8, buf: &mut u8| -> ScanResult<()> {
                *buf = *left;
                Ok(())
            },
            |_: &mut u8| -> ScanResult<()> { Ok(()) },
        );

        let mut buf = 0u8;
        let mut read = Vec::new();
        while cursor.advance() {
            cursor.read(&mut buf).unwrap();
            read.push(buf);
        }
        assert!(cursor.final_error().is_ok());
        assert_eq!(read, vec![2, 1, 0]);
        assert_eq!(*cursor.state(), 0);
    }

    #[test]
    fn test_fn_cursor_final_error() {
        let mut cursor = FnCursor::new(
            (),
            |_: &mut ()| false,
            |_: &mut (), _: &mut u8| -> ScanResult<()> { Ok(()) },
            |_: &mut ()| -> ScanResult<()> { Err(ScanError::read("connection reset")) },
        );

        assert!(!Cursor::<u8>::advance(&mut cursor));
        let err = Cursor::<u8>::final_error(&mut cursor).unwrap_err();
        assert_eq!(err.to_string(), "read failed: connection reset");
    }

    #[test]
    fn test_iter_cursor() {
        let records = vec![Ok(1u32), Err(ScanError::read("bad page")), Ok(3)];
        let mut cursor = IterCursor::new(records);
        let mut buf = 0u32;

        assert!(cursor.advance());
        cursor.read(&mut buf).unwrap();
        assert_eq!(buf, 1);

        assert!(cursor.advance());
        assert!(matches!(cursor.read(&mut buf), Err(ScanError::Read(_))));
        assert_eq!(buf, 1);

        assert!(cursor.advance());
        cursor.read(&mut buf).unwrap();
        assert_eq!(buf, 3);

        assert!(!cursor.advance());
        assert!(cursor.read(&mut buf).is_err());
        assert!(cursor.final_error().is_ok());
    }
}
