//! Local (client-side) filtering
//!
//! A `LocalFilter` is a pure predicate over a value and the caller's filter.
//! The same trait serves both tiers: coarse filters see the cheap raw
//! representation, fine filters see the materialized one.

/// Checks if a value must be kept.
pub trait LocalFilter<V: ?Sized, F: ?Sized> {
    fn keep(&self, value: &V, filter: &F) -> bool;

    /// Conjunction of two filters. Both are evaluated.
    fn and<O>(self, other: O) -> And<Self, O>
    where
        Self: Sized,
        O: LocalFilter<V, F>,
    {
        And::new(self, other)
    }
}

impl<V: ?Sized, F: ?Sized, P> LocalFilter<V, F> for P
where
    P: Fn(&V, &F) -> bool,
{
    fn keep(&self, value: &V, filter: &F) -> bool {
        self(value, filter)
    }
}

/// Keeps a value only if both filters keep it.
#[derive(Debug, Clone, Copy)]
pub struct And<A, B> {
    first: A,
    second: B,
}

impl<A, B> And<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<V: ?Sized, F: ?Sized, A, B> LocalFilter<V, F> for And<A, B>
where
    A: LocalFilter<V, F>,
    B: LocalFilter<V, F>,
{
    fn keep(&self, value: &V, filter: &F) -> bool {
        let first = self.first.keep(value, filter);
        let second = self.second.keep(value, filter);
        first && second
    }
}

/// Keeps every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAll;

impl<V: ?Sized, F: ?Sized> LocalFilter<V, F> for KeepAll {
    fn keep(&self, _value: &V, _filter: &F) -> bool {
        true
    }
}

/// Returns only the values the filter keeps, in their original order.
pub fn filter_local<V, F, K>(keep: &K, values: Vec<V>, filter: &F) -> Vec<V>
where
    F: ?Sized,
    K: LocalFilter<V, F> + ?Sized,
{
    values
        .into_iter()
        .filter(|value| keep.keep(value, filter))
        .collect()
}
