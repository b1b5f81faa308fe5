//! Generic sequence helpers used by the query and mutation engines.
//!
//! All helpers are stateless and operate on plain slices/vectors. Equality is
//! whatever `PartialEq` says for the element type; for entity references that
//! means comparing ids.

use std::cmp::Ordering;

/// Returns a shallow copy of `items`.
///
/// For `Arc` elements only the pointers are copied; the entities stay shared.
#[must_use]
pub fn copy<T: Clone>(items: &[T]) -> Vec<T> {
    items.to_vec()
}

/// Keeps only the elements for which `predicate` returns true, preserving
/// their relative order. Returns true if anything is left.
pub fn filter_in_place<T>(items: &mut Vec<T>, predicate: impl FnMut(&T) -> bool) -> bool {
    items.retain(predicate);
    !items.is_empty()
}

/// Appends `x` unless an equal element is already present.
///
/// Returns true if `x` was appended.
pub fn append_unique<T: PartialEq>(items: &mut Vec<T>, x: T) -> bool {
    if items.contains(&x) {
        return false;
    }
    items.push(x);
    true
}

/// Collects `iter` into a vector, keeping only the first occurrence of each
/// element.
pub fn unique<T: PartialEq>(iter: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for x in iter {
        append_unique(&mut out, x);
    }
    out
}

/// Returns true if `items` contains `x`.
#[must_use]
pub fn contains<T: PartialEq>(items: &[T], x: &T) -> bool {
    items.iter().any(|i| i == x)
}

/// Returns true if every element of `a` appears somewhere in `b`.
///
/// An empty `a` is a subset of anything; a non-empty `a` is never a subset of
/// an empty `b`. Duplicates in `a` are irrelevant.
#[must_use]
pub fn is_subset<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    a.iter().all(|x| b.contains(x))
}

/// Like [`is_subset`], but compares `a` against a projection of each `b`.
#[must_use]
pub fn is_subset_by<A: PartialEq, B>(a: &[A], b: &[B], get: impl Fn(&B) -> &A) -> bool {
    a.iter().all(|x| b.iter().any(|y| x == get(y)))
}

/// Sorts `items` with `cmp` when given, then truncates to `limit` when given.
///
/// The sort is stable, so elements comparing equal keep their input order.
/// A `limit` of `None` keeps everything; `Some(0)` yields an empty vector.
#[must_use]
pub fn sort_and_limit<T, F>(mut items: Vec<T>, cmp: Option<F>, limit: Option<usize>) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if let Some(cmp) = cmp {
        items.sort_by(cmp);
    }
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}
