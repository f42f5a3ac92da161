// Copyright 2025 the Stackboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered x-coordinate buckets for pruning rectangle queries.
//!
//! Every identity sits in exactly one bucket, keyed by its left edge. A range
//! query over bucket keys only narrows by x; callers re-check the exact
//! geometry of each candidate afterwards.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt::{self, Debug};
use core::hash::Hash;
use core::ops::RangeInclusive;

use hashbrown::HashMap;
use smallvec::SmallVec;

#[derive(Clone)]
struct Bucket<I> {
    ids: SmallVec<[I; 4]>,
}

impl<I> Default for Bucket<I> {
    fn default() -> Self {
        Self {
            ids: SmallVec::new(),
        }
    }
}

/// Ordered multimap from x to identities.
#[derive(Clone)]
pub struct XIndex<T, I> {
    buckets: BTreeMap<T, Bucket<I>>,
    by_id: HashMap<I, T>,
}

impl<T: Debug + Ord, I> Debug for XIndex<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XIndex")
            .field("buckets", &self.buckets.len())
            .field("entries", &self.by_id.len())
            .field("min_x", &self.buckets.first_key_value().map(|(x, _)| x))
            .field("max_x", &self.buckets.last_key_value().map(|(x, _)| x))
            .finish_non_exhaustive()
    }
}

impl<T, I> Default for XIndex<T, I>
where
    T: Copy + Ord + Debug,
    I: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, I> XIndex<T, I>
where
    T: Copy + Ord + Debug,
    I: Copy + Eq + Hash + Debug,
{
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
            by_id: HashMap::new(),
        }
    }

    /// Number of identities held.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the index holds no identities.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Bucket key currently holding `id`.
    pub fn x_of(&self, id: I) -> Option<T> {
        self.by_id.get(&id).copied()
    }

    /// Add `id` under `x`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is already present.
    pub fn insert(&mut self, id: I, x: T) {
        let previous = self.by_id.insert(id, x);
        assert!(
            previous.is_none(),
            "x-index invariant violated: {id:?} inserted twice"
        );
        self.buckets.entry(x).or_default().ids.push(id);
    }

    /// Remove `id`, returning the bucket key it was under.
    pub fn remove(&mut self, id: I) -> Option<T> {
        let x = self.by_id.remove(&id)?;
        self.remove_from_bucket(id, x);
        Some(x)
    }

    /// Move `id` to the bucket for `x`. Returns the previous key.
    ///
    /// Both halves happen under the same `&mut self`, so no reader can see
    /// `id` in zero or two buckets. Moving to the current key is a no-op.
    pub fn move_to(&mut self, id: I, x: T) -> Option<T> {
        let old = self.x_of(id)?;
        if old != x {
            self.remove_from_bucket(id, old);
            self.buckets.entry(x).or_default().ids.push(id);
            self.by_id.insert(id, x);
        }
        Some(old)
    }

    /// Visit every identity whose key lies in `range`. Order is by key, then
    /// insertion order within a bucket.
    pub fn visit_x_range<F: FnMut(I)>(&self, range: RangeInclusive<T>, mut f: F) {
        if range.start() > range.end() {
            return;
        }
        for bucket in self.buckets.range(range).map(|(_, b)| b) {
            for &id in &bucket.ids {
                f(id);
            }
        }
    }

    /// Collect the identities whose key lies in `range`.
    pub fn candidates_in_x_range(&self, range: RangeInclusive<T>) -> impl Iterator<Item = I> {
        let mut out = Vec::new();
        self.visit_x_range(range, |id| out.push(id));
        out.into_iter()
    }

    fn remove_from_bucket(&mut self, id: I, x: T) {
        let bucket = self
            .buckets
            .get_mut(&x)
            .expect("x-index invariant violated: missing bucket while removing entry");
        let pos = bucket
            .ids
            .iter()
            .position(|&other| other == id)
            .expect("x-index invariant violated: entry not found in expected bucket");
        bucket.ids.remove(pos);
        if bucket.ids.is_empty() {
            self.buckets.remove(&x);
        }
    }
}
