// Copyright 2025 the Stackboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collision-free z ordering with cascading shifts.

use alloc::collections::BTreeMap;
use core::fmt::{self, Debug};
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

/// Returned when resolving a z would step past `i32::MAX`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ZOverflow;

impl fmt::Display for ZOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("z-index space exhausted")
    }
}

impl core::error::Error for ZOverflow {}

/// One displaced entry inside a [`ShiftPlan`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Shift<I> {
    /// The displaced identity.
    pub id: I,
    /// Its z before the shift.
    pub from: i32,
    /// Its z after the shift (always `from + 1`).
    pub to: i32,
}

/// The full set of reassignments needed to place one identity.
///
/// A plan is computed by [`ZOrder::plan`] without touching the index and is
/// applied in one step by [`ZOrder::apply`]. Planning is where every failure
/// happens, so an index is never left half-shifted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShiftPlan<I> {
    id: I,
    z: i32,
    // Highest z first, which is the order they must be rewritten in.
    shifts: SmallVec<[Shift<I>; 4]>,
}

impl<I: Copy> ShiftPlan<I> {
    /// The identity being placed.
    pub fn id(&self) -> I {
        self.id
    }

    /// The z the identity ends up at.
    pub fn z(&self) -> i32 {
        self.z
    }

    /// Entries pushed up by one to free [`ShiftPlan::z`], highest z first.
    pub fn shifts(&self) -> &[Shift<I>] {
        &self.shifts
    }
}

/// Ordered mapping from z to identity, with at most one identity per z.
///
/// Gaps between z values are allowed and are never compacted. Placing an
/// identity on an occupied z pushes the contiguous run starting there up by
/// one; a gap ends the run.
///
/// ## Example
///
/// ```rust
/// use stackboard_index::ZOrder;
///
/// let mut order = ZOrder::new();
/// order.assign('a', Some(5)).unwrap();
/// order.assign('b', Some(5)).unwrap();
///
/// assert_eq!(order.z_of('b'), Some(5));
/// assert_eq!(order.z_of('a'), Some(6));
/// ```
#[derive(Clone)]
pub struct ZOrder<I> {
    first_z: i32,
    slots: BTreeMap<i32, I>,
    by_id: HashMap<I, i32>,
}

impl<I: Debug> Debug for ZOrder<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZOrder")
            .field("first_z", &self.first_z)
            .field("len", &self.slots.len())
            .field("min_z", &self.slots.first_key_value().map(|(z, _)| *z))
            .field("max_z", &self.slots.last_key_value().map(|(z, _)| *z))
            .finish_non_exhaustive()
    }
}

impl<I: Copy + Eq + Hash + Debug> Default for ZOrder<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Copy + Eq + Hash + Debug> ZOrder<I> {
    /// Create an empty index whose first automatic z is `0`.
    pub fn new() -> Self {
        Self::with_first_z(0)
    }

    /// Create an empty index whose first automatic z is `first_z`.
    pub fn with_first_z(first_z: i32) -> Self {
        Self {
            first_z,
            slots: BTreeMap::new(),
            by_id: HashMap::new(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current z of `id`, if present.
    pub fn z_of(&self, id: I) -> Option<i32> {
        self.by_id.get(&id).copied()
    }

    /// Identity at `z`, if any.
    pub fn get(&self, z: i32) -> Option<I> {
        self.slots.get(&z).copied()
    }

    /// Highest occupied z.
    pub fn max_z(&self) -> Option<i32> {
        self.slots.last_key_value().map(|(z, _)| *z)
    }

    /// Compute where `id` would land and what would be displaced.
    ///
    /// - `desired == None`: an identity already present keeps its z; a new
    ///   identity goes one above the highest z (or the first z when empty).
    /// - `desired` occupied by `id` itself: nothing moves.
    /// - `desired` occupied by another identity: the contiguous run starting
    ///   at `desired` is planned to move up by one. The old slot of `id`, if
    ///   any, counts as free, so it terminates the run.
    pub fn plan(&self, id: I, desired: Option<i32>) -> Result<ShiftPlan<I>, ZOverflow> {
        let z = match desired.or_else(|| self.z_of(id)) {
            Some(z) => z,
            None => match self.max_z() {
                Some(max) => max.checked_add(1).ok_or(ZOverflow)?,
                None => self.first_z,
            },
        };

        let mut shifts = SmallVec::new();
        let mut at = z;
        while let Some(occupant) = self.get(at) {
            if occupant == id {
                break;
            }
            let to = at.checked_add(1).ok_or(ZOverflow)?;
            shifts.push(Shift {
                id: occupant,
                from: at,
                to,
            });
            at = to;
        }
        shifts.reverse();

        Ok(ShiftPlan { id, z, shifts })
    }

    /// Apply a plan produced by [`ZOrder::plan`] against this unmodified index.
    ///
    /// # Panics
    ///
    /// Panics if the index changed between planning and applying.
    pub fn apply(&mut self, plan: &ShiftPlan<I>) {
        if let Some(old) = self.by_id.get(&plan.id).copied()
            && old != plan.z
        {
            let vacated = self.slots.remove(&old);
            assert_eq!(
                vacated,
                Some(plan.id),
                "z-order invariant violated: stale slot for moved entry"
            );
        }

        for shift in &plan.shifts {
            let moved = self.slots.remove(&shift.from);
            assert_eq!(
                moved,
                Some(shift.id),
                "z-order invariant violated: shift plan is stale"
            );
            let clobbered = self.slots.insert(shift.to, shift.id);
            assert!(
                clobbered.is_none(),
                "z-order invariant violated: shift overwrote z {}",
                shift.to
            );
            self.by_id.insert(shift.id, shift.to);
        }

        let previous = self.slots.insert(plan.z, plan.id);
        assert!(
            previous.is_none() || previous == Some(plan.id),
            "z-order invariant violated: z {} still occupied after shift",
            plan.z
        );
        self.by_id.insert(plan.id, plan.z);
    }

    /// Place `id` at `desired` (or on top), shifting others as needed.
    ///
    /// Returns the applied plan so callers can mirror the reassignments.
    pub fn assign(&mut self, id: I, desired: Option<i32>) -> Result<ShiftPlan<I>, ZOverflow> {
        let plan = self.plan(id, desired)?;
        self.apply(&plan);
        Ok(plan)
    }

    /// Remove `id`, returning the z it held. Remaining z values are not compacted.
    pub fn remove(&mut self, id: I) -> Option<i32> {
        let z = self.by_id.remove(&id)?;
        let removed = self.slots.remove(&z);
        assert_eq!(
            removed,
            Some(id),
            "z-order invariant violated: reverse map points at the wrong slot"
        );
        Some(z)
    }

    /// Iterate `(z, id)` pairs in ascending z.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (i32, I)> + '_ {
        self.slots.iter().map(|(z, id)| (*z, *id))
    }

    /// Up to `limit` identities in ascending z.
    pub fn top(&self, limit: usize) -> impl Iterator<Item = I> + '_ {
        self.slots.values().copied().take(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn order_of(order: &ZOrder<char>) -> Vec<(i32, char)> {
        order.iter().collect()
    }

    #[test]
    fn colliding_insert_shifts_existing_up() {
        let mut order = ZOrder::new();
        order.assign('a', Some(5)).unwrap();
        let plan = order.assign('b', Some(5)).unwrap();

        assert_eq!(plan.z(), 5);
        assert_eq!(
            plan.shifts(),
            &[Shift {
                id: 'a',
                from: 5,
                to: 6
            }]
        );
        assert_eq!(order_of(&order), vec![(5, 'b'), (6, 'a')]);
    }

    #[test]
    fn shift_cascades_through_contiguous_run() {
        let mut order = ZOrder::new();
        order.assign('a', Some(5)).unwrap();
        order.assign('b', Some(5)).unwrap();
        order.assign('c', Some(6)).unwrap();

        assert_eq!(order_of(&order), vec![(5, 'b'), (6, 'c'), (7, 'a')]);
    }

    #[test]
    fn gap_stops_shift() {
        let mut order = ZOrder::new();
        order.assign('a', Some(1)).unwrap();
        order.assign('b', Some(2)).unwrap();
        order.assign('c', Some(4)).unwrap();
        let plan = order.assign('d', Some(1)).unwrap();

        assert_eq!(plan.shifts().len(), 2);
        assert_eq!(plan.shifts()[0].id, 'b');
        assert_eq!(plan.shifts()[1].id, 'a');
        assert_eq!(
            order_of(&order),
            vec![(1, 'd'), (2, 'a'), (3, 'b'), (4, 'c')]
        );
    }

    #[test]
    fn same_slot_is_a_no_op() {
        let mut order = ZOrder::new();
        order.assign('a', Some(3)).unwrap();
        order.assign('b', Some(4)).unwrap();
        let plan = order.assign('a', Some(3)).unwrap();

        assert!(plan.shifts().is_empty());
        assert_eq!(order_of(&order), vec![(3, 'a'), (4, 'b')]);
    }

    #[test]
    fn absent_z_keeps_existing_entry_in_place() {
        let mut order = ZOrder::new();
        order.assign('a', Some(3)).unwrap();
        order.assign('b', None).unwrap();
        let plan = order.assign('a', None).unwrap();

        assert_eq!(plan.z(), 3);
        assert_eq!(order_of(&order), vec![(3, 'a'), (4, 'b')]);
    }

    #[test]
    fn auto_assign_starts_at_first_z_and_stacks_on_top() {
        let mut order = ZOrder::with_first_z(1);
        assert_eq!(order.assign('a', None).unwrap().z(), 1);
        assert_eq!(order.assign('b', None).unwrap().z(), 2);
        order.assign('c', Some(10)).unwrap();
        assert_eq!(order.assign('d', None).unwrap().z(), 11);
    }

    #[test]
    fn move_into_run_that_contains_own_slot() {
        let mut order = ZOrder::new();
        order.assign('a', Some(1)).unwrap();
        order.assign('b', Some(2)).unwrap();
        order.assign('c', Some(3)).unwrap();

        // `c` leaves 3, so only `a` and `b` need to move.
        let plan = order.assign('c', Some(1)).unwrap();
        assert_eq!(plan.shifts().len(), 2);
        assert_eq!(order_of(&order), vec![(1, 'c'), (2, 'a'), (3, 'b')]);
    }

    #[test]
    fn move_down_to_free_slot_vacates_old() {
        let mut order = ZOrder::new();
        order.assign('a', Some(5)).unwrap();
        order.assign('a', Some(8)).unwrap();

        assert_eq!(order.get(5), None);
        assert_eq!(order_of(&order), vec![(8, 'a')]);
    }

    #[test]
    fn overflow_is_reported_before_mutation() {
        let mut order = ZOrder::new();
        order.assign('a', Some(i32::MAX - 1)).unwrap();
        order.assign('b', Some(i32::MAX)).unwrap();
        let before = order_of(&order);

        assert_eq!(order.assign('c', Some(i32::MAX - 1)), Err(ZOverflow));
        assert_eq!(order.assign('c', None), Err(ZOverflow));
        assert_eq!(order_of(&order), before);
        assert_eq!(order.z_of('c'), None);
    }

    #[test]
    fn remove_leaves_gaps() {
        let mut order = ZOrder::new();
        for id in ['a', 'b', 'c'] {
            order.assign(id, None).unwrap();
        }
        assert_eq!(order.remove('b'), Some(1));
        assert_eq!(order.remove('b'), None);
        assert_eq!(order_of(&order), vec![(0, 'a'), (2, 'c')]);
        assert_eq!(order.max_z(), Some(2));
    }

    #[test]
    fn top_is_ascending_and_restartable() {
        let mut order = ZOrder::new();
        for (z, id) in [(9, 'x'), (-3, 'y'), (4, 'z')] {
            order.assign(id, Some(z)).unwrap();
        }
        let first: Vec<_> = order.top(2).collect();
        let again: Vec<_> = order.top(2).collect();
        assert_eq!(first, vec!['y', 'z']);
        assert_eq!(first, again);
        assert_eq!(order.top(10).count(), 3);
    }

    #[test]
    #[should_panic(expected = "shift plan is stale")]
    fn stale_plan_panics() {
        let mut order = ZOrder::new();
        order.assign('a', Some(1)).unwrap();
        let plan = order.plan('b', Some(1)).unwrap();
        order.remove('a');
        order.apply(&plan);
    }
}
