// Copyright 2025 the Stackboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=stackboard_index --heading-base-level=0

//! Stackboard Index: the derived indexes behind a board of stacked boxes.
//!
//! Stackboard Index holds identity references only. It never stores the boxes
//! themselves; a higher layer owns the canonical records and keeps these
//! indexes in step with them.
//!
//! - [`ZOrder`]: a gap-tolerant ordered mapping from z to identity with
//!   unique keys. Placing an identity on an occupied z shifts the contiguous
//!   run above it by one.
//! - [`XIndex`]: an ordered multimap from left edge to identities, used to
//!   prune rectangle queries before an exact containment check.
//! - [`Bounds`]: axis-aligned boxes with edge-inclusive containment.
//!
//! Shifts are split into [`ZOrder::plan`] and [`ZOrder::apply`]. The plan
//! lists every `(id, from, to)` reassignment up front, so a caller can mirror
//! it into its own records and nothing is applied when planning fails.
//!
//! # Example
//!
//! ```rust
//! use stackboard_index::{Bounds, XIndex, ZOrder};
//!
//! let mut order = ZOrder::new();
//! let mut xs = XIndex::new();
//!
//! for (id, x) in [(1_u32, 0), (2, 40), (3, 200)] {
//!     order.assign(id, None).unwrap();
//!     xs.insert(id, x);
//! }
//!
//! // Put 3 underneath everything else.
//! let plan = order.assign(3, Some(0)).unwrap();
//! assert_eq!(plan.shifts().len(), 2);
//! assert_eq!(order.top(3).collect::<Vec<_>>(), vec![3, 1, 2]);
//!
//! // Prune by x before checking full geometry.
//! let area = Bounds::new(0, 0, 100, 100);
//! let near: Vec<_> = xs.candidates_in_x_range(area.min_x..=area.max_x).collect();
//! assert_eq!(near, vec![1, 2]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod types;
mod x_index;
mod z_order;

pub use types::{Bounds, Scalar};
pub use x_index::XIndex;
pub use z_order::{Shift, ShiftPlan, ZOrder, ZOverflow};
