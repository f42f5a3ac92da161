// Copyright 2025 the Stackboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The in-memory engine: the store plus both indexes behind one lock.

use core::fmt;

use parking_lot::RwLock;
use stackboard_index::{ShiftPlan, XIndex, ZOrder};
use tracing::{debug, info, trace};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::repository::WidgetRepository;
use crate::store::WidgetStore;
use crate::widget::{Area, Widget, WidgetId, WidgetSpec, stamp};

/// Store and derived indexes. Only ever touched through the engine's lock.
#[derive(Debug)]
struct Board {
    store: WidgetStore,
    z_order: ZOrder<WidgetId>,
    xs: XIndex<i32, WidgetId>,
    next_id: u64,
}

impl Board {
    fn new(first_z: i32) -> Self {
        Self {
            store: WidgetStore::new(),
            z_order: ZOrder::with_first_z(first_z),
            xs: XIndex::new(),
            next_id: 1,
        }
    }

    fn widget(&self, id: WidgetId) -> &Widget {
        self.store
            .get(id)
            .expect("board invariant violated: index references a missing widget")
    }

    /// Apply a z plan to the index and mirror the displaced z values into the store.
    fn apply(&mut self, plan: &ShiftPlan<WidgetId>) {
        self.z_order.apply(plan);
        for shift in plan.shifts() {
            self.store
                .get_mut(shift.id)
                .expect("board invariant violated: shifted widget missing from store")
                .z = shift.to;
        }
        if !plan.shifts().is_empty() {
            debug!(
                id = %plan.id(),
                z = plan.z(),
                shifted = plan.shifts().len(),
                "shifted widgets up to free z"
            );
        }
    }

    fn check(&self) {
        debug_assert_eq!(
            self.store.len(),
            self.z_order.len(),
            "board invariant violated: store and z-order diverged"
        );
        debug_assert_eq!(
            self.store.len(),
            self.xs.len(),
            "board invariant violated: store and x-index diverged"
        );
    }
}

/// Thread-safe widget engine.
///
/// Writers hold an exclusive lock for the whole operation, including id
/// allocation, z resolution, and any shift; readers share the lock. No reader
/// ever sees a half-applied shift or a widget in two x buckets.
///
/// ## Example
///
/// ```rust
/// use stackboard_store::{Engine, WidgetSpec};
///
/// let engine = Engine::new();
/// let a = engine.create(WidgetSpec::new(0, 0, 10, 10).at_z(5)).unwrap();
/// let b = engine.create(WidgetSpec::new(0, 0, 10, 10).at_z(5)).unwrap();
///
/// assert_eq!(b.z, 5);
/// assert_eq!(engine.get(a.id).unwrap().z, 6);
/// ```
pub struct Engine {
    config: EngineConfig,
    board: RwLock<Board>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.board.read();
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("widgets", &board.store.len())
            .field("next_id", &board.next_id)
            .field("z_order", &board.z_order)
            .field("xs", &board.xs)
            .finish_non_exhaustive()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an empty engine with default settings.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an empty engine.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            board: RwLock::new(Board::new(config.first_z)),
            config,
        }
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.board.read().store.len()
    }

    /// Whether no widgets are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a widget; see [`WidgetRepository::create`].
    pub fn create(&self, spec: WidgetSpec) -> Result<Widget> {
        spec.validate()?;
        let mut board = self.board.write();

        let id = WidgetId::new(board.next_id);
        let plan = board.z_order.plan(id, spec.z)?;
        board.next_id += 1;
        board.apply(&plan);

        let widget = Widget {
            id,
            x: spec.x,
            y: spec.y,
            z: plan.z(),
            width: spec.width,
            height: spec.height,
            updated_at: stamp(),
        };
        board.xs.insert(id, widget.x);
        let widget = board.store.put(widget).clone();
        board.check();

        info!(%id, z = widget.z, "created widget");
        Ok(widget)
    }

    /// Update a widget; see [`WidgetRepository::update`].
    ///
    /// A z that is absent or equal to the current one leaves the z-order alone.
    pub fn update(&self, id: WidgetId, spec: WidgetSpec) -> Result<Widget> {
        spec.validate()?;
        let mut board = self.board.write();

        let (old_x, old_z) = {
            let current = board.store.get(id)?;
            (current.x, current.z)
        };

        let z = match spec.z {
            Some(z) if z != old_z => {
                let plan = board.z_order.plan(id, Some(z))?;
                board.apply(&plan);
                plan.z()
            }
            _ => old_z,
        };
        if spec.x != old_x {
            board.xs.move_to(id, spec.x);
        }

        let widget = Widget {
            id,
            x: spec.x,
            y: spec.y,
            z,
            width: spec.width,
            height: spec.height,
            updated_at: stamp(),
        };
        let widget = board.store.put(widget).clone();
        board.check();

        info!(%id, z, "updated widget");
        Ok(widget)
    }

    /// Delete a widget; see [`WidgetRepository::delete`].
    pub fn delete(&self, id: WidgetId) -> Result<()> {
        let mut board = self.board.write();
        board.store.delete(id)?;
        board
            .z_order
            .remove(id)
            .expect("board invariant violated: deleted widget missing from z-order");
        board
            .xs
            .remove(id)
            .expect("board invariant violated: deleted widget missing from x-index");
        board.check();

        info!(%id, "deleted widget");
        Ok(())
    }

    /// Fetch a widget; see [`WidgetRepository::get`].
    pub fn get(&self, id: WidgetId) -> Result<Widget> {
        let board = self.board.read();
        let widget = board.store.get(id)?.clone();
        trace!(%id, "found widget");
        Ok(widget)
    }

    /// Bottom `limit` widgets; see [`WidgetRepository::find_top`].
    pub fn find_top(&self, limit: usize) -> Result<Vec<Widget>> {
        self.config.check_limit(limit)?;
        let board = self.board.read();
        let found: Vec<Widget> = board
            .z_order
            .top(limit)
            .map(|id| board.widget(id).clone())
            .collect();
        trace!(limit, found = found.len(), "found widgets by z");
        Ok(found)
    }

    /// Widgets inside `area`; see [`WidgetRepository::find_in_area`].
    ///
    /// Candidates are pruned by left edge over `[x0, x1]` (inclusive), then
    /// checked on both axes, sorted by z, and truncated.
    pub fn find_in_area(&self, area: Area, limit: usize) -> Result<Vec<Widget>> {
        area.validate()?;
        self.config.check_limit(limit)?;
        let board = self.board.read();

        let mut inside: Vec<&Widget> = Vec::new();
        board.xs.visit_x_range(area.x0..=area.x1, |id| {
            let widget = board.widget(id);
            if area.contains(widget) {
                inside.push(widget);
            }
        });
        inside.sort_by_key(|w| w.z);
        inside.truncate(limit);

        let found: Vec<Widget> = inside.into_iter().cloned().collect();
        trace!(?area, limit, found = found.len(), "found widgets in area");
        Ok(found)
    }
}

impl WidgetRepository for Engine {
    fn create(&self, spec: WidgetSpec) -> Result<Widget> {
        Self::create(self, spec)
    }

    fn update(&self, id: WidgetId, spec: WidgetSpec) -> Result<Widget> {
        Self::update(self, id, spec)
    }

    fn delete(&self, id: WidgetId) -> Result<()> {
        Self::delete(self, id)
    }

    fn get(&self, id: WidgetId) -> Result<Widget> {
        Self::get(self, id)
    }

    fn find_top(&self, limit: usize) -> Result<Vec<Widget>> {
        Self::find_top(self, limit)
    }

    fn find_in_area(&self, area: Area, limit: usize) -> Result<Vec<Widget>> {
        Self::find_in_area(self, area, limit)
    }
}
