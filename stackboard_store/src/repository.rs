// Copyright 2025 the Stackboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract every backend honors, and backend selection.

use tracing::info;

use crate::config::{Backend, EngineConfig};
use crate::engine::Engine;
use crate::error::Result;
use crate::widget::{Area, Widget, WidgetId, WidgetSpec};

/// Create, update, delete, and query widgets.
///
/// Every implementation keeps z unique among live widgets by shifting the
/// contiguous run above a colliding z, and uses the same edge-inclusive
/// containment rule for [`WidgetRepository::find_in_area`]. Results of the
/// find operations are in ascending z.
pub trait WidgetRepository: Send + Sync {
    /// Create a widget. Assigns its id, resolves its z, stamps it.
    fn create(&self, spec: WidgetSpec) -> Result<Widget>;

    /// Overwrite the geometry of an existing widget and re-stamp it.
    fn update(&self, id: WidgetId, spec: WidgetSpec) -> Result<Widget>;

    /// Delete a widget.
    fn delete(&self, id: WidgetId) -> Result<()>;

    /// Fetch a widget.
    fn get(&self, id: WidgetId) -> Result<Widget>;

    /// Up to `limit` widgets from the bottom of the stack.
    fn find_top(&self, limit: usize) -> Result<Vec<Widget>>;

    /// Up to `limit` widgets lying entirely inside `area`, bottom first.
    fn find_in_area(&self, area: Area, limit: usize) -> Result<Vec<Widget>>;
}

/// Build the backend selected by `config`.
pub fn open_repository(config: &EngineConfig) -> Result<Box<dyn WidgetRepository>> {
    info!(backend = ?config.backend, first_z = config.first_z, "opening widget repository");
    Ok(match &config.backend {
        Backend::Memory => Box::new(Engine::with_config(config.clone())),
        #[cfg(feature = "sqlite")]
        Backend::Sqlite { path } => {
            let repo = match path {
                Some(path) => crate::sqlite::SqliteRepository::open(path, config.clone())?,
                None => crate::sqlite::SqliteRepository::open_in_memory(config.clone())?,
            };
            Box::new(repo)
        }
    })
}
