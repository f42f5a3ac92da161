// Copyright 2025 the Stackboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canonical widget records keyed by id.

use hashbrown::HashMap;

use crate::error::{Error, Result};
use crate::widget::{Widget, WidgetId};

/// Plain key-value storage of widgets.
///
/// The store never stamps or validates; that is the engine's job. Indexes
/// refer into it by [`WidgetId`] and never hold copies.
#[derive(Clone, Debug, Default)]
pub struct WidgetStore {
    widgets: HashMap<WidgetId, Widget>,
}

impl WidgetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of widgets.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Insert or overwrite by id, returning the stored record.
    pub fn put(&mut self, widget: Widget) -> &Widget {
        let id = widget.id;
        self.widgets.insert(id, widget);
        &self.widgets[&id]
    }

    /// Look up a widget.
    pub fn get(&self, id: WidgetId) -> Result<&Widget> {
        self.widgets.get(&id).ok_or(Error::NotFound(id))
    }

    /// Look up a widget for in-place edits.
    pub fn get_mut(&mut self, id: WidgetId) -> Result<&mut Widget> {
        self.widgets.get_mut(&id).ok_or(Error::NotFound(id))
    }

    /// Remove a widget, returning its last record.
    pub fn delete(&mut self, id: WidgetId) -> Result<Widget> {
        self.widgets.remove(&id).ok_or(Error::NotFound(id))
    }
}
