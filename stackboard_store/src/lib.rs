// Copyright 2025 the Stackboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=stackboard_store --heading-base-level=0

//! Stackboard Store: widgets on a plane, kept in a strict stacking order.
//!
//! A widget is a box (`x`, `y`, `width`, `height`) with a `z` that no other
//! live widget shares. Creating or moving a widget onto a taken `z` pushes the
//! contiguous run of widgets above it up by one; a gap in the run stops the
//! push.
//!
//! - [`WidgetRepository`]: the contract (create, update, delete, get,
//!   find top N, find top N inside an area).
//! - [`Engine`]: in-memory implementation. A [`WidgetStore`] holds the
//!   records; [`stackboard_index::ZOrder`] and [`stackboard_index::XIndex`]
//!   hold only ids and are kept in step under one lock.
//! - `SqliteRepository` *(feature `sqlite`, default)*: the same contract over
//!   an SQLite table.
//! - [`EngineConfig`] and [`open_repository`]: pick a backend at startup.
//!
//! Find results are always in ascending z. Area queries return widgets whose
//! box lies entirely inside the area, edges included.
//!
//! ## Features
//!
//! - `sqlite` *(default)*: enables `SqliteRepository` via `rusqlite`.
//! - `serde`: serializes [`Widget`] as `{ id, x, y, z, width, height, updatedAt }`
//!   with an ISO-8601 timestamp, and deserializes [`WidgetSpec`], [`Area`],
//!   and [`EngineConfig`].
//!
//! # Example
//!
//! ```rust
//! use stackboard_store::{Area, Engine, WidgetSpec};
//!
//! let engine = Engine::new();
//! let a = engine.create(WidgetSpec::new(1000, 1050, 100, 100)).unwrap();
//! let b = engine.create(WidgetSpec::new(1050, 1100, 100, 100)).unwrap();
//! let _c = engine.create(WidgetSpec::new(1100, 1100, 100, 100)).unwrap();
//!
//! let area = Area::new(1000, 1000, 1100, 1150).unwrap();
//! let inside = engine.find_in_area(area, 10).unwrap();
//! assert_eq!(inside.len(), 1);
//! assert_eq!(inside[0].id, a.id);
//!
//! // Slide `b` under `a` and into the area.
//! engine.update(b.id, WidgetSpec::new(1000, 1000, 100, 50).at_z(a.z)).unwrap();
//! let inside = engine.find_in_area(area, 10).unwrap();
//! assert_eq!(inside.iter().map(|w| w.id).collect::<Vec<_>>(), vec![b.id, a.id]);
//! ```

mod config;
mod engine;
mod error;
mod repository;
#[cfg(feature = "sqlite")]
mod sqlite;
mod store;
mod widget;

pub use config::{Backend, DEFAULT_MAX_LIMIT, EngineConfig};
pub use engine::Engine;
pub use error::{Error, Result};
pub use repository::{WidgetRepository, open_repository};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
pub use store::WidgetStore;
pub use widget::{Area, Widget, WidgetId, WidgetSpec};
