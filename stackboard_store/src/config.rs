// Copyright 2025 the Stackboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.

#[cfg(feature = "sqlite")]
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Largest `limit` accepted by the find operations unless configured otherwise.
pub const DEFAULT_MAX_LIMIT: usize = 500;

/// Which backend [`open_repository`](crate::open_repository) builds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "kebab-case"))]
pub enum Backend {
    /// The in-memory [`Engine`](crate::Engine).
    #[default]
    Memory,
    /// An SQLite table; `path: None` opens a private in-memory database.
    #[cfg(feature = "sqlite")]
    Sqlite {
        /// Database file.
        #[cfg_attr(feature = "serde", serde(default))]
        path: Option<PathBuf>,
    },
}

/// Settings shared by every backend.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct EngineConfig {
    /// z given to the first widget created without an explicit z on an empty board.
    pub first_z: i32,
    /// Upper bound for `limit` in find operations.
    pub max_limit: usize,
    /// Backend selection.
    pub backend: Backend,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            first_z: 0,
            max_limit: DEFAULT_MAX_LIMIT,
            backend: Backend::Memory,
        }
    }
}

impl EngineConfig {
    /// Reject a `limit` outside `1..=max_limit`.
    pub fn check_limit(&self, limit: usize) -> Result<()> {
        if limit == 0 || limit > self.max_limit {
            return Err(Error::InvalidArgument(format!(
                "limit must be within 1..={}, got {limit}",
                self.max_limit
            )));
        }
        Ok(())
    }
}
