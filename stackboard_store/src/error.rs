// Copyright 2025 the Stackboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy shared by every repository backend.

use stackboard_index::ZOverflow;
use thiserror::Error;

use crate::widget::WidgetId;

/// Errors returned by [`WidgetRepository`](crate::WidgetRepository) operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No live widget has this id.
    #[error("widget {0} not found")]
    NotFound(WidgetId),

    /// Geometry, rectangle, or limit outside the accepted range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Resolving a z would step past `i32::MAX`. Nothing was changed.
    #[error("z-index space exhausted")]
    ZOverflow,

    /// The durable backend failed; the caller decides whether to retry.
    #[cfg(feature = "sqlite")]
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl From<ZOverflow> for Error {
    fn from(_: ZOverflow) -> Self {
        Self::ZOverflow
    }
}

/// Result alias defaulting to [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
