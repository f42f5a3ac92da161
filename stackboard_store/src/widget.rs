// Copyright 2025 the Stackboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget records, the specs callers write them from, and query areas.

use core::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use stackboard_index::Bounds;

use crate::error::{Error, Result};

/// Opaque widget identity, assigned on creation and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct WidgetId(u64);

impl WidgetId {
    /// Wrap a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The canonical record of a widget.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Widget {
    /// Identity.
    pub id: WidgetId,
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Stacking order; unique among live widgets. Lower draws below higher.
    pub z: i32,
    /// Width, always positive.
    pub width: i32,
    /// Height, always positive.
    pub height: i32,
    /// Time of the last write to this widget.
    pub updated_at: DateTime<Utc>,
}

impl Widget {
    /// World-space box, widened so the far edges never overflow.
    pub fn bounds(&self) -> Bounds<i64> {
        Bounds::from_xywh(
            i64::from(self.x),
            i64::from(self.y),
            i64::from(self.width),
            i64::from(self.height),
        )
    }
}

/// Desired state of a widget for create and update.
///
/// `z` is optional: on create an absent z stacks the widget on top of
/// everything; on update it keeps the widget where it is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct WidgetSpec {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Requested z, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub z: Option<i32>,
    /// Width; must be positive.
    pub width: i32,
    /// Height; must be positive.
    pub height: i32,
}

impl WidgetSpec {
    /// A spec without an explicit z.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            z: None,
            width,
            height,
        }
    }

    /// The same spec requesting `z`.
    pub const fn at_z(mut self, z: i32) -> Self {
        self.z = Some(z);
        self
    }

    /// Reject non-positive sizes.
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 {
            return Err(Error::InvalidArgument(format!(
                "width must be positive, got {}",
                self.width
            )));
        }
        if self.height <= 0 {
            return Err(Error::InvalidArgument(format!(
                "height must be positive, got {}",
                self.height
            )));
        }
        Ok(())
    }
}

/// A query rectangle from `(x0, y0)` to `(x1, y1)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Area {
    /// Left edge.
    pub x0: i32,
    /// Top edge.
    pub y0: i32,
    /// Right edge; greater than `x0`.
    pub x1: i32,
    /// Bottom edge; greater than `y0`.
    pub y1: i32,
}

impl Area {
    /// Build a checked area.
    ///
    /// ```
    /// use stackboard_store::Area;
    ///
    /// assert!(Area::new(0, 0, 100, 150).is_ok());
    /// assert!(Area::new(100, 0, 100, 150).is_err());
    /// ```
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Result<Self> {
        let area = Self { x0, y0, x1, y1 };
        area.validate()?;
        Ok(area)
    }

    /// Reject empty or inverted areas.
    pub fn validate(&self) -> Result<()> {
        if self.bounds().is_empty() {
            return Err(Error::InvalidArgument(format!(
                "area must satisfy x1 > x0 and y1 > y0, got ({}, {})-({}, {})",
                self.x0, self.y0, self.x1, self.y1
            )));
        }
        Ok(())
    }

    /// The area as a box.
    pub fn bounds(&self) -> Bounds<i64> {
        Bounds::new(
            i64::from(self.x0),
            i64::from(self.y0),
            i64::from(self.x1),
            i64::from(self.y1),
        )
    }

    /// Whether `widget` lies entirely inside this area (edges inclusive).
    pub fn contains(&self, widget: &Widget) -> bool {
        self.bounds().contains(&widget.bounds())
    }
}

/// Write timestamp, truncated to milliseconds so every backend stores it exactly.
pub(crate) fn stamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(x: i32, y: i32, width: i32, height: i32) -> Widget {
        Widget {
            id: WidgetId::new(1),
            x,
            y,
            z: 0,
            width,
            height,
            updated_at: stamp(),
        }
    }

    #[test]
    fn containment_checks_both_axes() {
        let area = Area::new(0, 0, 100, 150).unwrap();
        assert!(area.contains(&widget(50, 100, 50, 50)));
        assert!(area.contains(&widget(0, 0, 30, 40)));
        assert!(!area.contains(&widget(100, 100, 30, 40)));
        assert!(!area.contains(&widget(20, 20, 80, 180)));
    }

    #[test]
    fn far_edge_does_not_overflow() {
        let area = Area::new(0, 0, i32::MAX, i32::MAX).unwrap();
        assert!(!area.contains(&widget(i32::MAX - 1, 0, 10, 10)));
        assert!(area.contains(&widget(i32::MAX - 10, 0, 10, 10)));
    }

    #[test]
    fn spec_rejects_non_positive_size() {
        assert!(WidgetSpec::new(0, 0, 1, 1).validate().is_ok());
        assert!(matches!(
            WidgetSpec::new(0, 0, 0, 1).validate(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            WidgetSpec::new(0, 0, 1, -4).validate(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn area_rejects_empty_and_inverted() {
        assert!(Area::new(0, 0, 0, 10).is_err());
        assert!(Area::new(0, 10, 10, 5).is_err());
    }

    #[test]
    fn stamp_has_millisecond_precision() {
        assert_eq!(stamp().timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn id_displays_as_number() {
        assert_eq!(WidgetId::new(42).to_string(), "42");
    }
}
