// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display rotation and viewport size.
//!
//! A [`DisplayGeometry`] is only ever replaced by an explicit
//! display-changed notification. [`GeometryTracker`] compares each
//! notification against the stored value and reports what actually changed,
//! so rotation-dependent work (texture coordinates) is redone only when the
//! rotation moves and size-only changes just feed the aspect ratio.

use core::fmt;

use kurbo::Size;

use crate::error::Error;

/// Rotation of the display relative to the device's natural orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayRotation {
    /// Natural orientation.
    #[default]
    Deg0,
    /// Rotated a quarter turn.
    Deg90,
    /// Upside down.
    Deg180,
    /// Rotated three quarter turns.
    Deg270,
}

impl DisplayRotation {
    /// All rotations in ascending order.
    pub const ALL: [Self; 4] = [Self::Deg0, Self::Deg90, Self::Deg180, Self::Deg270];

    /// Parses a rotation given in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRotation`] for anything other than 0, 90, 180
    /// or 270.
    pub const fn from_degrees(degrees: i32) -> Result<Self, Error> {
        match degrees {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            other => Err(Error::InvalidRotation(other)),
        }
    }

    /// The rotation in degrees.
    #[inline]
    #[must_use]
    pub const fn degrees(self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// The rotation as a number of quarter turns (`0..4`).
    ///
    /// This is the index form most platform display APIs use
    /// (`Surface.ROTATION_0` through `Surface.ROTATION_270` on Android).
    #[inline]
    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 1,
            Self::Deg180 => 2,
            Self::Deg270 => 3,
        }
    }

    /// Returns `true` for 90 and 270 degrees.
    #[inline]
    #[must_use]
    pub const fn is_sideways(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

impl TryFrom<i32> for DisplayRotation {
    type Error = Error;

    fn try_from(degrees: i32) -> Result<Self, Error> {
        Self::from_degrees(degrees)
    }
}

/// Current display rotation and viewport size in pixels.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayGeometry {
    rotation: DisplayRotation,
    width: u32,
    height: u32,
}

impl DisplayGeometry {
    /// Geometry assumed before the first display-changed notification.
    pub const DEFAULT: Self = Self {
        rotation: DisplayRotation::Deg0,
        width: 1,
        height: 1,
    };

    /// Creates a geometry, rejecting zero-sized viewports.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidViewport`] if `width` or `height` is zero.
    pub const fn new(rotation: DisplayRotation, width: u32, height: u32) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidViewport { width, height });
        }
        Ok(Self {
            rotation,
            width,
            height,
        })
    }

    /// Parses a rotation in degrees and validates the viewport in one step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRotation`] or [`Error::InvalidViewport`].
    pub const fn from_degrees(degrees: i32, width: u32, height: u32) -> Result<Self, Error> {
        match DisplayRotation::from_degrees(degrees) {
            Ok(rotation) => Self::new(rotation, width, height),
            Err(e) => Err(e),
        }
    }

    /// Display rotation.
    #[inline]
    #[must_use]
    pub const fn rotation(&self) -> DisplayRotation {
        self.rotation
    }

    /// Viewport width in pixels.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Viewport height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Viewport size as a [`Size`].
    #[inline]
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Width divided by height.
    #[inline]
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Compares `self` (the stored geometry) with `next`.
    #[must_use]
    pub fn diff(&self, next: &Self) -> GeometryChange {
        GeometryChange {
            rotation_changed: self.rotation != next.rotation,
            size_changed: self.width != next.width || self.height != next.height,
        }
    }
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for DisplayGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DisplayGeometry({}x{}@{}°)",
            self.width,
            self.height,
            self.rotation.degrees()
        )
    }
}

/// What a display-changed notification actually changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeometryChange {
    /// The rotation differs from the stored value, or this is the first
    /// notification.
    pub rotation_changed: bool,
    /// The width or height differs from the stored value, or this is the
    /// first notification.
    pub size_changed: bool,
}

impl GeometryChange {
    /// A change that touches everything, as produced by the first
    /// notification.
    pub const ALL: Self = Self {
        rotation_changed: true,
        size_changed: true,
    };

    /// Returns `true` if nothing changed.
    #[inline]
    #[must_use]
    pub const fn is_noop(self) -> bool {
        !self.rotation_changed && !self.size_changed
    }
}

/// Holds the current [`DisplayGeometry`] and detects no-op notifications.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeometryTracker {
    current: Option<DisplayGeometry>,
}

impl GeometryTracker {
    /// Creates a tracker that has not seen any notification yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Stores `next` and reports what changed relative to the previous value.
    ///
    /// The first call always reports [`GeometryChange::ALL`].
    pub fn update(&mut self, next: DisplayGeometry) -> GeometryChange {
        let change = match &self.current {
            Some(current) => current.diff(&next),
            None => GeometryChange::ALL,
        };
        self.current = Some(next);
        change
    }

    /// The stored geometry, or [`DisplayGeometry::DEFAULT`] before the first
    /// notification.
    #[inline]
    #[must_use]
    pub fn current(&self) -> DisplayGeometry {
        self.current.unwrap_or(DisplayGeometry::DEFAULT)
    }

    /// Returns `true` once at least one notification has been applied.
    #[inline]
    #[must_use]
    pub const fn has_geometry(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_parses_quarter_turns_only() {
        for (deg, turns) in [(0, 0), (90, 1), (180, 2), (270, 3)] {
            let r = DisplayRotation::from_degrees(deg).unwrap();
            assert_eq!(r.quarter_turns(), turns);
            assert_eq!(i64::from(r.degrees()), i64::from(deg));
        }
        assert_eq!(
            DisplayRotation::from_degrees(45),
            Err(Error::InvalidRotation(45))
        );
        assert_eq!(
            DisplayRotation::try_from(-90),
            Err(Error::InvalidRotation(-90))
        );
        assert_eq!(
            DisplayRotation::from_degrees(360),
            Err(Error::InvalidRotation(360))
        );
    }

    #[test]
    fn zero_sized_viewport_is_rejected() {
        assert_eq!(
            DisplayGeometry::new(DisplayRotation::Deg0, 0, 1080),
            Err(Error::InvalidViewport {
                width: 0,
                height: 1080
            })
        );
        assert_eq!(
            DisplayGeometry::from_degrees(90, 1920, 0),
            Err(Error::InvalidViewport {
                width: 1920,
                height: 0
            })
        );
        assert_eq!(
            DisplayGeometry::from_degrees(30, 1920, 1080),
            Err(Error::InvalidRotation(30))
        );
    }

    #[test]
    fn aspect_ratio_is_width_over_height() {
        let g = DisplayGeometry::from_degrees(90, 1920, 1080).unwrap();
        assert!((g.aspect_ratio() - 1920.0 / 1080.0).abs() < 1e-6);
        assert_eq!(g.size(), Size::new(1920.0, 1080.0));
    }

    #[test]
    fn first_update_changes_everything() {
        let mut tracker = GeometryTracker::new();
        assert!(!tracker.has_geometry());
        assert_eq!(tracker.current(), DisplayGeometry::DEFAULT);

        let g = DisplayGeometry::from_degrees(0, 1080, 1920).unwrap();
        assert_eq!(tracker.update(g), GeometryChange::ALL);
        assert_eq!(tracker.current(), g);
    }

    #[test]
    fn identical_update_is_noop() {
        let mut tracker = GeometryTracker::new();
        let g = DisplayGeometry::from_degrees(0, 1080, 1920).unwrap();
        let _ = tracker.update(g);
        assert!(tracker.update(g).is_noop());
    }

    #[test]
    fn size_only_update_keeps_rotation() {
        let mut tracker = GeometryTracker::new();
        let _ = tracker.update(DisplayGeometry::from_degrees(90, 1920, 1080).unwrap());
        let change = tracker.update(DisplayGeometry::from_degrees(90, 2400, 1080).unwrap());
        assert!(!change.rotation_changed);
        assert!(change.size_changed);
    }

    #[test]
    fn rotation_update_is_detected() {
        let mut tracker = GeometryTracker::new();
        let _ = tracker.update(DisplayGeometry::from_degrees(0, 1080, 1920).unwrap());
        let change = tracker.update(DisplayGeometry::from_degrees(270, 1080, 1920).unwrap());
        assert!(change.rotation_changed);
        assert!(!change.size_changed);
    }
}
