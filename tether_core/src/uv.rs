// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Texture coordinates for the camera background quad.
//!
//! The background is a full-screen triangle strip with vertices
//! `(-1,-1) (1,-1) (-1,1) (1,1)`. Which part of the camera image each corner
//! samples depends on the display rotation, so the tracking runtime
//! transforms the [canonical quad](UvQuad::CANONICAL) into the rotated one.
//! That transform only changes with the rotation, so
//! [`TextureCoordinateMapper`] caches the result and asks the runtime again
//! only when the cache is dirty.

use core::fmt;

use crate::geometry::{DisplayRotation, GeometryChange};
use crate::tracking::TrackingFrame;

/// Four `(s, t)` texture coordinates, one per background strip vertex.
#[derive(Clone, Copy, PartialEq)]
pub struct UvQuad {
    vertices: [[f32; 2]; 4],
}

/// Strip corners in counter-clockwise order, as indices into a [`UvQuad`].
const CCW: [usize; 4] = [0, 1, 3, 2];

impl UvQuad {
    /// Texture coordinates for an unrotated display.
    ///
    /// Image row 0 is at the top, so `t` is flipped relative to clip space.
    pub const CANONICAL: Self = Self {
        vertices: [[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
    };

    /// Creates a quad from four `(s, t)` pairs in strip order.
    #[inline]
    #[must_use]
    pub const fn new(vertices: [[f32; 2]; 4]) -> Self {
        Self { vertices }
    }

    /// Creates a quad from 8 interleaved floats `s0 t0 s1 t1 …`.
    #[must_use]
    pub const fn from_floats(f: &[f32; 8]) -> Self {
        Self {
            vertices: [[f[0], f[1]], [f[2], f[3]], [f[4], f[5]], [f[6], f[7]]],
        }
    }

    /// Returns the 8 interleaved floats `s0 t0 s1 t1 …`, ready for upload.
    #[must_use]
    pub const fn to_floats(&self) -> [f32; 8] {
        let v = &self.vertices;
        [
            v[0][0], v[0][1], v[1][0], v[1][1], v[2][0], v[2][1], v[3][0], v[3][1],
        ]
    }

    /// Returns the `(s, t)` pair for strip vertex `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn vertex(&self, i: usize) -> [f32; 2] {
        self.vertices[i]
    }

    /// Rotates the image content by `rotation`, moving every coordinate to
    /// the next corner counter-clockwise once per quarter turn.
    ///
    /// This is the transform a runtime without its own display-UV mapping
    /// applies to [`CANONICAL`](Self::CANONICAL).
    #[must_use]
    pub fn rotated(&self, rotation: DisplayRotation) -> Self {
        let turns = usize::from(rotation.quarter_turns());
        let mut vertices = self.vertices;
        for k in 0..4 {
            vertices[CCW[k]] = self.vertices[CCW[(k + turns) % 4]];
        }
        Self { vertices }
    }
}

impl Default for UvQuad {
    fn default() -> Self {
        Self::CANONICAL
    }
}

impl fmt::Debug for UvQuad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.vertices.iter()).finish()
    }
}

/// A [`UvQuad`] plus whether it has ever been computed from a live frame.
///
/// Until the first successful tracking update the camera texture holds no
/// image, so an uninitialized set means "do not sample the camera yet".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureCoordinateSet {
    uvs: UvQuad,
    initialized: bool,
}

impl TextureCoordinateSet {
    /// The set before any frame has been seen.
    pub const UNINITIALIZED: Self = Self {
        uvs: UvQuad::CANONICAL,
        initialized: false,
    };

    /// A set computed from a live frame.
    #[inline]
    #[must_use]
    pub const fn computed(uvs: UvQuad) -> Self {
        Self {
            uvs,
            initialized: true,
        }
    }

    /// The coordinates.
    #[inline]
    #[must_use]
    pub const fn uvs(&self) -> &UvQuad {
        &self.uvs
    }

    /// Whether the coordinates came from a live frame.
    #[inline]
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl Default for TextureCoordinateSet {
    fn default() -> Self {
        Self::UNINITIALIZED
    }
}

/// Caches the rotated [`TextureCoordinateSet`] and recomputes it lazily.
///
/// The cache becomes dirty when the display rotation changes (or on the first
/// display notification), when the frame reports that the runtime's own view
/// of the display geometry changed, or when it was never initialized.
#[derive(Clone, Debug)]
pub struct TextureCoordinateMapper {
    set: TextureCoordinateSet,
    dirty: bool,
    recompute_count: u64,
}

impl Default for TextureCoordinateMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureCoordinateMapper {
    /// Creates a mapper whose first resolve will recompute.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            set: TextureCoordinateSet::UNINITIALIZED,
            dirty: true,
            recompute_count: 0,
        }
    }

    /// Applies the result of a display-changed notification.
    ///
    /// Only rotation changes invalidate the cache; size changes affect the
    /// projection's aspect ratio but not which image corner maps where.
    pub fn apply(&mut self, change: GeometryChange) {
        if change.rotation_changed {
            self.dirty = true;
        }
    }

    /// Forces the next resolve to recompute.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Returns `true` if the next resolve will ask the frame for new
    /// coordinates.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty || !self.set.initialized
    }

    /// Returns the cached set, recomputing it from `frame` if needed.
    ///
    /// The second value is `true` when a recomputation happened.
    pub fn resolve<F: TrackingFrame>(&mut self, frame: &F) -> (TextureCoordinateSet, bool) {
        self.resolve_with(frame.display_geometry_changed(), |quad| {
            frame.transform_display_uvs(quad)
        })
    }

    /// Like [`resolve`](Self::resolve), with the frame's geometry-changed
    /// flag and its UV transform passed in directly.
    pub fn resolve_with(
        &mut self,
        frame_geometry_changed: bool,
        transform: impl FnOnce(&UvQuad) -> UvQuad,
    ) -> (TextureCoordinateSet, bool) {
        if !(self.is_dirty() || frame_geometry_changed) {
            return (self.set, false);
        }
        self.set = TextureCoordinateSet::computed(transform(&UvQuad::CANONICAL));
        self.dirty = false;
        self.recompute_count += 1;
        log::debug!(
            target: "tether::uv",
            "recomputed display UVs (#{}): {:?}",
            self.recompute_count,
            self.set.uvs
        );
        (self.set, true)
    }

    /// The cached set without recomputing.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> TextureCoordinateSet {
        self.set
    }

    /// How many times the coordinates have been recomputed.
    #[inline]
    #[must_use]
    pub const fn recompute_count(&self) -> u64 {
        self.recompute_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotate90(q: &UvQuad) -> UvQuad {
        q.rotated(DisplayRotation::Deg90)
    }

    #[test]
    fn canonical_matches_strip_layout() {
        assert_eq!(
            UvQuad::CANONICAL.to_floats(),
            [0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0]
        );
        assert_eq!(UvQuad::CANONICAL.vertex(2), [0.0, 0.0]);
    }

    #[test]
    fn zero_rotation_is_identity() {
        assert_eq!(
            UvQuad::CANONICAL.rotated(DisplayRotation::Deg0),
            UvQuad::CANONICAL
        );
    }

    #[test]
    fn quarter_turn_moves_each_corner() {
        let r = UvQuad::CANONICAL.rotated(DisplayRotation::Deg90);
        // Bottom-left now samples what bottom-right sampled, and so on
        // around the quad.
        assert_eq!(r.vertex(0), [1.0, 1.0]);
        assert_eq!(r.vertex(1), [1.0, 0.0]);
        assert_eq!(r.vertex(3), [0.0, 0.0]);
        assert_eq!(r.vertex(2), [0.0, 1.0]);
    }

    #[test]
    fn four_quarter_turns_compose_to_identity() {
        let mut q = UvQuad::CANONICAL;
        for _ in 0..4 {
            q = q.rotated(DisplayRotation::Deg90);
        }
        assert_eq!(q, UvQuad::CANONICAL);
        assert_eq!(
            UvQuad::CANONICAL
                .rotated(DisplayRotation::Deg90)
                .rotated(DisplayRotation::Deg180),
            UvQuad::CANONICAL.rotated(DisplayRotation::Deg270)
        );
    }

    #[test]
    fn floats_round_trip() {
        let q = UvQuad::CANONICAL.rotated(DisplayRotation::Deg180);
        assert_eq!(UvQuad::from_floats(&q.to_floats()), q);
    }

    #[test]
    fn first_resolve_initializes() {
        let mut mapper = TextureCoordinateMapper::new();
        assert!(!mapper.current().is_initialized());
        let (set, recomputed) = mapper.resolve_with(false, rotate90);
        assert!(recomputed);
        assert!(set.is_initialized());
        assert_eq!(*set.uvs(), UvQuad::CANONICAL.rotated(DisplayRotation::Deg90));
        assert_eq!(mapper.recompute_count(), 1);
    }

    #[test]
    fn clean_cache_is_reused() {
        let mut mapper = TextureCoordinateMapper::new();
        let _ = mapper.resolve_with(false, rotate90);
        let (_, recomputed) = mapper.resolve_with(false, |_| panic!("cache should be used"));
        assert!(!recomputed);
        assert_eq!(mapper.recompute_count(), 1);
    }

    #[test]
    fn size_change_does_not_invalidate() {
        let mut mapper = TextureCoordinateMapper::new();
        let _ = mapper.resolve_with(false, rotate90);
        mapper.apply(GeometryChange {
            rotation_changed: false,
            size_changed: true,
        });
        assert!(!mapper.is_dirty());
    }

    #[test]
    fn rotation_change_invalidates_once() {
        let mut mapper = TextureCoordinateMapper::new();
        let _ = mapper.resolve_with(false, rotate90);
        mapper.apply(GeometryChange::ALL);
        assert!(mapper.is_dirty());
        let _ = mapper.resolve_with(false, rotate90);
        let _ = mapper.resolve_with(false, rotate90);
        assert_eq!(mapper.recompute_count(), 2);
    }

    #[test]
    fn frame_flag_forces_recompute() {
        let mut mapper = TextureCoordinateMapper::new();
        let _ = mapper.resolve_with(false, rotate90);
        let (_, recomputed) = mapper.resolve_with(true, rotate90);
        assert!(recomputed);
        assert_eq!(mapper.recompute_count(), 2);
    }
}
