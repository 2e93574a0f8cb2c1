// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the tick.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! frame orchestrator calls at each stage of a tick. All method bodies
//! default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::anchor::AnchorKey;
use crate::geometry::DisplayRotation;
use crate::matrix::ViewProjection;
use crate::tracking::TrackingState;
use crate::uv::UvQuad;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How a tick ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TickOutcome {
    /// The camera was tracking; background and overlays were drawn.
    Rendered,
    /// A frame arrived but the camera was not tracking; only the background
    /// (if its coordinates were initialized) was drawn.
    TrackingLost,
    /// The session produced no frame; nothing was drawn.
    UpdateFailed,
    /// The session is paused; nothing was acquired or drawn.
    Paused,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted once the tick's frame acquisition has been attempted.
#[derive(Clone, Copy, Debug)]
pub struct TickBeginEvent {
    /// Monotonic tick counter.
    pub frame_index: u64,
    /// Camera capture time of the acquired frame, if any.
    pub timestamp_ns: Option<i64>,
    /// Camera tracking state of the acquired frame, if any.
    pub camera: Option<TrackingState>,
}

/// Emitted when the background texture coordinates are recomputed.
#[derive(Clone, Copy, Debug)]
pub struct UvRecomputeEvent {
    /// Tick counter.
    pub frame_index: u64,
    /// Display rotation the coordinates were computed for.
    pub rotation: DisplayRotation,
    /// The new coordinates.
    pub uvs: UvQuad,
    /// Total recomputations so far, including this one.
    pub recompute_count: u64,
}

/// Emitted after the tick's matrices are computed.
#[derive(Clone, Copy, Debug)]
pub struct ViewProjectionEvent {
    /// Tick counter.
    pub frame_index: u64,
    /// The matrices every draw of this tick uses.
    pub view_projection: ViewProjection,
}

/// Emitted after the background pass.
#[derive(Clone, Copy, Debug)]
pub struct BackgroundDrawEvent {
    /// Tick counter.
    pub frame_index: u64,
    /// Whether the quad was actually drawn.
    pub drawn: bool,
}

/// Emitted for every anchor overlay drawn.
#[derive(Clone, Copy, Debug)]
pub struct OverlayDrawEvent {
    /// Tick counter.
    pub frame_index: u64,
    /// The anchor drawn.
    pub key: AnchorKey,
    /// The matrices the overlay was drawn with.
    pub view_projection: ViewProjection,
}

/// Emitted after the point cloud is drawn.
#[derive(Clone, Copy, Debug)]
pub struct PointCloudDrawEvent {
    /// Tick counter.
    pub frame_index: u64,
    /// Points drawn.
    pub points: usize,
    /// Points dropped by the cap.
    pub truncated: usize,
    /// The matrices the cloud was drawn with.
    pub view_projection: ViewProjection,
}

/// Emitted when an anchor enters or leaves the store during a tick.
#[derive(Clone, Copy, Debug)]
pub struct AnchorEvent {
    /// Tick counter.
    pub frame_index: u64,
    /// The anchor concerned.
    pub key: AnchorKey,
}

/// Emitted when a tick finishes.
#[derive(Clone, Copy, Debug)]
pub struct TickEndEvent {
    /// Tick counter.
    pub frame_index: u64,
    /// How the tick ended.
    pub outcome: TickOutcome,
    /// Anchor overlays drawn.
    pub overlays_drawn: usize,
    /// Feature points drawn.
    pub points_drawn: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the tick.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called once frame acquisition has been attempted.
    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        _ = e;
    }

    /// Called when background texture coordinates are recomputed.
    fn on_uv_recompute(&mut self, e: &UvRecomputeEvent) {
        _ = e;
    }

    /// Called after the tick's matrices are computed.
    fn on_view_projection(&mut self, e: &ViewProjectionEvent) {
        _ = e;
    }

    /// Called after the background pass.
    fn on_background_draw(&mut self, e: &BackgroundDrawEvent) {
        _ = e;
    }

    /// Called for every anchor overlay drawn.
    fn on_overlay_draw(&mut self, e: &OverlayDrawEvent) {
        _ = e;
    }

    /// Called after the point cloud is drawn.
    fn on_point_cloud_draw(&mut self, e: &PointCloudDrawEvent) {
        _ = e;
    }

    /// Called when a queued touch places an anchor.
    fn on_anchor_placed(&mut self, e: &AnchorEvent) {
        _ = e;
    }

    /// Called when a stopped anchor is swept.
    fn on_anchor_swept(&mut self, e: &AnchorEvent) {
        _ = e;
    }

    /// Called when a tick finishes.
    fn on_tick_end(&mut self, e: &TickEndEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Generates a `Tracer` method that forwards one event to the sink.
macro_rules! forward {
    ($(#[$doc:meta])* $name:ident, $event:ty, $sink_method:ident) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$event) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$sink_method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    forward!(
        /// Emits a [`TickBeginEvent`].
        tick_begin, TickBeginEvent, on_tick_begin
    );
    forward!(
        /// Emits a [`UvRecomputeEvent`].
        uv_recompute, UvRecomputeEvent, on_uv_recompute
    );
    forward!(
        /// Emits a [`ViewProjectionEvent`].
        view_projection, ViewProjectionEvent, on_view_projection
    );
    forward!(
        /// Emits a [`BackgroundDrawEvent`].
        background_draw, BackgroundDrawEvent, on_background_draw
    );
    forward!(
        /// Emits an [`OverlayDrawEvent`].
        overlay_draw, OverlayDrawEvent, on_overlay_draw
    );
    forward!(
        /// Emits a [`PointCloudDrawEvent`].
        point_cloud_draw, PointCloudDrawEvent, on_point_cloud_draw
    );
    forward!(
        /// Emits an anchor-placed [`AnchorEvent`].
        anchor_placed, AnchorEvent, on_anchor_placed
    );
    forward!(
        /// Emits an anchor-swept [`AnchorEvent`].
        anchor_swept, AnchorEvent, on_anchor_swept
    );
    forward!(
        /// Emits a [`TickEndEvent`].
        tick_end, TickEndEvent, on_tick_end
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_begin() -> TickBeginEvent {
        TickBeginEvent {
            frame_index: 42,
            timestamp_ns: Some(1_000_000),
            camera: Some(TrackingState::Tracking),
        }
    }

    fn sample_end() -> TickEndEvent {
        TickEndEvent {
            frame_index: 42,
            outcome: TickOutcome::Rendered,
            overlays_drawn: 3,
            points_drawn: 120,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_tick_begin(&sample_begin());
        sink.on_background_draw(&BackgroundDrawEvent {
            frame_index: 42,
            drawn: true,
        });
        sink.on_tick_end(&sample_end());
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.tick_begin(&sample_begin());
        tracer.tick_end(&sample_end());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            ticks: Vec<(u64, TickOutcome)>,
        }
        impl TraceSink for RecordingSink {
            fn on_tick_end(&mut self, e: &TickEndEvent) {
                self.ticks.push((e.frame_index, e.outcome));
            }
        }

        let mut sink = RecordingSink { ticks: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.tick_begin(&sample_begin());
        tracer.tick_end(&sample_end());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.ticks, &[(42, TickOutcome::Rendered)]);
    }
}
