// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] keeps every event it receives, in arrival order, as a
//! [`RecordedEvent`]. The events are plain `Copy` values, so a recording can
//! be inspected by tests or handed to [`chrome::export`](crate::chrome::export).

use tether_core::trace::{
    AnchorEvent, BackgroundDrawEvent, OverlayDrawEvent, PointCloudDrawEvent, TickBeginEvent,
    TickEndEvent, TraceSink, UvRecomputeEvent, ViewProjectionEvent,
};

/// One recorded trace event.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// A tick began.
    TickBegin(TickBeginEvent),
    /// Background texture coordinates were recomputed.
    UvRecompute(UvRecomputeEvent),
    /// The tick's matrices were computed.
    ViewProjection(ViewProjectionEvent),
    /// The background pass ran.
    BackgroundDraw(BackgroundDrawEvent),
    /// An anchor marker was drawn.
    OverlayDraw(OverlayDrawEvent),
    /// The point cloud was drawn.
    PointCloudDraw(PointCloudDrawEvent),
    /// A queued touch placed an anchor.
    AnchorPlaced(AnchorEvent),
    /// A stopped anchor was removed.
    AnchorSwept(AnchorEvent),
    /// A tick ended.
    TickEnd(TickEndEvent),
}

impl RecordedEvent {
    /// The tick the event belongs to.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        match self {
            Self::TickBegin(e) => e.frame_index,
            Self::UvRecompute(e) => e.frame_index,
            Self::ViewProjection(e) => e.frame_index,
            Self::BackgroundDraw(e) => e.frame_index,
            Self::OverlayDraw(e) => e.frame_index,
            Self::PointCloudDraw(e) => e.frame_index,
            Self::AnchorPlaced(e) | Self::AnchorSwept(e) => e.frame_index,
            Self::TickEnd(e) => e.frame_index,
        }
    }

    /// Short event name, as used in trace output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::TickBegin(_) => "TickBegin",
            Self::UvRecompute(_) => "UvRecompute",
            Self::ViewProjection(_) => "ViewProjection",
            Self::BackgroundDraw(_) => "BackgroundDraw",
            Self::OverlayDraw(_) => "OverlayDraw",
            Self::PointCloudDraw(_) => "PointCloudDraw",
            Self::AnchorPlaced(_) => "AnchorPlaced",
            Self::AnchorSwept(_) => "AnchorSwept",
            Self::TickEnd(_) => "TickEnd",
        }
    }
}

/// A [`TraceSink`] that records every event.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder, returning its events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Events belonging to tick `frame_index`.
    pub fn tick(&self, frame_index: u64) -> impl Iterator<Item = &RecordedEvent> {
        self.events
            .iter()
            .filter(move |e| e.frame_index() == frame_index)
    }

    /// Discards everything recorded.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for RecorderSink {
    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        self.events.push(RecordedEvent::TickBegin(*e));
    }

    fn on_uv_recompute(&mut self, e: &UvRecomputeEvent) {
        self.events.push(RecordedEvent::UvRecompute(*e));
    }

    fn on_view_projection(&mut self, e: &ViewProjectionEvent) {
        self.events.push(RecordedEvent::ViewProjection(*e));
    }

    fn on_background_draw(&mut self, e: &BackgroundDrawEvent) {
        self.events.push(RecordedEvent::BackgroundDraw(*e));
    }

    fn on_overlay_draw(&mut self, e: &OverlayDrawEvent) {
        self.events.push(RecordedEvent::OverlayDraw(*e));
    }

    fn on_point_cloud_draw(&mut self, e: &PointCloudDrawEvent) {
        self.events.push(RecordedEvent::PointCloudDraw(*e));
    }

    fn on_anchor_placed(&mut self, e: &AnchorEvent) {
        self.events.push(RecordedEvent::AnchorPlaced(*e));
    }

    fn on_anchor_swept(&mut self, e: &AnchorEvent) {
        self.events.push(RecordedEvent::AnchorSwept(*e));
    }

    fn on_tick_end(&mut self, e: &TickEndEvent) {
        self.events.push(RecordedEvent::TickEnd(*e));
    }
}

#[cfg(test)]
mod tests {
    use tether_core::trace::{TickOutcome, Tracer};
    use tether_core::tracking::TrackingState;

    use super::*;

    #[test]
    fn records_in_arrival_order() {
        let mut sink = RecorderSink::new();
        let mut tracer = Tracer::new(&mut sink);
        tracer.tick_begin(&TickBeginEvent {
            frame_index: 0,
            timestamp_ns: Some(33_000_000),
            camera: Some(TrackingState::Tracking),
        });
        tracer.background_draw(&BackgroundDrawEvent {
            frame_index: 0,
            drawn: true,
        });
        tracer.tick_end(&TickEndEvent {
            frame_index: 0,
            outcome: TickOutcome::Rendered,
            overlays_drawn: 0,
            points_drawn: 0,
        });
        tracer.tick_begin(&TickBeginEvent {
            frame_index: 1,
            timestamp_ns: None,
            camera: None,
        });
        drop(tracer);

        let names: Vec<_> = sink.events().iter().map(RecordedEvent::name).collect();
        assert_eq!(
            names,
            ["TickBegin", "BackgroundDraw", "TickEnd", "TickBegin"],
            "order"
        );
        assert_eq!(sink.tick(0).count(), 3, "tick 0 events");
        assert_eq!(sink.tick(1).count(), 1, "tick 1 events");

        sink.clear();
        assert!(sink.events().is_empty(), "cleared");
    }
}
