// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use tether_core::trace::{
    AnchorEvent, BackgroundDrawEvent, OverlayDrawEvent, PointCloudDrawEvent, TickBeginEvent,
    TickEndEvent, TraceSink, UvRecomputeEvent, ViewProjectionEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink, returning the destination.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn ns_to_ms(ns: i64) -> f64 {
    ns as f64 / 1_000_000.0
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        let _ = match (e.timestamp_ns, e.camera) {
            (Some(ts), Some(camera)) => writeln!(
                self.writer,
                "[tick] frame={} at {:.1}ms camera={camera:?}",
                e.frame_index,
                ns_to_ms(ts),
            ),
            _ => writeln!(self.writer, "[tick] frame={} no frame", e.frame_index),
        };
    }

    fn on_uv_recompute(&mut self, e: &UvRecomputeEvent) {
        let _ = writeln!(
            self.writer,
            "[uv] frame={} rotation={}° recompute#{} uvs={:?}",
            e.frame_index,
            e.rotation.degrees(),
            e.recompute_count,
            e.uvs,
        );
    }

    fn on_view_projection(&mut self, e: &ViewProjectionEvent) {
        let t = e.view_projection.view().translation();
        let _ = writeln!(
            self.writer,
            "[matrices] frame={} view.t=({:.3}, {:.3}, {:.3})",
            e.frame_index, t[0], t[1], t[2],
        );
    }

    fn on_background_draw(&mut self, e: &BackgroundDrawEvent) {
        let drawn = if e.drawn { "drawn" } else { "skipped" };
        let _ = writeln!(self.writer, "[background] frame={} {drawn}", e.frame_index);
    }

    fn on_overlay_draw(&mut self, e: &OverlayDrawEvent) {
        let _ = writeln!(
            self.writer,
            "[overlay] frame={} anchor={}",
            e.frame_index, e.key,
        );
    }

    fn on_point_cloud_draw(&mut self, e: &PointCloudDrawEvent) {
        let _ = writeln!(
            self.writer,
            "[points] frame={} drawn={} truncated={}",
            e.frame_index, e.points, e.truncated,
        );
    }

    fn on_anchor_placed(&mut self, e: &AnchorEvent) {
        let _ = writeln!(
            self.writer,
            "[anchor:placed] frame={} anchor={}",
            e.frame_index, e.key,
        );
    }

    fn on_anchor_swept(&mut self, e: &AnchorEvent) {
        let _ = writeln!(
            self.writer,
            "[anchor:swept] frame={} anchor={}",
            e.frame_index, e.key,
        );
    }

    fn on_tick_end(&mut self, e: &TickEndEvent) {
        let _ = writeln!(
            self.writer,
            "[end] frame={} outcome={:?} overlays={} points={}",
            e.frame_index, e.outcome, e.overlays_drawn, e.points_drawn,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::trace::TickOutcome;
    use tether_core::tracking::TrackingState;

    #[test]
    fn pretty_print_tick() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_tick_begin(&TickBeginEvent {
            frame_index: 1,
            timestamp_ns: Some(66_000_000),
            camera: Some(TrackingState::Tracking),
        });
        sink.on_tick_end(&TickEndEvent {
            frame_index: 1,
            outcome: TickOutcome::TrackingLost,
            overlays_drawn: 0,
            points_drawn: 0,
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.contains("[tick] frame=1 at 66.0ms"), "got: {output}");
        assert!(output.contains("outcome=TrackingLost"), "got: {output}");
    }

    #[test]
    fn missing_frame_is_spelled_out() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_tick_begin(&TickBeginEvent {
            frame_index: 4,
            timestamp_ns: None,
            camera: None,
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert_eq!(output, "[tick] frame=4 no frame\n", "got: {output}");
    }
}
