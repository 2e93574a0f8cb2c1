// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads events from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::RecordedEvent;

/// Spacing between ticks that carry no camera timestamp, in microseconds.
const UNTIMED_TICK_US: f64 = 1000.0;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// Each tick becomes a `B`/`E` span; everything inside it is an instant
/// event. Ticks are placed at their camera timestamp. Events inside a tick
/// carry no time of their own, so they are spread one microsecond apart in
/// arrival order. A tick without a camera frame is placed
/// [`UNTIMED_TICK_US`] after the previous one.
pub fn export(recorded: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut base_us = 0.0_f64;
    let mut seq = 0.0_f64;

    for event in recorded {
        let (cat, args) = match event {
            RecordedEvent::TickBegin(e) => {
                base_us = match e.timestamp_ns {
                    Some(ns) => ns as f64 / 1000.0,
                    None if events.is_empty() => 0.0,
                    None => base_us + UNTIMED_TICK_US,
                };
                seq = 0.0;
                events.push(json!({
                    "ph": "B",
                    "name": "Tick",
                    "cat": "Frame",
                    "ts": base_us,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                        "camera": e.camera.map(|c| format!("{c:?}")),
                    }
                }));
                continue;
            }
            RecordedEvent::TickEnd(e) => {
                seq += 1.0;
                events.push(json!({
                    "ph": "E",
                    "name": "Tick",
                    "cat": "Frame",
                    "ts": base_us + seq,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                        "outcome": format!("{:?}", e.outcome),
                        "overlays_drawn": e.overlays_drawn,
                        "points_drawn": e.points_drawn,
                    }
                }));
                continue;
            }
            RecordedEvent::UvRecompute(e) => (
                "Background",
                json!({
                    "frame_index": e.frame_index,
                    "rotation": e.rotation.degrees(),
                    "recompute_count": e.recompute_count,
                }),
            ),
            RecordedEvent::ViewProjection(e) => (
                "Matrices",
                json!({
                    "frame_index": e.frame_index,
                    "view_translation": e.view_projection.view().translation(),
                }),
            ),
            RecordedEvent::BackgroundDraw(e) => (
                "Background",
                json!({
                    "frame_index": e.frame_index,
                    "drawn": e.drawn,
                }),
            ),
            RecordedEvent::OverlayDraw(e) => (
                "Overlay",
                json!({
                    "frame_index": e.frame_index,
                    "anchor": e.key.to_string(),
                }),
            ),
            RecordedEvent::PointCloudDraw(e) => (
                "Overlay",
                json!({
                    "frame_index": e.frame_index,
                    "points": e.points,
                    "truncated": e.truncated,
                }),
            ),
            RecordedEvent::AnchorPlaced(e) | RecordedEvent::AnchorSwept(e) => (
                "Anchors",
                json!({
                    "frame_index": e.frame_index,
                    "anchor": e.key.to_string(),
                }),
            ),
        };
        seq += 1.0;
        events.push(json!({
            "ph": "i",
            "name": event.name(),
            "cat": cat,
            "ts": base_us + seq,
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": args,
        }));
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use tether_core::trace::{
        BackgroundDrawEvent, TickBeginEvent, TickEndEvent, TickOutcome, TraceSink,
    };
    use tether_core::tracking::TrackingState;

    fn tick(rec: &mut RecorderSink, frame_index: u64, timestamp_ns: Option<i64>) {
        rec.on_tick_begin(&TickBeginEvent {
            frame_index,
            timestamp_ns,
            camera: timestamp_ns.map(|_| TrackingState::Tracking),
        });
        rec.on_background_draw(&BackgroundDrawEvent {
            frame_index,
            drawn: true,
        });
        rec.on_tick_end(&TickEndEvent {
            frame_index,
            outcome: TickOutcome::Rendered,
            overlays_drawn: 0,
            points_drawn: 0,
        });
    }

    fn export_values(rec: &RecorderSink) -> Vec<Value> {
        let mut buf = Vec::new();
        export(rec.events(), &mut buf).unwrap();
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        tick(&mut rec, 0, Some(2_000_000));

        let events = export_values(&rec);
        assert_eq!(events.len(), 3, "begin, background, end");
        assert_eq!(events[0]["ph"], "B", "tick opens a span");
        assert_eq!(events[0]["ts"], 2000.0, "camera timestamp in us");
        assert_eq!(events[1]["ph"], "i", "inner events are instants");
        assert_eq!(events[1]["name"], "BackgroundDraw", "event name");
        assert_eq!(events[1]["ts"], 2001.0, "one us after the begin");
        assert_eq!(events[2]["ph"], "E", "tick closes the span");
        assert_eq!(events[2]["args"]["outcome"], "Rendered", "outcome");
    }

    #[test]
    fn untimed_ticks_follow_the_previous_one() {
        let mut rec = RecorderSink::new();
        tick(&mut rec, 0, Some(5_000_000));
        tick(&mut rec, 1, None);

        let events = export_values(&rec);
        assert_eq!(events[3]["ph"], "B", "second tick begins");
        assert_eq!(events[3]["ts"], 6000.0, "placed after the first tick");
        assert!(events[3]["args"]["camera"].is_null(), "no camera state");
    }

    #[test]
    fn empty_recording_is_an_empty_array() {
        let rec = RecorderSink::new();
        assert!(export_values(&rec).is_empty(), "no events");
    }
}
