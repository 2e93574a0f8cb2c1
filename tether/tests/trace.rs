// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace events emitted by the tick.

mod support;

use std::cell::RefCell;
use std::rc::Rc;

use tether::Config;
use tether_core::trace::{TickEndEvent, TickOutcome, TraceSink};
use tether_core::tracking::TrackingState;
use tether_debug::recorder::{RecordedEvent, RecorderSink};

use support::{plane_hit, started};

fn names(sink: &RecorderSink, frame_index: u64) -> Vec<&'static str> {
    sink.tick(frame_index).map(RecordedEvent::name).collect()
}

#[test]
fn tracking_tick_emits_events_in_tick_order() {
    let (script, mut orch) = started(Config::default());
    script.set_hits(vec![plane_hit()]);
    script.set_points(vec![[0.0, 0.0, -1.0, 1.0]; 3]);
    orch.input_handle().touch(10.0, 10.0);

    let mut sink = RecorderSink::new();
    orch.draw_frame_traced(&mut sink).unwrap();

    assert_eq!(
        names(&sink, 0),
        [
            "TickBegin",
            "UvRecompute",
            "ViewProjection",
            "BackgroundDraw",
            "AnchorPlaced",
            "OverlayDraw",
            "PointCloudDraw",
            "TickEnd",
        ],
        "acquire, matrices, background, anchors, overlays"
    );
}

#[test]
fn every_draw_event_carries_the_tick_view_projection() {
    let (script, mut orch) = started(Config::default());
    script.set_hits(vec![plane_hit()]);
    script.set_points(vec![[0.0, 0.0, -1.0, 1.0]; 3]);
    orch.input_handle().touch(10.0, 10.0);

    let mut sink = RecorderSink::new();
    orch.draw_frame_traced(&mut sink).unwrap();

    let computed = sink
        .events()
        .iter()
        .find_map(|e| match e {
            RecordedEvent::ViewProjection(e) => Some(e.view_projection),
            _ => None,
        })
        .expect("matrices computed");
    assert_eq!(orch.view_projection(), Some(computed), "stored for accessors");
    for event in sink.events() {
        match event {
            RecordedEvent::OverlayDraw(e) => {
                assert_eq!(e.view_projection, computed, "overlay matrices");
            }
            RecordedEvent::PointCloudDraw(e) => {
                assert_eq!(e.view_projection, computed, "point matrices");
            }
            _ => {}
        }
    }
}

#[test]
fn lost_tracking_emits_no_matrix_or_overlay_events() {
    let (script, mut orch) = started(Config::default());
    script.set_camera(TrackingState::Stopped);

    let mut sink = RecorderSink::new();
    orch.draw_frame_traced(&mut sink).unwrap();
    assert_eq!(
        names(&sink, 0),
        ["TickBegin", "BackgroundDraw", "TickEnd"],
        "background attempt only"
    );
    let Some(RecordedEvent::BackgroundDraw(background)) = sink.events().get(1) else {
        panic!("background event expected");
    };
    assert!(!background.drawn, "nothing drawn yet");
}

#[test]
fn sweep_is_traced() {
    let (script, mut orch) = started(Config::default());
    script.set_hits(vec![plane_hit()]);
    orch.draw_frame().unwrap();
    let key = orch.on_touch(10.0, 10.0).unwrap().expect("placed");
    script.anchors()[0].set_state(TrackingState::Stopped);

    let mut sink = RecorderSink::new();
    orch.draw_frame_traced(&mut sink).unwrap();
    let swept: Vec<_> = sink
        .events()
        .iter()
        .filter_map(|e| match e {
            RecordedEvent::AnchorSwept(e) => Some(e.key),
            _ => None,
        })
        .collect();
    assert_eq!(swept, [key], "the stopped anchor");
}

#[test]
fn installed_sink_sees_every_tick() {
    #[derive(Debug, Default)]
    struct Outcomes(Rc<RefCell<Vec<TickOutcome>>>);

    impl TraceSink for Outcomes {
        fn on_tick_end(&mut self, e: &TickEndEvent) {
            self.0.borrow_mut().push(e.outcome);
        }
    }

    let (script, mut orch) = started(Config::default());
    let outcomes = Rc::new(RefCell::new(Vec::new()));
    orch.set_trace_sink(Some(Box::new(Outcomes(outcomes.clone()))));

    orch.draw_frame().unwrap();
    script.fail_next_updates(1);
    orch.draw_frame().unwrap();
    orch.pause();
    orch.draw_frame().unwrap();

    orch.set_trace_sink(None);
    orch.resume().unwrap();
    orch.draw_frame().unwrap();

    assert_eq!(
        *outcomes.borrow(),
        [
            TickOutcome::Rendered,
            TickOutcome::UpdateFailed,
            TickOutcome::Paused
        ],
        "one event per tick while installed"
    );
}
