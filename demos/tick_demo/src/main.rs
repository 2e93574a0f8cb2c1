// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted AR session that exercises the tick pipeline and its diagnostics.
//!
//! Runs 30 ticks against a scripted tracking runtime and a recording GL
//! context while the script rotates the display, loses tracking, fails an
//! update and stops an anchor. Events go to both a
//! [`PrettyPrintSink`](tether_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](tether_debug::recorder::RecorderSink); the recording is
//! exported as a Chrome trace JSON file.

use std::fs::File;
use std::io::BufWriter;

use tether::{Config, FrameOrchestrator};
use tether_core::trace::{
    AnchorEvent, BackgroundDrawEvent, OverlayDrawEvent, PointCloudDrawEvent, TickBeginEvent,
    TickEndEvent, TraceSink, UvRecomputeEvent, ViewProjectionEvent,
};
use tether_core::tracking::TrackingState;
use tether_core::transform::Mat4;
use tether_debug::pretty::PrettyPrintSink;
use tether_debug::recorder::RecorderSink;
use tether_harness::{HitSpec, RecordingGl, Script, ScriptedSession};

const FRAME_COUNT: u64 = 30;

/// Forwards every event to two sinks.
struct Tee<'a> {
    pretty: &'a mut PrettyPrintSink,
    recorder: &'a mut RecorderSink,
}

impl TraceSink for Tee<'_> {
    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        self.pretty.on_tick_begin(e);
        self.recorder.on_tick_begin(e);
    }

    fn on_uv_recompute(&mut self, e: &UvRecomputeEvent) {
        self.pretty.on_uv_recompute(e);
        self.recorder.on_uv_recompute(e);
    }

    fn on_view_projection(&mut self, e: &ViewProjectionEvent) {
        self.pretty.on_view_projection(e);
        self.recorder.on_view_projection(e);
    }

    fn on_background_draw(&mut self, e: &BackgroundDrawEvent) {
        self.pretty.on_background_draw(e);
        self.recorder.on_background_draw(e);
    }

    fn on_overlay_draw(&mut self, e: &OverlayDrawEvent) {
        self.pretty.on_overlay_draw(e);
        self.recorder.on_overlay_draw(e);
    }

    fn on_point_cloud_draw(&mut self, e: &PointCloudDrawEvent) {
        self.pretty.on_point_cloud_draw(e);
        self.recorder.on_point_cloud_draw(e);
    }

    fn on_anchor_placed(&mut self, e: &AnchorEvent) {
        self.pretty.on_anchor_placed(e);
        self.recorder.on_anchor_placed(e);
    }

    fn on_anchor_swept(&mut self, e: &AnchorEvent) {
        self.pretty.on_anchor_swept(e);
        self.recorder.on_anchor_swept(e);
    }

    fn on_tick_end(&mut self, e: &TickEndEvent) {
        self.pretty.on_tick_end(e);
        self.recorder.on_tick_end(e);
    }
}

/// A 6x6 grid of feature points one meter ahead.
fn feature_points() -> Vec<[f32; 4]> {
    (0..36_u8)
        .map(|i| {
            let x = f32::from(i % 6) * 0.1 - 0.25;
            let y = f32::from(i / 6) * 0.1 - 0.25;
            [x, y, -1.0, 0.8]
        })
        .collect()
}

fn main() {
    env_logger::init();

    // -- script ------------------------------------------------------------
    let script = Script::new();
    script.set_hits(vec![HitSpec::plane(Mat4::from_translation(
        0.0, -0.5, -1.0,
    ))]);
    script.set_points(feature_points());
    script.set_light(Some([0.9, 0.95, 1.0, 0.7]));

    // -- orchestrator ------------------------------------------------------
    let mut orchestrator = FrameOrchestrator::new(
        ScriptedSession::new(script.clone()),
        RecordingGl::new(),
        Config::default(),
    );
    orchestrator.init().expect("failed to create GPU resources");
    orchestrator
        .on_display_changed(90, 1920, 1080)
        .expect("valid display geometry");
    let input = orchestrator.input_handle();

    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();

    // -- simulated loop ----------------------------------------------------
    for frame_index in 0..FRAME_COUNT {
        match frame_index {
            3 => input.touch(540.0, 960.0),
            8 => orchestrator
                .on_display_changed(0, 1080, 1920)
                .expect("valid display geometry"),
            12 => script.set_camera(TrackingState::Paused),
            15 => script.set_camera(TrackingState::Tracking),
            18 => script.fail_next_updates(1),
            22 => {
                if let Some(anchor) = script.anchors().first() {
                    anchor.set_state(TrackingState::Stopped);
                }
            }
            _ => {}
        }

        let mut tee = Tee {
            pretty: &mut pretty,
            recorder: &mut recorder,
        };
        let report = orchestrator
            .draw_frame_traced(&mut tee)
            .expect("orchestrator is initialized");
        log::debug!("tick {frame_index}: {report:?}");
    }

    // -- export Chrome trace -----------------------------------------------
    let path = "tick_trace.json";
    let file = File::create(path).expect("failed to create tick_trace.json");
    let mut writer = BufWriter::new(file);
    tether_debug::chrome::export(recorder.events(), &mut writer)
        .expect("failed to write Chrome trace");

    let draws = orchestrator.gl().draws().len();
    println!(
        "Wrote {path} ({FRAME_COUNT} ticks, {} events, {draws} draws, {} UV recomputes)",
        recorder.events().len(),
        orchestrator.uv_recompute_count(),
    );
}
