// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(dead_code, reason = "shared by several test crates; each uses a subset")]

use tether::{Config, FrameOrchestrator};
use tether_core::transform::Mat4;
use tether_harness::{HitSpec, RecordingGl, Script, ScriptedSession};

pub(crate) type Orchestrator = FrameOrchestrator<ScriptedSession, RecordingGl>;

/// An orchestrator over a fresh script, not yet initialized.
pub(crate) fn orchestrator(config: Config) -> (Script, Orchestrator) {
    let _ = env_logger::builder().is_test(true).try_init();
    let script = Script::new();
    let orchestrator =
        FrameOrchestrator::new(ScriptedSession::new(script.clone()), RecordingGl::new(), config);
    (script, orchestrator)
}

/// An initialized orchestrator on an upright 1080x1920 display.
pub(crate) fn started(config: Config) -> (Script, Orchestrator) {
    let (script, mut orchestrator) = orchestrator(config);
    orchestrator.init().unwrap();
    orchestrator.on_display_changed(0, 1080, 1920).unwrap();
    (script, orchestrator)
}

/// A placeable plane hit half a meter in front of the origin.
pub(crate) fn plane_hit() -> HitSpec {
    HitSpec::plane(Mat4::from_translation(0.0, -0.5, -1.0))
}
