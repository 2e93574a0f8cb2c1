// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles for driving tether without a device.
//!
//! - [`Script`] / [`ScriptedSession`]: an in-memory tracking runtime whose
//!   camera state, matrices, point cloud, hit results and failures are set by
//!   the test. Every runtime handle it hands out counts its own release, so
//!   ownership and teardown order can be asserted.
//! - [`RecordingGl`]: a [`GlApi`](tether_render::GlApi) that records every
//!   call and snapshots the uniforms in effect at each draw.

mod gl;
mod session;

pub use gl::{DrawCall, GlCall, RecordingGl, RecordingUniform, UniformValue};
pub use session::{
    AnchorControl, HitSpec, Script, ScriptedAnchor, ScriptedFrame, ScriptedHit, ScriptedSession,
    perspective,
};
