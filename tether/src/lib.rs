// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-tick synchronization of an AR tracking runtime with a GLES renderer.
//!
//! [`FrameOrchestrator`] owns a [`TrackingSession`](tether_core::tracking::TrackingSession),
//! a [`GlApi`](tether_render::GlApi) implementation and the renderers from
//! `tether_render`, and runs the display tick:
//!
//! ```text
//!   draw_frame()
//!     ├─ session.update()            acquire this tick's frame
//!     ├─ apply display change        rotation / viewport
//!     ├─ resolve UVs, matrices       one ViewProjection per tick
//!     ├─ draw background             camera image
//!     └─ touches, sweep, overlays    anchors + point cloud
//! ```
//!
//! Anchors live in a [`SharedAnchors`] store that other threads may lock, and
//! touches from other threads are queued through an [`InputHandle`].
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Emits
//!   [`TraceSink`](tether_core::trace::TraceSink) events from each tick.

pub mod config;
pub mod error;
pub mod input;
pub mod orchestrator;
pub mod shared;

pub use config::{Config, OverlayVisibility};
pub use error::Error;
pub use input::InputHandle;
pub use orchestrator::{FrameOrchestrator, NEUTRAL_LIGHT, TickReport};
pub use shared::SharedAnchors;
