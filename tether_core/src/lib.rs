// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for synchronizing an AR tracking runtime with a GLES renderer.
//!
//! `tether_core` holds everything about a display tick that does not touch
//! the GPU. It is `no_std` compatible (with `alloc`), so the same state
//! machine can be driven by a real tracking runtime or by a scripted one in
//! tests.
//!
//! # Architecture
//!
//! Data flows one way per tick:
//!
//! ```text
//!   TrackingSession::update() ──► TrackingFrame
//!                                     │
//!            ┌────────────────────────┼──────────────────────┐
//!            ▼                        ▼                      ▼
//!   TextureCoordinateMapper     MatrixProvider         AnchorStore::sweep_stopped()
//!            │                        │                      │
//!            ▼                        ▼                      ▼
//!   TextureCoordinateSet ───► ViewProjection ◄──── per-category anchors
//!                                     │
//!                                     ▼
//!                        renderers (tether_render)
//! ```
//!
//! **[`geometry`]**: Display rotation and viewport size, with change
//! detection for display-changed notifications.
//!
//! **[`uv`]**: The canonical background quad and the lazily recomputed,
//! rotation-dependent texture coordinates the camera image is sampled with.
//!
//! **[`matrix`]**: Per-tick view and projection matrices.
//!
//! **[`anchor`]**: Categorized anchor storage with generational keys.
//!
//! **[`tracking`]**: Traits the tracking runtime implements: sessions,
//! frames, anchors, and hit results.
//!
//! **[`transform`]**: Column-major 4×4 matrix type.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! tick instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod anchor;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod trace;
pub mod tracking;
pub mod transform;
pub mod uv;

pub use error::{Error, TrackingError};
