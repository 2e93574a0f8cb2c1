// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-level error type.

use tether_core::TrackingError;
use tether_render::RenderError;

/// Errors returned by [`FrameOrchestrator`](crate::FrameOrchestrator).
///
/// Transient tracking failures during a tick are not errors: the tick skips
/// the drawing that depends on tracking data and reports it in its
/// [`TickReport`](crate::TickReport) instead.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A tick or touch was requested before [`init`](crate::FrameOrchestrator::init).
    #[error("frame orchestrator is not initialized")]
    NotInitialized,
    /// An invalid display geometry was supplied.
    #[error(transparent)]
    Config(#[from] tether_core::Error),
    /// GPU resources could not be created.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// The tracking session refused a lifecycle request.
    #[error(transparent)]
    Tracking(#[from] TrackingError),
}
