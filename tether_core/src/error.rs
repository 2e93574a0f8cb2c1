// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types shared by every layer of the pipeline.

/// Misuse of the display-geometry API.
///
/// These are configuration errors: the caller passed values the pipeline can
/// never render with, so they are reported immediately instead of being
/// deferred to the next tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The rotation is not one of 0, 90, 180 or 270 degrees.
    #[error("invalid display rotation {0}; expected 0, 90, 180 or 270")]
    InvalidRotation(i32),
    /// One or both viewport dimensions are zero.
    #[error("invalid viewport {width}x{height}; both dimensions must be non-zero")]
    InvalidViewport {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}

/// Errors reported by a tracking runtime.
///
/// Every variant is transient from the pipeline's point of view: a tick that
/// sees one skips the drawing that depends on tracking data and tries again
/// on the next tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TrackingError {
    /// The session could not produce a new frame.
    #[error("tracking session update failed (status {0})")]
    UpdateFailed(i32),
    /// The session is paused and cannot produce frames.
    #[error("tracking session is paused")]
    SessionPaused,
    /// The runtime refused to create an anchor for a hit.
    #[error("anchor creation failed (status {0})")]
    AnchorRejected(i32),
    /// The runtime could not resume the session.
    #[error("tracking session failed to resume (status {0})")]
    ResumeFailed(i32),
}
