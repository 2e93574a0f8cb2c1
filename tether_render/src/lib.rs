// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! GLES renderers for an AR frame.
//!
//! `tether_render` draws one tick's worth of AR content given the values
//! `tether_core` computed for it:
//!
//! - [`BackgroundRenderer`] draws the camera image as a full-screen quad,
//!   sampled through the external (`GL_TEXTURE_EXTERNAL_OES`) camera texture
//!   with the tick's texture coordinates.
//! - [`PointCloudRenderer`] draws the tracked feature points.
//! - [`OverlayRenderers`] draws one colored marker per anchor, with a
//!   distinct marker shape per [`AnchorCategory`](tether_core::anchor::AnchorCategory).
//!
//! All GPU access goes through the [`GlApi`] trait, so the renderers can be
//! driven by a real GLES context (see `tether_backend_glow`) or by a
//! recording double in tests. Each renderer is a small state machine: it
//! starts [`Uninitialized`](RendererState::Uninitialized), becomes
//! [`Ready`](RendererState::Ready) when its GPU resources are created, and
//! goes back on [`destroy`](BackgroundRenderer::destroy). Drawing while
//! uninitialized issues no GL calls.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

pub mod anchor;
pub mod background;
pub mod error;
pub mod gl;
pub mod point_cloud;
pub mod shaders;
mod state;

pub use anchor::{AnchorRenderer, MarkerShape, OverlayRenderers};
pub use background::BackgroundRenderer;
pub use error::RenderError;
pub use gl::GlApi;
pub use point_cloud::{PointCloudDraw, PointCloudRenderer};
pub use state::RendererState;

#[cfg(test)]
mod fake_gl;
