// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! GPU resource errors.

use alloc::string::String;

/// Failure to create a renderer's GPU resources.
///
/// These are fatal at surface creation: a renderer that cannot link its
/// program or allocate its buffers cannot draw at all.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// Shader compilation or program linking failed.
    #[error("{renderer}: program link failed: {log}")]
    ProgramLink {
        /// Renderer that owns the program.
        renderer: &'static str,
        /// Compiler or linker log.
        log: String,
    },
    /// A vertex attribute the renderer binds is missing from the program.
    #[error("{renderer}: attribute `{name}` not found")]
    MissingAttribute {
        /// Renderer that owns the program.
        renderer: &'static str,
        /// Attribute name.
        name: &'static str,
    },
    /// A uniform the renderer sets is missing from the program.
    #[error("{renderer}: uniform `{name}` not found")]
    MissingUniform {
        /// Renderer that owns the program.
        renderer: &'static str,
        /// Uniform name.
        name: &'static str,
    },
    /// A texture or buffer could not be allocated.
    #[error("{renderer}: {resource} allocation failed: {log}")]
    Allocation {
        /// Renderer that owns the resource.
        renderer: &'static str,
        /// What was being allocated.
        resource: &'static str,
        /// Driver message.
        log: String,
    },
}
