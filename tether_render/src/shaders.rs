// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! GLSL ES 1.00 shader sources.

/// Passes the full-screen quad through and forwards the camera UVs.
pub const BACKGROUND_VERTEX: &str = "\
attribute vec4 vertex;
attribute vec2 textureCoords;
varying vec2 v_textureCoords;
void main() {
    v_textureCoords = textureCoords;
    gl_Position = vertex;
}
";

/// Samples the external camera texture.
pub const BACKGROUND_FRAGMENT: &str = "\
#extension GL_OES_EGL_image_external : require
precision mediump float;
uniform samplerExternalOES texture;
varying vec2 v_textureCoords;
void main() {
    gl_FragColor = texture2D(texture, v_textureCoords);
}
";

/// Transforms positions by `mvp` and sizes point sprites.
///
/// Shared by the point cloud and the anchor markers. The fourth component of
/// `vertex` is ignored so point-cloud confidence values can be uploaded
/// unchanged.
pub const FLAT_COLOR_VERTEX: &str = "\
uniform mat4 mvp;
uniform float point_size;
attribute vec4 vertex;
void main() {
    gl_Position = mvp * vec4(vertex.xyz, 1.0);
    gl_PointSize = point_size;
}
";

/// Fills with a single color.
pub const FLAT_COLOR_FRAGMENT: &str = "\
precision mediump float;
uniform vec4 color;
void main() {
    gl_FragColor = color;
}
";

/// Attribute and uniform names the renderers look up.
pub mod names {
    /// Vertex position attribute.
    pub const VERTEX: &str = "vertex";
    /// Background texture-coordinate attribute.
    pub const TEXTURE_COORDS: &str = "textureCoords";
    /// Background sampler uniform.
    pub const TEXTURE: &str = "texture";
    /// Model-view-projection uniform.
    pub const MVP: &str = "mvp";
    /// Flat color uniform.
    pub const COLOR: &str = "color";
    /// Point sprite size uniform.
    pub const POINT_SIZE: &str = "point_size";
}
