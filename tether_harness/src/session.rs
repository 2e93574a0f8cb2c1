// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted tracking runtime.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kurbo::Point;
use tether_core::TrackingError;
use tether_core::geometry::{DisplayGeometry, DisplayRotation};
use tether_core::matrix::ClipPlanes;
use tether_core::tracking::{
    HitResult, PointCloud, TrackableKind, TrackedAnchor, TrackingFrame, TrackingSession,
    TrackingState,
};
use tether_core::transform::Mat4;
use tether_core::uv::UvQuad;

/// Vertical field of view of the scripted camera, in radians.
const FOV_Y: f32 = core::f32::consts::FRAC_PI_3;

/// Nanoseconds between scripted frames (30 Hz).
const FRAME_INTERVAL_NS: i64 = 33_333_333;

const TARGET: &str = "tether_harness::session";

/// A right-handed perspective projection, column-major.
#[must_use]
pub fn perspective(fov_y: f32, aspect_ratio: f32, planes: ClipPlanes) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();
    let ClipPlanes { near, far } = planes;
    Mat4::from_cols(
        [f / aspect_ratio, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, (far + near) / (near - far), -1.0],
        [0.0, 0.0, 2.0 * far * near / (near - far), 0.0],
    )
}

/// What a hit test returns, and what anchoring it produces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitSpec {
    /// What was hit.
    pub kind: TrackableKind,
    /// Whether an anchor may be placed there.
    pub placeable: bool,
    /// Pose of the anchor created from the hit.
    pub pose: Mat4,
    /// Tracking state the new anchor starts in.
    pub anchor_state: TrackingState,
    /// Whether the runtime refuses to create the anchor.
    pub rejected: bool,
}

impl HitSpec {
    /// A placeable hit of `kind` that yields a tracking anchor at `pose`.
    #[must_use]
    pub const fn new(kind: TrackableKind, pose: Mat4) -> Self {
        Self {
            kind,
            placeable: true,
            pose,
            anchor_state: TrackingState::Tracking,
            rejected: false,
        }
    }

    /// A placeable plane hit at `pose`.
    #[must_use]
    pub const fn plane(pose: Mat4) -> Self {
        Self::new(TrackableKind::Plane, pose)
    }

    /// Marks the hit as outside the plane polygon (or without a normal).
    #[must_use]
    pub const fn not_placeable(self) -> Self {
        Self {
            placeable: false,
            ..self
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    frames_acquired: AtomicUsize,
    frames_released: AtomicUsize,
    anchors_created: AtomicUsize,
    anchors_released: AtomicUsize,
}

#[derive(Debug)]
struct ScriptState {
    camera: TrackingState,
    failing_updates: u32,
    timestamp_ns: i64,
    view: Mat4,
    points: Vec<[f32; 4]>,
    hits: Vec<HitSpec>,
    light: Option<[f32; 4]>,
    geometry: Option<DisplayGeometry>,
    geometry_changed: bool,
    camera_texture: Option<u32>,
    paused: bool,
    resume_error: Option<TrackingError>,
    touches: Vec<Point>,
    anchors: Vec<AnchorControl>,
}

impl Default for ScriptState {
    fn default() -> Self {
        Self {
            camera: TrackingState::Tracking,
            failing_updates: 0,
            timestamp_ns: 0,
            view: Mat4::IDENTITY,
            points: Vec::new(),
            hits: Vec::new(),
            light: None,
            geometry: None,
            geometry_changed: false,
            camera_texture: None,
            paused: false,
            resume_error: None,
            touches: Vec::new(),
            anchors: Vec::new(),
        }
    }
}

/// Test-side control of a [`ScriptedSession`].
///
/// Cloneable; every clone and the session it was given to share one state.
/// Frames snapshot the script when they are acquired, so changes take
/// effect on the next `update`.
#[derive(Clone, Default)]
pub struct Script {
    state: Arc<Mutex<ScriptState>>,
    counters: Arc<Counters>,
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Script")
            .field("state", &*self.lock())
            .field("counters", &self.counters)
            .finish()
    }
}

impl Script {
    /// A tracking camera with identity view, no points and no hits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the camera tracking state of upcoming frames.
    pub fn set_camera(&self, camera: TrackingState) {
        self.lock().camera = camera;
    }

    /// Makes the next `n` updates fail.
    pub fn fail_next_updates(&self, n: u32) {
        self.lock().failing_updates = n;
    }

    /// Sets the view matrix of upcoming frames.
    pub fn set_view(&self, view: Mat4) {
        self.lock().view = view;
    }

    /// Sets the point cloud of upcoming frames.
    pub fn set_points(&self, points: Vec<[f32; 4]>) {
        self.lock().points = points;
    }

    /// Sets what hit tests on upcoming frames return, nearest first.
    pub fn set_hits(&self, hits: Vec<HitSpec>) {
        self.lock().hits = hits;
    }

    /// Sets the light estimate of upcoming frames.
    pub fn set_light(&self, light: Option<[f32; 4]>) {
        self.lock().light = light;
    }

    /// Makes the next frame report a display geometry change.
    pub fn force_geometry_changed(&self) {
        self.lock().geometry_changed = true;
    }

    /// Makes the next `resume` fail with `error`.
    pub fn fail_resume(&self, error: TrackingError) {
        self.lock().resume_error = Some(error);
    }

    /// The texture name the session was told to stream into.
    #[must_use]
    pub fn camera_texture(&self) -> Option<u32> {
        self.lock().camera_texture
    }

    /// The display geometry the session was last told about.
    #[must_use]
    pub fn display_geometry(&self) -> Option<DisplayGeometry> {
        self.lock().geometry
    }

    /// Whether the session is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }

    /// Every point hit-tested so far.
    #[must_use]
    pub fn touches(&self) -> Vec<Point> {
        self.lock().touches.clone()
    }

    /// Controls for every anchor created so far, in creation order.
    #[must_use]
    pub fn anchors(&self) -> Vec<AnchorControl> {
        self.lock().anchors.clone()
    }

    /// Frames handed out by `update`.
    #[must_use]
    pub fn frames_acquired(&self) -> usize {
        self.counters.frames_acquired.load(Ordering::SeqCst)
    }

    /// Frames dropped so far.
    #[must_use]
    pub fn frames_released(&self) -> usize {
        self.counters.frames_released.load(Ordering::SeqCst)
    }

    /// Frames acquired but not yet dropped.
    #[must_use]
    pub fn live_frames(&self) -> usize {
        self.frames_acquired() - self.frames_released()
    }

    /// Anchors created and not yet dropped.
    #[must_use]
    pub fn live_anchors(&self) -> usize {
        self.counters.anchors_created.load(Ordering::SeqCst)
            - self.counters.anchors_released.load(Ordering::SeqCst)
    }
}

/// A [`TrackingSession`] driven by a [`Script`].
#[derive(Debug)]
pub struct ScriptedSession {
    script: Script,
}

impl ScriptedSession {
    /// Creates a session controlled by `script`.
    #[must_use]
    pub fn new(script: Script) -> Self {
        Self { script }
    }
}

impl TrackingSession for ScriptedSession {
    type Anchor = ScriptedAnchor;
    type Frame = ScriptedFrame;

    fn set_camera_texture(&mut self, texture_name: u32) {
        self.script.lock().camera_texture = Some(texture_name);
    }

    fn set_display_geometry(&mut self, geometry: DisplayGeometry) {
        let mut state = self.script.lock();
        if state.geometry != Some(geometry) {
            state.geometry_changed = true;
        }
        state.geometry = Some(geometry);
    }

    fn update(&mut self) -> Result<ScriptedFrame, TrackingError> {
        let mut state = self.script.lock();
        if state.paused {
            return Err(TrackingError::SessionPaused);
        }
        if state.failing_updates > 0 {
            state.failing_updates -= 1;
            log::debug!(
                target: TARGET,
                "scripted update failure ({} more)",
                state.failing_updates
            );
            return Err(TrackingError::UpdateFailed(-1));
        }
        state.timestamp_ns += FRAME_INTERVAL_NS;
        let frame = ScriptedFrame {
            timestamp_ns: state.timestamp_ns,
            camera: state.camera,
            geometry_changed: std::mem::take(&mut state.geometry_changed),
            rotation: state.geometry.map_or(DisplayRotation::Deg0, |g| g.rotation()),
            view: state.view,
            points: state.points.clone(),
            hits: state.hits.clone(),
            light: state.light,
            script: self.script.clone(),
        };
        drop(state);
        self.script
            .counters
            .frames_acquired
            .fetch_add(1, Ordering::SeqCst);
        Ok(frame)
    }

    fn pause(&mut self) {
        self.script.lock().paused = true;
    }

    fn resume(&mut self) -> Result<(), TrackingError> {
        let mut state = self.script.lock();
        if let Some(e) = state.resume_error.take() {
            log::debug!(target: TARGET, "scripted resume failure: {e}");
            return Err(e);
        }
        state.paused = false;
        // The runtime re-reports its display geometry after a resume.
        state.geometry_changed = true;
        Ok(())
    }
}

/// A snapshot of the [`Script`] taken at `update`.
pub struct ScriptedFrame {
    timestamp_ns: i64,
    camera: TrackingState,
    geometry_changed: bool,
    rotation: DisplayRotation,
    view: Mat4,
    points: Vec<[f32; 4]>,
    hits: Vec<HitSpec>,
    light: Option<[f32; 4]>,
    script: Script,
}

impl fmt::Debug for ScriptedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedFrame")
            .field("timestamp_ns", &self.timestamp_ns)
            .field("camera", &self.camera)
            .field("rotation", &self.rotation)
            .field("points", &self.points.len())
            .finish_non_exhaustive()
    }
}

impl Drop for ScriptedFrame {
    fn drop(&mut self) {
        self.script
            .counters
            .frames_released
            .fetch_add(1, Ordering::SeqCst);
    }
}

impl TrackingFrame for ScriptedFrame {
    type Anchor = ScriptedAnchor;
    type Hit = ScriptedHit;

    fn timestamp_ns(&self) -> i64 {
        self.timestamp_ns
    }

    fn camera_tracking_state(&self) -> TrackingState {
        self.camera
    }

    fn display_geometry_changed(&self) -> bool {
        self.geometry_changed
    }

    fn transform_display_uvs(&self, uvs: &UvQuad) -> UvQuad {
        uvs.rotated(self.rotation)
    }

    fn view_matrix(&self) -> Mat4 {
        self.view
    }

    fn projection_matrix(&self, planes: ClipPlanes, aspect_ratio: f32) -> Mat4 {
        perspective(FOV_Y, aspect_ratio, planes)
    }

    fn point_cloud(&self) -> Option<PointCloud<'_>> {
        (!self.points.is_empty()).then(|| PointCloud::new(&self.points))
    }

    fn hit_test(&self, point: Point) -> Vec<ScriptedHit> {
        self.script.lock().touches.push(point);
        self.hits
            .iter()
            .map(|&spec| ScriptedHit {
                spec,
                script: self.script.clone(),
            })
            .collect()
    }

    fn light_estimate(&self) -> Option<[f32; 4]> {
        self.light
    }
}

/// A hit on a [`ScriptedFrame`].
#[derive(Debug)]
pub struct ScriptedHit {
    spec: HitSpec,
    script: Script,
}

impl HitResult for ScriptedHit {
    type Anchor = ScriptedAnchor;

    fn trackable_kind(&self) -> TrackableKind {
        self.spec.kind
    }

    fn is_placeable(&self) -> bool {
        self.spec.placeable
    }

    fn create_anchor(self) -> Result<ScriptedAnchor, TrackingError> {
        if self.spec.rejected {
            log::debug!(target: TARGET, "scripted anchor rejection");
            return Err(TrackingError::AnchorRejected(-2));
        }
        let control = AnchorControl::new(self.spec.anchor_state, self.spec.pose);
        self.script.lock().anchors.push(control.clone());
        self.script
            .counters
            .anchors_created
            .fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedAnchor {
            control,
            counters: Arc::clone(&self.script.counters),
        })
    }
}

#[derive(Debug)]
struct AnchorShared {
    state: Mutex<TrackingState>,
    pose: Mutex<Mat4>,
    released: AtomicBool,
}

/// Test-side control of one [`ScriptedAnchor`].
#[derive(Clone, Debug)]
pub struct AnchorControl {
    shared: Arc<AnchorShared>,
}

impl AnchorControl {
    fn new(state: TrackingState, pose: Mat4) -> Self {
        Self {
            shared: Arc::new(AnchorShared {
                state: Mutex::new(state),
                pose: Mutex::new(pose),
                released: AtomicBool::new(false),
            }),
        }
    }

    /// Current tracking state.
    #[must_use]
    pub fn state(&self) -> TrackingState {
        *self
            .shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Changes the tracking state the anchor reports.
    pub fn set_state(&self, state: TrackingState) {
        *self
            .shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Current pose.
    #[must_use]
    pub fn pose(&self) -> Mat4 {
        *self
            .shared
            .pose
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves the anchor.
    pub fn set_pose(&self, pose: Mat4) {
        *self
            .shared
            .pose
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = pose;
    }

    /// Whether the anchor handle has been dropped.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.shared.released.load(Ordering::SeqCst)
    }
}

/// An anchor created by a [`ScriptedHit`].
pub struct ScriptedAnchor {
    control: AnchorControl,
    counters: Arc<Counters>,
}

impl fmt::Debug for ScriptedAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedAnchor")
            .field("state", &self.control.state())
            .finish_non_exhaustive()
    }
}

impl ScriptedAnchor {
    /// The control shared with the test.
    #[must_use]
    pub fn control(&self) -> &AnchorControl {
        &self.control
    }
}

impl Drop for ScriptedAnchor {
    fn drop(&mut self) {
        self.control.shared.released.store(true, Ordering::SeqCst);
        self.counters.anchors_released.fetch_add(1, Ordering::SeqCst);
        log::trace!(target: TARGET, "anchor released ({:?})", self.control.state());
    }
}

impl TrackedAnchor for ScriptedAnchor {
    fn tracking_state(&self) -> TrackingState {
        self.control.state()
    }

    fn pose(&self) -> Mat4 {
        self.control.pose()
    }
}
