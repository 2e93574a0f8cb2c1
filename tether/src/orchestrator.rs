// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-tick driver.

use std::fmt;

use kurbo::Point;
use tether_core::anchor::{AnchorCategory, AnchorKey, ColoredAnchor};
use tether_core::geometry::{DisplayGeometry, GeometryTracker};
use tether_core::matrix::{MatrixProvider, ViewProjection};
use tether_core::trace::{
    AnchorEvent, BackgroundDrawEvent, OverlayDrawEvent, PointCloudDrawEvent, TickBeginEvent,
    TickEndEvent, TickOutcome, TraceSink, Tracer, UvRecomputeEvent, ViewProjectionEvent,
};
use tether_core::tracking::{TrackedAnchor, TrackingFrame, TrackingSession, TrackingState};
use tether_core::transform::Mat4;
use tether_core::uv::{TextureCoordinateMapper, TextureCoordinateSet};
use tether_render::{BackgroundRenderer, GlApi, OverlayRenderers, PointCloudRenderer};

use crate::config::{Config, OverlayVisibility};
use crate::error::Error;
use crate::input::InputHandle;
use crate::shared::SharedAnchors;

/// Light estimate reported when the runtime has no valid one.
pub const NEUTRAL_LIGHT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

const TARGET: &str = "tether::orchestrator";

/// What one [`FrameOrchestrator::draw_frame`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Index of the tick, starting at 0.
    pub frame_index: u64,
    /// How the tick ended.
    pub outcome: TickOutcome,
    /// Whether the camera background was drawn.
    pub background_drawn: bool,
    /// Whether the background texture coordinates were recomputed.
    pub uvs_recomputed: bool,
    /// Anchor markers drawn.
    pub overlays_drawn: usize,
    /// Feature points drawn.
    pub points_drawn: usize,
    /// Feature points dropped by the cap.
    pub points_truncated: usize,
    /// Anchors created from queued touches.
    pub anchors_placed: usize,
    /// Stopped anchors removed.
    pub anchors_swept: usize,
}

impl TickReport {
    const fn empty(frame_index: u64, outcome: TickOutcome) -> Self {
        Self {
            frame_index,
            outcome,
            background_drawn: false,
            uvs_recomputed: false,
            overlays_drawn: 0,
            points_drawn: 0,
            points_truncated: 0,
            anchors_placed: 0,
            anchors_swept: 0,
        }
    }
}

/// Drives one AR tick: frame acquisition, matrices, background, overlays.
///
/// The orchestrator exclusively owns the tracking session, the current
/// frame, the GL context wrapper and every renderer. It starts
/// uninitialized; [`init`](Self::init) creates the GPU resources (the GL
/// context must be current) and hands the camera texture to the session.
///
/// Each [`draw_frame`](Self::draw_frame) runs the tick in a fixed order:
///
/// 1. Release the previous frame and acquire a new one from the session.
/// 2. Apply the pending display-change notification, if any.
/// 3. Resolve the background texture coordinates (cached across ticks,
///    recomputed on rotation change) and compute this tick's view and
///    projection matrices.
/// 4. Draw the camera background.
/// 5. Place anchors for queued touches, sweep stopped anchors, then draw
///    every visible anchor category and the point cloud.
///
/// Every draw in step 4 and 5 uses the one [`ViewProjection`] from step 3.
/// When the camera is not tracking, steps 3 and 5 skip everything that
/// depends on tracking data. Once the first tracking tick has initialized
/// the background coordinates, they keep following display rotation and the
/// background is still drawn.
///
/// Dropping the orchestrator releases GPU resources (in reverse creation
/// order) and every anchor before the session itself; the GL context must
/// still be current at that point.
pub struct FrameOrchestrator<S: TrackingSession, G: GlApi> {
    // Declared before `session` so it is released first.
    frame: Option<S::Frame>,
    session: S,
    gl: G,
    config: Config,
    visibility: OverlayVisibility,
    initialized: bool,
    paused: bool,
    geometry: GeometryTracker,
    pending_geometry: Option<DisplayGeometry>,
    mapper: TextureCoordinateMapper,
    matrices: MatrixProvider,
    view_projection: Option<ViewProjection>,
    background: BackgroundRenderer<G>,
    point_cloud: PointCloudRenderer<G>,
    overlays: OverlayRenderers<G>,
    anchors: SharedAnchors<S::Anchor>,
    input: InputHandle,
    light_estimate: [f32; 4],
    last_camera: Option<TrackingState>,
    frame_index: u64,
    sink: Option<Box<dyn TraceSink>>,
}

impl<S: TrackingSession, G: GlApi> fmt::Debug for FrameOrchestrator<S, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameOrchestrator")
            .field("initialized", &self.initialized)
            .field("paused", &self.paused)
            .field("frame_index", &self.frame_index)
            .field("geometry", &self.geometry.current())
            .field("visibility", &self.visibility)
            .field("background", &self.background)
            .field("point_cloud", &self.point_cloud)
            .field("overlays", &self.overlays)
            .finish_non_exhaustive()
    }
}

impl<S: TrackingSession, G: GlApi> FrameOrchestrator<S, G> {
    /// Takes ownership of a session and a GL context wrapper.
    ///
    /// Nothing is allocated until [`init`](Self::init).
    #[must_use]
    pub fn new(session: S, gl: G, config: Config) -> Self {
        Self {
            frame: None,
            session,
            gl,
            visibility: config.visibility,
            initialized: false,
            paused: false,
            geometry: GeometryTracker::new(),
            pending_geometry: None,
            mapper: TextureCoordinateMapper::new(),
            matrices: MatrixProvider::new(config.clip_planes),
            view_projection: None,
            background: BackgroundRenderer::new(config.camera_texture_unit),
            point_cloud: PointCloudRenderer::new(config.max_points),
            overlays: OverlayRenderers::new(),
            anchors: SharedAnchors::new(),
            input: InputHandle::with_capacity(config.touch_queue_capacity),
            light_estimate: NEUTRAL_LIGHT,
            last_camera: None,
            frame_index: 0,
            sink: None,
            config,
        }
    }

    /// Creates every GPU resource and hands the camera texture to the
    /// session.
    ///
    /// Calling it again once initialized does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if a program fails to link or a resource
    /// cannot be allocated; nothing stays allocated in that case.
    pub fn init(&mut self) -> Result<(), Error> {
        if self.initialized {
            log::debug!(target: TARGET, "init on an initialized orchestrator ignored");
            return Ok(());
        }
        self.create_gpu_resources()?;
        self.initialized = true;
        log::info!(target: TARGET, "initialized");
        Ok(())
    }

    /// Recreates GPU resources for a new surface.
    ///
    /// Before [`init`](Self::init) this performs the initialization.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if a resource cannot be created.
    pub fn surface_created(&mut self) -> Result<(), Error> {
        if !self.initialized {
            return self.init();
        }
        self.create_gpu_resources()?;
        log::info!(target: TARGET, "surface recreated");
        Ok(())
    }

    /// Releases GPU resources while the old surface's context is still
    /// current.
    ///
    /// Ticks keep running afterwards but draw nothing until
    /// [`surface_created`](Self::surface_created).
    pub fn surface_destroyed(&mut self) {
        if self.release_gpu_resources() {
            log::info!(target: TARGET, "surface destroyed; GPU resources released");
        }
    }

    fn create_gpu_resources(&mut self) -> Result<(), Error> {
        self.background.create(&self.gl)?;
        if let Err(e) = self.point_cloud.create(&self.gl) {
            self.background.destroy(&self.gl);
            return Err(e.into());
        }
        if let Err(e) = self.overlays.create_all(&self.gl) {
            self.point_cloud.destroy(&self.gl);
            self.background.destroy(&self.gl);
            return Err(e.into());
        }
        if let Some(name) = self.background.camera_texture_name(&self.gl) {
            self.session.set_camera_texture(name);
        }
        Ok(())
    }

    /// Returns `true` if anything was released.
    fn release_gpu_resources(&mut self) -> bool {
        let was_ready = self.background.is_ready();
        self.overlays.destroy_all(&self.gl);
        self.point_cloud.destroy(&self.gl);
        self.background.destroy(&self.gl);
        was_ready
    }

    /// Records a display rotation or viewport change.
    ///
    /// The session is told right away; the orchestrator applies the change
    /// at the start of the next tick. Only a rotation change (or the first
    /// notification) invalidates the background texture coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a rotation other than 0, 90, 180 or 270
    /// degrees or a zero-sized viewport.
    pub fn on_display_changed(
        &mut self,
        rotation_degrees: i32,
        width: u32,
        height: u32,
    ) -> Result<(), Error> {
        let geometry = DisplayGeometry::from_degrees(rotation_degrees, width, height)?;
        log::debug!(target: TARGET, "display changed to {geometry:?}");
        self.session.set_display_geometry(geometry);
        self.pending_geometry = Some(geometry);
        Ok(())
    }

    /// Runs one tick, reporting events to the installed trace sink, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init); no GL
    /// call is made in that case.
    pub fn draw_frame(&mut self) -> Result<TickReport, Error> {
        let mut sink = self.sink.take();
        let result = match sink.as_deref_mut() {
            Some(sink) => self.draw_frame_traced(sink),
            None => self.run(&mut Tracer::none()),
        };
        self.sink = sink;
        result
    }

    /// Runs one tick, reporting events to `sink`.
    ///
    /// # Errors
    ///
    /// Same as [`draw_frame`](Self::draw_frame).
    pub fn draw_frame_traced(&mut self, sink: &mut dyn TraceSink) -> Result<TickReport, Error> {
        self.run(&mut Tracer::new(sink))
    }

    fn run(&mut self, tracer: &mut Tracer<'_>) -> Result<TickReport, Error> {
        if !self.initialized {
            log::error!(target: TARGET, "draw_frame called before init");
            return Err(Error::NotInitialized);
        }
        let frame_index = self.frame_index;
        self.frame_index += 1;
        let report = if self.paused {
            tracer.tick_begin(&TickBeginEvent {
                frame_index,
                timestamp_ns: None,
                camera: None,
            });
            TickReport::empty(frame_index, TickOutcome::Paused)
        } else {
            self.tick(frame_index, tracer)
        };
        tracer.tick_end(&TickEndEvent {
            frame_index,
            outcome: report.outcome,
            overlays_drawn: report.overlays_drawn,
            points_drawn: report.points_drawn,
        });
        log::debug!(target: TARGET, "tick {frame_index}: {:?}", report.outcome);
        Ok(report)
    }

    fn tick(&mut self, frame_index: u64, tracer: &mut Tracer<'_>) -> TickReport {
        // 1. Acquire.
        self.frame = None;
        let frame = match self.session.update() {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!(target: TARGET, "tick {frame_index}: no frame: {e}");
                tracer.tick_begin(&TickBeginEvent {
                    frame_index,
                    timestamp_ns: None,
                    camera: None,
                });
                return TickReport::empty(frame_index, TickOutcome::UpdateFailed);
            }
        };
        let camera = frame.camera_tracking_state();
        tracer.tick_begin(&TickBeginEvent {
            frame_index,
            timestamp_ns: Some(frame.timestamp_ns()),
            camera: Some(camera),
        });
        self.note_camera_state(camera);

        // 2. Display changes.
        if let Some(geometry) = self.pending_geometry.take() {
            let change = self.geometry.update(geometry);
            self.mapper.apply(change);
        }

        let tracking = camera == TrackingState::Tracking;
        let mut report = TickReport::empty(
            frame_index,
            if tracking {
                TickOutcome::Rendered
            } else {
                TickOutcome::TrackingLost
            },
        );

        // 3. Coordinates and matrices. Coordinates follow the display even
        // while tracking is lost, once the first tracking tick has set them.
        if tracking || self.mapper.current().is_initialized() {
            let (uvs, recomputed) = self.mapper.resolve(&frame);
            if recomputed {
                report.uvs_recomputed = true;
                tracer.uv_recompute(&UvRecomputeEvent {
                    frame_index,
                    rotation: self.geometry.current().rotation(),
                    uvs: *uvs.uvs(),
                    recompute_count: self.mapper.recompute_count(),
                });
            }
        }
        let view_projection = if tracking {
            let view_projection = self.matrices.compute(&frame, &self.geometry.current());
            self.view_projection = Some(view_projection);
            self.light_estimate = frame.light_estimate().unwrap_or(NEUTRAL_LIGHT);
            tracer.view_projection(&ViewProjectionEvent {
                frame_index,
                view_projection,
            });
            Some(view_projection)
        } else {
            None
        };

        // 4. Background.
        report.background_drawn = self.background.draw(&self.gl, &self.mapper.current());
        tracer.background_draw(&BackgroundDrawEvent {
            frame_index,
            drawn: report.background_drawn,
        });

        // 5. Anchors and overlays.
        let touches = self.input.take_all();
        if tracking {
            for point in touches {
                if let Some(key) = place(&frame, &self.anchors, point) {
                    report.anchors_placed += 1;
                    tracer.anchor_placed(&AnchorEvent { frame_index, key });
                }
            }
        } else if !touches.is_empty() {
            log::debug!(
                target: TARGET,
                "tick {frame_index}: {} touch(es) discarded while not tracking",
                touches.len()
            );
        }

        let swept = self.anchors.lock().sweep_stopped();
        report.anchors_swept = swept.len();
        for key in swept {
            log::info!(target: TARGET, "anchor {key} stopped tracking; removed");
            tracer.anchor_swept(&AnchorEvent { frame_index, key });
        }

        if let Some(view_projection) = view_projection {
            self.draw_overlays(&frame, &view_projection, &mut report, tracer);
        }

        self.frame = Some(frame);
        report
    }

    fn draw_overlays(
        &self,
        frame: &S::Frame,
        view_projection: &ViewProjection,
        report: &mut TickReport,
        tracer: &mut Tracer<'_>,
    ) {
        let frame_index = report.frame_index;
        let store = self.anchors.lock();
        for category in AnchorCategory::ALL {
            if !self.visibility.shows(category) {
                continue;
            }
            let renderer = self.overlays.get(category);
            for (key, entry) in store.iter(category) {
                let anchor = entry.anchor();
                if anchor.tracking_state() != TrackingState::Tracking {
                    continue;
                }
                if renderer.draw(&self.gl, view_projection, anchor.pose(), entry.color()) {
                    report.overlays_drawn += 1;
                    tracer.overlay_draw(&OverlayDrawEvent {
                        frame_index,
                        key,
                        view_projection: *view_projection,
                    });
                }
            }
        }
        drop(store);

        if !self.visibility.point {
            return;
        }
        if let Some(cloud) = frame.point_cloud() {
            let drawn = self.point_cloud.draw(&self.gl, &cloud, view_projection);
            report.points_drawn = drawn.drawn;
            report.points_truncated = drawn.truncated;
            tracer.point_cloud_draw(&PointCloudDrawEvent {
                frame_index,
                points: drawn.drawn,
                truncated: drawn.truncated,
                view_projection: *view_projection,
            });
        }
    }

    fn note_camera_state(&mut self, camera: TrackingState) {
        let previous = self.last_camera.replace(camera);
        if previous == Some(camera) {
            return;
        }
        match camera {
            TrackingState::Tracking => {
                log::info!(target: TARGET, "camera tracking");
            }
            TrackingState::Paused | TrackingState::Stopped => {
                log::warn!(target: TARGET, "camera not tracking ({camera:?})");
            }
        }
    }

    /// Resolves a touch against the current frame and anchors whatever was
    /// hit.
    ///
    /// Returns the new anchor's key, or `None` when there is no frame yet,
    /// the camera is not tracking, or nothing placeable was hit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init).
    pub fn on_touch(&mut self, x: f64, y: f64) -> Result<Option<AnchorKey>, Error> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        let Some(frame) = &self.frame else {
            log::debug!(target: TARGET, "touch before the first frame ignored");
            return Ok(None);
        };
        if frame.camera_tracking_state() != TrackingState::Tracking {
            log::debug!(target: TARGET, "touch while not tracking ignored");
            return Ok(None);
        }
        Ok(place(frame, &self.anchors, Point::new(x, y)))
    }

    /// Suspends the session. Ticks do nothing until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.frame = None;
        self.session.pause();
        self.paused = true;
        log::info!(target: TARGET, "paused");
    }

    /// Resumes the session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tracking`] if the session cannot resume; the
    /// orchestrator stays paused.
    pub fn resume(&mut self) -> Result<(), Error> {
        if !self.paused {
            return Ok(());
        }
        self.session.resume()?;
        self.paused = false;
        self.last_camera = None;
        log::info!(target: TARGET, "resumed");
        Ok(())
    }

    /// Shows or hides overlay categories.
    pub fn on_config_changed(
        &mut self,
        show_plane: bool,
        show_point: bool,
        show_image: bool,
        show_faces: bool,
    ) {
        self.set_visibility(OverlayVisibility {
            plane: show_plane,
            point: show_point,
            image: show_image,
            face: show_faces,
        });
    }

    /// Replaces the overlay visibility.
    pub fn set_visibility(&mut self, visibility: OverlayVisibility) {
        log::debug!(target: TARGET, "overlay visibility {visibility:?}");
        self.visibility = visibility;
    }

    /// Current overlay visibility.
    #[must_use]
    pub fn visibility(&self) -> OverlayVisibility {
        self.visibility
    }

    /// Installs a sink that [`draw_frame`](Self::draw_frame) reports to.
    ///
    /// Events are only emitted when the `trace` feature is enabled.
    pub fn set_trace_sink(&mut self, sink: Option<Box<dyn TraceSink>>) {
        self.sink = sink;
    }

    /// Column-major projection matrix of the latest tracking tick, or all
    /// zeros before the first one.
    #[must_use]
    pub fn get_projection_matrix(&self) -> [f32; 16] {
        self.projection_matrix()
            .map_or([0.0; 16], |m| m.to_cols_array())
    }

    /// Projection matrix of the latest tracking tick.
    #[must_use]
    pub fn projection_matrix(&self) -> Option<Mat4> {
        self.view_projection.map(|vp| vp.projection())
    }

    /// View matrix of the latest tracking tick.
    #[must_use]
    pub fn view_matrix(&self) -> Option<Mat4> {
        self.view_projection.map(|vp| vp.view())
    }

    /// Both matrices of the latest tracking tick.
    #[must_use]
    pub fn view_projection(&self) -> Option<ViewProjection> {
        self.view_projection
    }

    /// Pose of a tracking anchor.
    #[must_use]
    pub fn model_matrix(&self, key: AnchorKey) -> Option<Mat4> {
        self.anchors.lock().model_matrix(key)
    }

    /// `view * pose` of a tracking anchor, with the latest view matrix.
    #[must_use]
    pub fn view_model_matrix(&self, key: AnchorKey) -> Option<Mat4> {
        let view_projection = self.view_projection?;
        Some(view_projection.model_view(self.model_matrix(key)?))
    }

    /// Color correction from the latest tracking tick, [`NEUTRAL_LIGHT`]
    /// when there is no valid estimate.
    #[must_use]
    pub fn light_estimate(&self) -> [f32; 4] {
        self.light_estimate
    }

    /// Number of ticks run so far; the index the next tick will carry.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// The cached background texture coordinates.
    #[must_use]
    pub fn texture_coordinates(&self) -> TextureCoordinateSet {
        self.mapper.current()
    }

    /// How many times the background texture coordinates were recomputed.
    #[must_use]
    pub fn uv_recompute_count(&self) -> u64 {
        self.mapper.recompute_count()
    }

    /// The display geometry applied by the latest tick.
    #[must_use]
    pub fn display_geometry(&self) -> DisplayGeometry {
        self.geometry.current()
    }

    /// Returns `true` after a successful [`init`](Self::init).
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns `true` while paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The configuration the orchestrator was created with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The shared anchor store. Clone it to reach the anchors from another
    /// thread.
    ///
    /// Dropping the orchestrator clears the store, so clones that outlive it
    /// hold no runtime anchors. Anchors taken out of a clone are the
    /// caller's to release, and must be dropped before the session is.
    #[must_use]
    pub fn anchors(&self) -> &SharedAnchors<S::Anchor> {
        &self.anchors
    }

    /// Removes an anchor, handing it back.
    ///
    /// The returned entry owns the runtime anchor handle; drop it before the
    /// orchestrator so the anchor is released while its session is alive.
    /// An unknown or already removed key logs a warning and returns `None`.
    pub fn remove_anchor(&self, key: AnchorKey) -> Option<ColoredAnchor<S::Anchor>> {
        self.anchors.lock().remove(key)
    }

    /// A handle other threads can queue touches through.
    #[must_use]
    pub fn input_handle(&self) -> InputHandle {
        self.input.clone()
    }

    /// The tracking session.
    #[must_use]
    pub fn session(&self) -> &S {
        &self.session
    }

    /// The GL context wrapper.
    #[must_use]
    pub fn gl(&self) -> &G {
        &self.gl
    }
}

impl<S: TrackingSession, G: GlApi> Drop for FrameOrchestrator<S, G> {
    fn drop(&mut self) {
        self.release_gpu_resources();
        self.frame = None;
        let released = self.anchors.lock().clear();
        log::info!(target: TARGET, "torn down; {released} anchor(s) released");
    }
}

/// Anchors whatever `point` hits on `frame`, in the hit category's color.
fn place<F: TrackingFrame>(
    frame: &F,
    anchors: &SharedAnchors<F::Anchor>,
    point: Point,
) -> Option<AnchorKey> {
    let (category, anchor) = tether_core::tracking::place_anchor(frame, point)?;
    let key = anchors
        .lock()
        .insert(category, anchor, category.default_color());
    log::info!(
        target: TARGET,
        "placed {key} at ({:.0}, {:.0})",
        point.x,
        point.y
    );
    Some(key)
}
