//! Camera projection model and per-view state
//!
//! [`Camera`] maps between world, view, and screen space for one viewport.
//! View space is right-handed with x right, y up, and z the view depth;
//! screen space is in pixels with the origin at the viewport's top-left
//! corner and y growing downward.
//!
//! In perspective mode one world unit at `dist_to_screen` covers
//! [`PERSPECTIVE_PIXELS_PER_UNIT`] pixels; in orthographic mode the mapping
//! is the viewport's `scale` in pixels per unit at every depth.

use glam::{Vec2, Vec3};

use crate::coords::CoordinateSystem;
use crate::error::{GizmoError, GizmoResult};
use crate::types::{BoundingBox, NavigationMode, Rect};

/// Default distance from the eye to the projection plane
pub const DEFAULT_DISTANCE_TO_SCREEN: f32 = 20.0;

/// Pixels covered by one world unit at `dist_to_screen` (perspective)
pub const PERSPECTIVE_PIXELS_PER_UNIT: f32 = 100.0;

/// Depth below which a point counts as behind the eye plane
const NEAR_TOLERANCE: f32 = 1e-6;

/// Projection mode of a camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// Camera frame plus projection parameters for one viewport
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    coords: CoordinateSystem,
    projection: Projection,
    dist_to_screen: f32,
    scale: f32,
    bounds: Rect,
}

impl Camera {
    /// Create a camera for a viewport rectangle.
    ///
    /// Starts perspective at the default frame (origin, looking along +Z)
    /// with an orthographic scale of 100 pixels per unit.
    pub fn new(bounds: Rect) -> GizmoResult<Self> {
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return Err(GizmoError::invalid_viewport(format!(
                "viewport must have positive size, got {}x{}",
                bounds.width, bounds.height
            )));
        }
        Ok(Self {
            coords: CoordinateSystem::default(),
            projection: Projection::Perspective,
            dist_to_screen: DEFAULT_DISTANCE_TO_SCREEN,
            scale: 100.0,
            bounds,
        })
    }

    pub fn coords(&self) -> &CoordinateSystem {
        &self.coords
    }

    pub fn set_coords(&mut self, coords: CoordinateSystem) {
        self.coords = coords;
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    pub fn is_perspective(&self) -> bool {
        self.projection == Projection::Perspective
    }

    pub fn dist_to_screen(&self) -> f32 {
        self.dist_to_screen
    }

    /// Orthographic scale in pixels per world unit
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) -> GizmoResult<()> {
        if scale <= 0.0 {
            return Err(GizmoError::invalid_viewport(format!(
                "scale must be positive, got {scale}"
            )));
        }
        self.scale = scale;
        Ok(())
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) -> GizmoResult<()> {
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return Err(GizmoError::invalid_viewport(format!(
                "viewport must have positive size, got {}x{}",
                bounds.width, bounds.height
            )));
        }
        self.bounds = bounds;
        Ok(())
    }

    /// World point into view space (x right, y up, z depth)
    pub fn world_to_view(&self, p: Vec3) -> Vec3 {
        let d = p - self.coords.origin();
        Vec3::new(
            d.dot(self.coords.right()),
            d.dot(self.coords.updir()),
            d.dot(self.coords.zdir()),
        )
    }

    /// View-space point back into world space
    pub fn view_to_world(&self, v: Vec3) -> Vec3 {
        self.coords.origin()
            + self.coords.right() * v.x
            + self.coords.updir() * v.y
            + self.coords.zdir() * v.z
    }

    /// Depth of a world point along the view direction
    pub fn view_z(&self, p: Vec3) -> f32 {
        (p - self.coords.origin()).dot(self.coords.zdir())
    }

    /// Pixels covered by one world unit at the given view depth
    fn pixels_per_unit(&self, depth: f32) -> f32 {
        match self.projection {
            Projection::Orthographic => self.scale,
            Projection::Perspective => PERSPECTIVE_PIXELS_PER_UNIT * self.dist_to_screen / depth,
        }
    }

    /// Project a world point to viewport pixels.
    ///
    /// Undefined for perspective points at or behind the eye plane; guard
    /// with [`Camera::find_screen_bounds`] before dereferencing projections
    /// of geometry that may lie behind the camera.
    pub fn world_to_screen(&self, p: Vec3) -> Vec2 {
        let v = self.world_to_view(p);
        let ppu = self.pixels_per_unit(v.z);
        let c = self.bounds.center();
        Vec2::new(c.x + v.x * ppu, c.y - v.y * ppu)
    }

    /// Unproject a screen point onto the plane at `plane_dist` view depth.
    ///
    /// Inverse of [`Camera::world_to_screen`] for points at that depth.
    pub fn screen_to_world(&self, screen: Vec2, plane_dist: f32) -> Vec3 {
        let ppu = self.pixels_per_unit(plane_dist);
        let c = self.bounds.center();
        self.view_to_world(Vec3::new(
            (screen.x - c.x) / ppu,
            -(screen.y - c.y) / ppu,
            plane_dist,
        ))
    }

    /// World displacement matching a screen-pixel delta at the depth of
    /// `drag_start`. Perspective-correct: the same pixel drag moves distant
    /// points further.
    pub fn find_drag_vector(&self, drag_start: Vec3, dx: f32, dy: f32) -> Vec3 {
        let depth = self.view_z(drag_start);
        let ppu = self.pixels_per_unit(depth);
        self.coords.right() * (dx / ppu) - self.coords.updir() * (dy / ppu)
    }

    /// Screen rectangle covering a view-space box, or `None` when the box
    /// lies entirely behind the eye plane.
    pub fn find_screen_bounds(&self, bounds: &BoundingBox) -> Option<Rect> {
        let c = self.bounds.center();
        let mut min = Vec2::INFINITY;
        let mut max = Vec2::NEG_INFINITY;
        let mut visible = 0;
        for corner in bounds.corners() {
            if self.is_perspective() && corner.z <= NEAR_TOLERANCE {
                continue;
            }
            let ppu = self.pixels_per_unit(corner.z);
            let s = Vec2::new(c.x + corner.x * ppu, c.y - corner.y * ppu);
            min = min.min(s);
            max = max.max(s);
            visible += 1;
        }
        if visible == 0 {
            return None;
        }
        Some(Rect::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }
}

/// Overlay markers mirrored into sibling viewports while a camera drag is
/// live, so multi-view editors stay visually synchronized
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOverlay {
    pub rotation_center: Vec3,
    pub camera_pos: Vec3,
    /// World positions of the dragged view's corner rays at its view plane
    pub frustum_corners: [Vec3; 4],
}

/// A scene camera object this viewport is bound to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundCamera {
    /// Index of the camera object in the scene's top-level object list
    pub object: usize,
    /// Field of view in degrees, when the object constrains it
    pub fov: Option<f32>,
}

/// Per-view state: the camera plus everything navigation operates on
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    camera: Camera,
    dist_to_plane: f32,
    rotation_center: Vec3,
    navigation: NavigationMode,
    grid_spacing: f32,
    snap_subdivisions: f32,
    bound_camera: Option<BoundCamera>,
    overlay: Option<ViewOverlay>,
    moving: bool,
}

impl Viewport {
    pub fn new(bounds: Rect) -> GizmoResult<Self> {
        let camera = Camera::new(bounds)?;
        let rotation_center =
            camera.coords().origin() + camera.coords().zdir() * DEFAULT_DISTANCE_TO_SCREEN;
        Ok(Self {
            camera,
            dist_to_plane: DEFAULT_DISTANCE_TO_SCREEN,
            rotation_center,
            navigation: NavigationMode::default(),
            grid_spacing: 1.0,
            snap_subdivisions: 10.0,
            bound_camera: None,
            overlay: None,
            moving: false,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn is_perspective(&self) -> bool {
        self.camera.is_perspective()
    }

    pub fn scale(&self) -> f32 {
        self.camera.scale()
    }

    pub fn set_scale(&mut self, scale: f32) -> GizmoResult<()> {
        self.camera.set_scale(scale)
    }

    /// View depth of the plane drags and the rotation center anchor to
    pub fn dist_to_plane(&self) -> f32 {
        self.dist_to_plane
    }

    pub fn set_dist_to_plane(&mut self, dist: f32) {
        self.dist_to_plane = dist;
    }

    pub fn rotation_center(&self) -> Vec3 {
        self.rotation_center
    }

    pub fn set_rotation_center(&mut self, center: Vec3) {
        self.rotation_center = center;
    }

    pub fn navigation_mode(&self) -> NavigationMode {
        self.navigation
    }

    pub fn set_navigation_mode(&mut self, mode: NavigationMode) {
        self.navigation = mode;
    }

    pub fn grid_spacing(&self) -> f32 {
        self.grid_spacing
    }

    pub fn set_grid_spacing(&mut self, spacing: f32) {
        self.grid_spacing = spacing;
    }

    pub fn snap_subdivisions(&self) -> f32 {
        self.snap_subdivisions
    }

    pub fn set_snap_subdivisions(&mut self, subdivisions: f32) {
        self.snap_subdivisions = subdivisions;
    }

    /// Grid step used for SHIFT snapping
    pub fn grid_snap_size(&self) -> f32 {
        self.grid_spacing / self.snap_subdivisions
    }

    pub fn bound_camera(&self) -> Option<BoundCamera> {
        self.bound_camera
    }

    /// Bind this viewport to a scene camera object; `fov` in degrees when
    /// the object constrains the projection
    pub fn bind_camera(&mut self, object: usize, fov: Option<f32>) {
        self.bound_camera = Some(BoundCamera { object, fov });
    }

    pub fn unbind_camera(&mut self) {
        self.bound_camera = None;
    }

    pub fn overlay(&self) -> Option<&ViewOverlay> {
        self.overlay.as_ref()
    }

    pub fn set_overlay(&mut self, overlay: ViewOverlay) {
        self.overlay = Some(overlay);
    }

    pub fn clear_overlay(&mut self) {
        self.overlay = None;
    }

    /// True while a navigation drag owns the camera
    pub fn moving(&self) -> bool {
        self.moving
    }

    pub(crate) fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }

    /// Distance term that keeps gizmo handles a constant pixel size.
    ///
    /// Orthographic views use the camera's fixed screen distance. A
    /// perspective view bound to a scene camera derives the distance from
    /// that camera's field of view, since the generic camera math cannot
    /// recover it once the FOV is constrained.
    pub fn projection_distance(&self) -> f32 {
        if !self.is_perspective() {
            return self.camera.dist_to_screen();
        }
        match self.bound_camera.and_then(|b| b.fov) {
            Some(fov) => {
                let edge_angle = (std::f32::consts::PI - fov.to_radians()) / 2.0;
                edge_angle.tan() / DEFAULT_DISTANCE_TO_SCREEN * self.camera.bounds().height
                    / self.scale()
                    * 10.0
            }
            None => self.camera.dist_to_screen(),
        }
    }
}
