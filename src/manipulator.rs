//! Hit-test & drag controller
//!
//! [`Compound3DManipulator`] presents a composite gizmo around the current
//! selection and turns pointer gestures on it into transform matrices. Each
//! gesture runs against a session snapshot taken at press time, so a drag is
//! always measured from its start state rather than composed from
//! intermediate increments.
//!
//! The state machine is `Idle → Pressed(kind, axis) → Dragging → Idle`; a
//! press that hits no handle stays in `Idle`, and a move without a live
//! session is a no-op.

use glam::{Mat4, Vec2, Vec3};

use crate::camera::{PERSPECTIVE_PIXELS_PER_UNIT, Viewport};
use crate::coords::CoordinateSystem;
use crate::draw::{
    Canvas, FEEDBACK_FILL, FEEDBACK_OUTLINE, HANDLE_BLUE, HANDLE_GREEN, HANDLE_ORANGE, HANDLE_RED,
    HandleIcon,
};
use crate::error::{GizmoError, GizmoResult};
use crate::handles::{CENTER_INDEX, HandleLayout, box_axis, box_handle_type};
use crate::style::Tuning;
use crate::types::{Axis, BoundingBox, HandleType, PointerEvent, Rect, ViewMode};
use crate::{gizmo_debug, gizmo_trace};

/// Emitted when a press lands on a handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandlePressed {
    pub kind: HandleType,
    pub axis: Axis,
    /// Manipulator screen bounds at press time
    pub screen_bounds: Rect,
    /// Selection bounds (view space) at press time
    pub selection_bounds: BoundingBox,
}

/// Emitted for every pointer move of a live drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleDragged {
    pub kind: HandleType,
    pub axis: Axis,
    pub screen_bounds: Rect,
    pub selection_bounds: BoundingBox,
    /// Transform from original to dragged positions, to apply to the
    /// selection's objects or vertices
    pub transform: Mat4,
    /// Rotation angle in radians, for Rotate drags
    pub angle: Option<f32>,
    /// Primary and secondary scale factors, for Scale drags; the secondary
    /// is only meaningful for the combined UV handle
    pub scales: Option<(f32, f32)>,
}

/// Emitted when the pointer is released with a live drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleReleased {
    pub kind: HandleType,
    pub axis: Axis,
    pub screen_bounds: Rect,
    pub selection_bounds: BoundingBox,
}

/// State frozen at press time; every move of the gesture is interpreted
/// against it
#[derive(Debug, Clone)]
struct DragSession {
    kind: HandleType,
    axis: Axis,
    base_click: Vec2,
    /// World position drags are anchored to (selection center, or the
    /// externally supplied handle location)
    start_position: Vec3,
    screen_bounds: Rect,
    selection_bounds: BoundingBox,
    start_axis_length: f32,
    ring: usize,
    segment: usize,
    angle: f32,
}

impl DragSession {
    fn dragged(
        &self,
        transform: Mat4,
        angle: Option<f32>,
        scales: Option<(f32, f32)>,
    ) -> HandleDragged {
        HandleDragged {
            kind: self.kind,
            axis: self.axis,
            screen_bounds: self.screen_bounds,
            selection_bounds: self.selection_bounds,
            transform,
            angle,
            scales,
        }
    }
}

/// Composite move/scale/rotate manipulator around a selection
#[derive(Debug, Clone)]
pub struct Compound3DManipulator {
    view_mode: ViewMode,
    pqn_axes: Option<[Vec3; 3]>,
    rotate_around_selection_center: bool,
    /// Gizmo axis length in pixels; editable by the CONTROL scale drag
    axis_length: f32,
    tuning: Tuning,
    /// Selection center in world space; follows the live selection except
    /// while a Rotate or Scale drag freezes the gizmo in place
    center: Vec3,
    session: Option<DragSession>,
}

impl Default for Compound3DManipulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Compound3DManipulator {
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    pub fn with_tuning(tuning: Tuning) -> Self {
        Self {
            view_mode: ViewMode::Xyz,
            pqn_axes: None,
            rotate_around_selection_center: true,
            axis_length: tuning.axis_length_px,
            tuning,
            center: Vec3::ZERO,
            session: None,
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Whether rotations pivot about the selection center instead of the
    /// world origin
    pub fn rotate_around_selection_center(&self) -> bool {
        self.rotate_around_selection_center
    }

    pub fn set_rotate_around_selection_center(&mut self, value: bool) {
        self.rotate_around_selection_center = value;
    }

    /// Current gizmo axis length in pixels
    pub fn axis_length(&self) -> f32 {
        self.axis_length
    }

    /// Supply the axis triad used in PQN mode. The directions must be unit
    /// length and mutually orthogonal; they stay cached until replaced.
    pub fn set_pqn_axes(&mut self, p: Vec3, q: Vec3, n: Vec3) -> GizmoResult<()> {
        const TOL: f32 = 1e-3;
        for (name, v) in [("p", p), ("q", q), ("n", n)] {
            if (v.length() - 1.0).abs() > TOL {
                return Err(GizmoError::invalid_axes(format!(
                    "{name} axis is not unit length (|{name}| = {})",
                    v.length()
                )));
            }
        }
        if p.dot(q).abs() > TOL || q.dot(n).abs() > TOL || n.dot(p).abs() > TOL {
            return Err(GizmoError::invalid_axes("axes are not orthogonal"));
        }
        self.pqn_axes = Some([p, q, n]);
        Ok(())
    }

    pub fn reset_pqn_axes(&mut self) {
        self.pqn_axes = None;
    }

    /// True while a drag session is live
    pub fn dragging(&self) -> bool {
        self.session.is_some()
    }

    /// World direction of an axis.
    ///
    /// # Panics
    ///
    /// `Uv` and `All` have no fixed direction in any mode, and `P`/`Q`/`N`
    /// have none before [`Compound3DManipulator::set_pqn_axes`]; asking for
    /// those is a contract violation.
    pub fn axis_direction(&self, axis: Axis, viewport: &Viewport) -> Vec3 {
        let coords = viewport.camera().coords();
        match axis {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
            Axis::U => coords.zdir().cross(coords.updir()),
            Axis::V => coords.updir(),
            Axis::W => -coords.zdir(),
            Axis::P | Axis::Q | Axis::N => {
                let axes = self
                    .pqn_axes
                    .as_ref()
                    .unwrap_or_else(|| panic!("axis {} requested before set_pqn_axes", axis.name()));
                match axis {
                    Axis::P => axes[0],
                    Axis::Q => axes[1],
                    _ => axes[2],
                }
            }
            Axis::Uv | Axis::All => {
                panic!("axis {} does not have a fixed direction", axis.name())
            }
        }
    }

    /// Screen rectangle of the manipulator for a selection, one handle size
    /// beyond the projected selection bounds
    pub fn find_screen_bounds(
        &self,
        bounds: &BoundingBox,
        viewport: &Viewport,
    ) -> Option<Rect> {
        viewport
            .camera()
            .find_screen_bounds(bounds)
            .map(|r| r.expanded(self.tuning.handle_px))
    }

    /// The kind of handle displayed at a location, for hover feedback
    pub fn handle_type_at_location(
        &self,
        pos: Vec2,
        viewport: &Viewport,
        selection_bounds: Option<&BoundingBox>,
    ) -> Option<HandleType> {
        let bounds = selection_bounds?;
        let center = viewport.camera().view_to_world(bounds.center());
        let layout = self.layout_for(center, viewport);
        for slot in 0..=CENTER_INDEX {
            if layout.slot_active(slot) && layout.boxes[slot].contains(pos) {
                return Some(box_handle_type(slot));
            }
        }
        if layout.find_ring_target(pos, &self.tuning).is_some() {
            return Some(HandleType::Rotate);
        }
        if self.view_mode == ViewMode::Uv && layout.extra_uv_box.contains(pos) {
            return Some(HandleType::Scale);
        }
        None
    }

    /// Feed a pointer press. Returns the press event when it lands on a
    /// handle and a drag session begins; `None` leaves the manipulator idle.
    pub fn mouse_pressed(
        &mut self,
        ev: &PointerEvent,
        viewport: &Viewport,
        selection_bounds: Option<&BoundingBox>,
    ) -> Option<HandlePressed> {
        let bounds = selection_bounds?;
        // An invisible or degenerate selection is not interactable
        let screen_bounds = self.find_screen_bounds(bounds, viewport)?;
        self.center = viewport.camera().view_to_world(bounds.center());
        let layout = self.layout_for(self.center, viewport);

        for slot in (0..=CENTER_INDEX).rev() {
            if !layout.slot_active(slot) || !layout.boxes[slot].contains(ev.pos) {
                continue;
            }
            let (kind, axis) = if slot == CENTER_INDEX {
                (HandleType::Move, Axis::All)
            } else {
                (box_handle_type(slot), box_axis(self.view_mode, slot)?)
            };
            return Some(self.begin_session(kind, axis, ev, screen_bounds, *bounds, 0, 0));
        }

        if let Some((ring, segment)) = layout.find_ring_target(ev.pos, &self.tuning) {
            let axis = layout.rings[ring].axis;
            return Some(self.begin_session(
                HandleType::Rotate,
                axis,
                ev,
                screen_bounds,
                *bounds,
                ring,
                segment,
            ));
        }

        if self.view_mode == ViewMode::Uv && layout.extra_uv_box.contains(ev.pos) {
            return Some(self.begin_session(
                HandleType::Scale,
                Axis::Uv,
                ev,
                screen_bounds,
                *bounds,
                0,
                0,
            ));
        }
        None
    }

    /// Begin an ALL-axis move drag from an externally supplied handle
    /// location (mesh editors pressing on a vertex handle)
    pub fn mouse_pressed_on_handle(
        &mut self,
        ev: &PointerEvent,
        viewport: &Viewport,
        selection_bounds: &BoundingBox,
        handle_location: Vec3,
    ) -> HandlePressed {
        let screen_bounds = self
            .find_screen_bounds(selection_bounds, viewport)
            .unwrap_or_default();
        self.center = viewport.camera().view_to_world(selection_bounds.center());
        let pressed = self.begin_session(
            HandleType::Move,
            Axis::All,
            ev,
            screen_bounds,
            *selection_bounds,
            0,
            0,
        );
        if let Some(session) = self.session.as_mut() {
            session.start_position = handle_location;
        }
        pressed
    }

    #[allow(clippy::too_many_arguments)]
    fn begin_session(
        &mut self,
        kind: HandleType,
        axis: Axis,
        ev: &PointerEvent,
        screen_bounds: Rect,
        selection_bounds: BoundingBox,
        ring: usize,
        segment: usize,
    ) -> HandlePressed {
        gizmo_debug!(
            "handle pressed: {:?} on axis {} at {:?}",
            kind,
            axis.name(),
            ev.pos
        );
        self.session = Some(DragSession {
            kind,
            axis,
            base_click: ev.pos,
            start_position: self.center,
            screen_bounds,
            selection_bounds,
            start_axis_length: self.axis_length,
            ring,
            segment,
            angle: 0.0,
        });
        HandlePressed {
            kind,
            axis,
            screen_bounds,
            selection_bounds,
        }
    }

    /// Feed a pointer move. With a live session this recomputes the gizmo
    /// geometry against the session's center and returns the incremental
    /// transform; without one it is a no-op.
    ///
    /// Returns `None` also for the CONTROL scale drag, which edits the gizmo
    /// axis length without changing the selection.
    pub fn mouse_dragged(
        &mut self,
        ev: &PointerEvent,
        viewport: &Viewport,
    ) -> Option<HandleDragged> {
        let kind = self.session.as_ref()?.kind;
        let layout = self.layout_for(self.center, viewport);
        match kind {
            HandleType::Move => self.move_dragged(ev, viewport, &layout),
            HandleType::Rotate => self.rotate_dragged(ev, &layout),
            HandleType::Scale => self.scale_dragged(ev, &layout),
        }
    }

    /// Feed a pointer release. Commits the gesture: returns the release
    /// event and destroys the session. A release without a session is a
    /// no-op.
    pub fn mouse_released(
        &mut self,
        _ev: &PointerEvent,
        _viewport: &Viewport,
    ) -> Option<HandleReleased> {
        let session = self.session.take()?;
        gizmo_debug!(
            "handle released: {:?} on axis {}",
            session.kind,
            session.axis.name()
        );
        Some(HandleReleased {
            kind: session.kind,
            axis: session.axis,
            screen_bounds: session.screen_bounds,
            selection_bounds: session.selection_bounds,
        })
    }

    fn move_dragged(
        &mut self,
        ev: &PointerEvent,
        viewport: &Viewport,
        layout: &HandleLayout,
    ) -> Option<HandleDragged> {
        let session = self.session.as_ref()?;
        let grid = viewport.grid_snap_size();
        let disp = ev.pos - session.base_click;

        // The center handle moves parallel to the screen plane, or along the
        // camera axis with CONTROL held
        if session.axis == Axis::All {
            let coords = viewport.camera().coords();
            let mut drag = if ev.control() {
                coords.zdir() * (-disp.y * self.tuning.center_z_move_factor)
            } else {
                viewport
                    .camera()
                    .find_drag_vector(session.start_position, disp.x, disp.y)
            };
            if ev.shift() && grid > 0.0 {
                drag = Vec3::new(
                    snap_to_grid(drag.x, grid),
                    snap_to_grid(drag.y, grid),
                    snap_to_grid(drag.z, grid),
                );
            }
            return Some(session.dragged(Mat4::from_translation(drag), None, None));
        }

        let (dir3, dir2) = layout.drag_directions(session.axis);
        let coords = viewport.camera().coords();
        let cam_z = coords.zdir();
        let cam_y = coords.updir();
        let cam_x = cam_z.cross(cam_y).normalize_or_zero();

        let drag2 = dir2 * disp.dot(dir2);
        let mut drag_projected = cam_x * drag2.x - cam_y * drag2.y;
        let dir_projected = drag_projected.normalize_or_zero();
        let scale_out = if viewport.is_perspective() {
            let depth = (self.center - coords.origin()).dot(cam_z);
            depth / viewport.projection_distance() / PERSPECTIVE_PIXELS_PER_UNIT
        } else {
            1.0 / viewport.scale()
        };
        drag_projected *= scale_out;
        let mut drag_distance = drag_projected.dot(dir3);

        // Compensate for foreshortening of the projected axis. When the
        // mouse has returned to the starting line the drag vector is zero
        // and the divisor with it; the remaining distance is negligible, so
        // skip the divide.
        let axis_projection_scale = dir_projected.dot(dir3).abs();
        if axis_projection_scale != 0.0 {
            drag_distance /= axis_projection_scale * axis_projection_scale;
        }

        if ev.shift() && grid > 0.0 {
            drag_distance = snap_to_grid(drag_distance, grid);
        }
        let transform = Mat4::from_translation(dir3 * drag_distance);
        Some(session.dragged(transform, None, None))
    }

    fn rotate_dragged(&mut self, ev: &PointerEvent, layout: &HandleLayout) -> Option<HandleDragged> {
        let session = self.session.as_mut()?;
        let ring = layout.rings.get(session.ring)?;
        let disp = ev.pos - session.base_click;
        let segment_dir =
            (ring.points2[session.segment + 1] - ring.points2[session.segment]).normalize_or_zero();
        let mut angle = segment_dir.dot(disp) / self.tuning.rotate_sensitivity;
        if ev.shift() {
            let step = self.tuning.angle_snap_degrees.to_radians();
            angle = snap_to_grid(angle, step);
        }
        session.angle = angle;

        let mut transform = Mat4::from_axis_angle(ring.rot_axis, angle);
        if self.rotate_around_selection_center {
            transform = Mat4::from_translation(self.center)
                * transform
                * Mat4::from_translation(-self.center);
        }
        Some(session.dragged(transform, Some(angle), None))
    }

    fn scale_dragged(&mut self, ev: &PointerEvent, layout: &HandleLayout) -> Option<HandleDragged> {
        let session = self.session.as_ref()?;
        let base = session.base_click - layout.center_point;
        let current = ev.pos - layout.center_point;
        let scale = if base.length() < 1.0 {
            1.0
        } else {
            base.dot(current) / base.length_squared()
        };

        // CONTROL turns the gesture into an axis-length edit: the gizmo is
        // resized, the selection untouched
        if ev.control() {
            self.axis_length = session.start_axis_length * scale;
            gizmo_trace!("axis length edited to {} px", self.axis_length);
            return None;
        }

        let mut sx = 1.0;
        let mut sy = 1.0;
        let mut sz = 1.0;
        match session.axis {
            Axis::X | Axis::U | Axis::P => {
                sx = scale;
                if ev.shift() {
                    sy = sx;
                    sz = sx;
                }
            }
            Axis::Y | Axis::V | Axis::Q => {
                sy = scale;
                if ev.shift() {
                    sx = sy;
                    sz = sy;
                }
            }
            Axis::Z | Axis::N => {
                sz = scale;
                if ev.shift() {
                    sx = sz;
                    sy = sz;
                }
            }
            Axis::Uv => {
                sx = axis_ratio(layout.axes_2d[0], base, current);
                sy = axis_ratio(layout.axes_2d[1], base, current);
                if ev.shift() {
                    let uniform = if sx < 1.0 && sy < 1.0 {
                        sx.min(sy)
                    } else {
                        sx.max(sy)
                    };
                    sx = uniform;
                    sy = uniform;
                    sz = uniform;
                }
            }
            _ => {}
        }

        // Scale in a local frame anchored at the center, aligned with the
        // gizmo's current up/forward axes
        let frame = CoordinateSystem::new(self.center, layout.axes[2], layout.axes[1]);
        let transform =
            frame.from_local() * Mat4::from_scale(Vec3::new(sx, sy, sz)) * frame.to_local();
        let scales = if session.axis == Axis::Uv {
            (sx, sy)
        } else {
            (scale, 0.0)
        };
        Some(session.dragged(transform, None, Some(scales)))
    }

    /// Draw the gizmo for the current selection.
    ///
    /// The gizmo center follows the live selection bounds, except while a
    /// Rotate or Scale drag is in progress: those freeze the gizmo so it
    /// does not crawl away as its own transform is applied. An empty or
    /// invisible selection draws nothing.
    pub fn draw(
        &mut self,
        viewport: &Viewport,
        selection_bounds: Option<&BoundingBox>,
        canvas: &mut dyn Canvas,
    ) {
        let Some(bounds) = selection_bounds else {
            return;
        };
        if viewport.camera().find_screen_bounds(bounds).is_none() {
            return;
        }
        let frozen = matches!(
            &self.session,
            Some(s) if s.kind == HandleType::Rotate || s.kind == HandleType::Scale
        );
        if !frozen {
            self.center = viewport.camera().view_to_world(bounds.center());
        }
        let layout = self.layout_for(self.center, viewport);

        // Rotation amount feedback behind the rings
        if let Some(session) = &self.session {
            if session.kind == HandleType::Rotate {
                if let Some(ring) = layout.rings.get(session.ring) {
                    let pie: Vec<Vec2> = ring
                        .rotation_feedback(session.angle)
                        .iter()
                        .map(|p| {
                            viewport
                                .camera()
                                .world_to_screen(self.center + *p * layout.len)
                        })
                        .collect();
                    canvas.fill_polygon(&pie, FEEDBACK_FILL);
                    canvas.draw_polygon(&pie, FEEDBACK_OUTLINE);
                }
            }
        }

        let axis_colors = match self.view_mode {
            ViewMode::Uv => [HANDLE_ORANGE; 3],
            _ => [HANDLE_BLUE, HANDLE_GREEN, HANDLE_RED],
        };
        for i in 0..3 {
            canvas.draw_line(layout.center_point, layout.screen_axis_ends[i], axis_colors[i]);
        }

        canvas.blit(
            HandleIcon::Center,
            Vec2::new(layout.boxes[CENTER_INDEX].x, layout.boxes[CENTER_INDEX].y),
        );
        for slot in 0..CENTER_INDEX {
            if !layout.slot_active(slot) {
                continue;
            }
            let b = layout.boxes[slot];
            canvas.blit(slot_icon(self.view_mode, slot), Vec2::new(b.x, b.y));
        }
        if self.view_mode == ViewMode::Uv {
            canvas.blit(
                HandleIcon::UvScale,
                Vec2::new(layout.extra_uv_box.x, layout.extra_uv_box.y),
            );
        }

        for (i, ring) in layout.rings.iter().enumerate() {
            let color = axis_colors[i.min(2)];
            for j in 0..ring.points2.len() - 1 {
                canvas.draw_line(ring.points2[j], ring.points2[j + 1], color);
            }
        }
    }

    fn layout_for(&self, center: Vec3, viewport: &Viewport) -> HandleLayout {
        HandleLayout::compute(
            center,
            viewport,
            self.view_mode,
            self.pqn_axes.as_ref(),
            self.axis_length,
            &self.tuning,
        )
    }
}

/// Snap a value to the nearest multiple of `step`
fn snap_to_grid(value: f32, step: f32) -> f32 {
    step * (value / step).round()
}

/// Screen-space scale ratio along one projected axis, with the degenerate
/// base treated as no change
fn axis_ratio(axis_2d: Vec2, base: Vec2, current: Vec2) -> f32 {
    let denom = axis_2d.dot(base);
    if denom.abs() < f32::EPSILON {
        1.0
    } else {
        axis_2d.dot(current) / denom
    }
}

fn slot_icon(mode: ViewMode, slot: usize) -> HandleIcon {
    match mode {
        ViewMode::Xyz => [
            HandleIcon::XMove,
            HandleIcon::XScale,
            HandleIcon::YMove,
            HandleIcon::YScale,
            HandleIcon::ZMove,
            HandleIcon::ZScale,
        ][slot],
        ViewMode::Uv => [
            HandleIcon::UMove,
            HandleIcon::UvScale,
            HandleIcon::VMove,
            HandleIcon::UvScale,
            HandleIcon::UvScale,
            HandleIcon::UvScale,
        ][slot],
        ViewMode::Pqn => [
            HandleIcon::PMove,
            HandleIcon::XScale,
            HandleIcon::QMove,
            HandleIcon::YScale,
            HandleIcon::NMove,
            HandleIcon::ZScale,
        ][slot],
    }
}
