//! Handle geometry engine
//!
//! Projects the gizmo for a selection center into screen space: per-axis
//! move/scale boxes, the center box, and the rotation rings. Everything is
//! recomputed on demand as a pure function of (camera, center, mode), so
//! there is no cached screen state to go stale between events.

use glam::{Mat4, Vec2, Vec3};

use crate::camera::{PERSPECTIVE_PIXELS_PER_UNIT, Viewport};
use crate::style::Tuning;
use crate::types::{Axis, HandleType, Rect, ViewMode};

/// Handle slot indices, one box each
pub const X_MOVE_INDEX: usize = 0;
pub const X_SCALE_INDEX: usize = 1;
pub const Y_MOVE_INDEX: usize = 2;
pub const Y_SCALE_INDEX: usize = 3;
pub const Z_MOVE_INDEX: usize = 4;
pub const Z_SCALE_INDEX: usize = 5;
pub const CENTER_INDEX: usize = 6;

/// Semantic axis represented by a handle slot in the given view mode.
///
/// The Z slots are unused in screen-relative mode (the third axis is
/// suppressed there).
pub fn box_axis(mode: ViewMode, slot: usize) -> Option<Axis> {
    let axes = match mode {
        ViewMode::Xyz => [
            Some(Axis::X),
            Some(Axis::X),
            Some(Axis::Y),
            Some(Axis::Y),
            Some(Axis::Z),
            Some(Axis::Z),
            Some(Axis::All),
        ],
        ViewMode::Uv => [
            Some(Axis::U),
            Some(Axis::U),
            Some(Axis::V),
            Some(Axis::V),
            None,
            None,
            Some(Axis::All),
        ],
        ViewMode::Pqn => [
            Some(Axis::P),
            Some(Axis::P),
            Some(Axis::Q),
            Some(Axis::Q),
            Some(Axis::N),
            Some(Axis::N),
            Some(Axis::All),
        ],
    };
    axes[slot]
}

/// Kind of manipulation a handle slot performs
pub fn box_handle_type(slot: usize) -> HandleType {
    const TYPES: [HandleType; 7] = [
        HandleType::Move,
        HandleType::Scale,
        HandleType::Move,
        HandleType::Scale,
        HandleType::Move,
        HandleType::Scale,
        HandleType::Move,
    ];
    TYPES[slot]
}

/// One rotation ring: a closed polyline on the unit circle around
/// `rot_axis`, starting at `ref_axis`, projected into screen space
#[derive(Debug, Clone)]
pub struct RingGeometry {
    /// Semantic axis this ring rotates about
    pub axis: Axis,
    pub rot_axis: Vec3,
    pub ref_axis: Vec3,
    /// Unit-circle points, `segments + 1` entries, last wraps to the first
    pub points3: Vec<Vec3>,
    /// The same points scaled to the gizmo radius and projected
    pub points2: Vec<Vec2>,
    /// View depth of each scaled point, for nearest-ring disambiguation
    depths: Vec<f32>,
}

impl RingGeometry {
    fn new(
        axis: Axis,
        rot_axis: Vec3,
        ref_axis: Vec3,
        segments: usize,
        center: Vec3,
        len: f32,
        viewport: &Viewport,
    ) -> Self {
        let step = 2.0 * std::f32::consts::PI / segments as f32;
        let mut points3 = Vec::with_capacity(segments + 1);
        let mut points2 = Vec::with_capacity(segments + 1);
        let mut depths = Vec::with_capacity(segments + 1);
        for i in 0..=segments {
            let p = Mat4::from_axis_angle(rot_axis, (i + 1) as f32 * step)
                .transform_vector3(ref_axis);
            let world = center + p * len;
            points3.push(p);
            points2.push(viewport.camera().world_to_screen(world));
            depths.push(viewport.camera().view_z(world));
        }
        Self {
            axis,
            rot_axis,
            ref_axis,
            points3,
            points2,
            depths,
        }
    }

    /// Segment whose screen polyline passes within `handle_px / 2` of the
    /// click, together with its interpolated view depth
    fn find_click_target(&self, pos: Vec2, handle_px: f32) -> Option<(usize, f32)> {
        let margin = handle_px / 4.0;
        let mut closest: Option<(usize, f32)> = None;
        for i in 0..self.points2.len() - 1 {
            let v1 = self.points2[i];
            let v2 = self.points2[i + 1];
            if (pos.x < v1.x - margin && pos.x < v2.x - margin)
                || (pos.x > v1.x + margin && pos.x > v2.x + margin)
                || (pos.y < v1.y - margin && pos.y < v2.y - margin)
                || (pos.y > v1.y + margin && pos.y > v2.y + margin)
            {
                continue;
            }

            // Perpendicular distance of the click from the segment, measured
            // against the dominant direction so the interpolation stays stable
            let (u, v, w);
            if (v1.x - v2.x).abs() > (v1.y - v2.y).abs() {
                if v2.x > v1.x {
                    v = (pos.x - v1.x) / (v2.x - v1.x);
                    u = 1.0 - v;
                } else {
                    u = (pos.x - v2.x) / (v1.x - v2.x);
                    v = 1.0 - u;
                }
                w = u * v1.y + v * v2.y - pos.y;
            } else {
                if v2.y > v1.y {
                    v = (pos.y - v1.y) / (v2.y - v1.y);
                    u = 1.0 - v;
                } else {
                    u = (pos.y - v2.y) / (v1.y - v2.y);
                    v = 1.0 - u;
                }
                w = u * v1.x + v * v2.x - pos.x;
            }
            if w.abs() > handle_px / 2.0 {
                continue;
            }
            let z = u * self.depths[i] + v * self.depths[i + 1];
            if closest.is_none_or(|(_, best)| z < best) {
                closest = Some((i, z));
            }
        }
        closest
    }

    /// Pie-slice polygon sweeping `angle` from the reference axis, on the
    /// unit circle; the draw layer scales it to the gizmo radius. Shown as
    /// rotation feedback during a drag.
    pub fn rotation_feedback(&self, angle: f32) -> Vec<Vec3> {
        let segments = self.points3.len() - 1;
        let mut points = Vec::with_capacity(segments + 1);
        points.push(Vec3::ZERO);
        for i in 0..segments {
            let p = Mat4::from_axis_angle(self.rot_axis, angle * i as f32 / segments as f32)
                .transform_vector3(self.ref_axis);
            points.push(p);
        }
        points
    }
}

/// Screen-space gizmo geometry for one frame
#[derive(Debug, Clone)]
pub struct HandleLayout {
    pub mode: ViewMode,
    /// Effective axis directions for the current mode
    pub axes: [Vec3; 3],
    /// Gizmo axis length in world units
    pub len: f32,
    /// Handle size in world units (constant apparent pixel size)
    pub handle_size: f32,
    /// Move/scale/center handle boxes, indexed by the `*_INDEX` constants
    pub boxes: [Rect; 7],
    /// Combined-scale box of the screen-relative mode
    pub extra_uv_box: Rect,
    pub center_point: Vec2,
    /// Projected axis tips, for the axis lines
    pub screen_axis_ends: [Vec2; 3],
    /// Normalized screen directions of the projected axes
    pub axes_2d: [Vec2; 3],
    pub rings: Vec<RingGeometry>,
}

impl HandleLayout {
    /// Compute the gizmo layout around a world-space center.
    ///
    /// `pqn_axes` must be present in PQN mode; requesting the layout for a
    /// mode whose axes were never supplied is a caller bug.
    pub fn compute(
        center: Vec3,
        viewport: &Viewport,
        mode: ViewMode,
        pqn_axes: Option<&[Vec3; 3]>,
        axis_length_px: f32,
        tuning: &Tuning,
    ) -> Self {
        let camera = viewport.camera();
        let axes = match mode {
            ViewMode::Xyz => [Vec3::X, Vec3::Y, Vec3::Z],
            ViewMode::Uv => {
                let coords = camera.coords();
                [
                    coords.zdir().cross(coords.updir()),
                    coords.updir(),
                    -coords.zdir(),
                ]
            }
            ViewMode::Pqn => *pqn_axes.expect("PQN axes requested before set_pqn_axes"),
        };

        // World-unit sizes that keep the gizmo constant in pixels
        let (handle_size, len) = if viewport.is_perspective() {
            let projection_dist = viewport.projection_distance();
            (
                tuning.handle_px * camera.view_z(center)
                    / projection_dist
                    / PERSPECTIVE_PIXELS_PER_UNIT,
                axis_length_px * viewport.dist_to_plane()
                    / projection_dist
                    / PERSPECTIVE_PIXELS_PER_UNIT,
            )
        } else {
            (
                tuning.handle_px / viewport.scale(),
                axis_length_px / viewport.scale(),
            )
        };

        let center_point = camera.world_to_screen(center);
        let mut boxes = [Rect::default(); 7];
        boxes[CENTER_INDEX] = Rect::centered(center_point, tuning.handle_px);

        let mut screen_axis_ends = [Vec2::ZERO; 3];
        let mut axes_2d = [Vec2::ZERO; 3];
        for (i, axis) in axes.iter().enumerate() {
            let tip = camera.world_to_screen(center + *axis * len);
            let handle = camera.world_to_screen(center + *axis * (len + handle_size));
            let offset = camera.world_to_screen(center + *axis * (len + handle_size * 1.5)) - tip;
            screen_axis_ends[i] = tip;
            axes_2d[i] = (tip - center_point).normalize_or_zero();
            if mode == ViewMode::Uv && i == 2 {
                continue;
            }
            boxes[2 * i] = Rect::centered(handle, tuning.handle_px);
            boxes[2 * i + 1] = Rect::centered(handle + offset, tuning.handle_px);
        }

        let extra_uv_box = if mode == ViewMode::Uv {
            Rect::new(
                boxes[X_SCALE_INDEX].x,
                boxes[Y_SCALE_INDEX].y,
                tuning.handle_px,
                tuning.handle_px,
            )
        } else {
            Rect::default()
        };

        let segs = tuning.ring_segments;
        let ring = |axis, rot: Vec3, reference: Vec3| {
            RingGeometry::new(axis, rot, reference, segs, center, len, viewport)
        };
        let rings = match mode {
            ViewMode::Xyz => vec![
                ring(Axis::X, axes[0], axes[1]),
                ring(Axis::Y, axes[1], axes[2]),
                ring(Axis::Z, axes[2], axes[0]),
            ],
            // A single ring about the axis pointing at the viewer
            ViewMode::Uv => vec![ring(Axis::U, axes[2], axes[0])],
            ViewMode::Pqn => vec![
                ring(Axis::P, axes[0], axes[1]),
                ring(Axis::Q, axes[1], axes[2]),
                ring(Axis::N, axes[2], axes[0]),
            ],
        };

        Self {
            mode,
            axes,
            len,
            handle_size,
            boxes,
            extra_uv_box,
            center_point,
            screen_axis_ends,
            axes_2d,
            rings,
        }
    }

    /// Whether a handle slot participates in the current mode
    pub fn slot_active(&self, slot: usize) -> bool {
        !(self.mode == ViewMode::Uv && (slot == Z_MOVE_INDEX || slot == Z_SCALE_INDEX))
    }

    /// The ring and segment under the pointer, if any.
    ///
    /// When several rings pass within tolerance the segment nearest the
    /// camera (smallest view depth) wins, matching the expectation that a
    /// click lands on the visually topmost circle.
    pub fn find_ring_target(&self, pos: Vec2, tuning: &Tuning) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize, f32)> = None;
        for (ring_index, ring) in self.rings.iter().enumerate() {
            if let Some((segment, depth)) = ring.find_click_target(pos, tuning.handle_px) {
                if best.is_none_or(|(_, _, d)| depth < d) {
                    best = Some((ring_index, segment, depth));
                }
            }
        }
        best.map(|(ring, segment, _)| (ring, segment))
    }

    /// Effective 3D direction and normalized 2D projection for a drag axis
    pub(crate) fn drag_directions(&self, axis: Axis) -> (Vec3, Vec2) {
        let slot = match axis {
            Axis::X | Axis::U | Axis::P => 0,
            Axis::Y | Axis::V | Axis::Q => 1,
            _ => 2,
        };
        (self.axes[slot], self.axes_2d[slot])
    }
}
