//! Tuning constants for manipulation feel
//!
//! The numeric values are empirical; they control how gestures map to
//! transforms and have no derivation beyond matching the established feel.

/// Tuning knobs shared by the manipulator and the navigation controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Handle square size, in pixels
    pub handle_px: f32,
    /// Gizmo axis length from center to the move handle, in pixels
    pub axis_length_px: f32,
    /// Divisor converting screen-pixel drag along a ring segment to radians
    pub rotate_sensitivity: f32,
    /// Angle-snap step while SHIFT is held, in degrees
    pub angle_snap_degrees: f32,
    /// Segment count of each rotation ring
    pub ring_segments: usize,
    /// Per-pixel geometric base of model-space zoom
    pub zoom_base: f32,
    /// Travel-space forward speed, world units per pixel per unit distance
    pub travel_forward_factor: f32,
    /// Vertical pan/strafe speed, world units per pixel per unit distance
    pub travel_vertical_factor: f32,
    /// Camera-z move speed of the CONTROL center-handle drag
    pub center_z_move_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            handle_px: 12.0,
            axis_length_px: 80.0,
            rotate_sensitivity: 70.0,
            angle_snap_degrees: 5.0,
            ring_segments: 64,
            zoom_base: 1.01,
            travel_forward_factor: 0.04,
            travel_vertical_factor: 0.01,
            center_z_move_factor: 0.01,
        }
    }
}
