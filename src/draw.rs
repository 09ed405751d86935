//! Drawing surface abstraction
//!
//! The core never owns a framebuffer: it issues primitives through the
//! [`Canvas`] trait and names handle images by [`HandleIcon`], leaving
//! rasterization and asset lookup to the embedding application.

use glam::Vec2;

use crate::camera::{ViewOverlay, Viewport};
use crate::types::Rect;

/// RGBA color, components in 0..=1
pub type Color = [f32; 4];

pub const HANDLE_RED: Color = [0.937, 0.0, 0.0, 1.0];
pub const HANDLE_GREEN: Color = [0.0, 0.937, 0.0, 1.0];
pub const HANDLE_BLUE: Color = [0.059, 0.435, 1.0, 1.0];
pub const HANDLE_ORANGE: Color = [1.0, 0.78, 0.0, 1.0];
pub const FEEDBACK_FILL: Color = [0.5, 0.5, 0.5, 1.0];
pub const FEEDBACK_OUTLINE: Color = [0.25, 0.25, 0.25, 1.0];
pub const OVERLAY_MARKER: Color = [0.8, 0.8, 0.2, 1.0];

/// Handle images the manipulator blits; the application maps them to its
/// own assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleIcon {
    XMove,
    XScale,
    YMove,
    YScale,
    ZMove,
    ZScale,
    UMove,
    VMove,
    UvScale,
    PMove,
    QMove,
    NMove,
    Center,
}

/// Abstract drawing surface for one viewport
pub trait Canvas {
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color);
    /// Outline of a closed polygon
    fn draw_polygon(&mut self, points: &[Vec2], color: Color);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    fn draw_rect(&mut self, rect: Rect, color: Color);
    /// Blit a handle image with its top-left corner at `pos`
    fn blit(&mut self, icon: HandleIcon, pos: Vec2);
}

/// Draw the markers another view's live camera drag published: the rotation
/// center, the camera position, and the dragged view's plane quad
pub fn draw_view_overlay(viewport: &Viewport, overlay: &ViewOverlay, canvas: &mut dyn Canvas) {
    let camera = viewport.camera();
    let marker = |canvas: &mut dyn Canvas, world| {
        if viewport.is_perspective() && camera.view_z(world) <= 0.0 {
            return;
        }
        let s = camera.world_to_screen(world);
        canvas.draw_rect(Rect::centered(s, 5.0), OVERLAY_MARKER);
    };
    marker(canvas, overlay.rotation_center);
    marker(canvas, overlay.camera_pos);

    let mut quad = Vec::with_capacity(4);
    for corner in overlay.frustum_corners {
        if viewport.is_perspective() && camera.view_z(corner) <= 0.0 {
            return;
        }
        quad.push(camera.world_to_screen(corner));
    }
    // Corner order is (0,0), (w,0), (0,h), (w,h); swap to trace the outline
    quad.swap(2, 3);
    canvas.draw_polygon(&quad, OVERLAY_MARKER);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Projection;
    use crate::coords::CoordinateSystem;
    use glam::Vec3;

    #[test]
    fn test_overlay_draws_markers_and_plane_quad() {
        let mut view = crate::Viewport::new(Rect::new(0.0, 0.0, 800.0, 600.0)).unwrap();
        view.camera_mut().set_projection(Projection::Orthographic);
        let overlay = ViewOverlay {
            rotation_center: Vec3::new(0.0, 0.0, 5.0),
            camera_pos: Vec3::new(0.0, 0.0, -5.0),
            frustum_corners: [
                Vec3::new(-4.0, 3.0, 5.0),
                Vec3::new(4.0, 3.0, 5.0),
                Vec3::new(-4.0, -3.0, 5.0),
                Vec3::new(4.0, -3.0, 5.0),
            ],
        };
        let mut canvas = RecordingCanvas::default();
        draw_view_overlay(&view, &overlay, &mut canvas);
        assert_eq!(canvas.rects.len(), 2);
        assert_eq!(canvas.polygons.len(), 1);
        assert_eq!(canvas.polygons[0].len(), 4);
    }

    #[test]
    fn test_overlay_skips_markers_behind_perspective_camera() {
        let mut view = crate::Viewport::new(Rect::new(0.0, 0.0, 800.0, 600.0)).unwrap();
        view.camera_mut().set_coords(CoordinateSystem::new(
            Vec3::ZERO,
            Vec3::Z,
            Vec3::Y,
        ));
        let overlay = ViewOverlay {
            rotation_center: Vec3::new(0.0, 0.0, -5.0),
            camera_pos: Vec3::new(0.0, 0.0, 5.0),
            frustum_corners: [Vec3::new(0.0, 0.0, -5.0); 4],
        };
        let mut canvas = RecordingCanvas::default();
        draw_view_overlay(&view, &overlay, &mut canvas);
        // Only the in-front marker survives; the quad is dropped entirely
        assert_eq!(canvas.rects.len(), 1);
        assert!(canvas.polygons.is_empty());
    }
}

/// Canvas that records calls instead of drawing, for tests
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingCanvas {
    pub lines: Vec<(Vec2, Vec2, Color)>,
    pub polygons: Vec<Vec<Vec2>>,
    pub fills: Vec<Vec<Vec2>>,
    pub rects: Vec<Rect>,
    pub blits: Vec<(HandleIcon, Vec2)>,
}

#[cfg(test)]
impl Canvas for RecordingCanvas {
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.lines.push((from, to, color));
    }

    fn draw_polygon(&mut self, points: &[Vec2], _color: Color) {
        self.polygons.push(points.to_vec());
    }

    fn fill_polygon(&mut self, points: &[Vec2], _color: Color) {
        self.fills.push(points.to_vec());
    }

    fn draw_rect(&mut self, rect: Rect, _color: Color) {
        self.rects.push(rect);
    }

    fn blit(&mut self, icon: HandleIcon, pos: Vec2) {
        self.blits.push((icon, pos));
    }
}
