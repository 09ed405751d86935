//! View navigation controller
//!
//! Turns pointer drags into camera motion: pan/zoom around the model in the
//! model-space modes, fly movement in the travel-space modes, with landscape
//! variants locking vertical motion to world up. Each gesture measures from
//! a session snapshot taken at press time — including the CONTROL state, so
//! changing modifiers mid-drag cannot reinterpret the gesture.
//!
//! Releasing with a bound scene camera commits the final frame to that
//! object, carries every descendant along with the same rigid transform, and
//! reports the before/after pairs for undo.

use glam::{Mat4, Vec2, Vec3};

use crate::camera::{ViewOverlay, Viewport};
use crate::coords::CoordinateSystem;
use crate::gizmo_debug;
use crate::scene::{CoordsChange, Scene, UndoRecord};
use crate::style::Tuning;
use crate::types::PointerEvent;

/// Camera state snapshotted at press time
#[derive(Debug, Clone)]
struct ViewerSession {
    control_down: bool,
    click_point: Vec2,
    /// The click unprojected onto the view plane, anchoring pan drags
    click_pos: Vec3,
    old_coords: CoordinateSystem,
    old_cam_pos: Vec3,
    old_scale: f32,
    old_dist: f32,
}

/// Result of one navigation pointer move
#[derive(Debug, Clone, PartialEq)]
pub struct NavUpdate {
    /// Markers for sibling viewports; install with
    /// [`Viewport::set_overlay`] and clear them again on release
    pub overlay: ViewOverlay,
    /// Whether every view showing the scene needs a redraw (the dragged
    /// view is bound to a scene camera), or just the dragged one
    pub redraw_all: bool,
}

/// Result of releasing a navigation drag
#[derive(Debug, Clone, PartialEq)]
pub struct NavRelease {
    /// Before/after pairs for the bound camera and its descendants; `None`
    /// when the viewport is not bound to a scene camera
    pub undo: Option<UndoRecord>,
}

/// State machine moving the viewpoint of one viewport
#[derive(Debug, Clone, Default)]
pub struct MoveViewController {
    tuning: Tuning,
    session: Option<ViewerSession>,
}

impl MoveViewController {
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    pub fn with_tuning(tuning: Tuning) -> Self {
        Self {
            tuning,
            session: None,
        }
    }

    /// True while a camera drag owns the viewport
    pub fn dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Feed a pointer press: snapshot the camera state and re-anchor the
    /// rotation center on the view plane
    pub fn mouse_pressed(&mut self, ev: &PointerEvent, viewport: &mut Viewport) {
        let camera = viewport.camera();
        let coords = *camera.coords();
        let old_dist = viewport.dist_to_plane();
        let session = ViewerSession {
            control_down: ev.control(),
            click_point: ev.pos,
            click_pos: camera.screen_to_world(ev.pos, old_dist),
            old_coords: coords,
            old_cam_pos: coords.origin(),
            old_scale: viewport.scale(),
            old_dist,
        };
        viewport.set_rotation_center(coords.origin() + coords.zdir() * old_dist);
        viewport.set_moving(true);
        gizmo_debug!(
            "camera drag started at {:?} (control = {})",
            ev.pos,
            session.control_down
        );
        self.session = Some(session);
    }

    /// Feed a pointer move. Mutates the viewport's camera per the navigation
    /// mode and returns the overlay for sibling views; a move without a
    /// prior press is a no-op.
    pub fn mouse_dragged(&mut self, ev: &PointerEvent, viewport: &mut Viewport) -> Option<NavUpdate> {
        let session = self.session.as_ref()?;
        if viewport.navigation_mode().is_travel() {
            drag_move_travel(session, &self.tuning, ev, viewport);
        } else {
            drag_move_model(session, &self.tuning, ev, viewport);
        }
        Some(NavUpdate {
            overlay: make_overlay(viewport),
            redraw_all: viewport.bound_camera().is_some(),
        })
    }

    /// Feed a pointer release: commit the gesture.
    ///
    /// With a bound scene camera the final frame is copied onto the object,
    /// the same rigid transform is propagated to all of its descendants, and
    /// the before/after pairs are returned for undo recording. Callers
    /// should redraw every view and clear sibling overlays.
    pub fn mouse_released(
        &mut self,
        viewport: &mut Viewport,
        scene: &mut Scene,
    ) -> Option<NavRelease> {
        let session = self.session.take()?;
        viewport.set_moving(false);
        viewport.clear_overlay();

        let mut undo = None;
        if let Some(bound) = viewport.bound_camera() {
            if let Some(object) = scene.object_mut(bound.object) {
                object.set_coords(*viewport.camera().coords());
                let mut record = UndoRecord::new();
                record.push(CoordsChange {
                    path: vec![bound.object],
                    before: session.old_coords,
                    after: *object.coords(),
                });
                // Children follow the camera: the transform mapping the old
                // frame onto the new one
                let transform = object.coords().from_local() * session.old_coords.to_local();
                object.transform_children(&transform, &mut vec![bound.object], &mut record);
                undo = Some(record);
            }
        }
        gizmo_debug!(
            "camera drag released, undo entries: {}",
            undo.as_ref().map_or(0, |u| u.changes().len())
        );
        Some(NavRelease { undo })
    }
}

/// SHIFT constrains panning to the dominant direction of the drag
fn axis_lock(ev: &PointerEvent, dx: f32, dy: f32) -> (f32, f32) {
    if ev.shift() {
        if dx.abs() > dy.abs() {
            (dx, 0.0)
        } else {
            (0.0, dy)
        }
    } else {
        (dx, dy)
    }
}

fn drag_move_model(
    session: &ViewerSession,
    tuning: &Tuning,
    ev: &PointerEvent,
    viewport: &mut Viewport,
) {
    let dx = ev.pos.x - session.click_point.x;
    let dy = ev.pos.y - session.click_point.y;

    if session.control_down {
        // Zoom. Perspective moves the camera against the fixed rotation
        // center; the view scale always follows for the orthographic image.
        if viewport.is_perspective() {
            let mut coords = *viewport.camera().coords();
            let new_dist = session.old_dist * (1.0 / tuning.zoom_base).powf(dy);
            coords.set_origin(viewport.rotation_center() - coords.zdir() * new_dist);
            viewport.camera_mut().set_coords(coords);
            viewport.set_dist_to_plane(new_dist);
        }
        let new_scale = session.old_scale * tuning.zoom_base.powf(dy);
        viewport.set_scale(new_scale).ok();
    } else {
        let (dx, dy) = axis_lock(ev, dx, dy);
        let mut mv = viewport.camera().find_drag_vector(session.click_pos, dx, dy);
        if viewport.is_perspective() {
            mv *= session.old_dist / viewport.dist_to_plane();
        }
        let mut coords = session.old_coords;
        coords.transform_origin(&Mat4::from_translation(-mv));
        viewport.camera_mut().set_coords(coords);
        viewport
            .set_rotation_center(coords.origin() + coords.zdir() * session.old_dist);
    }
}

/// Travel modes assume a perspective view
fn drag_move_travel(
    session: &ViewerSession,
    tuning: &Tuning,
    ev: &PointerEvent,
    viewport: &mut Viewport,
) {
    let landscape = viewport.navigation_mode().is_landscape();
    let dist_to_screen = viewport.camera().dist_to_screen();
    let dx = ev.pos.x - session.click_point.x;
    let dy = ev.pos.y - session.click_point.y;

    if session.control_down {
        // Forward/back along the view direction, or its horizontal
        // projection in the landscape variant
        let zdir = session.old_coords.zdir();
        let hdir = if landscape {
            Vec3::new(zdir.x, 0.0, zdir.z).normalize_or_zero()
        } else {
            zdir
        };
        let new_pos = session.old_cam_pos
            + hdir * (-dy * tuning.travel_forward_factor * session.old_dist / dist_to_screen);
        let mut coords = session.old_coords;
        coords.set_origin(new_pos);
        viewport.camera_mut().set_coords(coords);
        viewport.set_rotation_center(new_pos + coords.zdir() * session.old_dist);
    } else {
        let (dx, dy) = axis_lock(ev, dx, dy);
        let vdir = if landscape {
            Vec3::Y
        } else {
            session.old_coords.updir()
        };
        let mut coords = session.old_coords;

        // Horizontal strafe keeps the camera on its current ground plane
        let hmove = viewport.camera().find_drag_vector(session.click_pos, dx, 0.0);
        coords.transform_origin(&Mat4::from_translation(Vec3::new(-hmove.x, 0.0, -hmove.z)));

        let new_pos = coords.origin()
            + vdir * (dy * tuning.travel_vertical_factor * viewport.dist_to_plane() / dist_to_screen);
        coords.set_origin(new_pos);
        viewport.camera_mut().set_coords(coords);
        viewport.set_rotation_center(new_pos + coords.zdir() * viewport.dist_to_plane());
    }
}

/// Markers sibling viewports draw while this view's camera moves
fn make_overlay(viewport: &Viewport) -> ViewOverlay {
    let camera = viewport.camera();
    let coords = camera.coords();
    let b = camera.bounds();
    let dist = viewport.dist_to_plane();
    ViewOverlay {
        rotation_center: viewport.rotation_center(),
        // Nudged along the view direction so the marker never coincides
        // with the frustum apex
        camera_pos: coords.origin() + coords.zdir() * 1e-4,
        frustum_corners: [
            camera.screen_to_world(Vec2::new(b.x, b.y), dist),
            camera.screen_to_world(Vec2::new(b.right(), b.y), dist),
            camera.screen_to_world(Vec2::new(b.x, b.bottom()), dist),
            camera.screen_to_world(Vec2::new(b.right(), b.bottom()), dist),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Projection;
    use crate::scene::SceneObject;
    use crate::types::{Modifiers, NavigationMode, Rect};
    use approx::assert_relative_eq;

    fn viewport(projection: Projection) -> Viewport {
        let mut view = Viewport::new(Rect::new(0.0, 0.0, 800.0, 600.0)).unwrap();
        view.camera_mut().set_projection(projection);
        view.camera_mut().set_coords(CoordinateSystem::new(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::Y,
        ));
        view.set_dist_to_plane(10.0);
        view
    }

    fn press(nav: &mut MoveViewController, view: &mut Viewport, control: bool) {
        let mods = if control {
            Modifiers::CONTROL
        } else {
            Modifiers::empty()
        };
        nav.mouse_pressed(
            &PointerEvent::new(Vec2::new(400.0, 300.0), mods),
            view,
        );
    }

    #[test]
    fn test_drag_without_press_is_noop() {
        let mut view = viewport(Projection::Perspective);
        let mut nav = MoveViewController::new();
        assert!(
            nav.mouse_dragged(&PointerEvent::at(420.0, 300.0), &mut view)
                .is_none()
        );
        assert!(
            nav.mouse_released(&mut view, &mut Scene::new()).is_none()
        );
    }

    #[test]
    fn test_model_zoom_shrinks_distance() {
        let mut view = viewport(Projection::Perspective);
        let mut nav = MoveViewController::new();
        press(&mut nav, &mut view, true);
        assert!(view.moving());
        // Rotation center re-anchored on the view plane
        assert_relative_eq!(view.rotation_center().z, 0.0, epsilon = 1e-4);

        let ev = PointerEvent::new(Vec2::new(400.0, 400.0), Modifiers::CONTROL);
        nav.mouse_dragged(&ev, &mut view).unwrap();
        let expected = 10.0 * (1.0f32 / 1.01).powf(100.0);
        assert!(view.dist_to_plane() < 10.0);
        assert_relative_eq!(view.dist_to_plane(), expected, epsilon = 1e-3);
        // Camera closes in on the fixed rotation center
        assert_relative_eq!(
            view.camera().coords().origin().z,
            expected,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_model_zoom_scales_orthographic_view() {
        let mut view = viewport(Projection::Orthographic);
        let mut nav = MoveViewController::new();
        press(&mut nav, &mut view, true);
        let ev = PointerEvent::new(Vec2::new(400.0, 400.0), Modifiers::CONTROL);
        nav.mouse_dragged(&ev, &mut view).unwrap();
        assert_relative_eq!(
            view.scale(),
            100.0 * 1.01f32.powf(100.0),
            epsilon = 1e-2
        );
        // Orthographic zoom leaves the camera itself in place
        assert_relative_eq!(view.camera().coords().origin().z, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_model_pan_translates_against_drag() {
        let mut view = viewport(Projection::Orthographic);
        let mut nav = MoveViewController::new();
        press(&mut nav, &mut view, false);
        nav.mouse_dragged(&PointerEvent::at(430.0, 300.0), &mut view)
            .unwrap();
        // 30 px right at 100 px/unit moves the camera 0.3 left
        assert_relative_eq!(view.camera().coords().origin().x, -0.3, epsilon = 1e-4);
        assert_relative_eq!(view.camera().coords().origin().y, 0.0, epsilon = 1e-4);
        // Rotation center follows the camera on the view plane
        assert_relative_eq!(view.rotation_center().x, -0.3, epsilon = 1e-4);
    }

    #[test]
    fn test_model_pan_shift_locks_dominant_axis() {
        let mut view = viewport(Projection::Orthographic);
        let mut nav = MoveViewController::new();
        press(&mut nav, &mut view, false);
        let ev = PointerEvent::new(Vec2::new(430.0, 310.0), Modifiers::SHIFT);
        nav.mouse_dragged(&ev, &mut view).unwrap();
        // |dx| > |dy|: the vertical component is discarded
        assert_relative_eq!(view.camera().coords().origin().y, 0.0, epsilon = 1e-5);
        assert!(view.camera().coords().origin().x < 0.0);
    }

    #[test]
    fn test_travel_forward_moves_backward_for_positive_dy() {
        let mut view = viewport(Projection::Perspective);
        view.set_navigation_mode(NavigationMode::TravelSpace);
        let mut nav = MoveViewController::new();
        press(&mut nav, &mut view, true);
        let ev = PointerEvent::new(Vec2::new(400.0, 350.0), Modifiers::CONTROL);
        nav.mouse_dragged(&ev, &mut view).unwrap();
        // dy = +50 moves the camera along zdir by -50 * 0.04 * 10 / 20 = -1
        // world unit, i.e. backward: world z grows from 10 to 11
        assert_relative_eq!(view.camera().coords().origin().z, 11.0, epsilon = 1e-4);
        assert!(view.camera().coords().origin().z > 10.0);
    }

    #[test]
    fn test_travel_landscape_vertical_uses_world_up() {
        let mut view = viewport(Projection::Perspective);
        // Tilt the camera so its up direction differs from world up
        view.camera_mut().set_coords(CoordinateSystem::new(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 1.0, 0.0).normalize(),
        ));
        view.set_navigation_mode(NavigationMode::TravelLandscape);
        let mut nav = MoveViewController::new();
        press(&mut nav, &mut view, false);
        nav.mouse_dragged(&PointerEvent::at(400.0, 350.0), &mut view)
            .unwrap();
        let origin = view.camera().coords().origin();
        // Vertical motion goes along world Y only
        assert_relative_eq!(origin.x, 0.0, epsilon = 1e-4);
        assert!(origin.y > 0.0);
    }

    #[test]
    fn test_release_commits_bound_camera_and_children() {
        let mut view = viewport(Projection::Perspective);
        let mut scene = Scene::new();
        let mut camera_obj = SceneObject::new(*view.camera().coords());
        let child = camera_obj.add_child(SceneObject::new(CoordinateSystem::new(
            Vec3::new(1.0, 0.0, 10.0),
            Vec3::Z,
            Vec3::Y,
        )));
        camera_obj
            .child_mut(child)
            .unwrap()
            .add_child(SceneObject::new(CoordinateSystem::default()));
        let index = scene.add_object(camera_obj);
        view.bind_camera(index, Some(45.0));

        let mut nav = MoveViewController::new();
        press(&mut nav, &mut view, false);
        nav.mouse_dragged(&PointerEvent::at(460.0, 300.0), &mut view)
            .unwrap();
        let release = nav.mouse_released(&mut view, &mut scene).unwrap();
        let undo = release.undo.expect("bound camera produces undo data");
        // Camera itself plus two descendants
        assert_eq!(undo.changes().len(), 3);
        assert_eq!(undo.changes()[0].path, vec![index]);

        // The committed object frame matches the viewport camera
        let committed = scene.object(index).unwrap().coords();
        assert_relative_eq!(
            (committed.origin() - view.camera().coords().origin()).length(),
            0.0,
            epsilon = 1e-5
        );
        // Children moved rigidly with the camera: same relative offset
        let child_after = undo.changes()[1].after;
        let rel = child_after.origin() - committed.origin();
        let rel_before = undo.changes()[1].before.origin() - undo.changes()[0].before.origin();
        assert_relative_eq!(rel.length(), rel_before.length(), epsilon = 1e-4);
        assert!(!view.moving());
    }

    #[test]
    fn test_release_without_bound_camera_has_no_undo() {
        let mut view = viewport(Projection::Perspective);
        let mut nav = MoveViewController::new();
        press(&mut nav, &mut view, false);
        let release = nav.mouse_released(&mut view, &mut Scene::new()).unwrap();
        assert!(release.undo.is_none());
    }

    #[test]
    fn test_overlay_markers_track_the_dragged_view() {
        let mut view = viewport(Projection::Perspective);
        let mut nav = MoveViewController::new();
        press(&mut nav, &mut view, false);
        let update = nav
            .mouse_dragged(&PointerEvent::at(410.0, 300.0), &mut view)
            .unwrap();
        assert!(!update.redraw_all);
        assert_relative_eq!(
            (update.overlay.rotation_center - view.rotation_center()).length(),
            0.0,
            epsilon = 1e-5
        );
        // Frustum corners sit on the view plane
        for corner in update.overlay.frustum_corners {
            assert_relative_eq!(
                view.camera().view_z(corner),
                view.dist_to_plane(),
                epsilon = 1e-3
            );
        }
    }
}
