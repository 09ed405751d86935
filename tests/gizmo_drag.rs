//! End-to-end gizmo drag scenarios: press a handle, drag, inspect the
//! emitted transform.

use glam::{Mat4, Vec2, Vec3};
use viewport_gizmo::{
    Axis, BoundingBox, Compound3DManipulator, CoordinateSystem, HandleType, Modifiers,
    PointerEvent, Projection, Rect, Viewport,
};

/// Orthographic camera at (0, 0, 10) looking down -Z, scale 1.0, so screen
/// pixels map 1:1 onto world units
fn ortho_viewport() -> Viewport {
    let mut view = Viewport::new(Rect::new(0.0, 0.0, 800.0, 600.0)).unwrap();
    view.camera_mut().set_projection(Projection::Orthographic);
    view.set_scale(1.0).unwrap();
    view.camera_mut().set_coords(CoordinateSystem::new(
        Vec3::new(0.0, 0.0, 10.0),
        Vec3::new(0.0, 0.0, -1.0),
        Vec3::Y,
    ));
    view
}

/// Unit selection box around the world origin, in view space
fn origin_bounds() -> BoundingBox {
    BoundingBox::new(Vec3::new(-0.5, -0.5, 9.5), Vec3::new(0.5, 0.5, 10.5))
}

/// Screen location of the X move handle for this setup: 80 px of axis plus
/// one 12 px handle to the right of center
const X_MOVE_HANDLE: Vec2 = Vec2::new(492.0, 300.0);

#[test]
fn x_move_drag_emits_pure_x_translation() {
    let view = ortho_viewport();
    let mut manip = Compound3DManipulator::new();
    let bounds = origin_bounds();

    let pressed = manip
        .mouse_pressed(
            &PointerEvent::new(X_MOVE_HANDLE, Modifiers::empty()),
            &view,
            Some(&bounds),
        )
        .expect("press must land on the X move handle");
    assert_eq!(pressed.kind, HandleType::Move);
    assert_eq!(pressed.axis, Axis::X);

    let dragged = manip
        .mouse_dragged(
            &PointerEvent::new(X_MOVE_HANDLE + Vec2::new(50.0, 0.0), Modifiers::empty()),
            &view,
        )
        .unwrap();
    let t = dragged.transform.w_axis;
    assert!((t.x - 50.0).abs() < 1e-2);
    assert!(t.y.abs() < 1e-3);
    assert!(t.z.abs() < 1e-3);
    // Translation only: the rotation part stays identity
    assert!((dragged.transform.x_axis.x - 1.0).abs() < 1e-5);
    assert!(dragged.transform.x_axis.y.abs() < 1e-5);

    assert!(
        manip
            .mouse_released(
                &PointerEvent::new(X_MOVE_HANDLE + Vec2::new(50.0, 0.0), Modifiers::empty()),
                &view,
            )
            .is_some()
    );
}

#[test]
fn shifted_x_move_snaps_to_grid_multiples() {
    let mut view = ortho_viewport();
    view.set_grid_spacing(0.5);
    view.set_snap_subdivisions(1.0);
    let mut manip = Compound3DManipulator::new();
    let bounds = origin_bounds();

    manip
        .mouse_pressed(
            &PointerEvent::new(X_MOVE_HANDLE, Modifiers::empty()),
            &view,
            Some(&bounds),
        )
        .unwrap();
    let dragged = manip
        .mouse_dragged(
            &PointerEvent::new(X_MOVE_HANDLE + Vec2::new(50.3, 0.0), Modifiers::SHIFT),
            &view,
        )
        .unwrap();
    let x = dragged.transform.w_axis.x;
    let remainder = (x / 0.5 - (x / 0.5).round()).abs();
    assert!(remainder < 1e-4, "x = {x} is not a multiple of 0.5");
    assert!((x - 50.5).abs() < 1e-3);
}

#[test]
fn grid_snap_is_idempotent_across_distances() {
    let mut view = ortho_viewport();
    view.set_grid_spacing(0.7);
    view.set_snap_subdivisions(1.0);
    let bounds = origin_bounds();

    for d in [0.2f32, 1.3, 7.77, 36.0] {
        let mut manip = Compound3DManipulator::new();
        manip
            .mouse_pressed(
                &PointerEvent::new(X_MOVE_HANDLE, Modifiers::empty()),
                &view,
                Some(&bounds),
            )
            .unwrap();
        let ev = PointerEvent::new(X_MOVE_HANDLE + Vec2::new(d, 0.0), Modifiers::SHIFT);
        let snapped = manip.mouse_dragged(&ev, &view).unwrap().transform.w_axis.x;
        // Multiple of the grid step
        assert!(((snapped / 0.7) - (snapped / 0.7).round()).abs() < 1e-3);
        // Snapping a snapped value changes nothing
        assert!((0.7 * (snapped / 0.7).round() - snapped).abs() < 1e-4);
        // Within half a step of the raw distance
        assert!((snapped - d).abs() <= 0.35 + 1e-4);
    }
}

/// A point on the Z rotation ring, 45° around from the +X axis
fn z_ring_point() -> Vec2 {
    let r = 80.0 * std::f32::consts::FRAC_1_SQRT_2;
    Vec2::new(400.0 + r, 300.0 - r)
}

#[test]
fn z_ring_drag_emits_pure_z_rotation() {
    let view = ortho_viewport();
    let mut manip = Compound3DManipulator::new();
    // Selection center is at the world origin, so rotation about the center
    // and about the origin coincide; make the origin pivot explicit anyway
    manip.set_rotate_around_selection_center(false);
    let bounds = origin_bounds();

    let pressed = manip
        .mouse_pressed(
            &PointerEvent::new(z_ring_point(), Modifiers::empty()),
            &view,
            Some(&bounds),
        )
        .expect("press must land on the Z rotation ring");
    assert_eq!(pressed.kind, HandleType::Rotate);
    assert_eq!(pressed.axis, Axis::Z);

    let dragged = manip
        .mouse_dragged(
            &PointerEvent::new(z_ring_point() + Vec2::new(-10.0, -10.0), Modifiers::empty()),
            &view,
        )
        .unwrap();
    let angle = dragged.angle.expect("rotate drags carry the angle");
    assert!(angle.abs() > 1e-3);

    // The transform is exactly the axis rotation about world Z
    let expected = Mat4::from_axis_angle(Vec3::Z, angle);
    let diff = dragged.transform - expected;
    for col in [diff.x_axis, diff.y_axis, diff.z_axis, diff.w_axis] {
        assert!(col.length() < 1e-4);
    }
    // No translation component
    assert!(dragged.transform.w_axis.truncate().length() < 1e-5);
}

#[test]
fn shifted_rotation_snaps_to_five_degree_steps() {
    let view = ortho_viewport();
    let mut manip = Compound3DManipulator::new();
    let bounds = origin_bounds();
    manip
        .mouse_pressed(
            &PointerEvent::new(z_ring_point(), Modifiers::empty()),
            &view,
            Some(&bounds),
        )
        .unwrap();

    let drag_to = z_ring_point() + Vec2::new(-13.0, -13.0);
    let raw = manip
        .mouse_dragged(&PointerEvent::new(drag_to, Modifiers::empty()), &view)
        .unwrap()
        .angle
        .unwrap();
    let snapped = manip
        .mouse_dragged(&PointerEvent::new(drag_to, Modifiers::SHIFT), &view)
        .unwrap()
        .angle
        .unwrap();

    let step = 5.0f32.to_radians();
    assert!(((snapped / step) - (snapped / step).round()).abs() < 1e-3);
    // The snapped angle stays within half a step of the raw angle
    assert!((snapped - raw).abs() <= step / 2.0 + 1e-5);
}

#[test]
fn projection_round_trip_matches_original_point() {
    for projection in [Projection::Orthographic, Projection::Perspective] {
        let mut view = ortho_viewport();
        view.camera_mut().set_projection(projection);
        let camera = view.camera();
        for p in [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.5, -2.0, 3.0),
            Vec3::new(-4.0, 0.25, -6.0),
        ] {
            let d = camera.view_z(p);
            assert!(d > 0.0, "test points must lie in front of the camera");
            let s = camera.world_to_screen(p);
            let q = camera.screen_to_world(s, d);
            assert!(
                (q - p).length() < 1e-3,
                "round trip drifted for {p:?} under {projection:?}: {q:?}"
            );
        }
    }
}
