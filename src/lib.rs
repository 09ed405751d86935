//! Interactive 3D viewport manipulation
//!
//! This crate is the manipulation layer of a 3D scene editor's viewport: it
//! projects a selection gizmo into a camera view, hit-tests pointer events
//! against it, and converts 2D drags back into 3D transforms — translation,
//! rotation, and non-uniform scale — consistent with the camera's projection
//! model. A separate controller navigates the camera itself (pan, zoom, and
//! fly movement).
//!
//! The crate owns no window, renderer, or scene: pointer events come in as
//! plain values, drawing goes out through the [`Canvas`] trait, and
//! committed transforms and undo pairs are returned for the caller to apply.
//! Everything runs synchronously on the caller's event thread.
//!
//! # Selection manipulation
//!
//! ```
//! use glam::Vec3;
//! use viewport_gizmo::{
//!     BoundingBox, Compound3DManipulator, PointerEvent, Rect, Viewport,
//! };
//!
//! let viewport = Viewport::new(Rect::new(0.0, 0.0, 800.0, 600.0))?;
//! let mut manipulator = Compound3DManipulator::new();
//! // Selection bounds in view space, from the scene model
//! let bounds = BoundingBox::new(Vec3::new(-1.0, -1.0, 19.0), Vec3::new(1.0, 1.0, 21.0));
//!
//! if let Some(pressed) = manipulator.mouse_pressed(
//!     &PointerEvent::at(400.0, 300.0),
//!     &viewport,
//!     Some(&bounds),
//! ) {
//!     // Each pointer move yields a transform measured from the press
//!     let dragged = manipulator
//!         .mouse_dragged(&PointerEvent::at(450.0, 300.0), &viewport)
//!         .unwrap();
//!     assert_eq!(dragged.kind, pressed.kind);
//!     let _apply_to_selection = dragged.transform;
//! }
//! # Ok::<(), viewport_gizmo::GizmoError>(())
//! ```
//!
//! # Camera navigation
//!
//! [`MoveViewController`] runs the same press/drag/release machine against
//! the camera frame instead of a selection. On release with a camera-bound
//! viewport it commits the frame to the scene object, carries the object's
//! children along, and returns before/after pairs for undo recording.

pub mod camera;
pub mod coords;
pub mod draw;
pub mod error;
pub mod handles;
pub mod manipulator;
pub mod navigation;
pub mod scene;
pub mod style;
pub mod types;

pub use camera::{
    BoundCamera, Camera, DEFAULT_DISTANCE_TO_SCREEN, Projection, ViewOverlay, Viewport,
};
pub use coords::CoordinateSystem;
pub use draw::{Canvas, Color, HandleIcon, draw_view_overlay};
pub use error::{GizmoError, GizmoResult};
pub use handles::{HandleLayout, RingGeometry};
pub use manipulator::{Compound3DManipulator, HandleDragged, HandlePressed, HandleReleased};
pub use navigation::{MoveViewController, NavRelease, NavUpdate};
pub use scene::{CoordsChange, Scene, SceneObject, UndoRecord};
pub use style::Tuning;
pub use types::{
    Axis, BoundingBox, HandleType, Modifiers, NavigationMode, PointerEvent, Rect, ViewMode,
};
