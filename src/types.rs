//! Core data types for viewport manipulation
//!
//! The axis and handle-kind tokens are closed enums: the active view mode
//! decides which triad of [`Axis`] values the on-screen handles stand for.

use bitflags::bitflags;
use glam::{Vec2, Vec3};

/// Semantic axis of a handle.
///
/// `X`/`Y`/`Z` are the world axes, `U`/`V`/`W` the screen-relative triad
/// derived from the camera frame, and `P`/`Q`/`N` an externally supplied
/// orthogonal triad (for example face-normal aligned). `Uv` names the
/// combined two-axis scale handle of the screen-relative mode and `All` the
/// center handle; neither has a direction of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    U,
    V,
    W,
    P,
    Q,
    N,
    Uv,
    All,
}

impl Axis {
    /// Lowercase name, matching the handle labels
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::U => "u",
            Axis::V => "v",
            Axis::W => "w",
            Axis::P => "p",
            Axis::Q => "q",
            Axis::N => "n",
            Axis::Uv => "uv",
            Axis::All => "all",
        }
    }
}

/// Kind of manipulation a handle performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleType {
    Move,
    Rotate,
    Scale,
}

/// Which axis triad the manipulator presents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    /// World X/Y/Z axes
    #[default]
    Xyz,
    /// Screen-relative U/V axes (the third axis is suppressed)
    Uv,
    /// Externally supplied P/Q/N axes
    Pqn,
}

/// How pointer drags navigate the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NavigationMode {
    /// Orbit/zoom/pan around the scene
    #[default]
    ModelSpace,
    /// Model-space with the vertical axis locked to world up
    ModelLandscape,
    /// First-person fly movement
    TravelSpace,
    /// Travel-space with the vertical axis locked to world up
    TravelLandscape,
}

impl NavigationMode {
    /// Landscape variants constrain vertical motion to world up
    pub fn is_landscape(self) -> bool {
        matches!(
            self,
            NavigationMode::ModelLandscape | NavigationMode::TravelLandscape
        )
    }

    pub fn is_travel(self) -> bool {
        matches!(
            self,
            NavigationMode::TravelSpace | NavigationMode::TravelLandscape
        )
    }
}

bitflags! {
    /// Modifier-key state sampled with each pointer event.
    ///
    /// SHIFT snaps and constrains, CONTROL selects the alternate mode of the
    /// current gesture (axis-length edit, camera-z move, zoom/forward).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
    }
}

/// Pointer press/move/release payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Position in viewport pixels, origin top-left, y down
    pub pos: Vec2,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(pos: Vec2, modifiers: Modifiers) -> Self {
        Self { pos, modifiers }
    }

    pub fn at(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            modifiers: Modifiers::empty(),
        }
    }

    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    pub fn control(&self) -> bool {
        self.modifiers.contains(Modifiers::CONTROL)
    }
}

/// Axis-aligned screen rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centered on a point
    pub fn centered(center: Vec2, size: f32) -> Self {
        Self {
            x: center.x - size / 2.0,
            y: center.y - size / 2.0,
            width: size,
            height: size,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Grow (or shrink, with a negative margin) on all four sides
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }
}

/// Axis-aligned 3D bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }

    /// The eight corner points
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Smallest box containing both
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}
