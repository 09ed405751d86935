//! Coordinate frames
//!
//! A [`CoordinateSystem`] is an origin plus an orthonormal basis given by its
//! view direction (`zdir`) and up direction (`updir`). Both the camera frame
//! and every scene object's placement are coordinate systems; navigation
//! commits camera frames onto scene objects wholesale (copy-coordinates
//! semantics, not incremental composition).

use glam::{Mat4, Vec3, Vec4};

/// An oriented frame in world space.
///
/// Invariant: `zdir` and `updir` are unit length and orthogonal. Callers
/// constructing frames by hand must supply orthogonal directions; all
/// mutation paths in this crate preserve the invariant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSystem {
    origin: Vec3,
    zdir: Vec3,
    updir: Vec3,
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            zdir: Vec3::Z,
            updir: Vec3::Y,
        }
    }
}

impl CoordinateSystem {
    pub fn new(origin: Vec3, zdir: Vec3, updir: Vec3) -> Self {
        Self {
            origin,
            zdir: zdir.normalize_or_zero(),
            updir: updir.normalize_or_zero(),
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// View/forward direction
    pub fn zdir(&self) -> Vec3 {
        self.zdir
    }

    /// Up direction
    pub fn updir(&self) -> Vec3 {
        self.updir
    }

    /// Right direction, completing the basis
    pub fn right(&self) -> Vec3 {
        self.zdir.cross(self.updir)
    }

    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    pub fn set_orientation(&mut self, zdir: Vec3, updir: Vec3) {
        self.zdir = zdir.normalize_or_zero();
        self.updir = updir.normalize_or_zero();
    }

    /// Matrix taking world coordinates into this frame's local coordinates
    pub fn to_local(&self) -> Mat4 {
        let r = self.right();
        let u = self.updir;
        let z = self.zdir;
        let o = self.origin;
        Mat4::from_cols(
            Vec4::new(r.x, u.x, z.x, 0.0),
            Vec4::new(r.y, u.y, z.y, 0.0),
            Vec4::new(r.z, u.z, z.z, 0.0),
            Vec4::new(-r.dot(o), -u.dot(o), -z.dot(o), 1.0),
        )
    }

    /// Matrix taking local coordinates of this frame into world coordinates
    pub fn from_local(&self) -> Mat4 {
        let r = self.right();
        Mat4::from_cols(
            r.extend(0.0),
            self.updir.extend(0.0),
            self.zdir.extend(0.0),
            self.origin.extend(1.0),
        )
    }

    /// Apply a rigid transform to the whole frame
    pub fn transform_coordinates(&mut self, m: &Mat4) {
        self.origin = m.transform_point3(self.origin);
        self.zdir = m.transform_vector3(self.zdir).normalize_or_zero();
        self.updir = m.transform_vector3(self.updir).normalize_or_zero();
    }

    /// Apply a transform to the origin only, leaving orientation unchanged
    pub fn transform_origin(&mut self, m: &Mat4) {
        self.origin = m.transform_point3(self.origin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_local_round_trip() {
        let coords = CoordinateSystem::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::Y,
        );
        let m = coords.from_local() * coords.to_local();
        let p = Vec3::new(-4.0, 5.0, 0.5);
        let q = m.transform_point3(p);
        assert_relative_eq!(q.x, p.x, epsilon = 1e-5);
        assert_relative_eq!(q.y, p.y, epsilon = 1e-5);
        assert_relative_eq!(q.z, p.z, epsilon = 1e-5);
    }

    #[test]
    fn test_to_local_maps_frame_to_identity() {
        let coords = CoordinateSystem::new(Vec3::new(5.0, 0.0, 0.0), Vec3::X, Vec3::Z);
        let local_origin = coords.to_local().transform_point3(coords.origin());
        assert_relative_eq!(local_origin.length(), 0.0, epsilon = 1e-6);

        // One unit along zdir lands at local (0, 0, 1)
        let p = coords.to_local().transform_point3(coords.origin() + coords.zdir());
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-6);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rigid_transform_preserves_orthonormality() {
        let mut coords = CoordinateSystem::default();
        let m = Mat4::from_axis_angle(Vec3::new(1.0, 1.0, 0.3).normalize(), 1.1)
            * Mat4::from_translation(Vec3::new(3.0, -2.0, 7.0));
        coords.transform_coordinates(&m);
        assert_relative_eq!(coords.zdir().length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(coords.updir().length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(coords.zdir().dot(coords.updir()), 0.0, epsilon = 1e-5);
    }
}
