#![warn(missing_docs)]

//! Math types for botkit assemblies.
//!
//! Thin wrappers around nalgebra providing the rigid transforms used to
//! place parts: points, vectors, rotations, composed transforms, and
//! tolerance constants. There is no scale anywhere in an assembly, so a
//! [`Transform`] is always a translation plus a rotation.
//!
//! Rotations cross the API boundary as [`EulerXyz`] (three axis angles in
//! radians, applied intrinsically X, then Y, then Z) and are held as unit
//! quaternions everywhere else. Euler angles are never composed directly.

use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};

/// A point in 3D space (meters).
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space (meters).
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A 3D rotation.
pub type Rotation = UnitQuaternion<f64>;

/// Below this value of `cos(y)` the X and Z axes are aligned and only their
/// sum is recoverable.
const GIMBAL_COS_LIMIT: f64 = 1e-12;

/// Rotation as three axis angles in radians.
///
/// The angles are applied intrinsically in X-Y-Z order, so the equivalent
/// matrix is `Rx(x) * Ry(y) * Rz(z)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerXyz {
    /// Angle about the X axis (radians).
    pub x: f64,
    /// Angle about the Y axis (radians).
    pub y: f64,
    /// Angle about the Z axis (radians).
    pub z: f64,
}

impl EulerXyz {
    /// Create a new set of angles (radians).
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a new set of angles from degrees.
    pub fn from_degrees(x: f64, y: f64, z: f64) -> Self {
        Self::new(x.to_radians(), y.to_radians(), z.to_radians())
    }

    /// Convert to a quaternion.
    pub fn to_rotation(&self) -> Rotation {
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), self.x)
            * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.y)
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.z)
    }

    /// Decompose a quaternion into X-Y-Z intrinsic angles.
    ///
    /// At gimbal lock (`y = ±90°`) the Z angle is reported as zero and the
    /// whole remaining rotation is attributed to X.
    pub fn from_rotation(rotation: &Rotation) -> Self {
        let m = rotation.to_rotation_matrix().into_inner();
        // cos(y) from the first row keeps y accurate right up to the lock.
        let cy = m[(0, 0)].hypot(m[(0, 1)]);
        let y = m[(0, 2)].atan2(cy);
        if cy > GIMBAL_COS_LIMIT {
            Self {
                x: (-m[(1, 2)]).atan2(m[(2, 2)]),
                y,
                z: (-m[(0, 1)]).atan2(m[(0, 0)]),
            }
        } else {
            Self {
                x: m[(2, 1)].atan2(m[(1, 1)]),
                y,
                z: 0.0,
            }
        }
    }
}

/// Principal axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    /// Unit direction of this axis.
    pub fn dir(self) -> Dir3 {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }
}

/// A rigid transform (rotation followed by translation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// The underlying isometry.
    pub isometry: Isometry3<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            isometry: Isometry3::identity(),
        }
    }

    /// Build from a translation vector and a rotation.
    pub fn from_parts(translation: Vec3, rotation: Rotation) -> Self {
        Self {
            isometry: Isometry3::from_parts(Translation3::from(translation), rotation),
        }
    }

    /// Build from a position and X-Y-Z intrinsic angles.
    pub fn from_euler(position: Vec3, angles: EulerXyz) -> Self {
        Self::from_parts(position, angles.to_rotation())
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self::from_parts(Vec3::new(dx, dy, dz), Rotation::identity())
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        Self::rotation_about_axis(&Vector3::x_axis(), angle)
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        Self::rotation_about_axis(&Vector3::y_axis(), angle)
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        Self::rotation_about_axis(&Vector3::z_axis(), angle)
    }

    /// Rotation about an arbitrary axis through the origin by `angle` radians.
    pub fn rotation_about_axis(axis: &Dir3, angle: f64) -> Self {
        Self::from_parts(Vec3::zeros(), UnitQuaternion::from_axis_angle(axis, angle))
    }

    /// Translation component.
    pub fn position(&self) -> Vec3 {
        self.isometry.translation.vector
    }

    /// Rotation component.
    pub fn rotation(&self) -> Rotation {
        self.isometry.rotation
    }

    /// Rotation component as X-Y-Z intrinsic angles.
    pub fn euler(&self) -> EulerXyz {
        EulerXyz::from_rotation(&self.isometry.rotation)
    }

    /// Decompose into `(position, angles)`.
    pub fn to_euler(&self) -> (Vec3, EulerXyz) {
        (self.position(), self.euler())
    }

    /// Compose: `self` then `other` (`self * other`).
    ///
    /// With `self` a parent's world transform and `other` a child's local
    /// transform, the result is the child's world transform.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            isometry: self.isometry * other.isometry,
        }
    }

    /// Inverse of this transform. Always defined for rigid transforms.
    pub fn inverse(&self) -> Self {
        Self {
            isometry: self.isometry.inverse(),
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        self.isometry.transform_point(p)
    }

    /// Transform a direction vector (rotation only, no translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        self.isometry.transform_vector(v)
    }

    /// Compare two transforms within tolerance.
    pub fn approx_eq(&self, other: &Transform, tol: &Tolerance) -> bool {
        tol.vectors_equal(&self.position(), &other.position())
            && tol.rotations_equal(&self.rotation(), &other.rotation())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Angle in radians of the rotation taking `a` to `b`.
///
/// Computed with `atan2` on the relative quaternion, which stays accurate for
/// tiny angles where `acos` of the scalar part does not.
pub fn angle_between(a: &Rotation, b: &Rotation) -> f64 {
    let delta = a.inverse() * b;
    2.0 * delta.imag().norm().atan2(delta.scalar().abs())
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in meters.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default tolerances (1e-9 m linear, 1e-9 rad angular).
    pub const DEFAULT: Self = Self {
        linear: 1e-9,
        angular: 1e-9,
    };

    /// Tolerance for transforms that went through a chain of compositions
    /// and inversions (1e-6 m, 1e-6 rad).
    pub const ROUND_TRIP: Self = Self {
        linear: 1e-6,
        angular: 1e-6,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if two vectors are equal within tolerance.
    pub fn vectors_equal(&self, a: &Vec3, b: &Vec3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if two rotations are equal within tolerance.
    pub fn rotations_equal(&self, a: &Rotation, b: &Rotation) -> bool {
        angle_between(a, b) < self.angular
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        let result = t.apply_point(&p);
        assert!((result - p).norm() < 1e-12);
    }

    #[test]
    fn test_translation() {
        let t = Transform::translation(10.0, 20.0, 30.0);
        let p = Point3::new(1.0, 2.0, 3.0);
        let result = t.apply_point(&p);
        assert!((result.x - 11.0).abs() < 1e-12);
        assert!((result.y - 22.0).abs() < 1e-12);
        assert!((result.z - 33.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_z_90() {
        let t = Transform::rotation_z(FRAC_PI_2);
        let p = Point3::new(1.0, 0.0, 0.0);
        let result = t.apply_point(&p);
        assert!(result.x.abs() < 1e-12);
        assert!((result.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_euler_order_is_intrinsic_xyz() {
        // Rx(90) * Rz(90): z acts first on the vector, so +X -> +Y -> +Z.
        let r = EulerXyz::new(FRAC_PI_2, 0.0, FRAC_PI_2).to_rotation();
        let v = r * Vec3::x();
        assert_relative_eq!(v, Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_euler_roundtrip() {
        let samples = [-2.0 * PI, -2.5, -1.0, -0.3, 0.0, 0.4, 1.2, 2.9, 2.0 * PI];
        for &x in &samples {
            for &y in &[-1.4, -0.7, 0.0, 0.5, 1.3] {
                for &z in &samples {
                    let q = EulerXyz::new(x, y, z).to_rotation();
                    let back = EulerXyz::from_rotation(&q).to_rotation();
                    assert!(angle_between(&q, &back) < 1e-9, "x={x} y={y} z={z}");
                }
            }
        }
    }

    #[test]
    fn test_euler_roundtrip_near_gimbal_lock() {
        for &delta in &[1e-3, 4e-4, 1e-4, 1e-5] {
            for &sign in &[1.0, -1.0] {
                let angles = EulerXyz::new(0.3, sign * (FRAC_PI_2 - delta), 1.0);
                let back = EulerXyz::from_rotation(&angles.to_rotation());
                assert_relative_eq!(back.x, angles.x, epsilon = 1e-8);
                assert_relative_eq!(back.y, angles.y, epsilon = 1e-8);
                assert_relative_eq!(back.z, angles.z, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_euler_gimbal_lock() {
        let q = EulerXyz::new(0.3, FRAC_PI_2, 0.2).to_rotation();
        let e = EulerXyz::from_rotation(&q);
        assert_eq!(e.z, 0.0);
        assert_relative_eq!(e.y, FRAC_PI_2, epsilon = 1e-6);
        assert!(angle_between(&q, &e.to_rotation()) < 1e-6);
    }

    #[test]
    fn test_compose_parent_then_local() {
        let parent = Transform::from_euler(Vec3::new(1.0, 0.0, 0.0), EulerXyz::new(0.0, 0.0, FRAC_PI_2));
        let local = Transform::translation(1.0, 0.0, 0.0);
        let world = parent.then(&local);
        // The child's +X offset is rotated into the parent's +Y.
        assert_relative_eq!(world.position(), Vec3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_inverse() {
        let t = Transform::from_euler(Vec3::new(1.0, 2.0, 3.0), EulerXyz::new(0.4, -1.1, 2.2));
        let composed = t.then(&t.inverse());
        let p = Point3::new(5.0, 6.0, 7.0);
        let result = composed.apply_point(&p);
        assert!((result - p).norm() < 1e-12);
        assert!(composed.approx_eq(&Transform::identity(), &Tolerance::DEFAULT));
    }

    #[test]
    fn test_apply_vec_ignores_translation() {
        let t = Transform::from_euler(Vec3::new(9.0, 9.0, 9.0), EulerXyz::new(0.0, 0.0, PI));
        let v = t.apply_vec(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(v, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_angle_between_small_rotations() {
        let a = EulerXyz::new(0.2, -0.4, 1.0).to_rotation();
        let b = a * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 1e-7);
        assert_relative_eq!(angle_between(&a, &b), 1e-7, epsilon = 1e-12);
        assert!(angle_between(&a, &a) < 1e-12);
    }

    #[test]
    fn test_principal_rotations_match_euler() {
        let e = EulerXyz::new(0.5, -0.8, 1.1);
        let composed = Transform::rotation_x(e.x)
            .then(&Transform::rotation_y(e.y))
            .then(&Transform::rotation_z(e.z));
        assert!(composed.approx_eq(&Transform::from_euler(Vec3::zeros(), e), &Tolerance::DEFAULT));
    }

    #[test]
    fn test_tolerance_is_zero() {
        let tol = Tolerance::DEFAULT;
        assert!(tol.is_zero(5e-10));
        assert!(tol.is_zero(-5e-10));
        assert!(!tol.is_zero(1e-6));
    }

    #[test]
    fn test_tolerance_points_equal() {
        let tol = Tolerance::ROUND_TRIP;
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0 + 1e-7, 2.0, 3.0);
        assert!(tol.points_equal(&a, &b));
        let c = Point3::new(1.001, 2.0, 3.0);
        assert!(!tol.points_equal(&a, &c));
    }
}
