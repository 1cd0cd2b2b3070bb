//! Vector helpers shared by every simulation system.
//!
//! Gameplay ranges (tower reach, hero attack range, splash radii) are measured
//! on the ground plane, so most systems use [`distance_2d`] and ignore the
//! vertical axis. Projectile flight is the one place that measures full 3D
//! distance.

use glam::Vec3;

/// Distance between two points projected onto the x/z ground plane.
#[must_use]
pub fn distance_2d(a: Vec3, b: Vec3) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}

/// Full euclidean distance between two points.
#[must_use]
pub fn distance_3d(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

/// Linear interpolation between two scalars.
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation between two points.
#[must_use]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a.lerp(b, t)
}

/// Unit vector pointing in the same direction, or zero for a zero vector.
#[must_use]
pub fn normalize(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}

/// Facing angle (radians around the y axis) that looks from `from` to `to`.
///
/// Zero faces +z; the angle grows toward +x.
#[must_use]
pub fn angle_to_target(from: Vec3, to: Vec3) -> f32 {
    (to.x - from.x).atan2(to.z - from.z)
}

/// Unit ground-plane vector for a facing angle produced by [`angle_to_target`].
#[must_use]
pub fn facing_vector(rotation: f32) -> Vec3 {
    Vec3::new(rotation.sin(), 0.0, rotation.cos())
}

/// Copy of the point pinned to ground level.
#[must_use]
pub fn grounded(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}
