//! Vector math for dot layouts and picking
//!
//! Plain data only: nothing in here knows about macroquad. The scene adapter
//! converts to the runtime's vector type at the draw boundary.

use std::ops::{Add, Sub, Mul};
use serde::{Serialize, Deserialize};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        self.scale(1.0 / l)
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    pub fn distance(self, other: Vec3) -> f32 {
        (self - other).len()
    }

    /// All components finite (no NaN/Inf)
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

/// A 3D ray with origin and direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,  // Normalized
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }
}

/// Intersect a ray with a sphere.
///
/// Returns the distance along the ray to the nearest hit in front of the
/// origin, or None on a miss. An origin inside the sphere reports the exit point.
pub fn ray_sphere_intersect(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    // |o + t*d - c|^2 = r^2 with |d| = 1:
    //   t^2 + 2t(d·oc) + (oc·oc - r^2) = 0
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let near = -b - sqrt_d;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + sqrt_d;
    if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        let n = Vec3::new(3.0, 0.0, 4.0).normalize();
        assert!((n.len() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cross_is_right_handed() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_ray_hits_sphere_in_front() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -2.0));
        let t = ray_sphere_intersect(&ray, Vec3::ZERO, 0.5).unwrap();
        assert!((t - 4.5).abs() < 1e-5);
        assert!(((ray.origin + ray.direction * t).z - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_sphere() {
        let ray = Ray::new(Vec3::new(0.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(ray_sphere_intersect(&ray, Vec3::ZERO, 0.5).is_none());

        // Sphere entirely behind the origin
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(ray_sphere_intersect(&ray, Vec3::ZERO, 0.5).is_none());
    }
}
