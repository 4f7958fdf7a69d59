//! # Planar Vector Math
//!
//! A minimal 3-component vector for intersection geometry. The arbitration
//! rules only ever look at the ground plane, so most helpers work on the
//! `x`/`y` components and ignore height.
//!
//! The plane follows the host simulator's left-handed convention: +X is
//! forward, +Y is to the right of +X, +Z is up.

use serde::{Deserialize, Serialize};

/// A 3-component vector in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    #[serde(default)]
    pub z: f64,
}

impl Vec3 {
    /// Construct a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Construct a vector on the ground plane.
    pub const fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Dot product.
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Projection onto the ground plane (height dropped).
    pub fn flatten(&self) -> Self {
        Self::planar(self.x, self.y)
    }

    /// Unit-length copy, or `None` for a (near) zero vector.
    pub fn normalized(&self) -> Option<Self> {
        let len = self.length();
        if !len.is_finite() || len <= f64::EPSILON {
            return None;
        }
        Some(Self::new(self.x / len, self.y / len, self.z / len))
    }

    /// Scalar planar cross product `self.x * other.y - self.y * other.x`.
    ///
    /// For unit vectors this is the sine of the signed angle from `self`
    /// to `other`.
    pub fn cross_2d(&self, other: &Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Cosine of the angle between the ground-plane projections.
    ///
    /// Returns `0.0` when either projection is degenerate.
    pub fn cosine_angle_2d(&self, other: &Self) -> f64 {
        match (self.flatten().normalized(), other.flatten().normalized()) {
            (Some(a), Some(b)) => a.dot(&b),
            _ => 0.0,
        }
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}
