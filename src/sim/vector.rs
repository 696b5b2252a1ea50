//! Immutable 2D vector used for all physics geometry
//!
//! Every operation returns a new value. Equality is exact on (x, y); callers
//! needing tolerance compare explicitly.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A 2D vector of doubles
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2D {
    x: f64,
    y: f64,
}

impl Vector2D {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    /// Canonical +x axis, the fallback direction for degenerate geometry
    pub const X_AXIS: Self = Self { x: 1.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector of the given magnitude pointing along `angle`
    pub fn from_angle(angle: f64, magnitude: f64) -> Self {
        Self::from(DVec2::from_angle(angle) * magnitude)
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Direction in (-π, π]; the zero vector has angle 0
    pub fn angle(&self) -> f64 {
        if self.x == 0.0 && self.y == 0.0 {
            return 0.0;
        }
        let angle = self.y.atan2(self.x);
        // atan2(-0.0, negative) is exactly -π
        if angle == -std::f64::consts::PI {
            std::f64::consts::PI
        } else {
            angle
        }
    }

    #[inline]
    pub fn dot(&self, other: Self) -> f64 {
        DVec2::from(*self).dot(other.into())
    }

    /// Z component of the 3D cross product (positive when `other` is
    /// counterclockwise of `self`)
    #[inline]
    pub fn cross(&self, other: Self) -> f64 {
        DVec2::from(*self).perp_dot(other.into())
    }

    /// Signed angle from `self` to `other`; 0 if either vector is zero
    pub fn angle_between(&self, other: Self) -> f64 {
        let denom = self.magnitude() * other.magnitude();
        if denom == 0.0 {
            return 0.0;
        }
        let cos = (self.dot(other) / denom).clamp(-1.0, 1.0);
        let angle = cos.acos();
        if self.cross(other) < 0.0 { -angle } else { angle }
    }

    /// Unit vector in the same direction; the zero vector maps to +x
    pub fn unit(&self) -> Self {
        let len = self.magnitude();
        if len == 0.0 {
            return Self::X_AXIS;
        }
        Self::new(self.x / len, self.y / len)
    }

    /// Component of `self` along `other` (zero if `other` is zero)
    pub fn vector_project(&self, other: Self) -> Self {
        let len_sq = other.magnitude_squared();
        if len_sq == 0.0 {
            return Self::ZERO;
        }
        other * (self.dot(other) / len_sq)
    }

    /// Component of `self` perpendicular to `other`
    pub fn vector_rejection(&self, other: Self) -> Self {
        *self - self.vector_project(other)
    }

    /// Rotate counterclockwise by `theta` radians
    pub fn rotate(&self, theta: f64) -> Self {
        Self::from(DVec2::from_angle(theta).rotate((*self).into()))
    }

    /// False if either component is NaN or infinite
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<DVec2> for Vector2D {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2D> for DVec2 {
    fn from(v: Vector2D) -> Self {
        DVec2::new(v.x, v.y)
    }
}

impl Add for Vector2D {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2D {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector2D {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vector2D {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}
