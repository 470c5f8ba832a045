//! Immutable two-dimensional point/vector value type.
//!
//! `Vector2` wraps `nalgebra::Vector2<f64>` and exposes the small set of
//! operations the tree and the integrator need: arithmetic, component-wise
//! dominance tests for box membership, and Euclidean distance. Every
//! operation returns a new value; operands are never mutated.
//!
//! # Example
//!
//! ```rust
//! use bhquad::vector::Vector2;
//!
//! let sw = Vector2::new(0.0, 0.0);
//! let ne = Vector2::new(10.0, 10.0);
//! let p = Vector2::new(3.0, 4.0);
//!
//! assert!(p.dominates(&sw));
//! assert!(p.dominated_by(&ne));
//! assert_eq!(p.distance_to(&sw), 5.0);
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::error::ArithmeticError;

/// A 2-D vector with value semantics.
///
/// Serialized transparently as a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector2(na::Vector2<f64>);

impl Vector2 {
    /// Creates a vector from its components.
    pub fn new(x: f64, y: f64) -> Self {
        Self(na::Vector2::new(x, y))
    }

    /// The zero vector.
    pub fn zeros() -> Self {
        Self(na::Vector2::zeros())
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    /// Multiplies both components by `k`.
    pub fn scale(self, k: f64) -> Self {
        Self(self.0 * k)
    }

    /// Divides both components by `k`.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::DivisionByZero`] when `k == 0`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bhquad::vector::Vector2;
    ///
    /// let v = Vector2::new(4.0, 2.0);
    /// assert_eq!(v.divide(2.0).unwrap(), Vector2::new(2.0, 1.0));
    /// assert!(v.divide(0.0).is_err());
    /// ```
    pub fn divide(self, k: f64) -> Result<Self, ArithmeticError> {
        if k == 0.0 {
            return Err(ArithmeticError::DivisionByZero {
                context: "vector division",
            });
        }
        Ok(Self(self.0 / k))
    }

    /// True iff both components are `>=` those of `other`.
    pub fn dominates(&self, other: &Vector2) -> bool {
        self.0.x >= other.0.x && self.0.y >= other.0.y
    }

    /// True iff both components are `<=` those of `other`.
    pub fn dominated_by(&self, other: &Vector2) -> bool {
        self.0.x <= other.0.x && self.0.y <= other.0.y
    }

    /// Euclidean distance between two points.
    pub fn distance_to(&self, other: &Vector2) -> f64 {
        (self.0 - other.0).magnitude()
    }

    pub fn magnitude(&self) -> f64 {
        self.0.magnitude()
    }

    pub fn magnitude_squared(&self) -> f64 {
        self.0.magnitude_squared()
    }

    pub fn is_finite(&self) -> bool {
        self.0.x.is_finite() && self.0.y.is_finite()
    }

    /// Component-wise minimum.
    pub fn min(&self, other: &Vector2) -> Self {
        Self::new(self.0.x.min(other.0.x), self.0.y.min(other.0.y))
    }

    /// Component-wise maximum.
    pub fn max(&self, other: &Vector2) -> Self {
        Self::new(self.0.x.max(other.0.x), self.0.y.max(other.0.y))
    }
}

impl Default for Vector2 {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2(self.0 + rhs.0)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.0 += rhs.0;
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2(self.0 - rhs.0)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    fn neg(self) -> Vector2 {
        Vector2(-self.0)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, k: f64) -> Vector2 {
        self.scale(k)
    }
}

impl Mul<Vector2> for f64 {
    type Output = Vector2;

    fn mul(self, v: Vector2) -> Vector2 {
        v.scale(self)
    }
}

impl Sum for Vector2 {
    fn sum<I: Iterator<Item = Vector2>>(iter: I) -> Vector2 {
        iter.fold(Vector2::zeros(), |acc, v| acc + v)
    }
}

impl<'a> Sum<&'a Vector2> for Vector2 {
    fn sum<I: Iterator<Item = &'a Vector2>>(iter: I) -> Vector2 {
        iter.fold(Vector2::zeros(), |acc, v| acc + *v)
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0.x, self.0.y)
    }
}
