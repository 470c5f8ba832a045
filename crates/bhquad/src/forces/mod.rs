//! Force models for N-body simulations
//!
//! This module provides the `ForceModel` trait, the `ForceParams` value that
//! carries the gravitational constant and opening angle, and two
//! implementations: exact pairwise summation and the Barnes-Hut tree.

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::bounds::BoundingBox;
use crate::error::{NbodyError, Result};
use crate::quadtree::Containment;

pub mod gravity;
pub mod tree_gravity;

#[cfg(test)]
mod tree_gravity_test;

pub use gravity::DirectGravity;
pub use tree_gravity::TreeGravity;

/// Gravitational constant in SI units (m³ kg⁻¹ s⁻²)
pub const G_SI: f64 = 6.67e-11;

/// Opening angle used when none is configured
pub const DEFAULT_THETA: f64 = 0.5;

/// Parameters of a gravity evaluation.
///
/// # Opening Angle (θ)
///
/// Controls the accuracy/speed tradeoff of the tree walk:
/// - `None`: every cell is opened, equivalent to direct summation
/// - `Some(0.5)`: good accuracy, moderately fast (default)
/// - `Some(1.0)`: lower accuracy, fast
///
/// # Examples
///
/// ```
/// use bhquad::forces::{ForceParams, G_SI};
///
/// let params = ForceParams::default().with_theta(Some(0.3));
/// assert_eq!(params.gravitational_constant, G_SI);
/// assert_eq!(params.theta, Some(0.3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceParams {
    pub gravitational_constant: f64,
    pub theta: Option<f64>,
    /// Plummer softening length; 0 disables softening
    pub softening: f64,
}

impl ForceParams {
    pub fn new(gravitational_constant: f64, theta: Option<f64>) -> Self {
        Self {
            gravitational_constant,
            theta,
            softening: 0.0,
        }
    }

    /// Parameters that force exact evaluation (`theta == None`).
    pub fn exact(gravitational_constant: f64) -> Self {
        Self::new(gravitational_constant, None)
    }

    pub fn with_theta(mut self, theta: Option<f64>) -> Self {
        self.theta = theta;
        self
    }

    pub fn with_softening(mut self, softening: f64) -> Self {
        self.softening = softening;
        self
    }

    /// Checks that every parameter is finite and in range.
    pub fn validate(&self) -> Result<()> {
        if !self.gravitational_constant.is_finite() || self.gravitational_constant <= 0.0 {
            return Err(NbodyError::InvalidParameter(format!(
                "gravitational constant must be positive, got {}",
                self.gravitational_constant
            )));
        }
        if let Some(theta) = self.theta {
            if !theta.is_finite() || theta < 0.0 {
                return Err(NbodyError::InvalidParameter(format!(
                    "opening angle must be non-negative, got {theta}"
                )));
            }
        }
        if !self.softening.is_finite() || self.softening < 0.0 {
            return Err(NbodyError::InvalidParameter(format!(
                "softening must be non-negative, got {}",
                self.softening
            )));
        }
        Ok(())
    }
}

impl Default for ForceParams {
    fn default() -> Self {
        Self::new(G_SI, Some(DEFAULT_THETA))
    }
}

/// A source of accelerations on the bodies of a system
///
/// A force model pushes its contributions into each body's pending list;
/// the integrator then sums and drains them in [`Body::advance`].
pub trait ForceModel: Send + Sync {
    /// Push the contributions acting on every body into that body
    ///
    /// # Arguments
    ///
    /// * `bodies` - Canonical body collection, positions as of this step
    /// * `bounds` - Simulation box for this step
    /// * `containment` - Policy for bodies outside `bounds`
    fn accumulate(
        &self,
        bodies: &mut [Body],
        bounds: &BoundingBox,
        containment: Containment,
    ) -> Result<()>;

    /// Parameters this model evaluates with
    fn params(&self) -> &ForceParams;

    /// Total gravitational potential energy, each pair counted once
    ///
    /// Always computed by direct summation.
    fn potential_energy(&self, bodies: &[Body]) -> f64 {
        let params = self.params();
        let g = params.gravitational_constant;
        let eps2 = params.softening * params.softening;

        bodies
            .iter()
            .enumerate()
            .flat_map(|(i, a)| {
                bodies[i + 1..].iter().filter_map(move |b| {
                    let r2 = (a.position() - b.position()).magnitude_squared() + eps2;
                    (r2 > 0.0).then(|| -g * a.mass() * b.mass() / r2.sqrt())
                })
            })
            .sum()
    }
}
