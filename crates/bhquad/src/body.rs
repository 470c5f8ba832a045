use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{NbodyError, Result};
use crate::quadtree::{AccelerationSink, Massive};
use crate::vector::Vector2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub u32);

/// A point-mass particle advanced by the two-step position-Verlet method.
///
/// There is no velocity state: the previous and current positions together
/// carry it. Force evaluations push partial accelerations into a scratch list
/// that [`Body::advance`] sums and clears once per timestep.
///
/// Two bodies are equal iff their ids are equal, regardless of mass or
/// position. The tree relies on this to skip self-interaction.
#[derive(Debug, Clone)]
pub struct Body {
    id: BodyId,
    mass: f64,
    previous_position: Vector2,
    position: Vector2,
    pending_accelerations: Vec<Vector2>,
}

impl Body {
    /// Creates a body from its mass and its positions at the previous and
    /// current timesteps.
    ///
    /// # Errors
    ///
    /// * [`NbodyError::InvalidMass`] if `mass` is not strictly positive and finite
    /// * [`NbodyError::InvalidParameter`] if either position is non-finite
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bhquad::body::{Body, BodyId};
    /// use bhquad::vector::Vector2;
    ///
    /// let body = Body::new(BodyId(0), 1.0, Vector2::new(0.0, 0.0), Vector2::new(0.1, 0.0)).unwrap();
    /// assert_eq!(body.position(), Vector2::new(0.1, 0.0));
    /// ```
    pub fn new(
        id: BodyId,
        mass: f64,
        previous_position: Vector2,
        position: Vector2,
    ) -> Result<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(NbodyError::InvalidMass { id, mass });
        }
        if !previous_position.is_finite() || !position.is_finite() {
            return Err(NbodyError::InvalidParameter(format!(
                "body {id:?} has non-finite position {previous_position} -> {position}"
            )));
        }

        Ok(Self {
            id,
            mass,
            previous_position,
            position,
            pending_accelerations: Vec::new(),
        })
    }

    /// Creates a body from a position and velocity.
    ///
    /// The previous position is set to `position - velocity * h`, which is
    /// the consistent starting point for the Verlet recurrence with step `h`.
    pub fn from_velocity(
        id: BodyId,
        mass: f64,
        position: Vector2,
        velocity: Vector2,
        h: f64,
    ) -> Result<Self> {
        if !(h.is_finite() && h > 0.0) {
            return Err(NbodyError::InvalidParameter(format!(
                "time step must be positive, got {h}"
            )));
        }
        Self::new(id, mass, position - velocity * h, position)
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn previous_position(&self) -> Vector2 {
        self.previous_position
    }

    /// Contributions accumulated since the last [`Body::advance`].
    pub fn pending_accelerations(&self) -> &[Vector2] {
        &self.pending_accelerations
    }

    /// Appends one partial acceleration for the current timestep.
    pub fn add_acceleration(&mut self, a: Vector2) {
        self.pending_accelerations.push(a);
    }

    /// Sum of all pending contributions.
    ///
    /// Contributions from distinct sources add; they are never averaged.
    pub fn net_acceleration(&self) -> Vector2 {
        self.pending_accelerations.iter().sum()
    }

    /// Drops pending contributions without moving the body.
    pub fn clear_accelerations(&mut self) {
        self.pending_accelerations.clear();
    }

    /// Advances the body by one timestep of size `h`.
    ///
    /// Applies `x(t+h) = 2 x(t) - x(t-h) + h^2 a(t)` with `a(t)` the sum of
    /// pending contributions, shifts the position history, and clears the
    /// accumulator. With nothing pending the body coasts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bhquad::body::{Body, BodyId};
    /// use bhquad::vector::Vector2;
    ///
    /// let mut body = Body::new(BodyId(0), 1.0, Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0)).unwrap();
    /// body.advance(1.0);
    /// assert_eq!(body.position(), Vector2::new(2.0, 0.0));
    /// assert_eq!(body.previous_position(), Vector2::new(1.0, 0.0));
    /// ```
    pub fn advance(&mut self, h: f64) {
        let net = self.net_acceleration();
        let next = self.position * 2.0 - self.previous_position + net * (h * h);
        self.previous_position = self.position;
        self.position = next;
        self.pending_accelerations.clear();
    }

    /// Backward-difference velocity estimate `(x(t) - x(t-h)) / h`.
    pub fn velocity(&self, h: f64) -> Result<Vector2> {
        Ok((self.position - self.previous_position).divide(h)?)
    }

    pub fn momentum(&self, h: f64) -> Result<Vector2> {
        Ok(self.velocity(h)? * self.mass)
    }

    pub fn kinetic_energy(&self, h: f64) -> Result<f64> {
        Ok(0.5 * self.mass * self.velocity(h)?.magnitude_squared())
    }

    /// Copyable snapshot of the body's current mass and position.
    pub fn point_mass(&self) -> PointMass {
        PointMass {
            id: self.id,
            mass: self.mass,
            position: self.position,
        }
    }
}

impl PartialEq for Body {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Body {}

impl Hash for Body {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Massive for Body {
    fn id(&self) -> BodyId {
        self.id
    }

    fn position(&self) -> Vector2 {
        self.position
    }

    fn mass(&self) -> f64 {
        self.mass
    }
}

impl AccelerationSink for Body {
    fn add_acceleration(&mut self, a: Vector2) {
        Body::add_acceleration(self, a);
    }
}

/// Mass and position of a body frozen at one instant.
///
/// Trees are built over these snapshots so the bodies themselves stay free
/// to be mutably borrowed while contributions are pushed into them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass {
    pub id: BodyId,
    pub mass: f64,
    pub position: Vector2,
}

impl Massive for PointMass {
    fn id(&self) -> BodyId {
        self.id
    }

    fn position(&self) -> Vector2 {
        self.position
    }

    fn mass(&self) -> f64 {
        self.mass
    }
}
