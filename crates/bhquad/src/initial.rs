//! Initial conditions.
//!
//! The two-step integrator needs each body's position at two consecutive
//! timesteps. These helpers build such bodies either from paired coordinate
//! arrays or from a seeded rotating-disk model.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};

use crate::body::{Body, BodyId};
use crate::error::{NbodyError, Result};
use crate::vector::Vector2;

/// Builds equal-mass bodies from positions at two consecutive timesteps.
///
/// Body `i` gets id `i`, previous position `previous[i]` and current position
/// `current[i]`.
///
/// # Errors
///
/// [`NbodyError::LengthMismatch`] if the arrays differ in length, plus any
/// error from [`Body::new`].
///
/// # Examples
///
/// ```rust
/// use bhquad::initial::from_coordinate_pairs;
/// use bhquad::vector::Vector2;
///
/// let previous = [Vector2::new(1.0, 1.0), Vector2::new(2.0, 2.0)];
/// let current = [Vector2::new(1.1, 1.0), Vector2::new(2.0, 1.9)];
///
/// let bodies = from_coordinate_pairs(1.0e12, &previous, &current).unwrap();
/// assert_eq!(bodies.len(), 2);
/// assert_eq!(bodies[1].previous_position(), Vector2::new(2.0, 2.0));
/// ```
pub fn from_coordinate_pairs(
    mass: f64,
    previous: &[Vector2],
    current: &[Vector2],
) -> Result<Vec<Body>> {
    if previous.len() != current.len() {
        return Err(NbodyError::LengthMismatch {
            previous: previous.len(),
            current: current.len(),
        });
    }

    previous
        .iter()
        .zip(current)
        .enumerate()
        .map(|(i, (&prev, &cur))| Body::new(BodyId(i as u32), mass, prev, cur))
        .collect()
}

/// A rotating disk of test particles around a central mass.
///
/// Particles are spread uniformly by area between `inner_radius` and
/// `outer_radius` and start on circular orbits about the central mass alone.
/// The whole galaxy moves with `bulk_velocity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskGalaxy {
    pub center: Vector2,
    #[serde(default)]
    pub bulk_velocity: Vector2,
    pub central_mass: f64,
    pub particle_count: usize,
    pub particle_mass: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    #[serde(default)]
    pub clockwise: bool,
}

impl DiskGalaxy {
    pub fn validate(&self) -> Result<()> {
        if !(self.inner_radius > 0.0 && self.inner_radius <= self.outer_radius)
            || !self.outer_radius.is_finite()
        {
            return Err(NbodyError::InvalidParameter(format!(
                "disk radii must satisfy 0 < inner <= outer, got {} and {}",
                self.inner_radius, self.outer_radius
            )));
        }
        Ok(())
    }

    /// Generates the central body followed by the disk particles.
    ///
    /// # Arguments
    ///
    /// * `rng` - Seeded generator; the same seed yields the same galaxy
    /// * `first_id` - Id of the central body; particles follow consecutively
    /// * `g` - Gravitational constant used for the circular speeds
    /// * `h` - Timestep used to back-date the previous positions
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bhquad::initial::DiskGalaxy;
    /// use bhquad::vector::Vector2;
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaChaRng;
    ///
    /// let galaxy = DiskGalaxy {
    ///     center: Vector2::new(0.0, 0.0),
    ///     bulk_velocity: Vector2::zeros(),
    ///     central_mass: 1.0,
    ///     particle_count: 10,
    ///     particle_mass: 1.0e-6,
    ///     inner_radius: 0.5,
    ///     outer_radius: 2.0,
    ///     clockwise: false,
    /// };
    ///
    /// let mut rng = ChaChaRng::seed_from_u64(42);
    /// let bodies = galaxy.generate(&mut rng, 0, 1.0, 0.01).unwrap();
    /// assert_eq!(bodies.len(), 11);
    /// ```
    pub fn generate(&self, rng: &mut ChaChaRng, first_id: u32, g: f64, h: f64) -> Result<Vec<Body>> {
        self.validate()?;

        let mut bodies = Vec::with_capacity(self.particle_count + 1);
        bodies.push(Body::from_velocity(
            BodyId(first_id),
            self.central_mass,
            self.center,
            self.bulk_velocity,
            h,
        )?);

        let inner2 = self.inner_radius * self.inner_radius;
        let outer2 = self.outer_radius * self.outer_radius;
        let spin = if self.clockwise { -1.0 } else { 1.0 };

        for i in 0..self.particle_count {
            let u: f64 = rng.random();
            let r = (inner2 + u * (outer2 - inner2)).sqrt();
            let angle = rng.random_range(0.0..TAU);
            let (sin, cos) = angle.sin_cos();

            let offset = Vector2::new(cos, sin) * r;
            let tangent = Vector2::new(-sin, cos) * spin;
            let speed = (g * self.central_mass / r).sqrt();

            bodies.push(Body::from_velocity(
                BodyId(first_id + 1 + i as u32),
                self.particle_mass,
                self.center + offset,
                self.bulk_velocity + tangent * speed,
                h,
            )?);
        }

        Ok(bodies)
    }
}

/// Generates several galaxies from one seed with consecutive ids.
pub fn generate_galaxies(galaxies: &[DiskGalaxy], seed: u64, g: f64, h: f64) -> Result<Vec<Body>> {
    let mut rng = ChaChaRng::seed_from_u64(seed);
    let mut bodies = Vec::new();
    for galaxy in galaxies {
        let first_id = bodies.len() as u32;
        bodies.extend(galaxy.generate(&mut rng, first_id, g, h)?);
    }
    Ok(bodies)
}
