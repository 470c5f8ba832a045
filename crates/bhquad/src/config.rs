//! Configuration types for simulations and YAML scenarios.
//!
//! A scenario file describes the driver settings, the number of steps, an
//! optional simulation box and the initial bodies:
//!
//! ```yaml
//! steps: 200
//! simulation:
//!   time_step: 1.0e13
//!   boundary: expand        # fail | expand | discard
//!   record_every: 10
//!   force:
//!     method: tree          # tree | direct
//!     theta: 0.5            # null forces exact evaluation
//!     gravitational_constant: 6.67e-11
//!     softening: 0.0
//! bounds:
//!   min: [0.0, 0.0]
//!   max: [1.0e21, 1.0e21]
//! bodies:
//!   kind: coordinate_pairs
//!   mass: 2.0e42
//!   previous: [[1.0e20, 2.0e20], [5.0e20, 5.0e20]]
//!   current:  [[1.0e20, 2.1e20], [5.0e20, 4.9e20]]
//! ```
//!
//! `bodies` may instead be `kind: explicit` with a `list` of bodies, or
//! `kind: galaxies` with a `seed` and a list of disk galaxies.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::body::{Body, BodyId};
use crate::bounds::BoundingBox;
use crate::error::{NbodyError, Result};
use crate::forces::{
    DEFAULT_THETA, DirectGravity, ForceModel, ForceParams, G_SI, TreeGravity,
};
use crate::initial::{self, DiskGalaxy};
use crate::simulation::Simulation;
use crate::vector::Vector2;

/// How accelerations are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceMethod {
    /// Barnes-Hut quadtree
    #[default]
    Tree,
    /// Exact pairwise summation
    Direct,
}

/// What the driver does when a body leaves the simulation box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Stop with an error
    #[default]
    Fail,
    /// Grow the box to contain every body
    Expand,
    /// Leave escaped bodies out of the tree; they stop exerting force
    Discard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceConfig {
    #[serde(default)]
    pub method: ForceMethod,
    #[serde(default = "default_gravitational_constant")]
    pub gravitational_constant: f64,
    #[serde(default = "default_theta")]
    pub theta: Option<f64>,
    #[serde(default)]
    pub softening: f64,
}

fn default_gravitational_constant() -> f64 {
    G_SI
}

fn default_theta() -> Option<f64> {
    Some(DEFAULT_THETA)
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            method: ForceMethod::default(),
            gravitational_constant: default_gravitational_constant(),
            theta: default_theta(),
            softening: 0.0,
        }
    }
}

impl ForceConfig {
    pub fn params(&self) -> ForceParams {
        ForceParams::new(self.gravitational_constant, self.theta).with_softening(self.softening)
    }

    /// Instantiates the configured force model.
    pub fn build(&self) -> Result<Box<dyn ForceModel>> {
        let params = self.params();
        params.validate()?;
        Ok(match self.method {
            ForceMethod::Tree => Box::new(TreeGravity::new(params)),
            ForceMethod::Direct => Box::new(DirectGravity::new(params)),
        })
    }
}

/// Driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Timestep `h`
    pub time_step: f64,
    #[serde(default)]
    pub force: ForceConfig,
    #[serde(default)]
    pub boundary: BoundaryPolicy,
    /// Padding, as a fraction of the box extent, added when the box grows
    #[serde(default = "default_expand_margin")]
    pub expand_margin: f64,
    /// Record a trajectory frame every this many steps
    #[serde(default = "default_record_every")]
    pub record_every: usize,
}

fn default_expand_margin() -> f64 {
    0.1
}

fn default_record_every() -> usize {
    1
}

impl SimulationConfig {
    /// Default settings with the given timestep.
    pub fn new(time_step: f64) -> Self {
        Self {
            time_step,
            force: ForceConfig::default(),
            boundary: BoundaryPolicy::default(),
            expand_margin: default_expand_margin(),
            record_every: default_record_every(),
        }
    }

    pub fn with_force(mut self, force: ForceConfig) -> Self {
        self.force = force;
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_record_every(mut self, record_every: usize) -> Self {
        self.record_every = record_every;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(NbodyError::InvalidParameter(format!(
                "time step must be positive, got {}",
                self.time_step
            )));
        }
        if !self.expand_margin.is_finite() || self.expand_margin < 0.0 {
            return Err(NbodyError::InvalidParameter(format!(
                "expand margin must be non-negative, got {}",
                self.expand_margin
            )));
        }
        if self.record_every == 0 {
            return Err(NbodyError::InvalidParameter(
                "record_every must be at least 1".to_string(),
            ));
        }
        self.force.params().validate()
    }
}

/// One body of an explicit body list.
///
/// The previous position is taken from `previous` if given, otherwise derived
/// from `velocity` (zero when absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub mass: f64,
    pub position: Vector2,
    #[serde(default)]
    pub previous: Option<Vector2>,
    #[serde(default)]
    pub velocity: Option<Vector2>,
}

/// Source of the initial bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodiesConfig {
    Explicit {
        list: Vec<BodyConfig>,
    },
    /// Paired coordinate arrays for two consecutive timesteps, one mass for all
    CoordinatePairs {
        mass: f64,
        previous: Vec<Vector2>,
        current: Vec<Vector2>,
    },
    /// Seeded disk galaxies
    Galaxies {
        seed: u64,
        galaxies: Vec<DiskGalaxy>,
    },
}

/// Top-level scenario loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub simulation: SimulationConfig,
    pub steps: usize,
    /// Simulation box; defaults to the box enclosing the initial bodies
    #[serde(default)]
    pub bounds: Option<BoundingBox>,
    pub bodies: BodiesConfig,
}

impl ScenarioConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Materializes the initial bodies, ids assigned in order from 0.
    pub fn initial_bodies(&self) -> Result<Vec<Body>> {
        let h = self.simulation.time_step;
        match &self.bodies {
            BodiesConfig::Explicit { list } => list
                .iter()
                .enumerate()
                .map(|(i, body)| {
                    let id = BodyId(i as u32);
                    match (body.previous, body.velocity) {
                        (Some(previous), _) => Body::new(id, body.mass, previous, body.position),
                        (None, velocity) => Body::from_velocity(
                            id,
                            body.mass,
                            body.position,
                            velocity.unwrap_or_default(),
                            h,
                        ),
                    }
                })
                .collect(),

            BodiesConfig::CoordinatePairs {
                mass,
                previous,
                current,
            } => initial::from_coordinate_pairs(*mass, previous, current),

            BodiesConfig::Galaxies { seed, galaxies } => initial::generate_galaxies(
                galaxies,
                *seed,
                self.simulation.force.gravitational_constant,
                h,
            ),
        }
    }

    /// Builds the simulation this scenario describes.
    pub fn build(&self) -> Result<Simulation> {
        self.simulation.validate()?;
        let bodies = self.initial_bodies()?;

        let bounds = match self.bounds {
            Some(bounds) => BoundingBox::new(bounds.min, bounds.max)?,
            None => {
                let enclosing = BoundingBox::enclosing(&bodies).ok_or_else(|| {
                    NbodyError::InvalidParameter(
                        "scenario has no bodies and no bounds".to_string(),
                    )
                })?;
                let pad = (enclosing.max - enclosing.min).scale(self.simulation.expand_margin);
                BoundingBox::new(enclosing.min - pad, enclosing.max + pad)?
            }
        };

        Simulation::new(bodies, bounds, &self.simulation)
    }
}
