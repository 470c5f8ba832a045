//! Time-stepping driver.
//!
//! Each step rebuilds the force evaluation from the current positions, lets
//! every body collect its contributions, and only then advances every body
//! with the position-Verlet recurrence:
//!
//! 1. Resolve the simulation box per [`BoundaryPolicy`]
//! 2. Force pass: each body accumulates its partial accelerations
//! 3. Advance: `x(t+h) = 2 x(t) - x(t-h) + h² a(t)`, accumulators cleared
//!
//! The force pass finishes for all bodies before any body moves.

use std::collections::HashSet;
use std::fmt;

use log::{Level, debug, info, log_enabled};

use crate::body::{Body, BodyId};
use crate::bounds::BoundingBox;
use crate::config::{BoundaryPolicy, SimulationConfig};
use crate::error::{NbodyError, Result};
use crate::forces::ForceModel;
use crate::quadtree::Containment;
use crate::trajectory::Trajectory;
use crate::vector::Vector2;

/// Owns the canonical body collection and advances it in time.
pub struct Simulation {
    bodies: Vec<Body>,
    bounds: BoundingBox,
    config: SimulationConfig,
    force: Box<dyn ForceModel>,
    time: f64,
    steps: u64,
}

impl Simulation {
    /// Creates a simulation using the force model named in `config`.
    ///
    /// # Errors
    ///
    /// * [`NbodyError::InvalidParameter`] for an invalid configuration
    /// * [`NbodyError::DuplicateBodyId`] if two bodies share an id
    ///
    /// # Examples
    ///
    /// ```
    /// use bhquad::body::{Body, BodyId};
    /// use bhquad::bounds::BoundingBox;
    /// use bhquad::config::SimulationConfig;
    /// use bhquad::simulation::Simulation;
    /// use bhquad::vector::Vector2;
    ///
    /// let bodies = vec![
    ///     Body::new(BodyId(0), 1.0e24, Vector2::new(1.0e6, 1.0e6), Vector2::new(1.0e6, 1.0e6)).unwrap(),
    ///     Body::new(BodyId(1), 1.0e24, Vector2::new(3.0e6, 1.0e6), Vector2::new(3.0e6, 1.0e6)).unwrap(),
    /// ];
    /// let bounds = BoundingBox::new(Vector2::new(0.0, 0.0), Vector2::new(4.0e6, 4.0e6)).unwrap();
    ///
    /// let mut sim = Simulation::new(bodies, bounds, &SimulationConfig::new(1.0)).unwrap();
    /// sim.step().unwrap();
    ///
    /// assert_eq!(sim.steps_taken(), 1);
    /// assert!(sim.bodies()[0].position().x() > 1.0e6);
    /// ```
    pub fn new(bodies: Vec<Body>, bounds: BoundingBox, config: &SimulationConfig) -> Result<Self> {
        let force = config.force.build()?;
        Self::with_force_model(bodies, bounds, config, force)
    }

    /// Creates a simulation with a caller-supplied force model.
    pub fn with_force_model(
        bodies: Vec<Body>,
        bounds: BoundingBox,
        config: &SimulationConfig,
        force: Box<dyn ForceModel>,
    ) -> Result<Self> {
        config.validate()?;
        let bounds = BoundingBox::new(bounds.min, bounds.max)?;

        let mut seen = HashSet::with_capacity(bodies.len());
        if let Some(duplicate) = bodies.iter().find(|b| !seen.insert(b.id())) {
            return Err(NbodyError::DuplicateBodyId(duplicate.id()));
        }

        Ok(Self {
            bodies,
            bounds,
            config: config.clone(),
            force,
            time: 0.0,
            steps: 0,
        })
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Elapsed simulated time
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps
    }

    pub fn ids(&self) -> Vec<BodyId> {
        self.bodies.iter().map(Body::id).collect()
    }

    /// Advances every body by one timestep.
    ///
    /// If the force pass fails, pending contributions are discarded and no
    /// body moves.
    pub fn step(&mut self) -> Result<()> {
        let containment = self.resolve_bounds()?;

        if let Err(err) = self
            .force
            .accumulate(&mut self.bodies, &self.bounds, containment)
        {
            self.bodies.iter_mut().for_each(Body::clear_accelerations);
            return Err(err);
        }

        let h = self.config.time_step;
        self.bodies.iter_mut().for_each(|body| body.advance(h));
        self.time += h;
        self.steps += 1;

        if log_enabled!(Level::Debug) {
            debug!("{}", self.diagnostics());
        }
        Ok(())
    }

    /// Runs `n_steps` steps and returns the recorded positions.
    ///
    /// The initial state is always recorded, then every `record_every`-th
    /// step and the final step.
    pub fn run(&mut self, n_steps: usize) -> Result<Trajectory> {
        info!(
            "running {} steps of h = {} over {} bodies",
            n_steps,
            self.config.time_step,
            self.bodies.len()
        );

        let mut trajectory = Trajectory::new(self.ids(), self.config.time_step);
        trajectory.record(self.steps, self.time, &self.bodies);

        for i in 1..=n_steps {
            self.step()?;
            if i % self.config.record_every == 0 || i == n_steps {
                trajectory.record(self.steps, self.time, &self.bodies);
            }
        }

        info!(
            "finished at t = {} after {} steps ({} frames)",
            self.time,
            self.steps,
            trajectory.len()
        );
        Ok(trajectory)
    }

    fn resolve_bounds(&mut self) -> Result<Containment> {
        match self.config.boundary {
            BoundaryPolicy::Fail => {
                if let Some(body) = self
                    .bodies
                    .iter()
                    .find(|b| !self.bounds.contains(&b.position()))
                {
                    return Err(NbodyError::BodyOutOfBounds {
                        id: body.id(),
                        position: body.position(),
                    });
                }
                Ok(Containment::Strict)
            }
            BoundaryPolicy::Expand => {
                let grown = self
                    .bounds
                    .expanded_to_contain(&self.bodies, self.config.expand_margin);
                if grown != self.bounds {
                    debug!(
                        "box grown from [{}, {}] to [{}, {}]",
                        self.bounds.min, self.bounds.max, grown.min, grown.max
                    );
                    self.bounds = grown;
                }
                Ok(Containment::Strict)
            }
            BoundaryPolicy::Discard => Ok(Containment::Discard),
        }
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(Body::mass).sum()
    }

    /// Mass-weighted mean position; `None` without bodies.
    pub fn center_of_mass(&self) -> Option<Vector2> {
        let total = self.total_mass();
        let weighted: Vector2 = self
            .bodies
            .iter()
            .map(|b| b.position() * b.mass())
            .sum();
        weighted.divide(total).ok()
    }

    /// Kinetic energy from backward-difference velocities.
    pub fn kinetic_energy(&self) -> f64 {
        let h = self.config.time_step;
        self.bodies
            .iter()
            .filter_map(|b| b.kinetic_energy(h).ok())
            .sum()
    }

    pub fn total_momentum(&self) -> Vector2 {
        let h = self.config.time_step;
        self.bodies.iter().filter_map(|b| b.momentum(h).ok()).sum()
    }

    pub fn potential_energy(&self) -> f64 {
        self.force.potential_energy(&self.bodies)
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            steps: self.steps,
            time: self.time,
            total_mass: self.total_mass(),
            center_of_mass: self.center_of_mass(),
            kinetic_energy: self.kinetic_energy(),
            potential_energy: self.potential_energy(),
            momentum: self.total_momentum(),
        }
    }
}

/// Conserved-quantity snapshot, useful for checking numerical drift
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    pub steps: u64,
    pub time: f64,
    pub total_mass: f64,
    pub center_of_mass: Option<Vector2>,
    pub kinetic_energy: f64,
    pub potential_energy: f64,
    pub momentum: Vector2,
}

impl Diagnostics {
    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy + self.potential_energy
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {} t={:.6e} M={:.6e} E={:.6e} (K={:.6e}, U={:.6e}) p={}",
            self.steps,
            self.time,
            self.total_mass,
            self.total_energy(),
            self.kinetic_energy,
            self.potential_energy,
            self.momentum
        )?;
        if let Some(com) = self.center_of_mass {
            write!(f, " com={com}")?;
        }
        Ok(())
    }
}
