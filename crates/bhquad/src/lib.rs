pub mod body;
pub mod bounds;
pub mod config;
pub mod error;
pub mod forces;
pub mod initial;
pub mod quadtree;
pub mod simulation;
pub mod trajectory;
pub mod vector;

pub use body::{Body, BodyId, PointMass};
pub use bounds::{BoundingBox, Quadrant};
pub use error::{ArithmeticError, NbodyError, Result};
pub use forces::{ForceModel, ForceParams, G_SI};
pub use quadtree::QuadTree;
pub use simulation::Simulation;
pub use vector::Vector2;

#[cfg(test)]
mod bounds_test;
#[cfg(test)]
mod initial_test;
#[cfg(test)]
mod vector_test;
