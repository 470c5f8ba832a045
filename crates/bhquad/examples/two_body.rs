//! Two equal masses on a circular orbit
//!
//! Demonstrates the position-Verlet driver with the tree force model,
//! tracking separation and energy drift once per quarter orbit.
//!
//! Run with: cargo run --package bhquad --example two_body

use bhquad::body::{Body, BodyId};
use bhquad::bounds::BoundingBox;
use bhquad::config::{ForceConfig, ForceMethod, SimulationConfig};
use bhquad::simulation::Simulation;
use bhquad::vector::Vector2;

fn main() -> bhquad::Result<()> {
    println!("Barnes-Hut driver: two-body circular orbit\n");
    println!("{}", "=".repeat(60));

    // G = 1, unit masses, unit separation: each body circles at r = 0.5
    let h = 0.001;
    let speed = 0.5_f64.sqrt();
    let period = std::f64::consts::TAU * 0.5 / speed;
    let steps_per_orbit = (period / h).round() as usize;

    let bodies = vec![
        Body::from_velocity(BodyId(0), 1.0, Vector2::new(-0.5, 0.0), Vector2::new(0.0, -speed), h)?,
        Body::from_velocity(BodyId(1), 1.0, Vector2::new(0.5, 0.0), Vector2::new(0.0, speed), h)?,
    ];
    let bounds = BoundingBox::new(Vector2::new(-1.0, -1.0), Vector2::new(1.0, 1.0))?;
    let config = SimulationConfig::new(h).with_force(ForceConfig {
        method: ForceMethod::Tree,
        gravitational_constant: 1.0,
        theta: Some(0.5),
        softening: 0.0,
    });
    let mut simulation = Simulation::new(bodies, bounds, &config)?;

    let initial = simulation.diagnostics();
    println!("Period: {period:.4} ({steps_per_orbit} steps of h = {h})");
    println!("Initial: {initial}\n");

    let quarter = steps_per_orbit / 4;
    for q in 1..=8 {
        simulation.run(quarter)?;
        let [a, b] = [simulation.bodies()[0].position(), simulation.bodies()[1].position()];
        let energy = simulation.diagnostics().total_energy();
        println!(
            "Quarter {q}: separation = {:.6}, dE/E = {:.2e}, body 1 at {b}",
            a.distance_to(&b),
            ((energy - initial.total_energy()) / initial.total_energy()).abs()
        );
    }

    println!("\n{}", "=".repeat(60));
    println!("Final: {}", simulation.diagnostics());
    Ok(())
}
