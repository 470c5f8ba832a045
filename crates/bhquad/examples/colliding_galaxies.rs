//! Two rotating disks passing through each other
//!
//! Compares the Barnes-Hut tree against direct summation for the same seeded
//! initial conditions, reporting contribution counts and accuracy for a few
//! opening angles, then evolves the encounter with the tree.
//!
//! Run with: cargo run --release --package bhquad --example colliding_galaxies

use std::time::Instant;

use bhquad::body::Body;
use bhquad::bounds::BoundingBox;
use bhquad::config::{BoundaryPolicy, ForceConfig, ForceMethod, SimulationConfig};
use bhquad::forces::{DirectGravity, ForceParams};
use bhquad::initial::{DiskGalaxy, generate_galaxies};
use bhquad::quadtree::QuadTree;
use bhquad::simulation::Simulation;
use bhquad::vector::Vector2;

fn disk(center: Vector2, bulk_velocity: Vector2, central_mass: f64, clockwise: bool) -> DiskGalaxy {
    DiskGalaxy {
        center,
        bulk_velocity,
        central_mass,
        particle_count: 1_000,
        particle_mass: 1.0e-3,
        inner_radius: 0.5,
        outer_radius: 3.0,
        clockwise,
    }
}

fn main() -> bhquad::Result<()> {
    let h = 0.005;
    let galaxies = [
        disk(Vector2::new(-6.0, -1.5), Vector2::new(0.6, 0.0), 100.0, false),
        disk(Vector2::new(6.0, 1.5), Vector2::new(-0.6, 0.0), 60.0, true),
    ];
    let bodies = generate_galaxies(&galaxies, 2024, 1.0, h)?;
    let Some(enclosing) = BoundingBox::enclosing(&bodies) else {
        return Ok(());
    };
    let pad = (enclosing.max - enclosing.min).scale(0.1);
    let bounds = BoundingBox::new(enclosing.min - pad, enclosing.max + pad)?;

    println!("Colliding galaxies: {} bodies\n", bodies.len());
    println!("{}", "=".repeat(60));

    let exact_params = ForceParams::exact(1.0).with_softening(0.05);
    let start = Instant::now();
    let exact = DirectGravity::new(exact_params).accelerations(&bodies);
    println!("Direct summation: {:?}", start.elapsed());

    let snapshot: Vec<_> = bodies.iter().map(Body::point_mass).collect();
    let tree = QuadTree::build(&snapshot, bounds)?;
    println!("Tree: {} nodes, depth {}\n", tree.node_count(), tree.depth());

    for theta in [0.3, 0.5, 0.7, 1.0] {
        let params = exact_params.with_theta(Some(theta));
        let start = Instant::now();
        let mut contributions = 0;
        let mut error = 0.0;
        for (body, reference) in bodies.iter().zip(&exact) {
            let mut sample = body.clone();
            contributions += tree.evaluate_acceleration(&mut sample, &params);
            error += (sample.net_acceleration() - *reference).magnitude() / reference.magnitude();
        }
        println!(
            "theta = {theta:.1}: {:>8} contributions, mean relative error {:.2e}, {:?}",
            contributions,
            error / bodies.len() as f64,
            start.elapsed()
        );
    }

    let config = SimulationConfig::new(h)
        .with_boundary(BoundaryPolicy::Expand)
        .with_force(ForceConfig {
            method: ForceMethod::Tree,
            gravitational_constant: 1.0,
            theta: Some(0.7),
            softening: 0.05,
        });
    let mut simulation = Simulation::new(bodies, bounds, &config)?;

    println!("\nEvolving...");
    for _ in 0..10 {
        simulation.run(200)?;
        let box_now = simulation.bounds();
        println!(
            "t = {:>6.2}: box {} .. {}, K = {:.4e}",
            simulation.time(),
            box_now.min,
            box_now.max,
            simulation.kinetic_energy()
        );
    }

    println!("\n{}", "=".repeat(60));
    println!("Final: {}", simulation.diagnostics());
    Ok(())
}
