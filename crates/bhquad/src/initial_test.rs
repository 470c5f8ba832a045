use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::body::BodyId;
use crate::error::NbodyError;
use crate::initial::{DiskGalaxy, from_coordinate_pairs, generate_galaxies};
use crate::vector::Vector2;

fn galaxy(center: Vector2, count: usize) -> DiskGalaxy {
    DiskGalaxy {
        center,
        bulk_velocity: Vector2::zeros(),
        central_mass: 1.0e3,
        particle_count: count,
        particle_mass: 1.0e-3,
        inner_radius: 1.0,
        outer_radius: 4.0,
        clockwise: false,
    }
}

/// z-component of `a x b`
fn cross(a: Vector2, b: Vector2) -> f64 {
    a.x() * b.y() - a.y() * b.x()
}

#[test]
fn test_coordinate_pairs() {
    let previous = [Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0), Vector2::new(2.0, 2.0)];
    let current = [Vector2::new(0.1, 0.0), Vector2::new(1.0, 1.1), Vector2::new(2.0, 2.0)];

    let bodies = from_coordinate_pairs(5.0, &previous, &current).unwrap();

    assert_eq!(bodies.len(), 3);
    for (i, body) in bodies.iter().enumerate() {
        assert_eq!(body.id(), BodyId(i as u32));
        assert_eq!(body.mass(), 5.0);
        assert_eq!(body.previous_position(), previous[i]);
        assert_eq!(body.position(), current[i]);
    }
}

#[test]
fn test_coordinate_pairs_length_mismatch() {
    let err = from_coordinate_pairs(1.0, &[Vector2::zeros()], &[]).unwrap_err();
    assert!(matches!(
        err,
        NbodyError::LengthMismatch {
            previous: 1,
            current: 0
        }
    ));
}

#[test]
fn test_coordinate_pairs_invalid_mass() {
    let p = [Vector2::zeros()];
    let err = from_coordinate_pairs(-1.0, &p, &p).unwrap_err();
    assert!(matches!(err, NbodyError::InvalidMass { .. }));
}

#[test]
fn test_disk_is_deterministic_per_seed() {
    let g = galaxy(Vector2::zeros(), 50);

    let a = g.generate(&mut ChaChaRng::seed_from_u64(1), 0, 1.0, 0.01).unwrap();
    let b = g.generate(&mut ChaChaRng::seed_from_u64(1), 0, 1.0, 0.01).unwrap();
    let c = g.generate(&mut ChaChaRng::seed_from_u64(2), 0, 1.0, 0.01).unwrap();

    assert!(a.iter().zip(&b).all(|(x, y)| x.position() == y.position()));
    assert!(a.iter().zip(&c).skip(1).any(|(x, y)| x.position() != y.position()));
}

#[test]
fn test_disk_particles_within_radii() {
    let center = Vector2::new(10.0, -3.0);
    let bodies = galaxy(center, 200)
        .generate(&mut ChaChaRng::seed_from_u64(99), 0, 1.0, 0.01)
        .unwrap();

    assert_eq!(bodies[0].position(), center);
    assert_eq!(bodies[0].mass(), 1.0e3);
    for body in &bodies[1..] {
        let r = body.position().distance_to(&center);
        assert!((1.0 - 1e-12..=4.0 + 1e-12).contains(&r), "radius {r}");
        assert_eq!(body.mass(), 1.0e-3);
    }
}

#[test]
fn test_disk_circular_velocities() {
    let h = 0.01;
    let g = 2.0;
    let bodies = galaxy(Vector2::zeros(), 30)
        .generate(&mut ChaChaRng::seed_from_u64(5), 0, g, h)
        .unwrap();

    assert_eq!(bodies[0].velocity(h).unwrap(), Vector2::zeros());
    for body in &bodies[1..] {
        let offset = body.position();
        let v = body.velocity(h).unwrap();
        let r = offset.magnitude();

        assert_relative_eq!(v.magnitude(), (g * 1.0e3 / r).sqrt(), max_relative = 1e-9);
        // Tangential and counter-clockwise
        assert!((offset.x() * v.x() + offset.y() * v.y()).abs() < 1e-6 * r * v.magnitude());
        assert!(cross(offset, v) > 0.0);
    }
}

#[test]
fn test_clockwise_disk_with_bulk_motion() {
    let h = 0.1;
    let mut g = galaxy(Vector2::new(1.0, 1.0), 10);
    g.clockwise = true;
    g.bulk_velocity = Vector2::new(0.5, 0.0);

    let bodies = g.generate(&mut ChaChaRng::seed_from_u64(3), 0, 1.0, h).unwrap();

    let bulk = bodies[0].velocity(h).unwrap();
    assert_relative_eq!(bulk.x(), 0.5, epsilon = 1e-12);
    assert_relative_eq!(bulk.y(), 0.0, epsilon = 1e-12);
    for body in &bodies[1..] {
        let relative = body.velocity(h).unwrap() - bulk;
        assert!(cross(body.position() - g.center, relative) < 0.0);
    }
}

#[test]
fn test_galaxies_get_consecutive_ids() {
    let galaxies = [galaxy(Vector2::new(-10.0, 0.0), 3), galaxy(Vector2::new(10.0, 0.0), 4)];
    let bodies = generate_galaxies(&galaxies, 11, 1.0, 0.01).unwrap();

    let ids: Vec<_> = bodies.iter().map(|b| b.id()).collect();
    assert_eq!(ids, (0..9).map(BodyId).collect::<Vec<_>>());
    assert_eq!(bodies[4].position(), Vector2::new(10.0, 0.0));
}

#[test]
fn test_invalid_radii() {
    let mut g = galaxy(Vector2::zeros(), 1);
    g.inner_radius = 5.0;
    assert!(g.validate().is_err());

    g.inner_radius = 0.0;
    assert!(g.validate().is_err());

    let mut rng = ChaChaRng::seed_from_u64(0);
    assert!(matches!(
        g.generate(&mut rng, 0, 1.0, 0.1),
        Err(NbodyError::InvalidParameter(_))
    ));
}
