use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use crate::body::{Body, BodyId};
use crate::bounds::BoundingBox;
use crate::error::NbodyError;
use crate::forces::tree_gravity::TreeGravity;
use crate::forces::{DirectGravity, ForceModel, ForceParams};
use crate::quadtree::Containment;
use crate::vector::Vector2;

fn at_rest(id: u32, mass: f64, x: f64, y: f64) -> Body {
    let p = Vector2::new(x, y);
    Body::new(BodyId(id), mass, p, p).unwrap()
}

fn unit_box() -> BoundingBox {
    BoundingBox::new(Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0)).unwrap()
}

fn scattered(n: usize, seed: u64) -> Vec<Body> {
    let mut rng = ChaChaRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            at_rest(
                i as u32,
                rng.random_range(1.0..3.0),
                rng.random_range(0.0..1.0),
                rng.random_range(0.0..1.0),
            )
        })
        .collect()
}

#[test]
fn test_two_bodies_attract() {
    let mut bodies = vec![at_rest(0, 1.0, 0.0, 0.0), at_rest(1, 1.0, 1.0, 0.0)];
    let gravity = TreeGravity::new(ForceParams::new(1.0, Some(0.5)));

    gravity
        .accumulate(&mut bodies, &unit_box(), Containment::Strict)
        .unwrap();

    assert_eq!(bodies[0].net_acceleration(), Vector2::new(1.0, 0.0));
    assert_eq!(bodies[1].net_acceleration(), Vector2::new(-1.0, 0.0));
}

#[test]
fn test_exact_tree_matches_direct() {
    let mut tree_bodies = scattered(120, 9);
    let mut direct_bodies = tree_bodies.clone();
    let params = ForceParams::exact(1.0);

    TreeGravity::new(params)
        .accumulate(&mut tree_bodies, &unit_box(), Containment::Strict)
        .unwrap();
    DirectGravity::new(params)
        .accumulate(&mut direct_bodies, &unit_box(), Containment::Strict)
        .unwrap();

    for (t, d) in tree_bodies.iter().zip(&direct_bodies) {
        assert_eq!(t.pending_accelerations().len(), d.pending_accelerations().len());
        let (t, d) = (t.net_acceleration(), d.net_acceleration());
        assert!((t - d).magnitude() <= 1e-9 * d.magnitude() + 1e-12);
    }
}

#[test]
fn test_approximation_stays_close_to_direct() {
    let mut bodies = scattered(250, 21);
    let exact = DirectGravity::new(ForceParams::exact(1.0)).accelerations(&bodies);

    TreeGravity::new(ForceParams::new(1.0, Some(0.5)))
        .accumulate(&mut bodies, &unit_box(), Containment::Strict)
        .unwrap();

    let error: f64 = bodies
        .iter()
        .zip(&exact)
        .map(|(b, e)| (b.net_acceleration() - *e).magnitude())
        .sum();
    let norm: f64 = exact.iter().map(Vector2::magnitude).sum();
    assert!(error / norm < 0.05, "relative error {}", error / norm);

    // Far-field cells were collapsed for at least some bodies
    assert!(bodies.iter().any(|b| b.pending_accelerations().len() < 249));
}

#[test]
fn test_out_of_bounds_fails_without_partial_state_in_tree() {
    let mut bodies = vec![at_rest(0, 1.0, 0.5, 0.5), at_rest(1, 1.0, 2.0, 0.5)];
    let gravity = TreeGravity::new(ForceParams::exact(1.0));

    let err = gravity
        .accumulate(&mut bodies, &unit_box(), Containment::Strict)
        .unwrap_err();
    assert!(matches!(err, NbodyError::BodyOutOfBounds { id: BodyId(1), .. }));
    assert!(bodies.iter().all(|b| b.pending_accelerations().is_empty()));
}

#[test]
fn test_discarded_body_still_feels_the_tree() {
    let mut bodies = vec![
        at_rest(0, 1.0, 0.0, 0.0),
        at_rest(1, 1.0, 1.0, 0.0),
        at_rest(2, 1.0, 3.0, 0.0),
    ];
    let gravity = TreeGravity::new(ForceParams::exact(1.0));

    gravity
        .accumulate(&mut bodies, &unit_box(), Containment::Discard)
        .unwrap();

    // Body 2 exerts nothing but is pulled by both bodies in the box
    assert_eq!(bodies[0].net_acceleration(), Vector2::new(1.0, 0.0));
    assert_eq!(bodies[1].net_acceleration(), Vector2::new(-1.0, 0.0));
    assert_eq!(bodies[2].pending_accelerations().len(), 2);
    assert!(bodies[2].net_acceleration().x() < 0.0);
}
