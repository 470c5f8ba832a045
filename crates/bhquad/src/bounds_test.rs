use crate::body::{BodyId, PointMass};
use crate::bounds::{BoundingBox, Quadrant};
use crate::error::NbodyError;
use crate::vector::Vector2;

fn unit_box() -> BoundingBox {
    BoundingBox::new(Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0)).unwrap()
}

fn point(id: u32, x: f64, y: f64) -> PointMass {
    PointMass {
        id: BodyId(id),
        mass: 1.0,
        position: Vector2::new(x, y),
    }
}

#[test]
fn test_invalid_box_rejected() {
    let err = BoundingBox::new(Vector2::new(0.0, 2.0), Vector2::new(1.0, 1.0)).unwrap_err();
    assert!(matches!(err, NbodyError::InvalidBox { .. }));

    let err = BoundingBox::new(Vector2::new(0.0, 0.0), Vector2::new(f64::INFINITY, 1.0));
    assert!(err.is_err());
}

#[test]
fn test_zero_area_box_allowed() {
    let p = Vector2::new(3.0, 3.0);
    let bounds = BoundingBox::new(p, p).unwrap();
    assert_eq!(bounds.side_length(), 0.0);
    assert!(bounds.contains(&p));
}

#[test]
fn test_geometry() {
    let bounds = BoundingBox::new(Vector2::new(-1.0, 2.0), Vector2::new(3.0, 4.0)).unwrap();

    assert_eq!(bounds.center(), Vector2::new(1.0, 3.0));
    assert_eq!(bounds.width(), 4.0);
    assert_eq!(bounds.height(), 2.0);
    assert_eq!(bounds.side_length(), 4.0);
}

#[test]
fn test_contains_is_closed() {
    let bounds = unit_box();

    assert!(bounds.contains(&Vector2::new(0.0, 0.0)));
    assert!(bounds.contains(&Vector2::new(1.0, 1.0)));
    assert!(bounds.contains(&Vector2::new(1.0, 0.5)));
    assert!(!bounds.contains(&Vector2::new(1.0 + 1e-12, 0.5)));
    assert!(!bounds.contains(&Vector2::new(0.5, -1e-12)));
}

#[test]
fn test_quadrant_interior_points() {
    let bounds = unit_box();

    assert_eq!(bounds.quadrant(&Vector2::new(0.25, 0.75)), Quadrant::NorthWest);
    assert_eq!(bounds.quadrant(&Vector2::new(0.75, 0.75)), Quadrant::NorthEast);
    assert_eq!(bounds.quadrant(&Vector2::new(0.25, 0.25)), Quadrant::SouthWest);
    assert_eq!(bounds.quadrant(&Vector2::new(0.75, 0.25)), Quadrant::SouthEast);
}

#[test]
fn test_quadrant_split_lines_are_half_open() {
    let bounds = unit_box();

    // Lower bound of the upper half belongs to it
    assert_eq!(bounds.quadrant(&Vector2::new(0.5, 0.25)), Quadrant::SouthEast);
    assert_eq!(bounds.quadrant(&Vector2::new(0.25, 0.5)), Quadrant::NorthWest);
    assert_eq!(bounds.quadrant(&Vector2::new(0.5, 0.5)), Quadrant::NorthEast);
    // Outer edges of the root
    assert_eq!(bounds.quadrant(&Vector2::new(1.0, 0.0)), Quadrant::SouthEast);
    assert_eq!(bounds.quadrant(&Vector2::new(0.0, 1.0)), Quadrant::NorthWest);
}

#[test]
fn test_subdivide_tiles_the_box() {
    let bounds = unit_box();

    let nw = bounds.subdivide(Quadrant::NorthWest);
    let ne = bounds.subdivide(Quadrant::NorthEast);
    let sw = bounds.subdivide(Quadrant::SouthWest);
    let se = bounds.subdivide(Quadrant::SouthEast);

    assert_eq!(nw.min, Vector2::new(0.0, 0.5));
    assert_eq!(nw.max, Vector2::new(0.5, 1.0));
    assert_eq!(ne.min, Vector2::new(0.5, 0.5));
    assert_eq!(ne.max, Vector2::new(1.0, 1.0));
    assert_eq!(sw.min, Vector2::new(0.0, 0.0));
    assert_eq!(sw.max, Vector2::new(0.5, 0.5));
    assert_eq!(se.min, Vector2::new(0.5, 0.0));
    assert_eq!(se.max, Vector2::new(1.0, 0.5));
}

#[test]
fn test_quadrant_point_lies_in_its_sub_box() {
    let bounds = BoundingBox::new(Vector2::new(-3.0, -1.0), Vector2::new(5.0, 7.0)).unwrap();
    let samples = [
        Vector2::new(-3.0, -1.0),
        Vector2::new(1.0, 3.0),
        Vector2::new(5.0, 7.0),
        Vector2::new(0.9, 6.0),
        Vector2::new(4.0, -0.5),
    ];

    for p in samples {
        let sub = bounds.subdivide(bounds.quadrant(&p));
        assert!(sub.contains(&p), "{p} not in {sub:?}");
    }
}

#[test]
fn test_enclosing() {
    assert!(BoundingBox::enclosing::<PointMass>(&[]).is_none());

    let points = [point(0, 1.0, -2.0), point(1, -4.0, 3.0), point(2, 0.0, 0.0)];
    let bounds = BoundingBox::enclosing(&points).unwrap();

    assert_eq!(bounds.min, Vector2::new(-4.0, -2.0));
    assert_eq!(bounds.max, Vector2::new(1.0, 3.0));
}

#[test]
fn test_expanded_to_contain() {
    let bounds = unit_box();

    let inside = [point(0, 0.5, 0.5)];
    assert_eq!(bounds.expanded_to_contain(&inside, 0.1), bounds);

    let escaped = [point(0, 0.5, 0.5), point(1, 3.0, 0.5)];
    let grown = bounds.expanded_to_contain(&escaped, 0.1);

    // Only the east side moved, padded by 10% of the new 3x1 extent
    assert_eq!(grown.min, Vector2::new(0.0, 0.0));
    assert!((grown.max.x() - 3.3).abs() < 1e-12);
    assert_eq!(grown.max.y(), 1.0);
    assert!(escaped.iter().all(|p| grown.contains(&p.position)));
}

#[test]
fn test_divisibility_at_f64_resolution() {
    assert!(unit_box().is_divisible());

    // Zero height still splits along x
    let flat = BoundingBox::new(Vector2::new(0.0, 2.0), Vector2::new(1.0, 2.0)).unwrap();
    assert!(flat.is_divisible());

    let u = f64::from_bits(0.5_f64.to_bits() + 1);
    let tiny = BoundingBox::new(Vector2::new(0.5, 0.5), Vector2::new(u, u)).unwrap();
    assert!(!tiny.is_divisible());
}
