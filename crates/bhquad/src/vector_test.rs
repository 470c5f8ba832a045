use approx::assert_relative_eq;

use crate::error::ArithmeticError;
use crate::vector::Vector2;

#[test]
fn test_arithmetic_returns_new_values() {
    let a = Vector2::new(1.0, 2.0);
    let b = Vector2::new(3.0, -1.0);

    assert_eq!(a + b, Vector2::new(4.0, 1.0));
    assert_eq!(a - b, Vector2::new(-2.0, 3.0));
    assert_eq!(-a, Vector2::new(-1.0, -2.0));
    assert_eq!(a.scale(3.0), Vector2::new(3.0, 6.0));
    assert_eq!(2.0 * b, Vector2::new(6.0, -2.0));

    // Operands are untouched
    assert_eq!(a, Vector2::new(1.0, 2.0));
    assert_eq!(b, Vector2::new(3.0, -1.0));
}

#[test]
fn test_divide() {
    let v = Vector2::new(3.0, -6.0);
    assert_eq!(v.divide(3.0).unwrap(), Vector2::new(1.0, -2.0));
}

#[test]
fn test_divide_by_zero_fails() {
    let err = Vector2::new(1.0, 1.0).divide(0.0).unwrap_err();
    assert!(matches!(err, ArithmeticError::DivisionByZero { .. }));
}

#[test]
fn test_dominance_requires_both_components() {
    let origin = Vector2::zeros();
    let p = Vector2::new(1.0, -1.0);

    assert!(!p.dominates(&origin));
    assert!(!p.dominated_by(&origin));

    let q = Vector2::new(1.0, 0.0);
    assert!(q.dominates(&origin));
    assert!(origin.dominated_by(&q));
}

#[test]
fn test_dominance_is_inclusive() {
    let p = Vector2::new(2.0, 5.0);
    assert!(p.dominates(&p));
    assert!(p.dominated_by(&p));
}

#[test]
fn test_distance() {
    let a = Vector2::new(1.0, 1.0);
    let b = Vector2::new(4.0, 5.0);

    assert_relative_eq!(a.distance_to(&b), 5.0);
    assert_relative_eq!(b.distance_to(&a), 5.0);
    assert_eq!(a.distance_to(&a), 0.0);
}

#[test]
fn test_sum_of_vectors() {
    let parts = [
        Vector2::new(1.0, 0.0),
        Vector2::new(0.0, 2.0),
        Vector2::new(-0.5, 0.5),
    ];

    let by_ref: Vector2 = parts.iter().sum();
    let by_value: Vector2 = parts.into_iter().sum();

    assert_eq!(by_ref, Vector2::new(0.5, 2.5));
    assert_eq!(by_value, by_ref);
}

#[test]
fn test_serializes_as_pair() {
    let v = Vector2::new(1.5, -2.0);
    let json = serde_json::to_string(&v).unwrap();
    assert_eq!(json, "[1.5,-2.0]");
}
