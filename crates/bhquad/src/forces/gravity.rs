//! Direct N-body gravity (O(N²) implementation)

use log::trace;

use crate::body::Body;
use crate::bounds::BoundingBox;
use crate::error::Result;
use crate::forces::{ForceModel, ForceParams};
use crate::quadtree::Containment;
use crate::vector::Vector2;

/// Acceleration at `target` due to a point mass `mass` at `source`.
///
/// Uses the vector form `a = G M r / |r|³` with `r = source - target`, or the
/// Plummer-softened `a = G M r / (|r|² + ε²)^(3/2)` when softening is set.
/// Coincident points with no softening contribute nothing.
///
/// # Examples
///
/// ```
/// use bhquad::forces::ForceParams;
/// use bhquad::forces::gravity::pairwise_acceleration;
/// use bhquad::vector::Vector2;
///
/// let params = ForceParams::exact(1.0);
/// let a = pairwise_acceleration(Vector2::new(0.0, 0.0), Vector2::new(0.0, 2.0), 4.0, &params);
/// assert_eq!(a, Some(Vector2::new(0.0, 1.0)));
/// ```
pub fn pairwise_acceleration(
    target: Vector2,
    source: Vector2,
    mass: f64,
    params: &ForceParams,
) -> Option<Vector2> {
    let separation = source - target;
    let r2 = separation.magnitude_squared() + params.softening * params.softening;
    if r2 == 0.0 {
        trace!("skipping coincident source at {source}");
        return None;
    }
    let r = r2.sqrt();
    Some(separation * (params.gravitational_constant * mass / (r2 * r)))
}

/// Direct O(N²) gravitational force computation
///
/// Sums one exact contribution from every other body. Simple and exact up to
/// softening, but scales poorly.
///
/// Best for:
/// - Small systems
/// - Validating the tree approximation
///
/// # Examples
///
/// ```
/// use bhquad::body::{Body, BodyId};
/// use bhquad::bounds::BoundingBox;
/// use bhquad::forces::{DirectGravity, ForceModel, ForceParams};
/// use bhquad::quadtree::Containment;
/// use bhquad::vector::Vector2;
///
/// let mut bodies = vec![
///     Body::new(BodyId(0), 1.0, Vector2::new(0.0, 0.0), Vector2::new(0.0, 0.0)).unwrap(),
///     Body::new(BodyId(1), 1.0, Vector2::new(1.0, 0.0), Vector2::new(1.0, 0.0)).unwrap(),
/// ];
/// let bounds = BoundingBox::enclosing(&bodies).unwrap();
///
/// let gravity = DirectGravity::new(ForceParams::exact(1.0));
/// gravity.accumulate(&mut bodies, &bounds, Containment::Strict).unwrap();
///
/// // Pulled toward each other
/// assert!(bodies[0].net_acceleration().x() > 0.0);
/// assert!(bodies[1].net_acceleration().x() < 0.0);
/// ```
pub struct DirectGravity {
    params: ForceParams,
}

impl DirectGravity {
    pub fn new(params: ForceParams) -> Self {
        Self { params }
    }

    /// Exact net acceleration on every body, in slice order.
    pub fn accelerations(&self, bodies: &[Body]) -> Vec<Vector2> {
        bodies
            .iter()
            .map(|body| {
                bodies
                    .iter()
                    .filter(|other| other.id() != body.id())
                    .filter_map(|other| {
                        pairwise_acceleration(
                            body.position(),
                            other.position(),
                            other.mass(),
                            &self.params,
                        )
                    })
                    .sum()
            })
            .collect()
    }
}

impl ForceModel for DirectGravity {
    /// Bounds and containment do not constrain direct summation.
    fn accumulate(
        &self,
        bodies: &mut [Body],
        _bounds: &BoundingBox,
        _containment: Containment,
    ) -> Result<()> {
        let snapshot: Vec<_> = bodies.iter().map(Body::point_mass).collect();

        for body in bodies.iter_mut() {
            let (id, position) = (body.id(), body.position());
            for other in snapshot.iter().filter(|other| other.id != id) {
                if let Some(a) =
                    pairwise_acceleration(position, other.position, other.mass, &self.params)
                {
                    body.add_acceleration(a);
                }
            }
        }
        Ok(())
    }

    fn params(&self) -> &ForceParams {
        &self.params
    }
}
