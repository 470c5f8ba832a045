//! Tree-based gravity using Barnes-Hut algorithm (O(N log N))

use crate::body::{Body, PointMass};
use crate::bounds::BoundingBox;
use crate::error::Result;
use crate::forces::{ForceModel, ForceParams};
use crate::quadtree::{Containment, QuadTree};

/// Barnes-Hut tree-based gravitational force computation
///
/// Each call builds a fresh quadtree over a snapshot of the current positions
/// and walks it once per body. Accuracy is controlled by `params.theta`.
///
/// # Examples
///
/// ```
/// use bhquad::body::{Body, BodyId};
/// use bhquad::bounds::BoundingBox;
/// use bhquad::forces::{ForceModel, ForceParams, TreeGravity};
/// use bhquad::quadtree::Containment;
/// use bhquad::vector::Vector2;
///
/// let mut bodies = vec![
///     Body::new(BodyId(0), 1.0, Vector2::new(0.0, 0.0), Vector2::new(0.0, 0.0)).unwrap(),
///     Body::new(BodyId(1), 1.0, Vector2::new(1.0, 0.0), Vector2::new(1.0, 0.0)).unwrap(),
///     Body::new(BodyId(2), 1.0, Vector2::new(0.0, 1.0), Vector2::new(0.0, 1.0)).unwrap(),
/// ];
/// let bounds = BoundingBox::new(Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0)).unwrap();
///
/// let gravity = TreeGravity::new(ForceParams::new(1.0, Some(0.5)));
/// gravity.accumulate(&mut bodies, &bounds, Containment::Strict).unwrap();
/// assert_eq!(bodies[0].pending_accelerations().len(), 2);
/// ```
pub struct TreeGravity {
    params: ForceParams,
}

impl TreeGravity {
    pub fn new(params: ForceParams) -> Self {
        Self { params }
    }
}

impl ForceModel for TreeGravity {
    fn accumulate(
        &self,
        bodies: &mut [Body],
        bounds: &BoundingBox,
        containment: Containment,
    ) -> Result<()> {
        let snapshot: Vec<PointMass> = bodies.iter().map(Body::point_mass).collect();
        let tree = QuadTree::build_with(&snapshot, *bounds, containment)?;

        // The tree holds the body itself too; the walk skips it by id
        for body in bodies.iter_mut() {
            tree.evaluate_acceleration(body, &self.params);
        }
        Ok(())
    }

    fn params(&self) -> &ForceParams {
        &self.params
    }
}
