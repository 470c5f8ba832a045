//! Arena-based Barnes-Hut quadtree.
//!
//! The tree is rebuilt from scratch every timestep. Nodes live contiguously
//! in a `Vec` and reference their children by [`NodeId`], so a build is a
//! single allocation pass with no shared or cyclic ownership. The tree
//! borrows the body slice it was built from and stores only indices into it.
//!
//! Every node is exactly one of:
//!
//! - an empty leaf (no bodies, total mass 0),
//! - an occupied leaf (exactly one body),
//! - an internal node with four children, carrying the total mass and the
//!   center of mass of everything below it,
//! - a bucket holding several bodies whose cell can no longer be split at
//!   `f64` resolution. Each member contributes exactly.
//!
//! Aggregates are computed bottom-up during the build and never change.
//!
//! # Example
//!
//! ```rust
//! use bhquad::body::{Body, BodyId};
//! use bhquad::bounds::BoundingBox;
//! use bhquad::forces::ForceParams;
//! use bhquad::quadtree::QuadTree;
//! use bhquad::vector::Vector2;
//!
//! let mut bodies = vec![
//!     Body::new(BodyId(0), 1.0, Vector2::new(0.0, 0.0), Vector2::new(0.0, 0.0)).unwrap(),
//!     Body::new(BodyId(1), 1.0, Vector2::new(1.0, 0.0), Vector2::new(1.0, 0.0)).unwrap(),
//! ];
//! let bounds = BoundingBox::new(Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0)).unwrap();
//!
//! let snapshot: Vec<_> = bodies.iter().map(Body::point_mass).collect();
//! let tree = QuadTree::build(&snapshot, bounds).unwrap();
//! assert_eq!(tree.total_mass(), 2.0);
//!
//! let params = ForceParams::exact(1.0);
//! tree.evaluate_acceleration(&mut bodies[0], &params);
//! assert_eq!(bodies[0].net_acceleration(), Vector2::new(1.0, 0.0));
//! ```

use log::{trace, warn};

use crate::body::BodyId;
use crate::bounds::{BoundingBox, Quadrant};
use crate::error::{ArithmeticError, NbodyError, Result};
use crate::forces::ForceParams;
use crate::forces::gravity::pairwise_acceleration;
use crate::vector::Vector2;

/// Anything the tree can hold: an identity, a position and a mass.
pub trait Massive {
    fn id(&self) -> BodyId;

    fn position(&self) -> Vector2;

    /// Mass; must be strictly positive.
    fn mass(&self) -> f64;
}

/// Receiver of partial accelerations during a tree walk.
pub trait AccelerationSink {
    fn add_acceleration(&mut self, a: Vector2);
}

/// What to do with bodies that lie outside the root box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Containment {
    /// Fail the build with [`NbodyError::BodyOutOfBounds`].
    #[default]
    Strict,
    /// Leave the body out of the tree and record its id.
    Discard,
}

/// Index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize, "NodeId overflow");
        NodeId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug)]
enum Node {
    Empty {
        bounds: BoundingBox,
    },

    Leaf {
        bounds: BoundingBox,
        /// Index into the borrowed body slice
        body_index: u32,
    },

    Internal {
        bounds: BoundingBox,
        total_mass: f64,
        center_of_mass: Vector2,
        /// Children in [`Quadrant::ALL`] order
        children: [NodeId; 4],
    },

    /// Bodies left together once the cell stops shrinking
    Bucket {
        bounds: BoundingBox,
        total_mass: f64,
        center_of_mass: Vector2,
        /// Range into the tree's bucket member list
        first: u32,
        len: u32,
    },
}

impl Node {
    fn bounds(&self) -> BoundingBox {
        match self {
            Node::Empty { bounds }
            | Node::Leaf { bounds, .. }
            | Node::Internal { bounds, .. }
            | Node::Bucket { bounds, .. } => *bounds,
        }
    }
}

/// Barnes-Hut quadtree over a borrowed slice of bodies.
///
/// The lifetime `'a` ties the tree to the body slice; the tree is only
/// meaningful while those bodies stay where they were at build time.
pub struct QuadTree<'a, B: Massive> {
    nodes: Vec<Node>,
    bodies: &'a [B],
    /// Body indices of every bucket, stored contiguously
    members: Vec<u32>,
    root: NodeId,
    discarded: Vec<BodyId>,
}

impl<'a, B: Massive> QuadTree<'a, B> {
    /// Builds a tree over `bodies` inside `bounds`, failing if any body lies
    /// outside the box.
    ///
    /// # Errors
    ///
    /// * [`NbodyError::InvalidBox`] for a degenerate box
    /// * [`NbodyError::BodyOutOfBounds`] for a body outside the box
    /// * [`NbodyError::CoincidentBodies`] when two bodies share a position
    pub fn build(bodies: &'a [B], bounds: BoundingBox) -> Result<Self> {
        Self::build_with(bodies, bounds, Containment::Strict)
    }

    /// Builds a tree with an explicit policy for out-of-box bodies.
    ///
    /// # Arguments
    ///
    /// * `bodies` - Bodies to partition; positions are read once
    /// * `bounds` - Root box; closed on all edges
    /// * `containment` - Whether an escaping body is an error or is dropped
    pub fn build_with(
        bodies: &'a [B],
        bounds: BoundingBox,
        containment: Containment,
    ) -> Result<Self> {
        let bounds = BoundingBox::new(bounds.min, bounds.max)?;

        let mut indices = Vec::with_capacity(bodies.len());
        let mut discarded = Vec::new();
        for (i, body) in bodies.iter().enumerate() {
            let position = body.position();
            if bounds.contains(&position) {
                indices.push(i);
                continue;
            }
            match containment {
                Containment::Strict => {
                    return Err(NbodyError::BodyOutOfBounds {
                        id: body.id(),
                        position,
                    });
                }
                Containment::Discard => {
                    warn!(
                        "body {:?} at {} is outside [{}, {}] and was left out of the tree",
                        body.id(),
                        position,
                        bounds.min,
                        bounds.max
                    );
                    discarded.push(body.id());
                }
            }
        }

        let mut arena = Vec::with_capacity(indices.len() * 2 + 1);
        let mut members = Vec::new();
        let root = Self::build_recursive(bodies, &indices, bounds, &mut arena, &mut members)?;
        trace!(
            "built quadtree with {} nodes over {} bodies ({} in buckets)",
            arena.len(),
            indices.len(),
            members.len()
        );

        Ok(QuadTree {
            nodes: arena,
            bodies,
            members,
            root,
            discarded,
        })
    }

    fn build_recursive(
        bodies: &[B],
        indices: &[usize],
        bounds: BoundingBox,
        arena: &mut Vec<Node>,
        members: &mut Vec<u32>,
    ) -> Result<NodeId> {
        let node = match indices {
            [] => Node::Empty { bounds },

            [single] => Node::Leaf {
                bounds,
                body_index: *single as u32,
            },

            [first, rest @ ..]
                if rest
                    .iter()
                    .all(|&i| bodies[i].position() == bodies[*first].position()) =>
            {
                return Err(coincident(bodies, *first, rest[0]));
            }

            indices if !bounds.is_divisible() => {
                Self::bucket(bodies, indices, bounds, members)?
            }

            indices => {
                let mut quadrants: [Vec<usize>; 4] = Default::default();
                for &i in indices {
                    let q = bounds.quadrant(&bodies[i].position());
                    quadrants[q.index()].push(i);
                }

                let mut children = [NodeId(0); 4];
                for quadrant in Quadrant::ALL {
                    children[quadrant.index()] = Self::build_recursive(
                        bodies,
                        &quadrants[quadrant.index()],
                        bounds.subdivide(quadrant),
                        arena,
                        members,
                    )?;
                }

                // Aggregate from the children, not the raw bodies
                let (total_mass, weighted) = children
                    .iter()
                    .filter_map(|child| aggregate(bodies, &arena[child.index()]))
                    .fold((0.0, Vector2::zeros()), |(mass, sum), (m, com)| {
                        (mass + m, sum + com * m)
                    });
                let center_of_mass = weighted.divide(total_mass)?;
                if !total_mass.is_finite() || !center_of_mass.is_finite() {
                    return Err(ArithmeticError::NonFinite {
                        context: "node aggregate",
                    }
                    .into());
                }

                Node::Internal {
                    bounds,
                    total_mass,
                    center_of_mass,
                    children,
                }
            }
        };

        let id = NodeId::new(arena.len());
        arena.push(node);
        Ok(id)
    }

    /// Groups bodies that share a cell too small to split.
    ///
    /// Distinct positions are still required; the walk evaluates each member
    /// exactly.
    fn bucket(
        bodies: &[B],
        indices: &[usize],
        bounds: BoundingBox,
        members: &mut Vec<u32>,
    ) -> Result<Node> {
        for (k, &a) in indices.iter().enumerate() {
            if let Some(&b) = indices[k + 1..]
                .iter()
                .find(|&&b| bodies[b].position() == bodies[a].position())
            {
                return Err(coincident(bodies, a, b));
            }
        }

        let total_mass: f64 = indices.iter().map(|&i| bodies[i].mass()).sum();
        let weighted: Vector2 = indices
            .iter()
            .map(|&i| bodies[i].position() * bodies[i].mass())
            .sum();
        let center_of_mass = weighted.divide(total_mass)?;
        if !total_mass.is_finite() || !center_of_mass.is_finite() {
            return Err(ArithmeticError::NonFinite {
                context: "bucket aggregate",
            }
            .into());
        }
        trace!(
            "{} bodies share an indivisible cell [{}, {}]",
            indices.len(),
            bounds.min,
            bounds.max
        );

        let first = members.len() as u32;
        members.extend(indices.iter().map(|&i| i as u32));
        Ok(Node::Bucket {
            bounds,
            total_mass,
            center_of_mass,
            first,
            len: indices.len() as u32,
        })
    }

    fn bucket_members(&self, first: u32, len: u32) -> &[u32] {
        &self.members[first as usize..(first + len) as usize]
    }

    /// Total mass of every body in the tree.
    pub fn total_mass(&self) -> f64 {
        self.root().total_mass()
    }

    /// Mass-weighted mean position of the bodies in the tree; `None` when the
    /// tree is empty.
    pub fn center_of_mass(&self) -> Option<Vector2> {
        self.root().center_of_mass()
    }

    pub fn root(&self) -> NodeView<'_, 'a, B> {
        NodeView {
            tree: self,
            id: self.root,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        self.root().bounds()
    }

    /// Number of nodes in the arena, empty leaves included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest node; a lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.depth_of(self.root)
    }

    fn depth_of(&self, id: NodeId) -> usize {
        match &self.nodes[id.index()] {
            Node::Internal { children, .. } => {
                1 + children
                    .iter()
                    .map(|&child| self.depth_of(child))
                    .max()
                    .unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Ids of every body in the tree, in depth-first [`Quadrant::ALL`] order.
    pub fn occupants(&self) -> Vec<BodyId> {
        let mut ids = Vec::with_capacity(self.bodies.len());
        self.collect_occupants(self.root, &mut ids);
        ids
    }

    fn collect_occupants(&self, id: NodeId, ids: &mut Vec<BodyId>) {
        match &self.nodes[id.index()] {
            Node::Empty { .. } => {}
            Node::Leaf { body_index, .. } => ids.push(self.bodies[*body_index as usize].id()),
            Node::Bucket { first, len, .. } => ids.extend(
                self.bucket_members(*first, *len)
                    .iter()
                    .map(|&i| self.bodies[i as usize].id()),
            ),
            Node::Internal { children, .. } => {
                for &child in children {
                    self.collect_occupants(child, ids);
                }
            }
        }
    }

    /// Bodies left out of the tree under [`Containment::Discard`].
    pub fn discarded(&self) -> &[BodyId] {
        &self.discarded
    }

    /// Pushes the gravitational contributions acting on `target` into it.
    ///
    /// Occupied leaves contribute exactly, unless the occupant is the target
    /// itself. An internal node whose side length over distance (measured
    /// from its geometric center) is at most `theta` contributes once as a
    /// point mass at its center of mass; otherwise its four children are
    /// visited. A node whose box contains the target is always opened, and
    /// `theta == None` opens every node.
    ///
    /// # Returns
    ///
    /// Number of contributions pushed.
    pub fn evaluate_acceleration<T>(&self, target: &mut T, params: &ForceParams) -> usize
    where
        T: Massive + AccelerationSink + ?Sized,
    {
        let target_id = target.id();
        let position = target.position();
        let mut count = 0;
        self.walk(self.root, Some(target_id), position, params, &mut |a| {
            target.add_acceleration(a);
            count += 1;
        });
        count
    }

    /// Net acceleration at an arbitrary point, optionally ignoring one body.
    pub fn acceleration_at(
        &self,
        position: Vector2,
        exclude: Option<BodyId>,
        params: &ForceParams,
    ) -> Vector2 {
        let mut total = Vector2::zeros();
        self.walk(self.root, exclude, position, params, &mut |a| total += a);
        total
    }

    fn walk<F: FnMut(Vector2)>(
        &self,
        node_id: NodeId,
        exclude: Option<BodyId>,
        position: Vector2,
        params: &ForceParams,
        emit: &mut F,
    ) {
        match &self.nodes[node_id.index()] {
            Node::Empty { .. } => {}

            Node::Leaf { body_index, .. } => {
                self.emit_exact(*body_index, exclude, position, params, emit);
            }

            Node::Bucket { first, len, .. } => {
                for &body_index in self.bucket_members(*first, *len) {
                    self.emit_exact(body_index, exclude, position, params, emit);
                }
            }

            Node::Internal {
                bounds,
                total_mass,
                center_of_mass,
                children,
            } => {
                if accepts_as_point_mass(bounds, position, params.theta) {
                    if let Some(a) =
                        pairwise_acceleration(position, *center_of_mass, *total_mass, params)
                    {
                        emit(a);
                    }
                } else {
                    for &child in children {
                        self.walk(child, exclude, position, params, emit);
                    }
                }
            }
        }
    }
}

impl<B: Massive> QuadTree<'_, B> {
    fn emit_exact<F: FnMut(Vector2)>(
        &self,
        body_index: u32,
        exclude: Option<BodyId>,
        position: Vector2,
        params: &ForceParams,
        emit: &mut F,
    ) {
        let source = &self.bodies[body_index as usize];
        if exclude == Some(source.id()) {
            return;
        }
        if let Some(a) = pairwise_acceleration(position, source.position(), source.mass(), params) {
            emit(a);
        }
    }
}

fn coincident<B: Massive>(bodies: &[B], first: usize, second: usize) -> NbodyError {
    NbodyError::CoincidentBodies {
        first: bodies[first].id(),
        second: bodies[second].id(),
        position: bodies[first].position(),
    }
}

/// Opening-angle test for an internal node.
fn accepts_as_point_mass(bounds: &BoundingBox, position: Vector2, theta: Option<f64>) -> bool {
    let Some(theta) = theta else {
        return false;
    };
    if bounds.contains(&position) {
        return false;
    }
    let distance = bounds.center().distance_to(&position);
    distance > 0.0 && bounds.side_length() / distance <= theta
}

fn aggregate<B: Massive>(bodies: &[B], node: &Node) -> Option<(f64, Vector2)> {
    match node {
        Node::Empty { .. } => None,
        Node::Leaf { body_index, .. } => {
            let body = &bodies[*body_index as usize];
            Some((body.mass(), body.position()))
        }
        Node::Internal {
            total_mass,
            center_of_mass,
            ..
        }
        | Node::Bucket {
            total_mass,
            center_of_mass,
            ..
        } => Some((*total_mass, *center_of_mass)),
    }
}

/// Read-only view of one tree node.
pub struct NodeView<'t, 'a, B: Massive> {
    tree: &'t QuadTree<'a, B>,
    id: NodeId,
}

impl<B: Massive> Clone for NodeView<'_, '_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: Massive> Copy for NodeView<'_, '_, B> {}

impl<'t, 'a, B: Massive> NodeView<'t, 'a, B> {
    fn node(&self) -> &'t Node {
        &self.tree.nodes[self.id.index()]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn bounds(&self) -> BoundingBox {
        self.node().bounds()
    }

    pub fn total_mass(&self) -> f64 {
        aggregate(self.tree.bodies, self.node()).map_or(0.0, |(mass, _)| mass)
    }

    pub fn center_of_mass(&self) -> Option<Vector2> {
        aggregate(self.tree.bodies, self.node()).map(|(_, com)| com)
    }

    /// The single body held by an occupied leaf.
    pub fn occupant(&self) -> Option<&'a B> {
        match self.node() {
            Node::Leaf { body_index, .. } => Some(&self.tree.bodies[*body_index as usize]),
            _ => None,
        }
    }

    /// Bodies held directly by this node: one for a leaf, several for a
    /// bucket, none otherwise.
    pub fn members(&self) -> Vec<&'a B> {
        let bodies = self.tree.bodies;
        match self.node() {
            Node::Leaf { body_index, .. } => vec![&bodies[*body_index as usize]],
            Node::Bucket { first, len, .. } => self
                .tree
                .bucket_members(*first, *len)
                .iter()
                .map(|&i| &bodies[i as usize])
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Children in [`Quadrant::ALL`] order, for internal nodes only.
    pub fn children(&self) -> Option<[NodeView<'t, 'a, B>; 4]> {
        match self.node() {
            Node::Internal { children, .. } => Some(children.map(|id| NodeView {
                tree: self.tree,
                id,
            })),
            _ => None,
        }
    }

    pub fn child(&self, quadrant: Quadrant) -> Option<NodeView<'t, 'a, B>> {
        self.children().map(|children| children[quadrant.index()])
    }

    pub fn is_empty_leaf(&self) -> bool {
        matches!(self.node(), Node::Empty { .. })
    }
}
