//! Axis-aligned boxes and their quadrant partition.

use serde::{Deserialize, Serialize};

use crate::error::{NbodyError, Result};
use crate::quadtree::Massive;
use crate::vector::Vector2;

/// One of the four equal sub-boxes of a [`BoundingBox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Quadrant {
    /// All quadrants in child-storage order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    /// Position of this quadrant in [`Quadrant::ALL`].
    pub fn index(self) -> usize {
        match self {
            Quadrant::NorthWest => 0,
            Quadrant::NorthEast => 1,
            Quadrant::SouthWest => 2,
            Quadrant::SouthEast => 3,
        }
    }

    fn is_east(self) -> bool {
        matches!(self, Quadrant::NorthEast | Quadrant::SouthEast)
    }

    fn is_north(self) -> bool {
        matches!(self, Quadrant::NorthWest | Quadrant::NorthEast)
    }
}

/// A rectangle given by its south-west (`min`) and north-east (`max`) corners.
///
/// Membership in the box itself is closed on every edge. Splitting into
/// quadrants is half-open: the lower bound belongs to a child, the upper bound
/// belongs to its eastern/northern neighbour. Together these put every point
/// of the box into exactly one quadrant at every level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vector2,
    pub max: Vector2,
}

impl BoundingBox {
    /// Creates a box from its SW and NE corners.
    ///
    /// # Errors
    ///
    /// Returns [`NbodyError::InvalidBox`] if a corner is non-finite or `min`
    /// is not dominated by `max`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bhquad::bounds::BoundingBox;
    /// use bhquad::vector::Vector2;
    ///
    /// assert!(BoundingBox::new(Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0)).is_ok());
    /// assert!(BoundingBox::new(Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0)).is_err());
    /// ```
    pub fn new(min: Vector2, max: Vector2) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || !min.dominated_by(&max) {
            return Err(NbodyError::InvalidBox { min, max });
        }
        Ok(Self { min, max })
    }

    /// Smallest box containing every body, or `None` for an empty slice.
    pub fn enclosing<B: Massive>(bodies: &[B]) -> Option<Self> {
        let first = bodies.first()?.position();
        let (min, max) = bodies.iter().fold((first, first), |(min, max), body| {
            let p = body.position();
            (min.min(&p), max.max(&p))
        });
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vector2 {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f64 {
        self.max.x() - self.min.x()
    }

    pub fn height(&self) -> f64 {
        self.max.y() - self.min.y()
    }

    /// Edge length used by the opening-angle test; the longer edge for
    /// non-square boxes.
    pub fn side_length(&self) -> f64 {
        self.width().max(self.height())
    }

    /// Closed membership test: edges and corners are inside.
    pub fn contains(&self, point: &Vector2) -> bool {
        self.min.dominated_by(point) && point.dominated_by(&self.max)
    }

    /// Quadrant a point falls into when this box is split at its center.
    ///
    /// Points on the vertical split line go east, points on the horizontal
    /// split line go north.
    pub fn quadrant(&self, point: &Vector2) -> Quadrant {
        let center = self.center();
        match (point.x() >= center.x(), point.y() >= center.y()) {
            (false, true) => Quadrant::NorthWest,
            (true, true) => Quadrant::NorthEast,
            (false, false) => Quadrant::SouthWest,
            (true, false) => Quadrant::SouthEast,
        }
    }

    /// True iff splitting at the center shrinks the box along at least one
    /// axis. Fails once an edge is within a few ulps of its opposite edge.
    pub fn is_divisible(&self) -> bool {
        let center = self.center();
        (self.min.x() < center.x() && center.x() < self.max.x())
            || (self.min.y() < center.y() && center.y() < self.max.y())
    }

    /// The sub-box covering `quadrant`.
    pub fn subdivide(&self, quadrant: Quadrant) -> Self {
        let center = self.center();
        let (min_x, max_x) = if quadrant.is_east() {
            (center.x(), self.max.x())
        } else {
            (self.min.x(), center.x())
        };
        let (min_y, max_y) = if quadrant.is_north() {
            (center.y(), self.max.y())
        } else {
            (self.min.y(), center.y())
        };
        Self {
            min: Vector2::new(min_x, min_y),
            max: Vector2::new(max_x, max_y),
        }
    }

    /// Grows the box so that it contains every body, padding any side that
    /// had to move by `margin` times the resulting extent.
    ///
    /// Returns the box unchanged when all bodies are already inside.
    pub fn expanded_to_contain<B: Massive>(&self, bodies: &[B], margin: f64) -> Self {
        let Some(needed) = Self::enclosing(bodies) else {
            return *self;
        };
        if self.contains(&needed.min) && self.contains(&needed.max) {
            return *self;
        }

        let min = self.min.min(&needed.min);
        let max = self.max.max(&needed.max);
        let pad = (max - min).scale(margin);
        Self {
            min: Vector2::new(
                if min.x() < self.min.x() { min.x() - pad.x() } else { min.x() },
                if min.y() < self.min.y() { min.y() - pad.y() } else { min.y() },
            ),
            max: Vector2::new(
                if max.x() > self.max.x() { max.x() + pad.x() } else { max.x() },
                if max.y() > self.max.y() { max.y() + pad.y() } else { max.y() },
            ),
        }
    }
}
