// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node outlines and exact, geometry-level containment.
//!
//! A [`Shape`] is expressed in node-local coordinates with the node's origin
//! at `(0, 0)`. Hit testing converts a scene point into that space (see
//! [`Magnetic::node_at`](crate::Magnetic::node_at)) and then asks the shape
//! itself, so overlapping bounding boxes never produce false hits.

use kurbo::{Affine, BezPath, Circle, PathEl, Point, Rect, Shape as _};
use thiserror::Error;

/// Tolerance used when flattening circles into paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Reasons a path cannot be used as a node outline.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    /// The path contains no drawing commands.
    #[error("node path is empty")]
    Empty,
    /// A control or end point is NaN or infinite.
    #[error("node path contains a non-finite point")]
    NonFinite,
}

/// The outline of a node in local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// A circle centered on the node origin.
    Circle {
        /// Radius in local units.
        radius: f64,
    },
    /// An arbitrary closed path around the node origin.
    Path(BezPath),
}

impl Shape {
    /// A circle of `radius` centered on the origin.
    ///
    /// A zero radius is accepted and yields a degenerate node that is never
    /// hit.
    ///
    /// # Panics
    ///
    /// Panics if `radius` is negative or not finite.
    #[must_use]
    pub fn circle(radius: f64) -> Self {
        assert!(
            radius.is_finite() && radius >= 0.0,
            "node radius must be finite and non-negative, got {radius}"
        );
        Self::Circle { radius }
    }

    /// Wraps a custom outline, rejecting paths that cannot describe a node.
    pub fn from_path(path: BezPath) -> Result<Self, ShapeError> {
        if path.elements().is_empty() {
            return Err(ShapeError::Empty);
        }
        let finite = path.elements().iter().all(|el| match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => p.is_finite(),
            PathEl::QuadTo(p1, p2) => p1.is_finite() && p2.is_finite(),
            PathEl::CurveTo(p1, p2, p3) => p1.is_finite() && p2.is_finite() && p3.is_finite(),
            PathEl::ClosePath => true,
        });
        if !finite {
            return Err(ShapeError::NonFinite);
        }
        Ok(Self::Path(path))
    }

    /// Returns `true` if the local point lies inside the outline.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        match self {
            Self::Circle { radius } => *radius > 0.0 && Circle::new(Point::ORIGIN, *radius).contains(pt),
            Self::Path(path) => path.contains(pt),
        }
    }

    /// Local-space bounding box.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        match self {
            Self::Circle { radius } => Circle::new(Point::ORIGIN, *radius).bounding_box(),
            Self::Path(path) => path.bounding_box(),
        }
    }

    /// Enclosed area, used by hosts to derive a default mass.
    #[must_use]
    pub fn area(&self) -> f64 {
        match self {
            Self::Circle { radius } => Circle::new(Point::ORIGIN, *radius).area(),
            Self::Path(path) => path.area().abs(),
        }
    }

    /// The same outline uniformly scaled about the origin.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        match self {
            Self::Circle { radius } => Self::Circle {
                radius: radius * factor,
            },
            Self::Path(path) => {
                let mut path = path.clone();
                path.apply_affine(Affine::scale(factor));
                Self::Path(path)
            }
        }
    }

    /// The outline as a Bézier path, flattening circles.
    #[must_use]
    pub fn to_path(&self) -> BezPath {
        match self {
            Self::Circle { radius } => Circle::new(Point::ORIGIN, *radius).to_path(PATH_TOLERANCE),
            Self::Path(path) => path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(half: f64) -> BezPath {
        let mut path = BezPath::new();
        path.move_to((-half, -half));
        path.line_to((half, -half));
        path.line_to((half, half));
        path.line_to((-half, half));
        path.close_path();
        path
    }

    #[test]
    fn circle_contains_center_but_not_corner() {
        let shape = Shape::circle(10.0);
        assert!(shape.contains(Point::new(0.0, 0.0)));
        assert!(shape.contains(Point::new(7.0, 7.0)));
        // Inside the bounding box, outside the circle.
        assert!(!shape.contains(Point::new(9.0, 9.0)));
    }

    #[test]
    fn zero_radius_never_hits() {
        let shape = Shape::circle(0.0);
        assert!(!shape.contains(Point::ORIGIN));
        assert_eq!(shape.bounding_box().width(), 0.0);
    }

    #[test]
    #[should_panic(expected = "node radius must be finite")]
    fn negative_radius_fails_fast() {
        let _ = Shape::circle(-1.0);
    }

    #[test]
    fn empty_and_non_finite_paths_are_rejected() {
        assert_eq!(Shape::from_path(BezPath::new()), Err(ShapeError::Empty));

        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((f64::NAN, 1.0));
        assert_eq!(Shape::from_path(path), Err(ShapeError::NonFinite));
    }

    #[test]
    fn custom_path_uses_exact_outline() {
        let shape = Shape::from_path(square(5.0)).unwrap();
        assert!(shape.contains(Point::new(4.0, -4.0)));
        assert!(!shape.contains(Point::new(6.0, 0.0)));
        assert_eq!(shape.bounding_box(), Rect::new(-5.0, -5.0, 5.0, 5.0));
    }

    #[test]
    fn scaling_grows_outline() {
        let Shape::Circle { radius } = Shape::circle(10.0).scaled(1.01) else {
            panic!("scaling a circle keeps it a circle");
        };
        assert!((radius - 10.1).abs() < 1e-9);

        let path = Shape::from_path(square(10.0)).unwrap().scaled(2.0);
        assert_eq!(path.bounding_box(), Rect::new(-20.0, -20.0, 20.0, 20.0));
    }
}
