// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The central radial field and the boundary derived from the scene size.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Size, Vec2};

use crate::host::World;

/// Radial-gravity descriptor keeping free nodes near the scene center.
///
/// Entirely derived from the scene size; see [`ForceField::for_size`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ForceField {
    /// Field center in scene coordinates.
    pub position: Point,
    /// Radius of the region the field acts in.
    pub region_radius: f64,
    /// Distance below which the field behaves as if at this radius.
    pub minimum_radius: f64,
    /// Field strength.
    pub strength: f64,
}

impl ForceField {
    /// Derives the field for a scene of `size`.
    ///
    /// `strength = max(width, height)` and both radii equal
    /// `sqrt(strength) * 100`. Negative or non-finite extents count as zero.
    #[must_use]
    pub fn for_size(size: Size) -> Self {
        let size = sanitize(size);
        let strength = size.width.max(size.height);
        let radius = strength.sqrt() * 100.0;
        Self {
            position: Point::new(size.width / 2.0, size.height / 2.0),
            region_radius: radius,
            minimum_radius: radius,
            strength,
        }
    }

    /// Edge loop bodies collide with: as wide as the field's minimum radius,
    /// as tall as the scene, horizontally centered on the field.
    #[must_use]
    pub fn boundary(&self, size: Size) -> Rect {
        let size = sanitize(size);
        let half = self.minimum_radius / 2.0;
        Rect::new(
            self.position.x - half,
            0.0,
            self.position.x + half,
            size.height,
        )
    }

    /// The complete physics configuration for a scene of `size`.
    #[must_use]
    pub fn world(size: Size) -> World {
        let field = Self::for_size(size);
        World {
            gravity: Vec2::ZERO,
            boundary: field.boundary(size),
            field,
        }
    }
}

pub(crate) fn sanitize(size: Size) -> Size {
    let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
    Size::new(clean(size.width), clean(size.height))
}
