// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Embedding a scene in a host view.
//!
//! Host toolkits usually report pointer positions y-down relative to the
//! view's top-left corner, while the scene is y-up from its bottom-left.
//! [`MagneticView`] owns the scene, keeps it sized to the view bounds, and
//! converts pointer positions on the way in.

use kurbo::{Point, Rect};

use crate::host::Host;
use crate::node::NodeId;
use crate::scene::Magnetic;
use crate::traversal::Direction;

/// A view hosting one [`Magnetic`] scene.
#[derive(Debug)]
pub struct MagneticView<H: Host> {
    bounds: Rect,
    magnetic: Magnetic<H>,
}

impl<H: Host> MagneticView<H> {
    /// Creates a view with `bounds` in view coordinates.
    pub fn new(host: H, bounds: Rect) -> Self {
        Self {
            bounds,
            magnetic: Magnetic::new(host, bounds.size()),
        }
    }

    /// Wraps an existing scene, resizing it to `bounds`.
    pub fn with_scene(mut magnetic: Magnetic<H>, bounds: Rect) -> Self {
        magnetic.set_size(bounds.size());
        Self { bounds, magnetic }
    }

    /// Current bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Applies new bounds. Call on every layout pass.
    pub fn layout(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.magnetic.set_size(bounds.size());
    }

    /// The scene.
    pub fn magnetic(&self) -> &Magnetic<H> {
        &self.magnetic
    }

    /// Mutable access to the scene.
    pub fn magnetic_mut(&mut self) -> &mut Magnetic<H> {
        &mut self.magnetic
    }

    /// Animates every node away. See [`Magnetic::reset`].
    pub fn reset(&mut self) {
        self.magnetic.reset();
    }

    /// Maps a y-down view point into y-up scene space.
    pub fn to_scene(&self, point: Point) -> Point {
        Point::new(point.x - self.bounds.x0, self.bounds.y1 - point.y)
    }

    /// Forwards a touch-down in view coordinates.
    pub fn touch_began(&mut self, point: Point, time: f64) {
        let point = self.to_scene(point);
        self.magnetic.touch_began(point, time);
    }

    /// Forwards a touch move in view coordinates.
    pub fn touch_moved(&mut self, point: Point) {
        let point = self.to_scene(point);
        self.magnetic.touch_moved(point);
    }

    /// Forwards a touch-up in view coordinates.
    pub fn touch_ended(&mut self, point: Point, time: f64) {
        let point = self.to_scene(point);
        self.magnetic.touch_ended(point, time);
    }

    /// Forwards a touch cancellation.
    pub fn touch_cancelled(&mut self) {
        self.magnetic.touch_cancelled();
    }

    /// The rotor assistive technologies use to step through selected nodes.
    pub fn selection_rotor(&self) -> SelectionRotor {
        SelectionRotor::default()
    }
}

/// Named accessibility rotor over the selected nodes, in label order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SelectionRotor {
    name: &'static str,
}

impl Default for SelectionRotor {
    fn default() -> Self {
        Self { name: "Selected" }
    }
}

impl SelectionRotor {
    /// Name announced to the user.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The selected node after `current` in `direction`, or `None` at either
    /// end.
    pub fn next<H: Host>(
        &self,
        magnetic: &Magnetic<H>,
        current: Option<NodeId>,
        direction: Direction,
    ) -> Option<NodeId> {
        magnetic.next_selected(current, direction)
    }
}
