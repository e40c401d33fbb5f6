// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The physics, animation, and scheduling capabilities a scene needs.
//!
//! [`Magnetic`](crate::Magnetic) never integrates motion or interpolates
//! animations itself. It drives a [`Host`], which owns the per-node bodies and
//! presentation state, and it receives completions back as [`HostEvent`]s
//! through [`Magnetic::handle_event`](crate::Magnetic::handle_event).
//!
//! Everything is single-threaded: hosts deliver events on the same event loop
//! that feeds pointer input, never from another thread.

use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect, Vec2};

use crate::action::{Action, ActionId, TimerId};
use crate::field::ForceField;
use crate::label::Font;
use crate::node::{Node, NodeId};
use crate::shape::Shape;

/// Physics parameters for one node body.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsBody {
    /// Collision outline in node-local coordinates.
    pub shape: Shape,
    /// Explicit mass; `None` lets the host derive it from the shape's area.
    pub mass: Option<f64>,
    /// Surface friction.
    pub friction: f64,
    /// Velocity damping per second.
    pub linear_damping: f64,
    /// Whether the body may spin.
    pub allows_rotation: bool,
    /// Whether world gravity acts on the body.
    pub affected_by_gravity: bool,
    /// Whether the body moves in response to forces.
    pub is_dynamic: bool,
}

impl PhysicsBody {
    /// The body every node floats with: no gravity, no friction, damped, and
    /// rotation-locked.
    #[must_use]
    pub fn floating(shape: Shape) -> Self {
        Self {
            shape,
            mass: None,
            friction: 0.0,
            linear_damping: 3.0,
            allows_rotation: false,
            affected_by_gravity: false,
            is_dynamic: true,
        }
    }
}

/// Scene-wide physics configuration pushed to the host on every resize.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    /// Uniform world gravity. Always zero for a picker.
    pub gravity: Vec2,
    /// Edge loop bodies collide with.
    pub boundary: Rect,
    /// The central radial field.
    pub field: ForceField,
}

/// Completion notifications a host feeds back into the scene.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// The action tree started with [`Host::run_action`] has finished.
    ActionFinished(ActionId),
    /// A timer from [`Host::schedule_repeating`] fired.
    TimerFired(TimerId),
}

/// Text measurement used for label wrapping and resize-to-fit.
pub trait TextMeasure {
    /// Advance width of `text` set in `font`.
    fn text_width(&self, text: &str, font: &Font) -> f64;
}

/// The physics/render/scheduling provider behind a scene.
///
/// Operations addressing an unknown [`NodeId`] must be silent no-ops.
pub trait Host: TextMeasure {
    /// Replace gravity, boundary, and field.
    fn configure_world(&mut self, world: &World);

    /// Add a node at `position` with the active body from
    /// [`Node::physics_body`]. The host reads the outline, label, and
    /// appearance it needs to draw the node from `node`.
    fn add_node(&mut self, id: NodeId, position: Point, node: &Node);

    /// Re-read a node's outline, label, appearance, and body after it
    /// changed outside the selection machine.
    fn update_node(&mut self, id: NodeId, node: &Node);

    /// Detach a node's body so it stops reacting to forces while staying on
    /// screen.
    fn detach_body(&mut self, id: NodeId);

    /// Remove a node and its body from the scene graph.
    fn remove_node(&mut self, id: NodeId);

    /// Current node-to-scene transform (translation and scale) of a node.
    fn transform(&self, id: NodeId) -> Option<Affine>;

    /// Apply a force for the current simulation step. Forces do not persist.
    fn apply_force(&mut self, id: NodeId, force: Vec2);

    /// Start an action on a node. The returned id is reported through
    /// [`HostEvent::ActionFinished`] once the action completes.
    fn run_action(&mut self, id: NodeId, action: Action) -> ActionId;

    /// Schedule a timer firing every `interval` seconds until cancelled.
    fn schedule_repeating(&mut self, interval: f64) -> TimerId;

    /// Cancel a timer. Unknown ids are ignored.
    fn cancel_timer(&mut self, id: TimerId);

    /// Physics simulation speed multiplier.
    fn speed(&self) -> f64;

    /// Set the physics simulation speed multiplier. Actions are unaffected.
    fn set_speed(&mut self, speed: f64);
}

/// Hosts that can be stepped explicitly, such as headless runners and tests.
pub trait Step {
    /// Advance by `dt` seconds and return the events produced, in order.
    fn step(&mut self, dt: f64) -> Vec<HostEvent>;
}
