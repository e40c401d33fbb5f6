// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Magnetic: a physics-driven bubble picker, independent of any toolkit.
//!
//! Nodes float in a scene, are pulled toward a central radial field, can be
//! dragged around, and toggle a selection state with animated feedback when
//! tapped. This crate holds the whole interaction model and none of the
//! machinery: motion integration, animation playback, and drawing belong to
//! a [`Host`].
//!
//! # Position in the stack
//!
//! - **Host toolkit**: owns a window or view, decodes images, draws nodes,
//!   and feeds pointer events in.
//! - **Host (physics + scheduling)**: implements [`Host`]; integrates bodies,
//!   plays [`Action`] trees, runs timers, and reports completions back as
//!   [`HostEvent`]s. `magnetic_ref` is a headless reference implementation.
//! - **Scene (this crate)**: [`Magnetic`] places nodes, routes drags into
//!   forces, runs the selection protocol, and notifies a
//!   [`MagneticDelegate`].
//!
//! # Core concepts
//!
//! - [`ForceField`]: strength and radii derived from the scene size; the
//!   scene boundary is a vertical strip as wide as the field's minimum
//!   radius.
//! - [`Node`]: outline, label, optional image, and a two-state selection
//!   machine plus a terminal removing phase. [`NodeAnimations`] decides what
//!   transitions look like.
//! - Drag routing: the first move of a touch picks [`DragMode::Single`]
//!   (when starting on a node and single-node movement is on) or
//!   [`DragMode::All`]. Touches that travel less than the forgiveness
//!   distance are taps.
//! - Selection protocol: tapping a selected node deselects it; otherwise it
//!   is selected, first deselecting the others when multi-select is off.
//! - [`Magnetic::reset`]: pauses the simulation, then throws nodes out with
//!   a stagger, nearest first, and restores the speed afterwards.
//! - [`next_selected`] and [`SelectionRotor`]: non-visual traversal of the
//!   selected nodes in label order.
//!
//! Identifiers are never reused within a scene, and every operation on an
//! unknown or leaving node is a silent no-op returning `false` or `None`.
//!
//! # Example
//!
//! ```
//! use kurbo::Size;
//! use magnetic::{Magnetic, MagneticConfig, Node};
//! use magnetic_ref::RefHost;
//! use peniko::Color;
//!
//! let config = MagneticConfig {
//!     allows_multiple_selection: false,
//!     ..MagneticConfig::default()
//! };
//! let mut magnetic = Magnetic::with_config(RefHost::new(), Size::new(300.0, 300.0), config);
//! let rock = magnetic.insert(Node::circle(Some("Rock".into()), None, Color::BLACK, 30.0));
//! let jazz = magnetic.insert(Node::circle(Some("Jazz".into()), None, Color::BLACK, 30.0));
//!
//! magnetic.select(rock);
//! magnetic.select(jazz);
//! assert!(magnetic.selected().eq([jazz]));
//!
//! // Let the host play animations and the field pull nodes in.
//! magnetic.advance(0.5);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod action;
mod color;
mod config;
mod field;
mod gesture;
mod host;
mod label;
mod node;
mod reset;
mod scene;
mod shape;
mod touch;
mod traversal;
mod view;

pub use action::{Action, ActionId, ColorTarget, TimerId};
pub use color::{lerp, lerp_color};
pub use config::MagneticConfig;
pub use field::ForceField;
pub use gesture::{DragMode, DragState};
pub use host::{Host, HostEvent, PhysicsBody, Step, TextMeasure, World};
pub use label::{Font, Label, LabelLine};
pub use node::{
    AnimationContext, Appearance, DefaultAnimations, Image, ImageId, Node, NodeAnimations, NodeId,
    NodeStyle, Phase, StaticAnimations, Texture,
};
pub use scene::{Magnetic, MagneticDelegate};
pub use shape::{Shape, ShapeError};
pub use traversal::{Direction, next_selected};
pub use view::{MagneticView, SelectionRotor};
