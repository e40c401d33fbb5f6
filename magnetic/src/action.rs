// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative animation IR handed to the [`Host`](crate::Host).
//!
//! Nodes never animate themselves. Selection, removal, and reset produce
//! small [`Action`] trees which the host interprets against its presentation
//! state (position, scale, alpha, fill, label color) and reports back through
//! [`HostEvent::ActionFinished`](crate::HostEvent::ActionFinished) once the
//! whole tree has run.
//!
//! Durations are in seconds. A composite's duration is derived from its
//! children: a [`Action::Group`] lasts as long as its longest child and a
//! [`Action::Sequence`] as long as the sum of its children.

use alloc::vec::Vec;

use peniko::Color;

use crate::node::Texture;

/// Identifier for a running action, handed out by [`Host::run_action`](crate::Host::run_action).
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub u64);

/// Identifier for a scheduled timer, handed out by
/// [`Host::schedule_repeating`](crate::Host::schedule_repeating).
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Which color channel of a node a [`Action::ColorTransition`] drives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorTarget {
    /// The node's fill.
    Fill,
    /// The node's label text.
    Font,
}

/// One animation step or a composition of steps.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Animate the uniform scale to `scale`.
    ScaleTo {
        /// Final scale factor.
        scale: f64,
        /// Duration in seconds.
        duration: f64,
    },
    /// Animate the opacity to `alpha`.
    FadeTo {
        /// Final opacity in `[0, 1]`.
        alpha: f64,
        /// Duration in seconds.
        duration: f64,
    },
    /// Animate the horizontal position.
    MoveToX {
        /// Final x coordinate in scene space.
        x: f64,
        /// Duration in seconds.
        duration: f64,
    },
    /// Animate the vertical position.
    MoveToY {
        /// Final y coordinate in scene space.
        y: f64,
        /// Duration in seconds.
        duration: f64,
    },
    /// Interpolate a color channel between two colors.
    ///
    /// Hosts sample the channel with [`lerp_color`](crate::color::lerp_color).
    ColorTransition {
        /// Channel being driven.
        target: ColorTarget,
        /// Color at fraction `0`.
        from: Color,
        /// Color at fraction `1`.
        to: Color,
        /// Duration in seconds.
        duration: f64,
    },
    /// Instantly set the fill color.
    SetFillColor(Color),
    /// Instantly set (or clear) the fill texture.
    SetFillTexture(Option<Texture>),
    /// Do nothing for `duration` seconds.
    Wait {
        /// Duration in seconds.
        duration: f64,
    },
    /// Run all children at once.
    Group(Vec<Action>),
    /// Run children one after another.
    Sequence(Vec<Action>),
}

impl Action {
    /// An action that finishes immediately and changes nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Group(Vec::new())
    }

    /// Total duration in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        match self {
            Self::ScaleTo { duration, .. }
            | Self::FadeTo { duration, .. }
            | Self::MoveToX { duration, .. }
            | Self::MoveToY { duration, .. }
            | Self::ColorTransition { duration, .. }
            | Self::Wait { duration } => duration.max(0.0),
            Self::SetFillColor(_) | Self::SetFillTexture(_) => 0.0,
            Self::Group(children) => children.iter().map(Self::duration).fold(0.0, f64::max),
            Self::Sequence(children) => children.iter().map(Self::duration).sum(),
        }
    }

    /// Returns `true` if running this action has no visible effect.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Group(children) | Self::Sequence(children) => children.iter().all(Self::is_empty),
            _ => false,
        }
    }

    /// Builds a group, collapsing the trivial cases.
    #[must_use]
    pub fn group(mut children: Vec<Self>) -> Self {
        children.retain(|child| !child.is_empty());
        if children.len() == 1 {
            children.pop().unwrap_or_else(Self::empty)
        } else {
            Self::Group(children)
        }
    }
}
