// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer gesture bookkeeping for the drag router.
//!
//! [`DragState`] tracks where a touch started and where it was last seen, so
//! the router can compute per-move deltas and the total travel used to tell
//! taps from drags. [`GestureState`] adds the routing decision
//! ([`DragMode`]), the touch-down timestamp for long presses, and the
//! recurring timer that keeps a grabbed node under a stationary finger.
//!
//! ```text
//!   Idle ──first move──▶ Single(node) | All ──touch up / cancel──▶ Idle
//! ```

use kurbo::{Point, Vec2};

use crate::action::TimerId;
use crate::node::NodeId;

/// Start and last positions of the current touch.
#[derive(Debug, Clone, Default, Copy)]
pub struct DragState {
    /// Where the touch went down.
    pub start_pos: Option<Point>,
    /// Last position seen while the touch moved.
    pub last_pos: Option<Point>,
}

impl DragState {
    /// Begin tracking a touch at `pos`.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
    }

    /// Record a move, returning the delta since the previous position.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start_pos?;
        let delta = self.last_pos.map(|last| pos - last);
        self.last_pos = Some(pos);
        delta
    }

    /// Total travel from the start position.
    pub fn total_offset(&self, current_pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| current_pos - start)
    }

    /// Stop tracking.
    pub fn end(&mut self) {
        self.start_pos = None;
        self.last_pos = None;
    }

    /// Returns `true` while a touch is being tracked.
    pub fn is_tracking(&self) -> bool {
        self.start_pos.is_some()
    }
}

/// Where drag forces are routed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DragMode {
    /// No drag in progress.
    #[default]
    Idle,
    /// One grabbed node follows the finger.
    Single(NodeId),
    /// Every node is nudged along the finger's motion.
    All,
}

/// Recurring force re-application for a stationary single-node drag.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct RepeatDrag {
    pub(crate) timer: TimerId,
    pub(crate) node: NodeId,
    pub(crate) point: Point,
}

/// Transient state of the current touch.
#[derive(Clone, Debug, Default)]
pub(crate) struct GestureState {
    pub(crate) drag: DragState,
    pub(crate) mode: DragMode,
    pub(crate) touch_started: Option<f64>,
    pub(crate) repeat: Option<RepeatDrag>,
}

impl GestureState {
    /// Clears everything, returning the recurring timer to cancel, if any.
    pub(crate) fn reset(&mut self) -> Option<TimerId> {
        self.drag.end();
        self.mode = DragMode::Idle;
        self.touch_started = None;
        self.repeat.take().map(|repeat| repeat.timer)
    }

    pub(crate) fn is_dragging(&self) -> bool {
        self.mode != DragMode::Idle
    }
}
