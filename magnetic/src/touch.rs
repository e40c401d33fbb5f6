// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer routing: drags become forces, short touches become taps.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

use crate::action::TimerId;
use crate::gesture::{DragMode, RepeatDrag};
use crate::host::Host;
use crate::node::NodeId;
use crate::scene::Magnetic;

/// Scale applied to the finger delta when nudging every node.
const ALL_NODES_FORCE_SCALE: f64 = 3.0;

impl<H: Host> Magnetic<H> {
    /// A touch went down at `point` (scene space) at `time` seconds.
    pub fn touch_began(&mut self, point: Point, time: f64) {
        self.end_gesture();
        self.gesture.drag.start(point);
        self.gesture.touch_started = Some(time);
    }

    /// The touch moved to `point`.
    ///
    /// The first move after touch-down decides the routing: a drag starting
    /// on a node grabs it when single-node movement is enabled, anything
    /// else nudges every node.
    pub fn touch_moved(&mut self, point: Point) {
        if self.gesture.mode == DragMode::Idle {
            let Some(start) = self.gesture.drag.start_pos else {
                return;
            };
            self.gesture.mode = match self.config.moves_single_node.then(|| self.node_at(start)) {
                Some(Some(id)) => DragMode::Single(id),
                _ => DragMode::All,
            };
            tracing::debug!(mode = ?self.gesture.mode, "drag started");
        }
        let Some(delta) = self.gesture.drag.update(point) else {
            return;
        };
        match self.gesture.mode {
            DragMode::Single(id) => self.move_node(id, point),
            DragMode::All => self.move_all_nodes(point, delta),
            DragMode::Idle => {}
        }
    }

    /// The touch lifted at `point` at `time` seconds.
    ///
    /// Travel below [`selection_forgiveness_distance`] counts as a tap on the
    /// node under `point`.
    ///
    /// [`selection_forgiveness_distance`]: crate::MagneticConfig::selection_forgiveness_distance
    pub fn touch_ended(&mut self, point: Point, time: f64) {
        let travel = self.gesture.drag.total_offset(point);
        let started = self.gesture.touch_started;
        self.end_gesture();

        let Some(travel) = travel else {
            return;
        };
        if travel.hypot() >= self.config.selection_forgiveness_distance {
            return;
        }
        let Some(id) = self.node_at(point) else {
            return;
        };
        if self.is_long_press_removal(id, started, time) {
            tracing::debug!(id = id.get(), "long press");
            self.remove(id);
        } else {
            self.tap(id);
        }
    }

    /// The touch was interrupted. Never selects.
    pub fn touch_cancelled(&mut self) {
        self.end_gesture();
    }

    fn is_long_press_removal(&self, id: NodeId, started: Option<f64>, time: f64) -> bool {
        self.config.remove_on_long_press
            && self.node(id).is_some_and(|node| !node.is_selected())
            && started.is_some_and(|started| time - started >= self.config.long_press_duration)
    }

    pub(crate) fn end_gesture(&mut self) {
        if self.gesture.is_dragging() {
            tracing::debug!("drag ended");
        }
        if let Some(timer) = self.gesture.reset() {
            self.host.cancel_timer(timer);
        }
    }

    /// Pulls a grabbed node toward the finger and keeps pulling while the
    /// finger rests.
    fn move_node(&mut self, id: NodeId, point: Point) {
        if !self.apply_grab_force(id, point) {
            return;
        }
        if let Some(previous) = self.gesture.repeat.take() {
            self.host.cancel_timer(previous.timer);
        }
        let timer = self
            .host
            .schedule_repeating(self.config.drag_repeat_interval);
        self.gesture.repeat = Some(RepeatDrag {
            timer,
            node: id,
            point,
        });
    }

    fn apply_grab_force(&mut self, id: NodeId, point: Point) -> bool {
        if !self.is_live(id) {
            return false;
        }
        let Some(transform) = self.host.transform(id) else {
            return false;
        };
        if transform.determinant().abs() <= f64::EPSILON {
            return false;
        }
        let local = transform.inverse() * point;
        let force = local.to_vec2() * self.config.single_node_acceleration;
        tracing::trace!(id = id.get(), x = force.x, y = force.y, "grab force");
        self.host.apply_force(id, force);
        true
    }

    fn move_all_nodes(&mut self, point: Point, delta: Vec2) {
        if !self.config.moves_all_nodes || delta == Vec2::ZERO {
            return;
        }
        for index in 0..self.entries.len() {
            let id = self.entries[index].id;
            if !self.is_live(id) {
                continue;
            }
            let Some(transform) = self.host.transform(id) else {
                continue;
            };
            let position = Point::ORIGIN + transform.translation();
            let force = delta * (ALL_NODES_FORCE_SCALE * position.distance(point).sqrt());
            tracing::trace!(id = id.get(), x = force.x, y = force.y, "drag force");
            self.host.apply_force(id, force);
        }
    }

    /// Re-applies the grab force on the recurring drag timer.
    pub(crate) fn repeat_drag(&mut self, timer: TimerId) {
        let Some(repeat) = self.gesture.repeat.filter(|repeat| repeat.timer == timer) else {
            self.host.cancel_timer(timer);
            return;
        };
        if !self.apply_grab_force(repeat.node, repeat.point) {
            self.gesture.repeat = None;
            self.host.cancel_timer(timer);
        }
    }
}
