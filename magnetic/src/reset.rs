// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animated clearing of the whole scene.

use alloc::vec;
use alloc::vec::Vec;

use crate::action::Action;
use crate::host::Host;
use crate::node::{NodeId, Phase};
use crate::scene::{Completion, Magnetic, ResetState};

/// Extra height above the top edge selected nodes are thrown to.
const THROW_OVERSHOOT: f64 = 40.0;
const THROW_X_DURATION: f64 = 0.2;
const THROW_Y_DURATION: f64 = 0.4;
const THROW_SCALE: f64 = 0.3;

impl<H: Host> Magnetic<H> {
    /// Clears the scene with a staggered exit, nearest nodes first.
    ///
    /// The simulation is paused for the duration and every body is detached,
    /// so nodes freeze in place. After a per-node delay, selected nodes are
    /// thrown off the top edge; then each node plays its exit animation and
    /// leaves. The simulation speed is restored once the last node is gone.
    ///
    /// Calling `reset` on an empty scene does nothing. Calling it again while
    /// a reset is running adds any new nodes to the running reset.
    pub fn reset(&mut self) {
        self.end_gesture();

        let mut order: Vec<(NodeId, f64)> = self
            .entries
            .iter()
            .filter(|entry| !self.is_resetting(entry.id))
            .map(|entry| {
                let distance = self.host.transform(entry.id).map_or(f64::INFINITY, |transform| {
                    (transform.translation() - self.field.position.to_vec2()).hypot()
                });
                (entry.id, distance)
            })
            .collect();
        if order.is_empty() {
            return;
        }
        order.sort_by(|(_, a), (_, b)| a.total_cmp(b));

        let reset = self.reset.get_or_insert_with(|| ResetState {
            saved_speed: self.host.speed(),
            remaining: Vec::new(),
        });
        reset.remaining.extend(order.iter().map(|(id, _)| *id));
        self.host.set_speed(0.0);
        tracing::debug!(nodes = order.len(), "reset started");

        for (index, (id, _)) in order.into_iter().enumerate() {
            self.host.detach_body(id);
            let Some(entry_index) = self.index_of(id) else {
                continue;
            };
            let node = &mut self.entries[entry_index].node;
            if node.phase() == Phase::Removing {
                continue;
            }
            let delay = index as f64 * self.config.reset_stagger;
            let mut steps = vec![Action::Wait { duration: delay }];
            if node.is_selected() {
                node.set_resting_scale(THROW_SCALE);
                steps.push(Action::Group(vec![
                    Action::MoveToX {
                        x: self.size.width / 2.0,
                        duration: THROW_X_DURATION,
                    },
                    Action::MoveToY {
                        y: self.size.height + THROW_OVERSHOOT,
                        duration: THROW_Y_DURATION,
                    },
                    Action::ScaleTo {
                        scale: THROW_SCALE,
                        duration: THROW_Y_DURATION,
                    },
                ]));
            }
            let action = self.host.run_action(id, Action::Sequence(steps));
            self.pending.push((action, Completion::ResetExit(id)));
        }
    }

    pub(crate) fn finish_reset(&mut self) {
        if let Some(reset) = self.reset.take() {
            self.host.set_speed(reset.saved_speed);
            tracing::debug!(speed = reset.saved_speed, "reset finished");
        }
    }
}
