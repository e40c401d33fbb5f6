// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The picker scene: node collection, placement, hit testing, selection
//! policy, removal, and host event routing.
//!
//! Pointer routing lives in [`crate::touch`] and the animated reset in
//! [`crate::reset`]; both are further `impl` blocks on [`Magnetic`].

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Size};
use rand::rngs::SmallRng;
use rand::{Rng as _, SeedableRng as _};

use crate::action::ActionId;
use crate::config::MagneticConfig;
use crate::field::{ForceField, sanitize};
use crate::gesture::{DragMode, GestureState};
use crate::host::{Host, HostEvent, Step};
use crate::node::{Node, NodeId, Phase};
use crate::traversal::{self, Direction};

/// Smallest horizontal distance outside the visible bounds a node enters at,
/// so zero-width nodes still start off-screen.
const MIN_ENTRY_OFFSET: f64 = 1.0;

/// Receives selection and removal notifications from a scene.
///
/// Callbacks run synchronously, once per transition, in the order the
/// transitions happened. The scene is passed back mutably so a delegate may
/// select, deselect, or remove other nodes; transitions caused from inside a
/// callback are delivered after that callback returns.
pub trait MagneticDelegate<H: Host> {
    /// `node` became selected.
    fn did_select(&mut self, magnetic: &mut Magnetic<H>, node: NodeId);

    /// `node` became unselected.
    fn did_deselect(&mut self, magnetic: &mut Magnetic<H>, node: NodeId);

    /// `node` finished its exit animation and left the scene.
    fn did_remove(&mut self, magnetic: &mut Magnetic<H>, id: NodeId, node: &Node) {
        let _ = (magnetic, id, node);
    }
}

#[derive(Debug)]
enum Notification {
    Select(NodeId),
    Deselect(NodeId),
    Remove(NodeId, Node),
}

/// Work to do when a host action finishes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Completion {
    /// The exit animation finished; drop the node.
    Detach(NodeId),
    /// The staggered reset step finished; start the exit animation.
    ResetExit(NodeId),
}

#[derive(Debug)]
pub(crate) struct ResetState {
    pub(crate) saved_speed: f64,
    pub(crate) remaining: Vec<NodeId>,
}

#[derive(Debug)]
pub(crate) struct Entry {
    pub(crate) id: NodeId,
    pub(crate) node: Node,
}

/// A physics-driven bubble picker.
///
/// Owns its nodes in insertion order (which is also z and traversal order,
/// the last inserted node being top-most), the central [`ForceField`], and the
/// pointer gesture state. All motion and animation is delegated to the
/// [`Host`].
///
/// Scene space is y-up with the origin at the bottom-left corner of the
/// visible area.
pub struct Magnetic<H: Host> {
    pub(crate) host: H,
    pub(crate) size: Size,
    pub(crate) field: ForceField,
    pub(crate) config: MagneticConfig,
    pub(crate) entries: Vec<Entry>,
    next_id: u64,
    rng: SmallRng,
    pub(crate) gesture: GestureState,
    pub(crate) pending: Vec<(ActionId, Completion)>,
    pub(crate) reset: Option<ResetState>,
    delegate: Option<Box<dyn MagneticDelegate<H>>>,
    delegate_replaced: bool,
    notifications: VecDeque<Notification>,
    notifying: bool,
}

impl<H: Host + fmt::Debug> fmt::Debug for Magnetic<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Magnetic")
            .field("host", &self.host)
            .field("size", &self.size)
            .field("field", &self.field)
            .field("config", &self.config)
            .field("entries", &self.entries)
            .field("next_id", &self.next_id)
            .field("rng", &self.rng)
            .field("gesture", &self.gesture)
            .field("pending", &self.pending)
            .field("reset", &self.reset)
            .field("delegate", &self.delegate.is_some())
            .field("delegate_replaced", &self.delegate_replaced)
            .field("notifications", &self.notifications)
            .field("notifying", &self.notifying)
            .finish()
    }
}

impl<H: Host> Magnetic<H> {
    /// Creates a scene of `size` with the default configuration.
    pub fn new(host: H, size: Size) -> Self {
        Self::with_config(host, size, MagneticConfig::default())
    }

    /// Creates a scene of `size` with `config`.
    pub fn with_config(host: H, size: Size, config: MagneticConfig) -> Self {
        let seed = config.seed.unwrap_or(MagneticConfig::DEFAULT_SEED);
        let mut scene = Self {
            host,
            size: Size::ZERO,
            field: ForceField::for_size(Size::ZERO),
            config,
            entries: Vec::new(),
            next_id: 1,
            rng: SmallRng::seed_from_u64(seed),
            gesture: GestureState::default(),
            pending: Vec::new(),
            reset: None,
            delegate: None,
            delegate_replaced: false,
            notifications: VecDeque::new(),
            notifying: false,
        };
        scene.set_size(size);
        scene
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host, for driving its clock or inspecting state.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consumes the scene, returning its host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Visible size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Resizes the scene, recomputing the field and boundary.
    ///
    /// Idempotent; hosts call this on every bounds change.
    pub fn set_size(&mut self, size: Size) {
        self.size = sanitize(size);
        let world = ForceField::world(self.size);
        self.field = world.field;
        self.host.configure_world(&world);
        tracing::debug!(
            width = self.size.width,
            height = self.size.height,
            strength = self.field.strength,
            radius = self.field.minimum_radius,
            "configured field"
        );
    }

    /// The central field.
    pub fn field(&self) -> &ForceField {
        &self.field
    }

    /// Current configuration.
    pub fn config(&self) -> &MagneticConfig {
        &self.config
    }

    /// Replaces the configuration.
    ///
    /// Turning multi-select off keeps the first selected node (in traversal
    /// order) and deselects the rest, notifying the delegate for each. Nodes
    /// leaving through a running reset are left alone.
    pub fn set_config(&mut self, config: MagneticConfig) {
        let exclusive = !config.allows_multiple_selection;
        self.config = config;
        if exclusive {
            let extra: Vec<NodeId> = self
                .entries
                .iter()
                .filter(|entry| entry.node.is_selected() && !self.is_resetting(entry.id))
                .skip(1)
                .map(|entry| entry.id)
                .collect();
            for id in extra {
                self.apply_selection(id, false);
            }
            self.flush_notifications();
        }
    }

    /// Installs the delegate, replacing any previous one.
    pub fn set_delegate(&mut self, delegate: impl MagneticDelegate<H> + 'static) {
        self.delegate = Some(Box::new(delegate));
        self.delegate_replaced = true;
    }

    /// Removes the delegate.
    pub fn clear_delegate(&mut self) {
        self.delegate = None;
        self.delegate_replaced = true;
    }

    /// Number of nodes, including ones playing their exit animation.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the scene holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nodes in traversal order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.entries.iter().map(|entry| (entry.id, &entry.node))
    }

    /// Looks up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.entry(id).map(|entry| &entry.node)
    }

    /// Selected nodes in traversal order.
    pub fn selected(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries
            .iter()
            .filter(|entry| entry.node.is_selected())
            .map(|entry| entry.id)
    }

    /// Returns `true` while a drag gesture is routing forces.
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    /// Current drag routing.
    pub fn drag_mode(&self) -> DragMode {
        self.gesture.mode
    }

    /// Adds a node, placing it just outside the visible bounds.
    ///
    /// Nodes enter alternately from the right (even live node count) and the
    /// left (odd live node count), at a random height that keeps the whole node within
    /// the vertical bounds. The field then pulls them in.
    pub fn insert(&mut self, mut node: Node) -> NodeId {
        node.refresh_layout(&self.host);
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let position = self.entry_position(node.frame_size());
        self.host.add_node(id, position, &node);
        tracing::debug!(id = id.0, x = position.x, y = position.y, "inserted node");
        self.entries.push(Entry { id, node });
        id
    }

    fn entry_position(&mut self, frame: Size) -> Point {
        let frame = sanitize(frame);
        let offset = frame.width.max(MIN_ENTRY_OFFSET);
        let live = self
            .entries
            .iter()
            .filter(|entry| entry.node.phase() == Phase::Live)
            .count();
        let x = if live % 2 == 0 {
            self.size.width + offset
        } else {
            -offset
        };
        let low = frame.height;
        let high = self.size.height - frame.height;
        let y = if low < high {
            self.rng.gen_range(low..high)
        } else {
            self.size.height / 2.0
        };
        Point::new(x, y)
    }

    /// Applies `f` to a node, then re-runs resize-to-fit and label layout and
    /// pushes the result to the host.
    ///
    /// Returns `false` if the node does not exist.
    pub fn update_node(&mut self, id: NodeId, f: impl FnOnce(&mut Node)) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let node = &mut self.entries[index].node;
        f(node);
        node.refresh_layout(&self.host);
        self.host.update_node(id, node);
        true
    }

    /// Top-most live node whose outline contains `point`.
    ///
    /// The point is converted into each node's local space through the
    /// host-reported transform, so scaled (selected) nodes hit at their
    /// visible size. Nodes that are leaving the scene never hit.
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        self.entries
            .iter()
            .rev()
            .filter(|entry| entry.node.phase() == Phase::Live && !self.is_resetting(entry.id))
            .find(|entry| {
                self.host.transform(entry.id).is_some_and(|transform| {
                    transform.determinant().abs() > f64::EPSILON
                        && entry.node.shape().contains(transform.inverse() * point)
                })
            })
            .map(|entry| entry.id)
    }

    /// Runs the tap protocol on a node: deselect it if selected, otherwise
    /// select it (deselecting the previous selection first when multi-select
    /// is off).
    ///
    /// Returns `false` for unknown or leaving nodes.
    pub fn tap(&mut self, id: NodeId) -> bool {
        match self.live_entry(id) {
            Some(entry) if entry.node.is_selected() => self.deselect(id),
            Some(_) => self.select(id),
            None => false,
        }
    }

    /// Selects a node, honoring [`MagneticConfig::allows_multiple_selection`].
    ///
    /// Returns `false` if nothing changed.
    pub fn select(&mut self, id: NodeId) -> bool {
        match self.live_entry(id) {
            Some(entry) if !entry.node.is_selected() => {}
            _ => return false,
        }
        if !self.config.allows_multiple_selection {
            let others: Vec<NodeId> = self
                .entries
                .iter()
                .filter(|entry| entry.id != id && entry.node.is_selected())
                .map(|entry| entry.id)
                .collect();
            for other in others {
                self.apply_selection(other, false);
            }
        }
        self.apply_selection(id, true);
        self.flush_notifications();
        true
    }

    /// Deselects a node.
    ///
    /// Returns `false` if nothing changed, including for nodes that are being
    /// thrown out by [`Magnetic::reset`].
    pub fn deselect(&mut self, id: NodeId) -> bool {
        let changed = self.apply_selection(id, false);
        self.flush_notifications();
        changed
    }

    /// Starts a node's exit animation. The node stays in the collection, but
    /// no longer hits or selects, until the host reports the animation
    /// finished.
    ///
    /// Returns `false` for unknown nodes or ones already leaving.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let Some(exit) = self.entries[index].node.begin_removal() else {
            return false;
        };
        let action = self.host.run_action(id, exit);
        self.pending.push((action, Completion::Detach(id)));
        tracing::debug!(id = id.0, "removing node");
        true
    }

    /// Next selected node in label order, for assistive navigation.
    pub fn next_selected(&self, current: Option<NodeId>, direction: Direction) -> Option<NodeId> {
        traversal::next_selected(self.nodes(), current, direction)
    }

    /// Routes a host completion back into the scene.
    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::ActionFinished(action) => {
                let Some(index) = self.pending.iter().position(|(id, _)| *id == action) else {
                    return;
                };
                let (_, completion) = self.pending.swap_remove(index);
                match completion {
                    Completion::Detach(id) => self.detach(id),
                    Completion::ResetExit(id) => {
                        self.remove(id);
                    }
                }
            }
            HostEvent::TimerFired(timer) => self.repeat_drag(timer),
        }
    }

    pub(crate) fn index_of(&self, id: NodeId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    fn entry(&self, id: NodeId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    fn live_entry(&self, id: NodeId) -> Option<&Entry> {
        self.entry(id)
            .filter(|entry| entry.node.phase() == Phase::Live && !self.is_resetting(id))
    }

    pub(crate) fn is_live(&self, id: NodeId) -> bool {
        self.live_entry(id).is_some()
    }

    pub(crate) fn is_resetting(&self, id: NodeId) -> bool {
        self.reset
            .as_ref()
            .is_some_and(|reset| reset.remaining.contains(&id))
    }

    /// Flips one node's state and queues its notification.
    ///
    /// Nodes that are part of a running reset keep their state until they
    /// leave.
    fn apply_selection(&mut self, id: NodeId, selected: bool) -> bool {
        if self.is_resetting(id) {
            return false;
        }
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let node = &mut self.entries[index].node;
        let Some(action) = node.set_selected(selected) else {
            return false;
        };
        if !action.is_empty() && node.phase() == Phase::Live {
            self.host.run_action(id, action);
        }
        tracing::debug!(id = id.0, selected, "selection changed");
        self.notifications.push_back(if selected {
            Notification::Select(id)
        } else {
            Notification::Deselect(id)
        });
        true
    }

    fn detach(&mut self, id: NodeId) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let Entry { node, .. } = self.entries.remove(index);
        self.pending.retain(|(_, completion)| match completion {
            Completion::Detach(pending) | Completion::ResetExit(pending) => *pending != id,
        });
        self.host.remove_node(id);
        tracing::debug!(id = id.0, "detached node");
        self.notifications.push_back(Notification::Remove(id, node));

        if let Some(reset) = &mut self.reset {
            reset.remaining.retain(|remaining| *remaining != id);
            if reset.remaining.is_empty() {
                self.finish_reset();
            }
        }
        self.flush_notifications();
    }

    /// Delivers queued notifications unless a delivery is already underway
    /// further up the stack, in which case that loop picks them up.
    pub(crate) fn flush_notifications(&mut self) {
        if self.notifying {
            return;
        }
        self.notifying = true;
        while let Some(notification) = self.notifications.pop_front() {
            let Some(mut delegate) = self.delegate.take() else {
                continue;
            };
            self.delegate_replaced = false;
            match &notification {
                Notification::Select(id) => delegate.did_select(self, *id),
                Notification::Deselect(id) => delegate.did_deselect(self, *id),
                Notification::Remove(id, node) => delegate.did_remove(self, *id, node),
            }
            if !self.delegate_replaced {
                self.delegate = Some(delegate);
            }
        }
        self.notifying = false;
    }
}

impl<H: Host + Step> Magnetic<H> {
    /// Steps the host by `dt` seconds and routes every event it produced.
    pub fn advance(&mut self, dt: f64) {
        for event in self.host.step(dt) {
            self.handle_event(event);
        }
    }
}
