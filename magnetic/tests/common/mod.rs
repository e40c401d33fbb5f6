// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for scene integration tests.

#![allow(
    missing_docs,
    reason = "Integration-test helper module; not part of the public API."
)]
#![allow(
    dead_code,
    reason = "Each test binary uses a different subset of the helpers."
)]

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size};
use magnetic::{Host, Magnetic, MagneticConfig, MagneticDelegate, Node, NodeId};
use magnetic_ref::RefHost;
use peniko::Color;

pub(crate) const SIZE: Size = Size::new(300.0, 300.0);
pub(crate) const CENTER: Point = Point::new(150.0, 150.0);
pub(crate) const RADIUS: f64 = 30.0;
pub(crate) const FRAME: f64 = 1.0 / 60.0;

/// A delegate notification, as observed by [`Recorder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    Select(NodeId),
    Deselect(NodeId),
    Remove(NodeId, Option<String>),
}

/// Delegate that logs every notification into a shared buffer.
#[derive(Clone, Debug, Default)]
pub(crate) struct Recorder(Rc<RefCell<Vec<Event>>>);

impl Recorder {
    /// Drains and returns everything recorded so far.
    pub(crate) fn take(&self) -> Vec<Event> {
        self.0.borrow_mut().drain(..).collect()
    }
}

impl MagneticDelegate<RefHost> for Recorder {
    fn did_select(&mut self, _magnetic: &mut Magnetic<RefHost>, node: NodeId) {
        self.0.borrow_mut().push(Event::Select(node));
    }

    fn did_deselect(&mut self, _magnetic: &mut Magnetic<RefHost>, node: NodeId) {
        self.0.borrow_mut().push(Event::Deselect(node));
    }

    fn did_remove(&mut self, _magnetic: &mut Magnetic<RefHost>, id: NodeId, node: &Node) {
        self.0
            .borrow_mut()
            .push(Event::Remove(id, node.text().map(String::from)));
    }
}

pub(crate) fn bubble(text: &str) -> Node {
    Node::circle(
        Some(text.into()),
        None,
        Color::from_rgba8(0x1d, 0x9b, 0xf0, 0xff),
        RADIUS,
    )
}

/// A 300×300 scene with `config` and a recording delegate.
pub(crate) fn scene(config: MagneticConfig) -> (Magnetic<RefHost>, Recorder) {
    let mut magnetic = Magnetic::with_config(RefHost::new(), SIZE, config);
    let recorder = Recorder::default();
    magnetic.set_delegate(recorder.clone());
    (magnetic, recorder)
}

/// Like [`scene`], but with the simulation paused so nodes stay where they
/// are placed. Animations still play.
pub(crate) fn frozen(config: MagneticConfig) -> (Magnetic<RefHost>, Recorder) {
    let (mut magnetic, recorder) = scene(config);
    magnetic.host_mut().set_speed(0.0);
    (magnetic, recorder)
}

/// Inserts a bubble and parks it at `at`.
pub(crate) fn place(magnetic: &mut Magnetic<RefHost>, text: &str, at: Point) -> NodeId {
    let id = magnetic.insert(bubble(text));
    magnetic.host_mut().place(id, at);
    id
}

pub(crate) fn position(magnetic: &Magnetic<RefHost>, id: NodeId) -> Point {
    magnetic.host().body(id).expect("node has a body").position
}

/// A stationary touch at `point`.
pub(crate) fn tap_at(magnetic: &mut Magnetic<RefHost>, point: Point) {
    magnetic.touch_began(point, 0.0);
    magnetic.touch_ended(point, 0.05);
}

/// Advances the host by `frames` sixtieths of a second.
pub(crate) fn settle(magnetic: &mut Magnetic<RefHost>, frames: u32) {
    for _ in 0..frames {
        magnetic.advance(FRAME);
    }
}
