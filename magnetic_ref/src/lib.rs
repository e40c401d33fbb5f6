// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Magnetic Reference Host.
//!
//! A small, deterministic implementation of [`Host`] and [`Step`] for tests,
//! benchmarks, and headless experimentation.
//!
//! It is intentionally *not* a physics engine:
//! - Bodies are point masses with a bounding-circle collision pass.
//! - The radial field applies a constant acceleration of
//!   [`ForceField::strength`] toward its center inside the region radius.
//! - Damping is implicit (`v / (1 + damping * dt)`), which stays stable for
//!   any step size.
//! - Positions are clamped to the world boundary.
//!
//! Actions are interpreted on a virtual clock that ignores the simulation
//! speed; timers share the same clock. Every call to [`Step::step`] reports
//! events in a fixed order: finished actions (in start order), then timers.
//!
//! Text is measured as if monospaced, at `0.6 * size` per character.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect, Vec2};
use peniko::Color;

use magnetic::{
    Action, ActionId, ColorTarget, Font, ForceField, Host, HostEvent, Node, NodeId, PhysicsBody,
    Step, TextMeasure, Texture, TimerId, World, lerp, lerp_color,
};

/// Points per meter when deriving mass from an outline's area.
const POINTS_PER_METER: f64 = 150.0;

/// Advance per character, relative to the font size.
const CHARACTER_ADVANCE: f64 = 0.6;

/// Presentation and physics state of one node.
#[derive(Clone, Debug)]
pub struct Body {
    /// Node the body belongs to.
    pub id: NodeId,
    /// Center in scene coordinates.
    pub position: Point,
    /// Velocity in points per second.
    pub velocity: Vec2,
    /// Uniform scale.
    pub scale: f64,
    /// Opacity.
    pub alpha: f64,
    /// Fill color.
    pub fill_color: Color,
    /// Fill texture.
    pub fill_texture: Option<Texture>,
    /// Label color.
    pub font_color: Color,
    /// Active physics body; `None` once detached.
    pub physics: Option<PhysicsBody>,
    force: Vec2,
}

impl Body {
    fn new(id: NodeId, position: Point, node: &Node) -> Self {
        let appearance = node.appearance();
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            scale: appearance.scale,
            alpha: appearance.alpha,
            fill_color: appearance.fill_color,
            fill_texture: appearance.fill_texture,
            font_color: appearance.font_color,
            physics: Some(node.physics_body()),
            force: Vec2::ZERO,
        }
    }

    fn mass(physics: &PhysicsBody) -> f64 {
        physics
            .mass
            .unwrap_or_else(|| physics.shape.area() / (POINTS_PER_METER * POINTS_PER_METER))
    }

    fn radius(&self) -> f64 {
        self.physics.as_ref().map_or(0.0, |physics| {
            let size = physics.shape.bounding_box().size();
            size.width.max(size.height) / 2.0 * self.scale
        })
    }

    fn is_dynamic(&self) -> bool {
        self.physics.as_ref().is_some_and(|physics| physics.is_dynamic)
    }
}

/// An action started on a node, as recorded by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct StartedAction {
    /// Handle returned to the scene.
    pub id: ActionId,
    /// Target node.
    pub node: NodeId,
    /// The action tree.
    pub action: Action,
    /// Virtual time the action started at.
    pub started_at: f64,
}

/// Value a timed leaf interpolates from, captured on its first step.
#[derive(Copy, Clone, Debug)]
enum Start {
    Pending,
    Value(f64),
}

#[derive(Debug)]
enum Track {
    Leaf {
        action: Action,
        elapsed: f64,
        start: Start,
    },
    Group {
        children: Vec<Track>,
        leftover: f64,
    },
    Sequence {
        children: Vec<Track>,
        index: usize,
    },
}

impl Track {
    fn new(action: Action) -> Self {
        match action {
            Action::Group(children) => Self::Group {
                children: children.into_iter().map(Self::new).collect(),
                leftover: f64::INFINITY,
            },
            Action::Sequence(children) => Self::Sequence {
                children: children.into_iter().map(Self::new).collect(),
                index: 0,
            },
            action => Self::Leaf {
                action,
                elapsed: 0.0,
                start: Start::Pending,
            },
        }
    }

    /// Advances by `dt`; returns the unused time once finished.
    fn advance(&mut self, body: Option<&mut Body>, dt: f64) -> Option<f64> {
        match self {
            Self::Leaf {
                action,
                elapsed,
                start,
            } => {
                *elapsed += dt;
                let duration = action.duration();
                let fraction = if duration > 0.0 {
                    (*elapsed / duration).min(1.0)
                } else {
                    1.0
                };
                if let Some(body) = body {
                    apply(action, start, body, fraction);
                }
                (*elapsed >= duration).then(|| *elapsed - duration)
            }
            Self::Group { children, leftover } => {
                let mut body = body;
                let mut index = 0;
                while index < children.len() {
                    if let Some(unused) = children[index].advance(body.as_deref_mut(), dt) {
                        *leftover = leftover.min(unused);
                        children.remove(index);
                    } else {
                        index += 1;
                    }
                }
                children
                    .is_empty()
                    .then(|| if leftover.is_finite() { *leftover } else { dt })
            }
            Self::Sequence { children, index } => {
                let mut body = body;
                let mut dt = dt;
                while let Some(child) = children.get_mut(*index) {
                    dt = child.advance(body.as_deref_mut(), dt)?;
                    *index += 1;
                }
                Some(dt)
            }
        }
    }
}

fn apply(action: &Action, start: &mut Start, body: &mut Body, fraction: f64) {
    let mut tween = |current: f64, target: f64| {
        let from = match *start {
            Start::Pending => {
                *start = Start::Value(current);
                current
            }
            Start::Value(from) => from,
        };
        lerp(from, target, fraction)
    };
    match action {
        Action::ScaleTo { scale, .. } => body.scale = tween(body.scale, *scale),
        Action::FadeTo { alpha, .. } => body.alpha = tween(body.alpha, *alpha),
        Action::MoveToX { x, .. } => body.position.x = tween(body.position.x, *x),
        Action::MoveToY { y, .. } => body.position.y = tween(body.position.y, *y),
        Action::ColorTransition {
            target, from, to, ..
        } => {
            let color = lerp_color(*from, *to, fraction);
            match target {
                ColorTarget::Fill => body.fill_color = color,
                ColorTarget::Font => body.font_color = color,
            }
        }
        Action::SetFillColor(color) => body.fill_color = *color,
        Action::SetFillTexture(texture) => body.fill_texture = *texture,
        Action::Wait { .. } | Action::Group(_) | Action::Sequence(_) => {}
    }
}

#[derive(Debug)]
struct Running {
    id: ActionId,
    node: NodeId,
    track: Track,
}

#[derive(Debug)]
struct Timer {
    id: TimerId,
    interval: f64,
    next_fire: f64,
}

/// Headless host with simple physics and a virtual clock.
#[derive(Debug)]
pub struct RefHost {
    world: Option<World>,
    bodies: Vec<Body>,
    running: Vec<Running>,
    timers: Vec<Timer>,
    finished: Vec<ActionId>,
    started: Vec<StartedAction>,
    next_action: u64,
    next_timer: u64,
    speed: f64,
    clock: f64,
}

impl Default for RefHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RefHost {
    /// Creates an empty host running at speed `1`.
    pub fn new() -> Self {
        Self {
            world: None,
            bodies: Vec::new(),
            running: Vec::new(),
            timers: Vec::new(),
            finished: Vec::new(),
            started: Vec::new(),
            next_action: 1,
            next_timer: 1,
            speed: 1.0,
            clock: 0.0,
        }
    }

    /// Last world configuration pushed by the scene.
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    /// Virtual time in seconds.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Bodies in insertion order.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Looks up a body.
    pub fn body(&self, id: NodeId) -> Option<&Body> {
        self.bodies.iter().find(|body| body.id == id)
    }

    /// Teleports a body, clearing its velocity.
    pub fn place(&mut self, id: NodeId, position: Point) {
        if let Some(body) = self.body_mut(id) {
            body.position = position;
            body.velocity = Vec2::ZERO;
        }
    }

    /// Every action started so far, in start order.
    pub fn started_actions(&self) -> &[StartedAction] {
        &self.started
    }

    /// Number of actions still playing.
    pub fn running_actions(&self) -> usize {
        self.running.len()
    }

    /// Number of live timers.
    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    fn body_mut(&mut self, id: NodeId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|body| body.id == id)
    }

    fn step_physics(&mut self, dt: f64) {
        let Some(world) = self.world.as_ref() else {
            return;
        };
        let field = world.field;
        let boundary = world.boundary;
        let gravity = world.gravity;

        for body in &mut self.bodies {
            let force = core::mem::take(&mut body.force);
            if dt <= 0.0 || !body.is_dynamic() {
                continue;
            }
            let Some(physics) = body.physics.as_ref() else {
                continue;
            };
            let mass = Body::mass(physics);
            let mut acceleration = field_acceleration(&field, body.position);
            if physics.affected_by_gravity {
                acceleration += gravity;
            }
            if mass > 0.0 {
                acceleration += force / mass;
            }
            body.velocity += acceleration * dt;
            body.velocity /= 1.0 + physics.linear_damping.max(0.0) * dt;
            body.position += body.velocity * dt;
        }
        if dt > 0.0 {
            self.separate();
            for body in &mut self.bodies {
                if body.is_dynamic() {
                    let radius = body.radius();
                    body.position = clamp_into(boundary, body.position, radius);
                }
            }
        }
    }

    /// Pushes overlapping bodies apart along the line between their centers.
    fn separate(&mut self) {
        let count = self.bodies.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let (a, b) = (&self.bodies[i], &self.bodies[j]);
                if !a.is_dynamic() || !b.is_dynamic() {
                    continue;
                }
                let offset = b.position - a.position;
                let distance = offset.hypot();
                let overlap = a.radius() + b.radius() - distance;
                if overlap <= 0.0 {
                    continue;
                }
                let normal = if distance > f64::EPSILON {
                    offset / distance
                } else {
                    Vec2::new(1.0, 0.0)
                };
                let push = normal * (overlap / 2.0);
                self.bodies[i].position -= push;
                self.bodies[j].position += push;
            }
        }
    }

    fn step_actions(&mut self, dt: f64, events: &mut Vec<HostEvent>) {
        events.extend(self.finished.drain(..).map(HostEvent::ActionFinished));
        let mut index = 0;
        while index < self.running.len() {
            let running = &mut self.running[index];
            let body = self.bodies.iter_mut().find(|body| body.id == running.node);
            if running.track.advance(body, dt).is_some() {
                events.push(HostEvent::ActionFinished(running.id));
                self.running.remove(index);
            } else {
                index += 1;
            }
        }
    }

    fn step_timers(&mut self, events: &mut Vec<HostEvent>) {
        for timer in &mut self.timers {
            if timer.interval <= 0.0 {
                events.push(HostEvent::TimerFired(timer.id));
                continue;
            }
            while timer.next_fire <= self.clock {
                events.push(HostEvent::TimerFired(timer.id));
                timer.next_fire += timer.interval;
            }
        }
    }
}

fn field_acceleration(field: &ForceField, position: Point) -> Vec2 {
    let offset = field.position - position;
    let distance = offset.hypot();
    if distance <= f64::EPSILON || distance > field.region_radius {
        return Vec2::ZERO;
    }
    offset / distance * field.strength
}

fn clamp_into(boundary: Rect, position: Point, radius: f64) -> Point {
    let clamp = |value: f64, low: f64, high: f64| {
        if low <= high {
            value.clamp(low, high)
        } else {
            (low + high) / 2.0
        }
    };
    Point::new(
        clamp(position.x, boundary.x0 + radius, boundary.x1 - radius),
        clamp(position.y, boundary.y0 + radius, boundary.y1 - radius),
    )
}

impl TextMeasure for RefHost {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "character counts of labels fit in u32"
    )]
    fn text_width(&self, text: &str, font: &Font) -> f64 {
        let count = text.chars().count() as u32;
        f64::from(count) * font.size * CHARACTER_ADVANCE
    }
}

impl Host for RefHost {
    fn configure_world(&mut self, world: &World) {
        self.world = Some(world.clone());
    }

    fn add_node(&mut self, id: NodeId, position: Point, node: &Node) {
        self.bodies.retain(|body| body.id != id);
        self.bodies.push(Body::new(id, position, node));
    }

    fn update_node(&mut self, id: NodeId, node: &Node) {
        let Some(body) = self.body_mut(id) else {
            return;
        };
        let appearance = node.appearance();
        body.fill_color = appearance.fill_color;
        body.fill_texture = appearance.fill_texture;
        body.font_color = appearance.font_color;
        if body.physics.is_some() {
            body.physics = Some(node.physics_body());
        }
    }

    fn detach_body(&mut self, id: NodeId) {
        if let Some(body) = self.body_mut(id) {
            body.physics = None;
            body.velocity = Vec2::ZERO;
        }
    }

    fn remove_node(&mut self, id: NodeId) {
        self.bodies.retain(|body| body.id != id);
        let finished = self.running.iter().filter(|running| running.node == id);
        self.finished.extend(finished.map(|running| running.id));
        self.running.retain(|running| running.node != id);
    }

    fn transform(&self, id: NodeId) -> Option<Affine> {
        self.body(id)
            .map(|body| Affine::translate(body.position.to_vec2()) * Affine::scale(body.scale))
    }

    fn apply_force(&mut self, id: NodeId, force: Vec2) {
        if let Some(body) = self.body_mut(id) {
            body.force += force;
        }
    }

    fn run_action(&mut self, id: NodeId, action: Action) -> ActionId {
        let action_id = ActionId(self.next_action);
        self.next_action += 1;
        self.started.push(StartedAction {
            id: action_id,
            node: id,
            action: action.clone(),
            started_at: self.clock,
        });
        self.running.push(Running {
            id: action_id,
            node: id,
            track: Track::new(action),
        });
        action_id
    }

    fn schedule_repeating(&mut self, interval: f64) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.timers.push(Timer {
            id,
            interval,
            next_fire: self.clock + interval.max(0.0),
        });
        id
    }

    fn cancel_timer(&mut self, id: TimerId) {
        self.timers.retain(|timer| timer.id != id);
    }

    fn speed(&self) -> f64 {
        self.speed
    }

    fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }
}

impl Step for RefHost {
    fn step(&mut self, dt: f64) -> Vec<HostEvent> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut events = Vec::new();
        self.clock += dt;
        self.step_physics(dt * self.speed);
        self.step_actions(dt, &mut events);
        self.step_timers(&mut events);
        events
    }
}
