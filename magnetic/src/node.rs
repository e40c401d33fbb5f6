// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bubble nodes and their selection state machine.
//!
//! A [`Node`] is plain data plus a two-state visual machine:
//!
//! ```text
//!   Unselected ──select──▶ Selected
//!       ▲                      │
//!       └──────deselect────────┘
//! ```
//!
//! plus a terminal [`Phase::Removing`] entered once a removal is requested.
//! Transitions are driven only by the owning [`Magnetic`](crate::Magnetic)
//! scene. Each transition updates the node's resting [`Appearance`]
//! immediately and returns the [`Action`] the host should play to get there.
//!
//! What a transition looks like is decided by a [`NodeAnimations`]
//! implementation. [`DefaultAnimations`] scales, swaps in the image texture,
//! and cross-fades colors; [`StaticAnimations`] is the image-only variant that
//! shows its texture at rest and ignores selection.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Size;
use peniko::Color;

use crate::action::{Action, ColorTarget};
use crate::host::{PhysicsBody, TextMeasure};
use crate::label::Label;
use crate::shape::Shape;

/// Identifier for a node inside one scene.
///
/// Handed out by [`Magnetic::insert`](crate::Magnetic::insert). Identifiers
/// are never reused within a scene, so a stale `NodeId` never aliases a
/// different live node; operations on it are no-ops.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// Raw value, for hosts keying their own storage.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Builds an id from a raw value. Intended for hosts and tests.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Handle to an image decoded and owned by the host.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// An image a node can display, by handle and natural size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Image {
    /// Host handle.
    pub id: ImageId,
    /// Natural size in pixels.
    pub size: Size,
}

/// An image fitted to a node's frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Texture {
    /// Source image.
    pub image: ImageId,
    /// Frame the texture fills.
    pub size: Size,
    /// Uniform scale applied to the image so it covers `size`.
    pub scale: f64,
}

impl Texture {
    /// Scales `image` so it covers `frame` entirely, cropping the overflow.
    ///
    /// Images without a positive size keep a scale of `1`.
    #[must_use]
    pub fn aspect_fill(image: &Image, frame: Size) -> Self {
        let Size { width, height } = image.size;
        let scale = if width > 0.0 && height > 0.0 {
            (frame.width / width).max(frame.height / height)
        } else {
            1.0
        };
        Self {
            image: image.id,
            size: frame,
            scale,
        }
    }
}

/// Per-node animation and sizing settings.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
    /// Scale while selected.
    pub selected_scale: f64,
    /// Scale while unselected.
    pub deselected_scale: f64,
    /// Duration of selection and removal animations, in seconds.
    pub animation_duration: f64,
    /// Fill color while selected; `None` keeps the resting color.
    pub selected_color: Option<Color>,
    /// Label color while selected; `None` keeps the resting color.
    pub selected_font_color: Option<Color>,
    /// Resize the node to fit its label.
    pub scale_to_fit_content: bool,
    /// Padding around the label when resizing to fit.
    pub padding: f64,
    /// Factor by which the collision body exceeds the visible outline.
    pub margin_scale: f64,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            selected_scale: 4.0 / 3.0,
            deselected_scale: 1.0,
            animation_duration: 0.2,
            selected_color: None,
            selected_font_color: None,
            scale_to_fit_content: false,
            padding: 20.0,
            margin_scale: 1.01,
        }
    }
}

/// The resting visual state reached once the last animation completes.
#[derive(Clone, Debug, PartialEq)]
pub struct Appearance {
    /// Uniform scale.
    pub scale: f64,
    /// Opacity.
    pub alpha: f64,
    /// Fill color.
    pub fill_color: Color,
    /// Fill texture, drawn over the fill color.
    pub fill_texture: Option<Texture>,
    /// Label color.
    pub font_color: Color,
}

/// Lifecycle phase of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// In the scene and interactive.
    Live,
    /// Playing its exit animation; detached once the host reports completion.
    Removing,
}

/// What an animation hook may read and update.
#[derive(Debug)]
pub struct AnimationContext<'a> {
    /// The node's style.
    pub style: &'a NodeStyle,
    /// Resting fill color.
    pub color: Color,
    /// Resting label color.
    pub font_color: Color,
    /// Texture built from the node's image, if any.
    pub texture: Option<&'a Texture>,
    /// Resting appearance, to be updated to the animation's end state.
    pub appearance: &'a mut Appearance,
}

/// Selection and removal animation hooks.
///
/// Implementations update [`AnimationContext::appearance`] to the end state
/// and return the action that animates there. Override only the hooks a
/// variant needs.
pub trait NodeAnimations: fmt::Debug {
    /// Played when the node becomes selected.
    fn selected(&self, cx: &mut AnimationContext<'_>) -> Action {
        let duration = cx.style.animation_duration;
        let mut parts = Vec::new();

        cx.appearance.scale = cx.style.selected_scale;
        parts.push(Action::ScaleTo {
            scale: cx.style.selected_scale,
            duration,
        });
        if let Some(texture) = cx.texture {
            cx.appearance.fill_texture = Some(*texture);
            parts.push(Action::SetFillTexture(Some(*texture)));
        }
        if let Some(selected) = cx.style.selected_color {
            cx.appearance.fill_color = selected;
            parts.push(Action::ColorTransition {
                target: ColorTarget::Fill,
                from: cx.color,
                to: selected,
                duration,
            });
        }
        if let Some(selected) = cx.style.selected_font_color {
            cx.appearance.font_color = selected;
            parts.push(Action::ColorTransition {
                target: ColorTarget::Font,
                from: cx.font_color,
                to: selected,
                duration,
            });
        }
        Action::group(parts)
    }

    /// Played when the node becomes unselected.
    fn deselected(&self, cx: &mut AnimationContext<'_>) -> Action {
        let duration = cx.style.animation_duration;
        let mut parts = Vec::new();

        cx.appearance.scale = cx.style.deselected_scale;
        parts.push(Action::ScaleTo {
            scale: cx.style.deselected_scale,
            duration,
        });
        cx.appearance.fill_texture = None;
        parts.push(Action::SetFillTexture(None));
        cx.appearance.fill_color = cx.color;
        match cx.style.selected_color {
            Some(selected) => parts.push(Action::ColorTransition {
                target: ColorTarget::Fill,
                from: selected,
                to: cx.color,
                duration,
            }),
            None => parts.push(Action::SetFillColor(cx.color)),
        }
        if let Some(selected) = cx.style.selected_font_color {
            cx.appearance.font_color = cx.font_color;
            parts.push(Action::ColorTransition {
                target: ColorTarget::Font,
                from: selected,
                to: cx.font_color,
                duration,
            });
        }
        Action::group(parts)
    }

    /// Played once when the node is removed; the node is detached when it
    /// finishes.
    fn removed(&self, cx: &mut AnimationContext<'_>) -> Action {
        let duration = cx.style.animation_duration;
        cx.appearance.alpha = 0.0;
        cx.appearance.scale = 0.0;
        Action::Group(alloc::vec![
            Action::FadeTo {
                alpha: 0.0,
                duration,
            },
            Action::ScaleTo {
                scale: 0.0,
                duration,
            },
        ])
    }
}

/// Scale, texture swap, and optional color cross-fades.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultAnimations;

impl NodeAnimations for DefaultAnimations {}

/// Image-only nodes: the texture is always shown and selection is not animated.
#[derive(Copy, Clone, Debug, Default)]
pub struct StaticAnimations;

impl NodeAnimations for StaticAnimations {
    fn selected(&self, _cx: &mut AnimationContext<'_>) -> Action {
        Action::empty()
    }

    fn deselected(&self, _cx: &mut AnimationContext<'_>) -> Action {
        Action::empty()
    }
}

/// One selectable bubble.
#[derive(Debug)]
pub struct Node {
    shape: Shape,
    label: Label,
    image: Option<Image>,
    texture: Option<Texture>,
    color: Color,
    stroke_color: Color,
    mass: Option<f64>,
    is_selected: bool,
    phase: Phase,
    appearance: Appearance,
    style: NodeStyle,
    animations: Box<dyn NodeAnimations>,
}

impl Node {
    /// Creates a node with a custom outline.
    ///
    /// The label wraps at the outline's width until the node is laid out by
    /// its scene.
    #[must_use]
    pub fn new(text: Option<String>, image: Option<Image>, color: Color, shape: Shape) -> Self {
        let frame = shape.bounding_box().size();
        let label = Label::new(text, frame.width);
        let appearance = Appearance {
            scale: 1.0,
            alpha: 1.0,
            fill_color: color,
            fill_texture: None,
            font_color: label.color,
        };
        Self {
            texture: image.as_ref().map(|image| Texture::aspect_fill(image, frame)),
            shape,
            label,
            image,
            color,
            stroke_color: Color::WHITE,
            mass: None,
            is_selected: false,
            phase: Phase::Live,
            appearance,
            style: NodeStyle::default(),
            animations: Box::new(DefaultAnimations),
        }
    }

    /// Creates a circular node.
    ///
    /// # Panics
    ///
    /// Panics if `radius` is negative or not finite.
    #[must_use]
    pub fn circle(text: Option<String>, image: Option<Image>, color: Color, radius: f64) -> Self {
        Self::new(text, image, color, Shape::circle(radius))
    }

    /// Creates an image-only node that shows its texture at rest and does not
    /// animate on selection.
    #[must_use]
    pub fn image_node(text: Option<String>, image: Image, color: Color, shape: Shape) -> Self {
        let frame = shape.bounding_box().size();
        let mut node = Self::new(text, None, color, shape).with_animations(StaticAnimations);
        // Shown as-is rather than cropped to the frame.
        let texture = Texture {
            image: image.id,
            size: frame,
            scale: 1.0,
        };
        node.image = Some(image);
        node.texture = Some(texture);
        node.appearance.fill_texture = Some(texture);
        node
    }

    /// Replaces the style.
    #[must_use]
    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = style;
        self
    }

    /// Replaces the animation hooks.
    #[must_use]
    pub fn with_animations(mut self, animations: impl NodeAnimations + 'static) -> Self {
        self.animations = Box::new(animations);
        self
    }

    /// Sets an explicit body mass instead of the host-derived one.
    #[must_use]
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Visible outline in local coordinates.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The label.
    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Mutable access to the label. Layout is refreshed by
    /// [`Magnetic::update_node`](crate::Magnetic::update_node).
    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    /// Label text.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.label.text.as_deref()
    }

    /// Replaces the label text.
    pub fn set_text(&mut self, text: Option<String>) {
        self.label.text = text;
    }

    /// The image, if any.
    #[must_use]
    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    /// Texture derived from the image.
    #[must_use]
    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    /// Replaces the image and rebuilds the texture.
    pub fn set_image(&mut self, image: Option<Image>) {
        self.image = image;
        self.rebuild_texture();
    }

    /// Resting fill color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Replaces the resting fill color; shown right away unless a selected
    /// color currently overrides it.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        if !(self.is_selected && self.style.selected_color.is_some()) {
            self.appearance.fill_color = color;
        }
    }

    /// Outline color.
    #[must_use]
    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    /// Replaces the outline color.
    pub fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    /// Whether the node is selected.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    /// Lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Resting appearance after the last transition.
    #[must_use]
    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    /// The style.
    #[must_use]
    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    /// Mutable access to the style. Sizing changes apply on the next
    /// [`Magnetic::update_node`](crate::Magnetic::update_node).
    pub fn style_mut(&mut self) -> &mut NodeStyle {
        &mut self.style
    }

    /// Frame size at the current resting scale.
    #[must_use]
    pub fn frame_size(&self) -> Size {
        let size = self.shape.bounding_box().size();
        Size::new(
            size.width * self.appearance.scale,
            size.height * self.appearance.scale,
        )
    }

    /// Collision body: the outline grown by [`NodeStyle::margin_scale`].
    #[must_use]
    pub fn physics_body(&self) -> PhysicsBody {
        let mut body = PhysicsBody::floating(self.shape.scaled(self.style.margin_scale));
        body.mass = self.mass;
        body
    }

    /// Applies resize-to-fit and re-wraps the label.
    ///
    /// Returns `true` if the outline changed, meaning the collision body must
    /// be regenerated.
    pub(crate) fn refresh_layout<M: TextMeasure + ?Sized>(&mut self, measure: &M) -> bool {
        let mut changed = false;
        if self.style.scale_to_fit_content {
            if let Some(text) = self.label.text.as_deref() {
                let width = extent(measure.text_width(text, &self.label.font));
                let shape = Shape::circle(extent(width / 2.0 + extent(self.style.padding)));
                if shape != self.shape {
                    self.shape = shape;
                    changed = true;
                }
                self.label.width = width;
            }
        }
        if changed {
            self.rebuild_texture();
        }
        self.label.layout(measure);
        changed
    }

    /// Flips the selection state, returning the animation to play, or `None`
    /// if the state already matched.
    pub(crate) fn set_selected(&mut self, selected: bool) -> Option<Action> {
        if self.is_selected == selected {
            return None;
        }
        self.is_selected = selected;
        let mut cx = AnimationContext {
            style: &self.style,
            color: self.color,
            font_color: self.label.color,
            texture: self.texture.as_ref(),
            appearance: &mut self.appearance,
        };
        Some(if selected {
            self.animations.selected(&mut cx)
        } else {
            self.animations.deselected(&mut cx)
        })
    }

    /// Enters [`Phase::Removing`], returning the exit animation, or `None` if
    /// removal was already requested.
    pub(crate) fn begin_removal(&mut self) -> Option<Action> {
        if self.phase == Phase::Removing {
            return None;
        }
        self.phase = Phase::Removing;
        let mut cx = AnimationContext {
            style: &self.style,
            color: self.color,
            font_color: self.label.color,
            texture: self.texture.as_ref(),
            appearance: &mut self.appearance,
        };
        Some(self.animations.removed(&mut cx))
    }

    /// Records a scale reached outside the selection machine (reset throws).
    pub(crate) fn set_resting_scale(&mut self, scale: f64) {
        self.appearance.scale = scale;
    }

    fn rebuild_texture(&mut self) {
        let frame = self.shape.bounding_box().size();
        self.texture = self
            .image
            .as_ref()
            .map(|image| Texture::aspect_fill(image, frame));
        if self.appearance.fill_texture.is_some() {
            self.appearance.fill_texture = self.texture;
        }
    }
}

/// Clamps a measured length to a finite, non-negative value.
fn extent(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Font;

    struct Mono;

    impl TextMeasure for Mono {
        fn text_width(&self, text: &str, font: &Font) -> f64 {
            text.chars().count() as f64 * font.size / 2.0
        }
    }

    fn photo() -> Image {
        Image {
            id: ImageId(7),
            size: Size::new(200.0, 100.0),
        }
    }

    #[test]
    fn aspect_fill_covers_frame() {
        let texture = Texture::aspect_fill(&photo(), Size::new(80.0, 80.0));
        assert_eq!(texture.scale, 0.8);
        assert!(200.0 * texture.scale >= 80.0 && 100.0 * texture.scale >= 80.0);
    }

    #[test]
    fn selecting_scales_and_swaps_texture() {
        let mut node = Node::circle(Some("Rock".into()), Some(photo()), Color::BLACK, 40.0);
        let action = node.set_selected(true).unwrap();

        assert!(node.is_selected());
        assert_eq!(node.appearance().scale, 4.0 / 3.0);
        assert_eq!(node.appearance().fill_texture, node.texture().copied());
        assert_eq!(action.duration(), 0.2);
    }

    #[test]
    fn double_toggle_restores_appearance() {
        let mut node = Node::circle(Some("Pop".into()), Some(photo()), Color::BLACK, 40.0)
            .with_style(NodeStyle {
                selected_color: Some(Color::WHITE),
                selected_font_color: Some(Color::BLACK),
                ..NodeStyle::default()
            });
        let before = node.appearance().clone();

        node.set_selected(true);
        assert_ne!(node.appearance(), &before);
        node.set_selected(false);
        assert_eq!(node.appearance(), &before);
    }

    #[test]
    fn redundant_transition_is_a_no_op() {
        let mut node = Node::circle(None, None, Color::BLACK, 10.0);
        assert!(node.set_selected(false).is_none());
        assert!(node.set_selected(true).is_some());
        assert!(node.set_selected(true).is_none());
    }

    #[test]
    fn static_animations_keep_texture_at_rest() {
        let shape = Shape::circle(30.0);
        let mut node = Node::image_node(None, photo(), Color::BLACK, shape);
        let before = node.appearance().clone();
        assert!(before.fill_texture.is_some());

        let action = node.set_selected(true).unwrap();
        assert!(action.is_empty());
        assert_eq!(node.appearance(), &before);
    }

    #[test]
    fn removal_happens_once() {
        let mut node = Node::circle(None, None, Color::BLACK, 10.0);
        let exit = node.begin_removal().unwrap();
        assert_eq!(exit.duration(), 0.2);
        assert_eq!(node.phase(), Phase::Removing);
        assert_eq!(node.appearance().alpha, 0.0);
        assert!(node.begin_removal().is_none());
    }

    #[test]
    fn resize_to_fit_regenerates_outline_and_body() {
        let mut node = Node::circle(Some("Classical".into()), None, Color::BLACK, 40.0)
            .with_style(NodeStyle {
                scale_to_fit_content: true,
                ..NodeStyle::default()
            });
        // 9 characters at 6 units each.
        assert!(node.refresh_layout(&Mono));
        assert_eq!(node.shape(), &Shape::Circle { radius: 27.0 + 20.0 });
        assert_eq!(node.label().width, 54.0);

        let Shape::Circle { radius } = node.physics_body().shape else {
            panic!("circular nodes get circular bodies");
        };
        assert!(radius >= 47.0 * 1.01 - 1e-9);

        // Nothing changed since the last layout.
        assert!(!node.refresh_layout(&Mono));
    }

    /// Reports an unbounded width for every string.
    struct Unbounded;

    impl TextMeasure for Unbounded {
        fn text_width(&self, _text: &str, _font: &Font) -> f64 {
            f64::INFINITY
        }
    }

    #[test]
    fn resize_to_fit_survives_non_finite_measurements() {
        let mut node = Node::circle(Some("Ambient".into()), None, Color::BLACK, 40.0)
            .with_style(NodeStyle {
                scale_to_fit_content: true,
                padding: f64::INFINITY,
                ..NodeStyle::default()
            });
        node.refresh_layout(&Unbounded);
        assert_eq!(node.shape(), &Shape::Circle { radius: 0.0 });
        assert_eq!(node.label().width, 0.0);

        node.style_mut().padding = f64::MAX;
        node.refresh_layout(&Mono);
        let Shape::Circle { radius } = *node.shape() else {
            panic!("resize-to-fit keeps nodes circular");
        };
        assert!(radius.is_finite());
    }

    #[test]
    fn frame_follows_resting_scale() {
        let mut node = Node::circle(None, None, Color::BLACK, 30.0);
        assert_eq!(node.frame_size(), Size::new(60.0, 60.0));
        node.set_selected(true);
        assert!((node.frame_size().width - 80.0).abs() < 1e-9);
    }
}
