// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color interpolation used by [`Action::ColorTransition`](crate::Action::ColorTransition).

use peniko::Color;

/// Linear interpolation between two scalars.
#[must_use]
pub fn lerp(a: f64, b: f64, fraction: f64) -> f64 {
    (b - a) * fraction + a
}

/// Interpolates every RGBA component of `from` toward `to`.
///
/// `fraction` is clamped to `[0, 1]`; non-finite fractions yield `from`.
#[must_use]
pub fn lerp_color(from: Color, to: Color, fraction: f64) -> Color {
    let t = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let a = from.components;
    let b = to.components;
    let mut out = [0.0_f32; 4];
    for (i, c) in out.iter_mut().enumerate() {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "color components are stored as f32"
        )]
        let component = lerp(f64::from(a[i]), f64::from(b[i]), t) as f32;
        *c = component;
    }
    Color::new(out)
}
