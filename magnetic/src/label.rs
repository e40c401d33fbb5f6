// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-line node labels.
//!
//! Words are greedily packed into lines no wider than [`Label::width`], as
//! measured by the host's [`TextMeasure`]. A word wider than the wrap width
//! still gets a line of its own. Laid-out lines are centered vertically on the
//! node origin; scene space is y-up, so the first line sits highest.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;
use peniko::Color;

use crate::host::TextMeasure;

/// Font family and size.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    /// Family or face name understood by the host.
    pub family: String,
    /// Point size.
    pub size: f64,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: String::from("Avenir-Black"),
            size: 12.0,
        }
    }
}

/// One laid-out line.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelLine {
    /// Line contents.
    pub text: String,
    /// Baseline-center position relative to the node origin.
    pub position: Point,
}

/// A wrapped text label owned by a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    /// Full text, or `None` for no label.
    pub text: Option<String>,
    /// Font used for measuring and drawing.
    pub font: Font,
    /// Text color.
    pub color: Color,
    /// Word separator; `None` wraps per character.
    pub separator: Option<String>,
    /// Wrap width.
    pub width: f64,
    /// Line spacing; defaults to the font size.
    pub line_height: Option<f64>,
    lines: Vec<LabelLine>,
}

impl Label {
    /// An empty, space-separated label wrapping at `width`.
    #[must_use]
    pub fn new(text: Option<String>, width: f64) -> Self {
        Self {
            text,
            font: Font::default(),
            color: Color::WHITE,
            separator: Some(String::from(" ")),
            width,
            line_height: None,
            lines: Vec::new(),
        }
    }

    /// Lines produced by the last [`Label::layout`].
    #[must_use]
    pub fn lines(&self) -> &[LabelLine] {
        &self.lines
    }

    /// Re-wraps the text into lines.
    pub fn layout<M: TextMeasure + ?Sized>(&mut self, measure: &M) {
        self.lines.clear();
        let Some(text) = self.text.as_deref() else {
            return;
        };

        let joiner = self.separator.as_deref().filter(|sep| !sep.is_empty());
        let words: Vec<&str> = match joiner {
            Some(sep) => text.split(sep).collect(),
            None => text
                .char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect(),
        };
        let joiner = joiner.unwrap_or("");

        let mut groups: Vec<Vec<&str>> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut sizing = String::new();
        for word in words {
            let mut candidate = sizing.clone();
            if !current.is_empty() {
                candidate.push_str(joiner);
            }
            candidate.push_str(word);
            if !current.is_empty() && measure.text_width(&candidate, &self.font) > self.width {
                groups.push(core::mem::take(&mut current));
                sizing = String::from(word);
            } else {
                sizing = candidate;
            }
            current.push(word);
        }
        groups.push(current);

        let line_height = self.line_height.unwrap_or(self.font.size);
        let count = groups.len() as f64;
        for (index, words) in groups.into_iter().enumerate() {
            let index = index as f64;
            let y = (index - count / 2.0 + 0.5) * -line_height;
            self.lines.push(LabelLine {
                text: words.join(joiner),
                position: Point::new(0.0, y),
            });
        }
    }
}
