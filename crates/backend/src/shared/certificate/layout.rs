//! Text placement for the certificate page.
//!
//! All coordinates are PDF points with the origin at the bottom-left
//! corner of the page, the same space the draw calls use. Keeping the
//! flow logic free of any PDF handle makes the line breaking
//! deterministic and testable.

use super::metrics::{string_width, FontStyle};

/// A piece of text with a single style, flowed inline with its
/// neighbours.
#[derive(Debug, Clone)]
pub struct Run {
    pub text: String,
    pub style: FontStyle,
}

impl Run {
    pub fn normal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: FontStyle::Normal,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: FontStyle::Bold,
        }
    }
}

/// Text ready to draw: content, face, size and baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub style: FontStyle,
    pub size: f64,
    pub x: f64,
    pub y: f64,
}

/// Flows mixed-style runs left to right from (`start_x`, `start_y`).
/// A run whose rendered width would cross `max_x` starts a new line
/// at `start_x` before it is placed. Returns the placements and the
/// baseline of the last line.
pub fn flow_runs(
    runs: &[Run],
    start_x: f64,
    start_y: f64,
    max_x: f64,
    size: f64,
    line_height: f64,
) -> (Vec<PlacedText>, f64) {
    let mut placed = Vec::with_capacity(runs.len());
    let mut x = start_x;
    let mut y = start_y;
    for run in runs {
        let width = string_width(&run.text, run.style, size);
        if x + width > max_x {
            y -= line_height;
            x = start_x;
        }
        placed.push(PlacedText {
            text: run.text.clone(),
            style: run.style,
            size,
            x,
            y,
        });
        x += width;
    }
    (placed, y)
}

/// Word-wraps a paragraph at a fixed character width and stacks the
/// lines downward from `start_y`. Returns the placements and the
/// baseline one line below the last placed line (the position the
/// next block starts at).
pub fn flow_paragraph(
    text: &str,
    style: FontStyle,
    wrap_chars: usize,
    start_x: f64,
    start_y: f64,
    size: f64,
    line_height: f64,
) -> (Vec<PlacedText>, f64) {
    let mut placed = Vec::new();
    let mut y = start_y;
    for line in textwrap::wrap(text, wrap_chars) {
        placed.push(PlacedText {
            text: line.into_owned(),
            style,
            size,
            x: start_x,
            y,
        });
        y -= line_height;
    }
    (placed, y)
}

/// X coordinate at which `text` must start so that it is centered on
/// `center_x`.
pub fn centered_x(text: &str, style: FontStyle, size: f64, center_x: f64) -> f64 {
    center_x - string_width(text, style, size) / 2.0
}
