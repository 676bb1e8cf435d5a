//! Advance widths for the PDF builtin Helvetica fonts.
//!
//! The standard 14 PDF fonts are never embedded, so sizing text for
//! layout means carrying their AFM advance widths (1000 units per em).
//! Tables cover printable ASCII (0x20..=0x7E); anything outside that
//! range falls back to the lowercase average.

/// Font variant of a text run. Only the two Helvetica faces the
/// certificate uses are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Bold,
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width of one glyph in 1000ths of an em.
fn glyph_width(style: FontStyle, ch: char) -> u16 {
    let table = match style {
        FontStyle::Normal => &HELVETICA,
        FontStyle::Bold => &HELVETICA_BOLD,
    };
    let idx = ch as u32;
    if (0x20..=0x7E).contains(&idx) {
        table[(idx - 0x20) as usize]
    } else {
        // Lowercase 'o' width, a serviceable stand-in for the odd
        // accented character in a holder name.
        table[(b'o' - 0x20) as usize]
    }
}

/// Rendered width of `text` at `size` points.
pub fn string_width(text: &str, style: FontStyle, size: f64) -> f64 {
    let units: u32 = text.chars().map(|c| glyph_width(style, c) as u32).sum();
    units as f64 * size / 1000.0
}
