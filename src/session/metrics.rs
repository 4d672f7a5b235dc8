//! Approximate text measurement.
//!
//! The PPTX backend has no layout engine to ask for text extents, so fit
//! decisions rest on per-character advance widths and a greedy word wrap.
//! The widths are rough sans-serif figures in ems; they only need to rank
//! sizes consistently, not match the converter's rasterization.

/// Line height as a multiple of the font size.
pub const LINE_SPACING: f32 = 1.2;

/// Default left/right text inset of a text box, in points (0.1 inch).
pub const SIDE_INSET_PT: f32 = 7.2;

/// Default top/bottom text inset, in points (0.05 inch).
pub const VERTICAL_INSET_PT: f32 = 3.6;

fn char_width_em(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '\'' | '.' | ',' | ':' | ';' | '!' | '|' => 0.30,
        'f' | 'r' | 't' => 0.38,
        'm' | 'w' => 0.78,
        'M' | 'W' => 0.92,
        ' ' => 0.28,
        c if c.is_ascii_uppercase() => 0.66,
        c if c.is_ascii_digit() => 0.52,
        _ => 0.50,
    }
}

/// Width of a single unwrapped line, in points.
pub fn line_width(text: &str, size_pt: f32) -> f32 {
    text.chars().map(char_width_em).sum::<f32>() * size_pt
}

/// Rendered extent `(width, height)` of text wrapped into `avail_width`.
///
/// Wrapping is greedy on whitespace. A token wider than the available width
/// keeps its own line unbroken, so the returned width exceeds `avail_width`
/// exactly when such a token exists.
pub fn text_extent(text: &str, size_pt: f32, avail_width: f32) -> (f32, f32) {
    let space = char_width_em(' ') * size_pt;

    let mut widest = 0.0f32;
    let mut lines = 0usize;
    let mut current = 0.0f32;

    for word in text.split_whitespace() {
        let width = line_width(word, size_pt);
        if lines == 0 {
            lines = 1;
            current = width;
        } else if current + space + width <= avail_width {
            current += space + width;
        } else {
            widest = widest.max(current);
            lines += 1;
            current = width;
        }
    }
    widest = widest.max(current);

    (widest, lines as f32 * size_pt * LINE_SPACING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_extent() {
        assert_eq!(text_extent("", 12.0, 100.0), (0.0, 0.0));
    }

    #[test]
    fn test_single_line_fits() {
        let (width, height) = text_extent("on one line", 12.0, 1000.0);
        assert!(width <= 1000.0);
        assert_eq!(height, 12.0 * LINE_SPACING);
    }

    #[test]
    fn test_narrow_frame_wraps() {
        let wide = text_extent("alpha beta gamma", 12.0, 1000.0);
        let narrow = text_extent("alpha beta gamma", 12.0, 40.0);
        assert!(narrow.1 > wide.1);
        assert!(narrow.0 <= 40.0);
    }

    #[test]
    fn test_oversized_token_overflows_width() {
        let (width, _) = text_extent("antidisestablishmentarianism", 12.0, 40.0);
        assert!(width > 40.0);
    }

    #[test]
    fn test_smaller_size_shrinks_extent() {
        let large = text_extent("several words of card text", 12.0, 80.0);
        let small = text_extent("several words of card text", 6.0, 80.0);
        assert!(small.0 <= large.0);
        assert!(small.1 <= large.1);
    }
}
