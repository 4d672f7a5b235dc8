//! Font sizing: starting size and the shrink-to-fit loop.

use crate::session::ShapeHandle;

/// Maximum rendered cell height, in points.
pub const MAX_SHAPE_HEIGHT: f32 = 73.0;

/// How far each filled cell is raised from its template position, in points.
pub const SHAPE_RAISE: f32 = 35.0;

/// Font size phrases start from.
pub const BASE_FONT_SIZE: f32 = 12.0;

/// Hard floor for the shrink loop.
pub const MIN_FONT_SIZE: f32 = 6.0;

/// Size removed per shrink iteration.
pub const SHRINK_STEP: f32 = 0.5;

/// Tokens longer than this many characters drop the starting size to 80%.
pub const LONG_WORD_LEN: usize = 11;

const LONG_WORD_SCALE: f32 = 0.8;

/// Starting font size for a phrase: 12 pt, or 9.6 pt when a single token is
/// too long to stand a chance at full size.
pub fn starting_size(phrase: &str) -> f32 {
    let has_long_word = phrase
        .split_whitespace()
        .any(|word| word.chars().count() > LONG_WORD_LEN);

    if has_long_word {
        BASE_FONT_SIZE * LONG_WORD_SCALE
    } else {
        BASE_FONT_SIZE
    }
}

/// Shrink the font until the text fits its cell.
///
/// Each step removes [`SHRINK_STEP`]; the loop stops once the rendered
/// height is within [`MAX_SHAPE_HEIGHT`] and the text width is within the
/// shape width, or at [`MIN_FONT_SIZE`] regardless of fit.
pub fn shrink_to_fit<S: ShapeHandle + ?Sized>(shape: &mut S) {
    while shape.height() > MAX_SHAPE_HEIGHT || shape.text_width() > shape.width() {
        let size = shape.font_size();
        if size <= MIN_FONT_SIZE {
            break;
        }
        shape.set_font_size((size - SHRINK_STEP).max(MIN_FONT_SIZE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fake::FakeShape;

    #[test]
    fn test_starting_size_plain_phrase() {
        assert_eq!(starting_size("all short words"), 12.0);
        assert_eq!(starting_size("elevenchars fits"), 12.0);
    }

    #[test]
    fn test_starting_size_long_word() {
        assert_eq!(starting_size("antidisestablishmentarianism"), 9.6);
        assert_eq!(starting_size("one twelvecharss two"), 9.6);
    }

    #[test]
    fn test_fitting_text_keeps_starting_size() {
        let mut shape = FakeShape::placeholder(200.0);
        shape.set_text("short");
        shape.set_font_size(starting_size("short"));

        shrink_to_fit(&mut shape);
        assert_eq!(shape.font_size, 12.0);
    }

    #[test]
    fn test_unfittable_text_stops_at_floor() {
        let mut shape = FakeShape::placeholder(20.0);
        let phrase = "completely antidisestablishmentarianism unreasonable";
        shape.set_text(phrase);
        shape.set_font_size(starting_size(phrase));

        shrink_to_fit(&mut shape);
        assert_eq!(shape.font_size, MIN_FONT_SIZE);
    }

    #[test]
    fn test_shrink_never_goes_below_floor_from_reduced_start() {
        // 9.6 is not a whole number of steps above 6.0; the last step clamps
        let mut shape = FakeShape::placeholder(10.0);
        shape.set_text("incomprehensibilities");
        shape.set_font_size(9.6);

        shrink_to_fit(&mut shape);
        assert_eq!(shape.font_size, MIN_FONT_SIZE);
    }

    #[test]
    fn test_shrink_reduces_until_it_fits() {
        let mut shape = FakeShape::placeholder(80.0);
        let phrase = "a phrase with enough words to need wrapping and then some more";
        shape.set_text(phrase);
        shape.set_font_size(starting_size(phrase));

        shrink_to_fit(&mut shape);
        assert!(shape.font_size < 12.0);
        assert!(shape.font_size >= MIN_FONT_SIZE);
        assert!(shape.height() <= MAX_SHAPE_HEIGHT || shape.font_size == MIN_FONT_SIZE);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn phrase_strategy() -> impl Strategy<Value = String> {
            proptest::collection::vec("[a-zA-Z]{1,16}", 1..8)
                .prop_map(|words| words.join(" "))
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn prop_shrink_terminates_within_floor_and_start(
                phrase in phrase_strategy(),
                width in 10.0f32..300.0,
            ) {
                let start = starting_size(&phrase);
                let mut shape = FakeShape::placeholder(width);
                shape.set_text(&phrase);
                shape.set_font_size(start);

                shrink_to_fit(&mut shape);

                prop_assert!(shape.font_size >= MIN_FONT_SIZE);
                prop_assert!(shape.font_size <= start);
                // Either it fits, or the floor was reached
                let fits = shape.height() <= MAX_SHAPE_HEIGHT
                    && shape.text_width() <= shape.width();
                prop_assert!(fits || shape.font_size == MIN_FONT_SIZE);
            }
        }
    }
}
