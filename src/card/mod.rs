//! Per-card generation.
//!
//! One card = one deck session: every placeholder shape receives a phrase
//! that has not been used on this card yet, gets the accent styling, and is
//! shrunk until it fits its cell; the session is then exported and torn
//! down. Teardown runs on the failure path too, and its own failures are
//! discarded.

// Submodule declarations
pub mod fit;
pub mod select;

use std::path::Path;

use log::debug;
use rand::Rng;

use crate::common::{RGBColor, Result};
use crate::session::{DeckSession, ShapeHandle, SlideAutomation};

/// Text a template shape must carry to count as a placeholder, compared
/// case-insensitively after trimming.
pub const PLACEHOLDER_TEXT: &str = "test";

/// Dark orange applied to every filled-in phrase.
pub const ACCENT_COLOR: RGBColor = RGBColor::new(204, 85, 0);

/// Generate one card from `template` into the PDF at `output`.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use cardpress::card;
/// use cardpress::session::{PdfConverter, PptxAutomation};
///
/// let automation = PptxAutomation::new(PdfConverter::default());
/// let phrases = vec!["free space".to_owned(), "buzzword".to_owned()];
/// card::generate(
///     &automation,
///     Path::new("bingo_template.pptx"),
///     Path::new("card.pdf"),
///     &phrases,
/// )?;
/// # Ok::<(), cardpress::Error>(())
/// ```
pub fn generate<A: SlideAutomation>(
    automation: &A,
    template: &Path,
    output: &Path,
    phrases: &[String],
) -> Result<()> {
    generate_with_rng(automation, template, output, phrases, &mut rand::rng())
}

/// Like [`generate`], with an explicit random source for reproducibility.
pub fn generate_with_rng<A, R>(
    automation: &A,
    template: &Path,
    output: &Path,
    phrases: &[String],
    rng: &mut R,
) -> Result<()>
where
    A: SlideAutomation,
    R: Rng + ?Sized,
{
    debug!("Opening template {}", template.display());
    let mut session = automation.open(template)?;

    let outcome = populate(&mut session, phrases, rng).and_then(|()| {
        debug!("Saving as PDF...");
        session.export(output)
    });

    // Teardown runs on success and failure alike; secondary failures are
    // not surfaced
    if let Err(err) = session.close() {
        debug!("Session teardown failed: {err}");
    }

    outcome
}

/// Fill every placeholder shape of an open session.
pub fn populate<S, R>(session: &mut S, phrases: &[String], rng: &mut R) -> Result<()>
where
    S: DeckSession,
    R: Rng + ?Sized,
{
    let mut used: Vec<String> = Vec::new();

    for shape in session.shapes_mut() {
        if !shape.text().trim().eq_ignore_ascii_case(PLACEHOLDER_TEXT) {
            continue;
        }

        let Some(phrase) = select::pick(phrases, &mut used, rng) else {
            debug!("Phrase list is empty, leaving placeholder untouched");
            break;
        };

        debug!("Replacing placeholder with: {phrase}");
        let original_top = shape.top();

        shape.set_text(phrase);
        shape.set_color(ACCENT_COLOR);
        shape.anchor_middle();
        shape.set_font_size(fit::starting_size(phrase));
        fit::shrink_to_fit(shape);

        shape.set_height(fit::MAX_SHAPE_HEIGHT);
        shape.set_top(original_top - fit::SHAPE_RAISE);
        shape.clear_vertical_insets();
    }

    Ok(())
}
