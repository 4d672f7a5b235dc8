//! Cardpress - randomized bingo card generation from PowerPoint templates
//!
//! This library fills the placeholder shapes of a .pptx template with phrases
//! drawn at random from a prompt list, fits the text into each cell, and
//! exports one PDF per generated card.
//!
//! # How it works
//!
//! - **Prompt loading**: a plain text file, one phrase per line, blank lines
//!   ignored ([`prompts::load`]).
//! - **Card generation**: every shape on the first slide whose text reads
//!   "test" receives a phrase that has not been used on the card yet; the
//!   font size is shrunk step by step until the text fits its cell
//!   ([`card::generate`]).
//! - **Export**: the patched deck is written to a scratch directory and
//!   handed to an external converter process that produces the PDF
//!   ([`session::PdfConverter`]).
//!
//! The document-handling side is expressed as a capability: card logic only
//! talks to the [`SlideAutomation`], [`DeckSession`], and [`ShapeHandle`]
//! traits, so it can be exercised in tests without a real template or
//! converter present.
//!
//! # Example - Generating a batch of cards
//!
//! ```no_run
//! use cardpress::batch;
//! use cardpress::session::{PdfConverter, PptxAutomation};
//!
//! # fn main() -> Result<(), cardpress::Error> {
//! let automation = PptxAutomation::new(PdfConverter::default());
//!
//! // Reads prompts.txt and bingo_template.pptx from the working directory
//! // and writes bingo_cards/bingo_card_{1..5}.pdf.
//! batch::run(&automation, 5)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Generating a single card
//!
//! ```no_run
//! use std::path::Path;
//!
//! use cardpress::card;
//! use cardpress::session::{PdfConverter, PptxAutomation};
//!
//! # fn main() -> Result<(), cardpress::Error> {
//! let automation = PptxAutomation::new(PdfConverter::default());
//! let phrases = cardpress::prompts::load("prompts.txt")?;
//!
//! card::generate(
//!     &automation,
//!     Path::new("bingo_template.pptx"),
//!     Path::new("card.pdf"),
//!     &phrases,
//! )?;
//! # Ok(())
//! # }
//! ```

/// Batch driver: fixed paths, one phrase load, N sequential cards.
pub mod batch;

/// Per-card generation: phrase selection, text styling, and fitting.
pub mod card;

/// Interactive prompts for the command-line binary.
pub mod cli;

/// Shared types: errors, units, colors.
pub mod common;

/// Prompt file loading.
pub mod prompts;

/// PPTX package access: reading and patching slide parts.
pub mod pptx;

/// Deck session capability and its PPTX-backed implementation.
pub mod session;

// Re-export commonly used types for convenience
pub use common::{Error, RGBColor, Result};
pub use session::{DeckSession, ShapeHandle, SlideAutomation};
