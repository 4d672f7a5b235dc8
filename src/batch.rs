//! Batch driver.
//!
//! Loads the phrase list once, then generates the requested number of cards
//! sequentially. A failed card is logged and the batch moves on; only
//! batch-level failures (no phrases, unusable output directory) end the run.

use std::fs;
use std::path::PathBuf;

use log::{error, info};

use crate::card;
use crate::common::Result;
use crate::prompts;
use crate::session::SlideAutomation;

/// Template the cards are generated from.
pub const TEMPLATE_PATH: &str = "bingo_template.pptx";

/// Phrase list, one phrase per line.
pub const PROMPTS_PATH: &str = "prompts.txt";

/// Directory receiving the generated PDFs.
pub const OUTPUT_DIR: &str = "bingo_cards";

/// Where a batch reads its inputs and writes its cards.
#[derive(Debug, Clone)]
pub struct BatchPaths {
    pub template: PathBuf,
    pub prompts: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for BatchPaths {
    fn default() -> Self {
        Self {
            template: PathBuf::from(TEMPLATE_PATH),
            prompts: PathBuf::from(PROMPTS_PATH),
            output_dir: PathBuf::from(OUTPUT_DIR),
        }
    }
}

/// Generate `count` cards using the fixed relative paths.
pub fn run<A: SlideAutomation>(automation: &A, count: u32) -> Result<()> {
    run_with_paths(automation, count, &BatchPaths::default())
}

/// Generate `count` cards, reading and writing at the given paths.
pub fn run_with_paths<A: SlideAutomation>(
    automation: &A,
    count: u32,
    paths: &BatchPaths,
) -> Result<()> {
    info!("Reading prompts file...");
    let phrases = prompts::load(&paths.prompts).unwrap_or_else(|err| {
        error!("Error reading prompts file: {err}");
        Vec::new()
    });

    if phrases.is_empty() {
        error!("No phrases found in the prompts file.");
        return Ok(());
    }

    fs::create_dir_all(&paths.output_dir)?;

    for index in 1..=count {
        let output = paths.output_dir.join(format!("bingo_card_{index}.pdf"));
        info!("Creating bingo card {index} of {count}...");
        match card::generate(automation, &paths.template, &output, &phrases) {
            Ok(()) => info!("Successfully created {}", output.display()),
            Err(err) => error!("An error occurred: {err}"),
        }
    }

    Ok(())
}
