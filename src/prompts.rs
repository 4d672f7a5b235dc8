//! Prompt file loading.
//!
//! A prompt file is plain UTF-8 text with one phrase per line. Blank lines
//! are ignored; surrounding whitespace is trimmed; file order is preserved.

use std::fs;
use std::path::Path;

use crate::common::Result;

/// Load the phrase list from a prompt file.
///
/// # Examples
///
/// ```no_run
/// let phrases = cardpress::prompts::load("prompts.txt")?;
/// println!("{} phrases", phrases.len());
/// # Ok::<(), cardpress::Error>(())
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}
