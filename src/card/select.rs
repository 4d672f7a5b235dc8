//! Phrase selection with an explicit used-phrase pool.

use rand::Rng;
use rand::seq::IndexedRandom;

/// Pick a phrase uniformly at random from the subset not yet in `used`.
///
/// When every phrase has been used, the pool is cleared and selection starts
/// over from the full set; exhaustion is silent by design. The chosen phrase
/// is recorded in `used`. Returns `None` only for an empty phrase list.
pub fn pick<'a, R>(
    phrases: &'a [String],
    used: &mut Vec<String>,
    rng: &mut R,
) -> Option<&'a str>
where
    R: Rng + ?Sized,
{
    if phrases.is_empty() {
        return None;
    }

    let available: Vec<&String> = phrases
        .iter()
        .filter(|phrase| !used.contains(*phrase))
        .collect();

    let choice = if available.is_empty() {
        used.clear();
        phrases.iter().collect::<Vec<_>>().choose(rng).copied()
    } else {
        available.choose(rng).copied()
    };

    let phrase = choice?;
    used.push(phrase.clone());
    Some(phrase.as_str())
}
