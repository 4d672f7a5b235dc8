//! Interactive prompts for the command-line binary.

use std::io::{BufRead, Write};

/// Ask the operator how many cards to generate.
///
/// Re-prompts until a positive integer arrives; returns `None` once the
/// input is exhausted.
pub fn read_card_count<R: BufRead, W: Write>(mut input: R, output: &mut W) -> Option<u32> {
    loop {
        let _ = write!(output, "How many bingo cards would you like to create? ");
        let _ = output.flush();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => return None,
            Ok(_) => {},
        }

        match line.trim().parse::<i64>() {
            Ok(count) if count > 0 => match u32::try_from(count) {
                Ok(count) => return Some(count),
                Err(_) => {
                    let _ = writeln!(output, "Please enter a valid number.");
                },
            },
            Ok(_) => {
                let _ = writeln!(output, "Please enter a positive number.");
            },
            Err(_) => {
                let _ = writeln!(output, "Please enter a valid number.");
            },
        }
    }
}
