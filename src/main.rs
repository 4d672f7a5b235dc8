//! Command-line entry point: ask for a card count, run the batch.

use std::io;

use log::error;

use cardpress::batch;
use cardpress::cli;
use cardpress::session::{PdfConverter, PptxAutomation};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let Some(count) = cli::read_card_count(stdin.lock(), &mut stdout) else {
        return;
    };

    let automation = PptxAutomation::new(PdfConverter::default());
    if let Err(err) = batch::run(&automation, count) {
        error!("An error occurred in main: {err}");
    }
}
