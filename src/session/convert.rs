//! PDF conversion via an external converter process.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::common::{Error, Result};

/// Converter executable resolved from `PATH`.
pub const DEFAULT_CONVERTER: &str = "soffice";

/// Drives a headless office process to turn a .pptx into a PDF.
///
/// One invocation per card; the child process is waited on before the
/// session continues, so its lifetime never outlives the card.
#[derive(Debug, Clone)]
pub struct PdfConverter {
    program: String,
}

impl Default for PdfConverter {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERTER)
    }
}

impl PdfConverter {
    /// Create a converter around the given executable name or path.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Convert `deck` to PDF, writing next to it into `outdir`.
    ///
    /// Returns the path of the produced PDF.
    pub fn convert(&self, deck: &Path, outdir: &Path) -> Result<PathBuf> {
        debug!("Converting {} with {}", deck.display(), self.program);

        let output = Command::new(&self.program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(outdir)
            .arg(deck)
            .output()
            .map_err(|err| {
                Error::Convert(format!("failed to launch {}: {err}", self.program))
            })?;

        if !output.status.success() {
            return Err(Error::Convert(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stem = deck
            .file_stem()
            .ok_or_else(|| Error::Convert(format!("no file stem in {}", deck.display())))?;
        let pdf = outdir.join(Path::new(stem).with_extension("pdf"));

        if !pdf.is_file() {
            return Err(Error::Convert(format!(
                "{} produced no output for {}",
                self.program,
                deck.display()
            )));
        }

        Ok(pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_converter_is_reported() {
        let converter = PdfConverter::new("cardpress-no-such-converter");
        let err = converter
            .convert(Path::new("deck.pptx"), Path::new("."))
            .unwrap_err();
        assert!(matches!(err, Error::Convert(_)));
    }

    #[test]
    fn test_silent_converter_is_reported() {
        // `true` exits cleanly without producing a PDF
        let converter = PdfConverter::new("true");
        let dir = tempfile::tempdir().unwrap();
        let err = converter
            .convert(&dir.path().join("deck.pptx"), dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::Convert(_)));
    }
}
