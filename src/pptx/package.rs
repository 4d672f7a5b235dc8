//! Buffered ZIP view of a .pptx package.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::common::{Error, Result};

/// The main presentation part every .pptx carries.
const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Slide parts live under this prefix, numbered from 1.
const SLIDE_PREFIX: &str = "ppt/slides/slide";

struct Entry {
    name: String,
    data: Vec<u8>,
}

/// A PowerPoint (.pptx) package, fully buffered in memory.
///
/// The template is read once; parts can be replaced and the whole archive
/// written back out as a new file. The original on disk is never modified.
///
/// # Examples
///
/// ```rust,no_run
/// use cardpress::pptx::Package;
///
/// let pkg = Package::open("bingo_template.pptx")?;
/// let slide = pkg.first_slide_name()?;
/// println!("first slide part: {slide}");
/// # Ok::<(), cardpress::Error>(())
/// ```
pub struct Package {
    entries: Vec<Entry>,
}

impl Package {
    /// Open a .pptx package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Open a .pptx package from a reader.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use std::io::Cursor;
    /// use cardpress::pptx::Package;
    ///
    /// let data = std::fs::read("bingo_template.pptx")?;
    /// let pkg = Package::from_reader(Cursor::new(data))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            entries.push(Entry {
                name: file.name().to_owned(),
                data,
            });
        }

        // Verify it's a PowerPoint presentation
        if !entries.iter().any(|entry| entry.name == PRESENTATION_PART) {
            return Err(Error::InvalidTemplate(format!(
                "missing {PRESENTATION_PART}"
            )));
        }

        Ok(Self { entries })
    }

    /// Name of the lowest-numbered slide part (`ppt/slides/slide1.xml` in a
    /// well-formed single-slide template).
    pub fn first_slide_name(&self) -> Result<&str> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let number: u32 = entry
                    .name
                    .strip_prefix(SLIDE_PREFIX)?
                    .strip_suffix(".xml")?
                    .parse()
                    .ok()?;
                Some((number, entry.name.as_str()))
            })
            .min_by_key(|(number, _)| *number)
            .map(|(_, name)| name)
            .ok_or_else(|| Error::PartNotFound(format!("{SLIDE_PREFIX}*.xml")))
    }

    /// Get a part's bytes by its archive name.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.data.as_slice())
    }

    /// Replace an existing part's bytes.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.name == name)
            .ok_or_else(|| Error::PartNotFound(name.to_owned()))?;
        entry.data = data;
        Ok(())
    }

    /// Write the package to a file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Serialize the package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in &self.entries {
            writer.start_file(entry.name.as_str(), options)?;
            writer.write_all(&entry.data)?;
        }

        Ok(writer.finish()?.into_inner())
    }
}
