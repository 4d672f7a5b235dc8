//! PPTX-backed deck sessions.
//!
//! A session stages one mutable view per readable text shape of the first
//! slide. Nothing touches the package until export, which patches the slide
//! part, saves the deck into the session's scratch directory, and hands it
//! to the converter.

use std::fs;
use std::path::Path;

use log::debug;
use tempfile::TempDir;

use super::convert::PdfConverter;
use super::metrics::{self, SIDE_INSET_PT, VERTICAL_INSET_PT};
use super::{DeckSession, ShapeHandle, SlideAutomation};
use crate::common::unit::{centipoints_to_pt, emu_to_pt, pt_to_centipoints, pt_to_emu};
use crate::common::{Error, RGBColor, Result};
use crate::pptx::slide::{self, RunProps};
use crate::pptx::{Package, ShapeEdit, edit};

/// Body text size assumed when the template run does not carry one.
const DEFAULT_FONT_SIZE_PT: f32 = 18.0;

/// Factory for PPTX-backed sessions.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use cardpress::session::{PdfConverter, PptxAutomation, SlideAutomation};
///
/// let automation = PptxAutomation::new(PdfConverter::default());
/// let session = automation.open(Path::new("bingo_template.pptx"))?;
/// # Ok::<(), cardpress::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PptxAutomation {
    converter: PdfConverter,
}

impl PptxAutomation {
    pub fn new(converter: PdfConverter) -> Self {
        Self { converter }
    }
}

impl SlideAutomation for PptxAutomation {
    type Session = PptxSession;

    fn open(&self, template: &Path) -> Result<PptxSession> {
        let package = Package::open(template)?;
        PptxSession::from_package(package, self.converter.clone())
    }
}

/// Staged view over one `<p:sp>` of the slide.
#[derive(Debug, Clone)]
pub struct PptxShape {
    index: usize,
    text: String,
    font_size: f32,
    color: Option<RGBColor>,
    anchor_middle: bool,
    vertical_insets_cleared: bool,
    top_pt: f32,
    width_pt: f32,
    frame_height_pt: f32,
    run_props: Option<RunProps>,
    modified: bool,
}

impl PptxShape {
    fn wrap_width(&self) -> f32 {
        (self.width_pt - 2.0 * SIDE_INSET_PT).max(1.0)
    }

    fn to_edit(&self) -> ShapeEdit {
        ShapeEdit {
            index: self.index,
            text: self.text.clone(),
            font_size_centi: pt_to_centipoints(self.font_size),
            color: self.color,
            anchor_middle: self.anchor_middle,
            clear_vertical_insets: self.vertical_insets_cleared,
            top_emu: pt_to_emu(self.top_pt),
            height_emu: pt_to_emu(self.frame_height_pt),
            run_props: self.run_props.clone(),
        }
    }
}

impl ShapeHandle for PptxShape {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
        self.modified = true;
    }

    fn font_size(&self) -> f32 {
        self.font_size
    }

    fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
        self.modified = true;
    }

    fn set_color(&mut self, color: RGBColor) {
        self.color = Some(color);
        self.modified = true;
    }

    fn anchor_middle(&mut self) {
        self.anchor_middle = true;
        self.modified = true;
    }

    fn clear_vertical_insets(&mut self) {
        self.vertical_insets_cleared = true;
        self.modified = true;
    }

    fn width(&self) -> f32 {
        self.width_pt
    }

    fn height(&self) -> f32 {
        let insets = if self.vertical_insets_cleared {
            0.0
        } else {
            2.0 * VERTICAL_INSET_PT
        };
        let (_, text_height) = metrics::text_extent(&self.text, self.font_size, self.wrap_width());
        text_height + insets
    }

    fn set_height(&mut self, height: f32) {
        self.frame_height_pt = height;
        self.modified = true;
    }

    fn top(&self) -> f32 {
        self.top_pt
    }

    fn set_top(&mut self, top: f32) {
        self.top_pt = top;
        self.modified = true;
    }

    fn text_width(&self) -> f32 {
        metrics::text_extent(&self.text, self.font_size, self.wrap_width()).0
    }
}

/// One card's session over a template package.
pub struct PptxSession {
    package: Package,
    slide_name: String,
    shapes: Vec<PptxShape>,
    scratch: TempDir,
    converter: PdfConverter,
}

impl PptxSession {
    pub(crate) fn from_package(package: Package, converter: PdfConverter) -> Result<Self> {
        let slide_name = package.first_slide_name()?.to_owned();
        let xml = package
            .part(&slide_name)
            .ok_or_else(|| Error::PartNotFound(slide_name.clone()))?;

        let mut shapes = Vec::new();
        for shape in slide::text_shapes(xml)? {
            let Some(geometry) = shape.geometry else {
                // No explicit frame means no fit constraints to evaluate
                debug!("shape {} has no frame of its own, leaving untouched", shape.index);
                continue;
            };
            let font_size = shape
                .run_props
                .as_ref()
                .and_then(|props| props.size_centi)
                .map(centipoints_to_pt)
                .unwrap_or(DEFAULT_FONT_SIZE_PT);
            shapes.push(PptxShape {
                index: shape.index,
                text: shape.text,
                font_size,
                color: None,
                anchor_middle: false,
                vertical_insets_cleared: false,
                top_pt: emu_to_pt(geometry.y),
                width_pt: emu_to_pt(geometry.cx),
                frame_height_pt: emu_to_pt(geometry.cy),
                run_props: shape.run_props,
                modified: false,
            });
        }

        let scratch = TempDir::new()?;
        Ok(Self {
            package,
            slide_name,
            shapes,
            scratch,
            converter,
        })
    }
}

impl DeckSession for PptxSession {
    type Shape = PptxShape;

    fn shapes_mut(&mut self) -> &mut [PptxShape] {
        &mut self.shapes
    }

    fn export(&mut self, output: &Path) -> Result<()> {
        let edits: Vec<ShapeEdit> = self
            .shapes
            .iter()
            .filter(|shape| shape.modified)
            .map(PptxShape::to_edit)
            .collect();

        let xml = self
            .package
            .part(&self.slide_name)
            .ok_or_else(|| Error::PartNotFound(self.slide_name.clone()))?;
        let patched = edit::apply(xml, &edits)?;
        self.package.set_part(&self.slide_name, patched)?;

        let deck_path = self.scratch.path().join("card.pptx");
        self.package.save_to(&deck_path)?;

        let pdf = self.converter.convert(&deck_path, self.scratch.path())?;
        if fs::rename(&pdf, output).is_err() {
            // Scratch dir may live on another filesystem
            fs::copy(&pdf, output)?;
            let _ = fs::remove_file(&pdf);
        }
        Ok(())
    }

    fn close(self) -> Result<()> {
        self.scratch.close()?;
        Ok(())
    }
}
