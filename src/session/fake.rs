//! Recording fakes for the session capability, used across the crate's
//! tests in place of a real template and converter.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::metrics::{self, SIDE_INSET_PT, VERTICAL_INSET_PT};
use super::{DeckSession, ShapeHandle, SlideAutomation};
use crate::common::{Error, RGBColor, Result};

/// In-memory shape whose extents come from the same metrics the production
/// backend uses.
#[derive(Debug, Clone)]
pub(crate) struct FakeShape {
    pub text: String,
    pub font_size: f32,
    pub color: Option<RGBColor>,
    pub anchored_middle: bool,
    pub insets_cleared: bool,
    pub top: f32,
    pub frame_height: f32,
    pub width: f32,
}

impl FakeShape {
    /// A placeholder cell waiting for a phrase.
    pub fn placeholder(width: f32) -> Self {
        Self {
            text: "test".to_owned(),
            font_size: 18.0,
            color: None,
            anchored_middle: false,
            insets_cleared: false,
            top: 120.0,
            frame_height: 70.0,
            width,
        }
    }

    /// A shape card generation must leave alone.
    pub fn labeled(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            ..Self::placeholder(108.0)
        }
    }

    fn wrap_width(&self) -> f32 {
        (self.width - 2.0 * SIDE_INSET_PT).max(1.0)
    }
}

impl ShapeHandle for FakeShape {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
    }

    fn font_size(&self) -> f32 {
        self.font_size
    }

    fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    fn set_color(&mut self, color: RGBColor) {
        self.color = Some(color);
    }

    fn anchor_middle(&mut self) {
        self.anchored_middle = true;
    }

    fn clear_vertical_insets(&mut self) {
        self.insets_cleared = true;
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        let insets = if self.insets_cleared {
            0.0
        } else {
            2.0 * VERTICAL_INSET_PT
        };
        metrics::text_extent(&self.text, self.font_size, self.wrap_width()).1 + insets
    }

    fn set_height(&mut self, height: f32) {
        self.frame_height = height;
    }

    fn top(&self) -> f32 {
        self.top
    }

    fn set_top(&mut self, top: f32) {
        self.top = top;
    }

    fn text_width(&self) -> f32 {
        metrics::text_extent(&self.text, self.font_size, self.wrap_width()).0
    }
}

/// What the fakes saw happen, shared between automation and sessions.
#[derive(Debug, Default)]
pub(crate) struct SessionLog {
    pub opened: usize,
    pub exported: Vec<PathBuf>,
    pub closed: usize,
    /// Shape states captured at each export
    pub snapshots: Vec<Vec<FakeShape>>,
}

pub(crate) type SharedLog = Rc<RefCell<SessionLog>>;

pub(crate) struct FakeSession {
    pub shapes: Vec<FakeShape>,
    pub fail_export: bool,
    pub log: SharedLog,
}

impl DeckSession for FakeSession {
    type Shape = FakeShape;

    fn shapes_mut(&mut self) -> &mut [FakeShape] {
        &mut self.shapes
    }

    fn export(&mut self, output: &Path) -> Result<()> {
        if self.fail_export {
            return Err(Error::Convert("export refused".to_owned()));
        }
        let mut log = self.log.borrow_mut();
        log.exported.push(output.to_owned());
        log.snapshots.push(self.shapes.clone());
        Ok(())
    }

    fn close(self) -> Result<()> {
        self.log.borrow_mut().closed += 1;
        Ok(())
    }
}

pub(crate) struct FakeAutomation {
    pub shapes: Vec<FakeShape>,
    pub fail_open: bool,
    pub fail_export: bool,
    pub log: SharedLog,
}

impl FakeAutomation {
    pub fn new(shapes: Vec<FakeShape>) -> Self {
        Self {
            shapes,
            fail_open: false,
            fail_export: false,
            log: Rc::default(),
        }
    }
}

impl SlideAutomation for FakeAutomation {
    type Session = FakeSession;

    fn open(&self, _template: &Path) -> Result<FakeSession> {
        if self.fail_open {
            return Err(Error::InvalidTemplate("open refused".to_owned()));
        }
        self.log.borrow_mut().opened += 1;
        Ok(FakeSession {
            shapes: self.shapes.clone(),
            fail_export: self.fail_export,
            log: Rc::clone(&self.log),
        })
    }
}
