//! PPTX package access.
//!
//! Only what card generation needs: open a template package, read the text
//! shapes of its first slide, rewrite that slide part with staged edits, and
//! save the patched archive. Everything else in the package is carried
//! through untouched.

// Submodule declarations
pub mod edit;
pub mod package;
pub mod slide;

// Re-export main types
pub use edit::ShapeEdit;
pub use package::Package;
pub use slide::{RunProps, ShapeGeometry, SlideShape};
