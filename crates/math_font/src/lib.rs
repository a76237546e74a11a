//! Math Font - glyph metrics, ligatures and kerning for math layout
//!
//! This crate provides the font side of the layout core:
//!
//! - `font`: glyph descriptors and the `MathFont` provider trait
//! - `table`: the table-driven built-in provider, loadable from JSON
//! - `script`: Unicode script detection used to delimit character runs

mod error;
mod font;
mod script;
pub mod table;

pub use error::*;
pub use font::*;
pub use script::*;

pub use table::{FontTable, FontTableData, GlyphRecord, KernRecord, LigatureRecord};
