//! Math Layout - row composition for math formulas
//!
//! This crate turns trees of formula atoms into box trees:
//! - `atom` / `atoms`: the atom contract and the leaf atoms
//! - `atom_type` / `spacing`: classes, class sets and TeX's spacing table
//! - `decor`: per-build overlays recording reclassification and ligatures
//! - `row`: the row composer (binary reclassification, ligature and kern
//!   runs, glue insertion, context chaining between nested rows)
//! - `misc`: rotation and cancellation composites
//! - `layout`: the box model and the `LayoutEngine` entry point

pub mod atom;
pub mod atom_type;
pub mod atoms;
pub mod config;
pub mod decor;
pub mod env;
pub mod error;
pub mod layout;
pub mod misc;
pub mod row;
pub mod spacing;

pub use atom::{Atom, AtomRef, CharSymbol, Row};
pub use atom_type::{AtomType, AtomTypeSet, BIN_FOLLOW_SET, BIN_SET, LIG_KERN_SET};
pub use atoms::{BreakMarkAtom, CharAtom, FixedCharAtom, SpaceAtom, SymbolAtom, TextAtom};
pub use config::LayoutConfig;
pub use decor::AtomDecor;
pub use env::{Env, Length, MathStyle, Unit};
pub use error::*;
pub use layout::{CancelStroke, LayoutBox, LayoutContent, LayoutEngine, RotationOrigin};
pub use misc::{CancelAtom, Pivot, RotateAtom};
pub use row::RowAtom;
pub use spacing::{glue_box, space_between, SpaceKind};
