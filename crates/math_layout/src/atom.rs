//! The atom contract
//!
//! Atoms are immutable once built and shared through `AtomRef`. A layout pass
//! never writes to an atom; per-pass decisions live in `AtomDecor`.

use crate::atom_type::AtomType;
use crate::decor::AtomDecor;
use crate::env::Env;
use crate::layout::LayoutBox;
use math_font::Glyph;
use std::fmt;
use std::sync::Arc;

/// Shared handle to an atom
pub type AtomRef = Arc<dyn Atom>;

/// A formula node
pub trait Atom: fmt::Debug + Send + Sync {
    /// Class of the atom
    fn atom_type(&self) -> AtomType;

    /// Class seen by an atom on the left of this one
    fn left_type(&self) -> AtomType {
        self.atom_type()
    }

    /// Class seen by an atom on the right of this one
    fn right_type(&self) -> AtomType {
        self.atom_type()
    }

    /// Build the box for this atom under `env`
    fn create_box(&self, env: &Env) -> LayoutBox;

    fn as_char_symbol(&self) -> Option<&dyn CharSymbol> {
        None
    }

    fn as_row(&self) -> Option<&dyn Row> {
        None
    }

    /// Pure spacing element: contributes an offset, no glyph
    fn is_kern(&self) -> bool {
        false
    }

    /// Explicit break opportunity in a row
    fn is_break_mark(&self) -> bool {
        false
    }
}

/// An atom that is a single character
pub trait CharSymbol: Atom {
    fn code_point(&self) -> char;

    /// Math glyph rather than literal text
    fn is_math_mode(&self) -> bool;

    /// Glyph for this character, `None` when the font has none in its mode
    fn char_font(&self, env: &Env) -> Option<Glyph>;

    /// Glyph box; `text_symbol` is set when the character was folded into a
    /// text run and must not carry an italic correction.
    fn create_char_box(&self, env: &Env, text_symbol: bool) -> LayoutBox {
        match self.char_font(env) {
            Some(glyph) => {
                LayoutBox::glyph(glyph, env.size(), text_symbol || !self.is_math_mode())
            }
            None => {
                let glyph = env.font().fallback_glyph(self.code_point());
                LayoutBox::glyph(glyph, env.size(), true)
            }
        }
    }
}

/// A composite that can continue the classification context of whatever
/// precedes it in an enclosing row.
pub trait Row: Atom {
    /// Build the box as if `previous` stood directly before the first child.
    fn create_box_after(&self, env: &Env, previous: Option<&AtomDecor>) -> LayoutBox;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::{CharAtom, SpaceAtom};

    #[test]
    fn test_default_sides_follow_type() {
        let atom = CharAtom::math('x');
        assert_eq!(atom.left_type(), AtomType::Ordinary);
        assert_eq!(atom.right_type(), AtomType::Ordinary);
        assert!(atom.as_row().is_none());
        assert!(!atom.is_kern());
    }

    #[test]
    fn test_atom_ref_is_shareable() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        let atom: AtomRef = Arc::new(SpaceAtom::thin());
        assert_send_sync(&atom);
        assert!(atom.is_kern());
        assert!(atom.as_char_symbol().is_none());
    }

    #[test]
    fn test_unresolvable_char_still_boxes() {
        let env = Env::default();
        let atom = CharAtom::math('\u{4E2D}');
        assert!(atom.char_font(&env).is_none());
        let b = atom.create_char_box(&env, false);
        assert!(b.width > 0.0);
    }
}
