//! Per-build overlay on an atom
//!
//! A row may reclassify an element, fold it into a ligature or mark it as
//! part of a text run. Atoms are shared and immutable, so those decisions are
//! recorded on an `AtomDecor` that lives only for one `create_box` call.

use crate::atom::{Atom, AtomRef, CharSymbol, Row};
use crate::atom_type::AtomType;
use crate::atoms::FixedCharAtom;
use crate::env::Env;
use crate::error::{LayoutError, LayoutResult};
use crate::layout::LayoutBox;
use math_font::Glyph;

/// Overlay recording the layout decisions made for one element of a row
#[derive(Debug, Clone)]
pub struct AtomDecor {
    atom: AtomRef,
    atom_type: Option<AtomType>,
    text_symbol: bool,
    ligature: Option<FixedCharAtom>,
    previous: Option<Box<AtomDecor>>,
}

impl AtomDecor {
    pub fn new(atom: AtomRef) -> Self {
        Self {
            atom,
            atom_type: None,
            text_symbol: false,
            ligature: None,
            previous: None,
        }
    }

    /// The wrapped atom, ignoring any ligature substitute
    pub fn atom(&self) -> &AtomRef {
        &self.atom
    }

    /// The atom used for classification and box building
    pub fn effective(&self) -> &dyn Atom {
        match &self.ligature {
            Some(fixed) => fixed as &dyn Atom,
            None => self.atom.as_ref(),
        }
    }

    pub fn left_type(&self) -> AtomType {
        self.atom_type.unwrap_or_else(|| self.effective().left_type())
    }

    pub fn right_type(&self) -> AtomType {
        self.atom_type.unwrap_or_else(|| self.effective().right_type())
    }

    /// Override the class on both sides
    pub fn set_type(&mut self, atom_type: AtomType) {
        self.atom_type = Some(atom_type);
    }

    pub fn overridden_type(&self) -> Option<AtomType> {
        self.atom_type
    }

    fn char_symbol(&self) -> Option<&dyn CharSymbol> {
        match &self.ligature {
            Some(fixed) => Some(fixed as &dyn CharSymbol),
            None => self.atom.as_char_symbol(),
        }
    }

    pub fn is_char(&self) -> bool {
        self.char_symbol().is_some()
    }

    pub fn is_math_mode(&self) -> bool {
        self.char_symbol().is_some_and(|c| c.is_math_mode())
    }

    pub fn code_point(&self) -> Option<char> {
        self.char_symbol().map(|c| c.code_point())
    }

    /// Glyph in the active mode, `None` for non-characters and for code
    /// points the font cannot set
    pub fn resolve_char(&self, env: &Env) -> Option<Glyph> {
        self.char_symbol().and_then(|c| c.char_font(env))
    }

    /// Glyph for a character element; unresolvable code points yield the
    /// font's fallback glyph.
    pub fn get_char(&self, env: &Env) -> LayoutResult<Glyph> {
        let symbol = self
            .char_symbol()
            .ok_or_else(|| LayoutError::NotACharacter(format!("{:?}", self.atom)))?;
        Ok(symbol
            .char_font(env)
            .unwrap_or_else(|| env.font().fallback_glyph(symbol.code_point())))
    }

    /// Replace the element by a ligature glyph
    pub fn change_atom(&mut self, fixed: FixedCharAtom) {
        self.ligature = Some(fixed);
    }

    pub fn is_ligature(&self) -> bool {
        self.ligature.is_some()
    }

    pub fn mark_as_text_symbol(&mut self) {
        self.text_symbol = true;
    }

    pub fn is_text_symbol(&self) -> bool {
        self.text_symbol
    }

    pub fn is_kern(&self) -> bool {
        self.effective().is_kern()
    }

    pub fn is_break_mark(&self) -> bool {
        self.effective().is_break_mark()
    }

    pub fn as_row(&self) -> Option<&dyn Row> {
        if self.ligature.is_some() {
            return None;
        }
        self.atom.as_row()
    }

    /// Context handed to a nested row when this element is built
    pub fn set_previous_atom(&mut self, previous: Option<AtomDecor>) {
        self.previous = previous.map(Box::new);
    }

    pub fn previous_atom(&self) -> Option<&AtomDecor> {
        self.previous.as_deref()
    }

    /// Copy without the forwarded context, so chains of nested rows do not
    /// accumulate history.
    pub fn detached(&self) -> AtomDecor {
        AtomDecor {
            atom: self.atom.clone(),
            atom_type: self.atom_type,
            text_symbol: self.text_symbol,
            ligature: self.ligature.clone(),
            previous: None,
        }
    }

    pub fn create_box(&self, env: &Env) -> LayoutBox {
        if let Some(symbol) = self.char_symbol() {
            return symbol.create_char_box(env, self.text_symbol);
        }
        if let Some(row) = self.as_row() {
            return row.create_box_after(env, self.previous_atom());
        }
        self.atom.create_box(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::{CharAtom, SpaceAtom, SymbolAtom};
    use crate::config::LayoutConfig;
    use crate::row::RowAtom;
    use math_font::GlyphMode;
    use std::sync::Arc;

    fn decor(atom: impl Atom + 'static) -> AtomDecor {
        AtomDecor::new(Arc::new(atom))
    }

    #[test]
    fn test_override_applies_to_both_sides() {
        let mut d = AtomDecor::new(SymbolAtom::get_ref("plus").unwrap());
        assert_eq!(d.left_type(), AtomType::BinaryOperator);
        assert_eq!(d.overridden_type(), None);

        d.set_type(AtomType::Ordinary);
        assert_eq!(d.left_type(), AtomType::Ordinary);
        assert_eq!(d.right_type(), AtomType::Ordinary);
        // the shared atom keeps its class
        assert_eq!(d.atom().atom_type(), AtomType::BinaryOperator);
    }

    #[test]
    fn test_char_queries() {
        let d = decor(CharAtom::text('a'));
        assert!(d.is_char());
        assert!(!d.is_math_mode());
        assert_eq!(d.code_point(), Some('a'));

        let space = decor(SpaceAtom::thin());
        assert!(!space.is_char());
        assert!(!space.is_math_mode());
        assert!(space.is_kern());
    }

    #[test]
    fn test_get_char_on_non_character_fails() {
        let env = Env::default();
        let err = decor(SpaceAtom::thin()).get_char(&env).unwrap_err();
        assert!(matches!(err, LayoutError::NotACharacter(_)));
    }

    #[test]
    fn test_get_char_falls_back() {
        let env = Env::default();
        let d = decor(CharAtom::math('\u{4E2D}'));
        assert!(d.resolve_char(&env).is_none());
        let glyph = d.get_char(&env).unwrap();
        assert!(glyph.is_fallback());
        assert_eq!(glyph.code_point, '\u{4E2D}');
    }

    #[test]
    fn test_change_atom_substitutes() {
        let env = Env::new(LayoutConfig::for_size(10.0));
        let mut d = decor(CharAtom::text('f'));
        let fi = env.font().glyph('\u{FB01}', GlyphMode::Text).unwrap();
        d.change_atom(FixedCharAtom::new(fi));

        assert!(d.is_ligature());
        assert_eq!(d.code_point(), Some('\u{FB01}'));
        assert_eq!(d.create_box(&env).text_content(), "\u{FB01}");
        // original untouched
        assert_eq!(d.atom().as_char_symbol().unwrap().code_point(), 'f');
    }

    #[test]
    fn test_text_symbol_drops_italic_correction() {
        let env = Env::new(LayoutConfig::for_size(10.0));
        let mut d = decor(CharAtom::math('f'));
        let full = d.create_box(&env).width;
        d.mark_as_text_symbol();
        assert!(d.is_text_symbol());
        assert!(d.create_box(&env).width < full);
    }

    #[test]
    fn test_detached_drops_previous() {
        let mut d = decor(RowAtom::new());
        d.set_previous_atom(Some(decor(CharAtom::math('x'))));
        assert!(d.previous_atom().is_some());
        assert!(d.as_row().is_some());
        assert!(d.detached().previous_atom().is_none());
    }

    #[test]
    fn test_decorating_never_touches_atom() {
        let atom: AtomRef = Arc::new(SymbolAtom::new("minus", '\u{2212}', AtomType::BinaryOperator));
        {
            let mut d = AtomDecor::new(atom.clone());
            d.set_type(AtomType::Ordinary);
            d.mark_as_text_symbol();
        }
        assert_eq!(atom.atom_type(), AtomType::BinaryOperator);
        assert_eq!(Arc::strong_count(&atom), 1);
    }
}
