//! Leaf atoms: characters, symbols, spaces, break marks and literal text

use crate::atom::{Atom, AtomRef, CharSymbol};
use crate::atom_type::AtomType;
use crate::env::{Env, Length, Unit};
use crate::layout::LayoutBox;
use math_font::{FontFace, Glyph, GlyphMode};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

// =============================================================================
// Characters
// =============================================================================

/// A literal character in math or text mode
#[derive(Debug, Clone, PartialEq)]
pub struct CharAtom {
    c: char,
    mode: GlyphMode,
}

impl CharAtom {
    pub fn new(c: char, mode: GlyphMode) -> Self {
        Self { c, mode }
    }

    /// Character set as a math glyph
    pub fn math(c: char) -> Self {
        Self::new(c, GlyphMode::Math)
    }

    /// Character set as literal text
    pub fn text(c: char) -> Self {
        Self::new(c, GlyphMode::Text)
    }

    pub fn mode(&self) -> GlyphMode {
        self.mode
    }
}

impl Atom for CharAtom {
    fn atom_type(&self) -> AtomType {
        AtomType::Ordinary
    }

    fn create_box(&self, env: &Env) -> LayoutBox {
        self.create_char_box(env, false)
    }

    fn as_char_symbol(&self) -> Option<&dyn CharSymbol> {
        Some(self)
    }
}

impl CharSymbol for CharAtom {
    fn code_point(&self) -> char {
        self.c
    }

    fn is_math_mode(&self) -> bool {
        self.mode == GlyphMode::Math
    }

    fn char_font(&self, env: &Env) -> Option<Glyph> {
        env.font().glyph(self.c, self.mode)
    }
}

/// A named math symbol with a fixed class
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolAtom {
    name: String,
    c: char,
    atom_type: AtomType,
}

static SYMBOLS: Lazy<HashMap<&'static str, Arc<SymbolAtom>>> = Lazy::new(|| {
    use AtomType::*;
    let table: &[(&str, char, AtomType)] = &[
        ("plus", '+', BinaryOperator),
        ("minus", '\u{2212}', BinaryOperator),
        ("times", '\u{00D7}', BinaryOperator),
        ("div", '\u{00F7}', BinaryOperator),
        ("pm", '\u{00B1}', BinaryOperator),
        ("mp", '\u{2213}', BinaryOperator),
        ("cdot", '\u{22C5}', BinaryOperator),
        ("ast", '*', BinaryOperator),
        ("equals", '=', Relation),
        ("lt", '<', Relation),
        ("gt", '>', Relation),
        ("leq", '\u{2264}', Relation),
        ("geq", '\u{2265}', Relation),
        ("neq", '\u{2260}', Relation),
        ("approx", '\u{2248}', Relation),
        ("in", '\u{2208}', Relation),
        ("to", '\u{2192}', Relation),
        ("colon", ':', Relation),
        ("lparen", '(', Opening),
        ("rparen", ')', Closing),
        ("lbrack", '[', Opening),
        ("rbrack", ']', Closing),
        ("lbrace", '{', Opening),
        ("rbrace", '}', Closing),
        ("comma", ',', Punctuation),
        ("semicolon", ';', Punctuation),
        ("sum", '\u{2211}', BigOperator),
        ("prod", '\u{220F}', BigOperator),
        ("int", '\u{222B}', BigOperator),
        ("infty", '\u{221E}', Ordinary),
        ("slash", '/', Ordinary),
        ("prime", '\'', Ordinary),
    ];
    table
        .iter()
        .map(|&(name, c, t)| (name, Arc::new(SymbolAtom::new(name, c, t))))
        .collect()
});

impl SymbolAtom {
    pub fn new(name: impl Into<String>, c: char, atom_type: AtomType) -> Self {
        Self {
            name: name.into(),
            c,
            atom_type,
        }
    }

    /// Look up a built-in symbol by name
    pub fn get(name: &str) -> Option<Arc<SymbolAtom>> {
        SYMBOLS.get(name).cloned()
    }

    /// Built-in symbol as a shared atom handle
    pub fn get_ref(name: &str) -> Option<AtomRef> {
        Self::get(name).map(|s| s as AtomRef)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Atom for SymbolAtom {
    fn atom_type(&self) -> AtomType {
        self.atom_type
    }

    fn create_box(&self, env: &Env) -> LayoutBox {
        self.create_char_box(env, false)
    }

    fn as_char_symbol(&self) -> Option<&dyn CharSymbol> {
        Some(self)
    }
}

impl CharSymbol for SymbolAtom {
    fn code_point(&self) -> char {
        self.c
    }

    fn is_math_mode(&self) -> bool {
        true
    }

    fn char_font(&self, env: &Env) -> Option<Glyph> {
        env.font().glyph(self.c, GlyphMode::Math)
    }
}

/// An already resolved glyph, produced by ligature substitution
#[derive(Debug, Clone, PartialEq)]
pub struct FixedCharAtom {
    glyph: Glyph,
    atom_type: AtomType,
}

impl FixedCharAtom {
    pub fn new(glyph: Glyph) -> Self {
        Self::with_type(glyph, AtomType::Ordinary)
    }

    /// Substitute that keeps the class of the characters it replaces
    pub fn with_type(glyph: Glyph, atom_type: AtomType) -> Self {
        Self { glyph, atom_type }
    }

    pub fn glyph(&self) -> &Glyph {
        &self.glyph
    }
}

impl Atom for FixedCharAtom {
    fn atom_type(&self) -> AtomType {
        self.atom_type
    }

    fn create_box(&self, env: &Env) -> LayoutBox {
        self.create_char_box(env, false)
    }

    fn as_char_symbol(&self) -> Option<&dyn CharSymbol> {
        Some(self)
    }
}

impl CharSymbol for FixedCharAtom {
    fn code_point(&self) -> char {
        self.glyph.code_point
    }

    fn is_math_mode(&self) -> bool {
        self.glyph.mode == GlyphMode::Math
    }

    fn char_font(&self, _env: &Env) -> Option<Glyph> {
        Some(self.glyph)
    }
}

// =============================================================================
// Spacing
// =============================================================================

/// Explicit horizontal space
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceAtom {
    width: Length,
}

impl SpaceAtom {
    pub fn new(width: Length) -> Self {
        Self { width }
    }

    /// `\,`
    pub fn thin() -> Self {
        Self::new(Length::new(3.0, Unit::Mu))
    }

    /// `\:`
    pub fn medium() -> Self {
        Self::new(Length::new(4.0, Unit::Mu))
    }

    /// `\;`
    pub fn thick() -> Self {
        Self::new(Length::new(5.0, Unit::Mu))
    }

    /// `\!`
    pub fn negative_thin() -> Self {
        Self::new(Length::new(-3.0, Unit::Mu))
    }

    pub fn quad() -> Self {
        Self::new(Length::new(1.0, Unit::Em))
    }

    pub fn width(&self) -> Length {
        self.width
    }
}

impl Atom for SpaceAtom {
    fn atom_type(&self) -> AtomType {
        AtomType::Ordinary
    }

    fn create_box(&self, env: &Env) -> LayoutBox {
        LayoutBox::kern(env.to_pt(self.width))
    }

    fn is_kern(&self) -> bool {
        true
    }
}

/// Marks a permitted break before the next element of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BreakMarkAtom;

impl Atom for BreakMarkAtom {
    fn atom_type(&self) -> AtomType {
        AtomType::Ordinary
    }

    fn create_box(&self, _env: &Env) -> LayoutBox {
        LayoutBox::empty()
    }

    fn is_break_mark(&self) -> bool {
        true
    }
}

// =============================================================================
// Literal text
// =============================================================================

/// Text set literally in the fallback face
#[derive(Debug, Clone, PartialEq)]
pub struct TextAtom {
    text: String,
}

impl TextAtom {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Atom for TextAtom {
    fn atom_type(&self) -> AtomType {
        AtomType::Ordinary
    }

    fn create_box(&self, env: &Env) -> LayoutBox {
        let size = env.size();
        let (mut width, mut height, mut depth) = (0.0f32, 0.0f32, 0.0f32);
        for c in self.text.chars() {
            let m = env.font().fallback_glyph(c).metrics;
            width += m.width;
            height = height.max(m.height);
            depth = depth.max(m.depth);
        }
        LayoutBox::text(
            self.text.clone(),
            FontFace::Fallback,
            width * size,
            height * size,
            depth * size,
        )
    }
}
