//! Glyph descriptors and the font provider contract

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mode a code point is looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphMode {
    /// Math glyphs (italic letters, upright operators)
    Math,
    /// Literal text glyphs
    Text,
}

/// Face a glyph is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFace {
    MathItalic,
    MathUpright,
    TextRoman,
    /// System face used for code points the table cannot resolve
    Fallback,
}

impl FontFace {
    /// Family name handed to the rendering backend
    pub fn family(&self) -> &'static str {
        match self {
            FontFace::MathItalic => "Latin Modern Math Italic",
            FontFace::MathUpright => "Latin Modern Math",
            FontFace::TextRoman => "Latin Modern Roman",
            FontFace::Fallback => "sans-serif",
        }
    }
}

/// Metrics of one glyph, in em units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GlyphMetrics {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// Italic correction
    #[serde(default)]
    pub italic: f32,
}

impl GlyphMetrics {
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
            italic: 0.0,
        }
    }

    pub const fn with_italic(mut self, italic: f32) -> Self {
        self.italic = italic;
        self
    }
}

/// A resolved glyph: face, code point and metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub face: FontFace,
    pub code_point: char,
    pub mode: GlyphMode,
    pub metrics: GlyphMetrics,
}

impl Glyph {
    pub fn new(face: FontFace, code_point: char, mode: GlyphMode, metrics: GlyphMetrics) -> Self {
        Self {
            face,
            code_point,
            mode,
            metrics,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.face == FontFace::Fallback
    }
}

/// Font metrics lookup used by the layout core.
///
/// Implementations must be immutable: the same provider is shared by every
/// layout pass, possibly from several threads at once.
pub trait MathFont: Send + Sync + fmt::Debug {
    /// Human readable name of the metric set
    fn name(&self) -> &str;

    /// Height of a lowercase x, in em
    fn x_height(&self) -> f32;

    /// Look up a code point in the given mode
    fn glyph(&self, c: char, mode: GlyphMode) -> Option<Glyph>;

    /// Glyph from the fallback face, always available
    fn fallback_glyph(&self, c: char) -> Glyph;

    /// Composed glyph replacing the pair, if the font defines one
    fn ligature(&self, left: &Glyph, right: &Glyph) -> Option<Glyph>;

    /// Pairwise kern in em, zero when the pair has no entry
    fn kern(&self, left: &Glyph, right: &Glyph) -> f32;
}
