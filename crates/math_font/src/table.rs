//! Table-driven font metrics
//!
//! `FontTable` is the built-in `MathFont` provider. Metrics are approximate em
//! values of a Computer Modern style face; alternative tables can be loaded
//! from JSON.

use crate::{FontError, FontFace, Glyph, GlyphMetrics, GlyphMode, MathFont, Result, Script};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// One glyph entry of a metric table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRecord {
    pub ch: char,
    pub mode: GlyphMode,
    pub face: FontFace,
    pub metrics: GlyphMetrics,
}

/// `left` followed by `right` is replaced by `result`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LigatureRecord {
    pub mode: GlyphMode,
    pub left: char,
    pub right: char,
    pub result: char,
}

/// Pairwise kern in em
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernRecord {
    pub mode: GlyphMode,
    pub left: char,
    pub right: char,
    pub kern: f32,
}

/// Serialized form of a metric table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontTableData {
    pub name: String,
    pub x_height: f32,
    /// Advance of a fallback glyph, in em
    pub fallback_width: f32,
    /// Advance of a fallback glyph from a wide script (CJK, emoji)
    pub fallback_wide_width: f32,
    pub fallback_height: f32,
    pub fallback_depth: f32,
    pub glyphs: Vec<GlyphRecord>,
    #[serde(default)]
    pub ligatures: Vec<LigatureRecord>,
    #[serde(default)]
    pub kerns: Vec<KernRecord>,
}

static BUILTIN: Lazy<Arc<FontTable>> = Lazy::new(|| {
    Arc::new(FontTable::index(builtin_data()))
});

/// Indexed metric table
#[derive(Debug, Clone)]
pub struct FontTable {
    data: FontTableData,
    glyphs: HashMap<(GlyphMode, char), (FontFace, GlyphMetrics)>,
    ligatures: HashMap<(GlyphMode, char, char), char>,
    kerns: HashMap<(GlyphMode, char, char), f32>,
}

impl FontTable {
    /// The built-in table, shared by every caller
    pub fn builtin() -> Arc<FontTable> {
        Arc::clone(&BUILTIN)
    }

    /// Validate and index table data
    pub fn from_data(data: FontTableData) -> Result<Self> {
        if !(data.x_height > 0.0) {
            return Err(FontError::InvalidTable(format!(
                "x_height must be positive, got {}",
                data.x_height
            )));
        }
        if !(data.fallback_width > 0.0 && data.fallback_wide_width > 0.0) {
            return Err(FontError::InvalidTable(
                "fallback widths must be positive".to_string(),
            ));
        }

        let table = Self::index(data);
        if table.glyphs.len() != table.data.glyphs.len() {
            return Err(FontError::InvalidTable(
                "duplicate glyph entries".to_string(),
            ));
        }
        for lig in &table.data.ligatures {
            if !table.glyphs.contains_key(&(lig.mode, lig.result)) {
                return Err(FontError::InvalidTable(format!(
                    "ligature {:?}+{:?} produces {:?}, which has no glyph",
                    lig.left, lig.right, lig.result
                )));
            }
        }
        Ok(table)
    }

    /// Parse a table from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: FontTableData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Load a table from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let table = Self::from_json_str(&content)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            glyphs = table.glyph_count(),
            "loaded font table"
        );
        Ok(table)
    }

    /// Serialize the table to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    pub fn data(&self) -> &FontTableData {
        &self.data
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    fn index(data: FontTableData) -> Self {
        let glyphs = data
            .glyphs
            .iter()
            .map(|g| ((g.mode, g.ch), (g.face, g.metrics)))
            .collect();
        let ligatures = data
            .ligatures
            .iter()
            .map(|l| ((l.mode, l.left, l.right), l.result))
            .collect();
        let kerns = data
            .kerns
            .iter()
            .map(|k| ((k.mode, k.left, k.right), k.kern))
            .collect();
        Self {
            data,
            glyphs,
            ligatures,
            kerns,
        }
    }
}

impl MathFont for FontTable {
    fn name(&self) -> &str {
        &self.data.name
    }

    fn x_height(&self) -> f32 {
        self.data.x_height
    }

    fn glyph(&self, c: char, mode: GlyphMode) -> Option<Glyph> {
        self.glyphs
            .get(&(mode, c))
            .map(|(face, metrics)| Glyph::new(*face, c, mode, *metrics))
    }

    fn fallback_glyph(&self, c: char) -> Glyph {
        let width = if Script::of(c).is_wide() {
            self.data.fallback_wide_width
        } else {
            self.data.fallback_width
        };
        Glyph::new(
            FontFace::Fallback,
            c,
            GlyphMode::Text,
            GlyphMetrics::new(width, self.data.fallback_height, self.data.fallback_depth),
        )
    }

    fn ligature(&self, left: &Glyph, right: &Glyph) -> Option<Glyph> {
        if left.mode != right.mode || left.is_fallback() || right.is_fallback() {
            return None;
        }
        let result = self
            .ligatures
            .get(&(left.mode, left.code_point, right.code_point))?;
        self.glyph(*result, left.mode)
    }

    fn kern(&self, left: &Glyph, right: &Glyph) -> f32 {
        if left.mode != right.mode {
            return 0.0;
        }
        self.kerns
            .get(&(left.mode, left.code_point, right.code_point))
            .copied()
            .unwrap_or(0.0)
    }
}

// =============================================================================
// Built-in metrics
// =============================================================================

const X_HEIGHT: f32 = 0.431;
const CAP_HEIGHT: f32 = 0.683;
const ASCENDER: f32 = 0.694;
const DESCENDER: f32 = 0.194;
const DELIM_HEIGHT: f32 = 0.75;
const DELIM_DEPTH: f32 = 0.25;

fn math_lowercase(c: char) -> GlyphMetrics {
    let width = match c {
        'i' | 'j' | 'l' => 0.35,
        'm' => 0.88,
        'w' => 0.72,
        _ => 0.52,
    };
    let height = match c {
        't' => 0.615,
        'b' | 'd' | 'f' | 'h' | 'k' | 'l' | 'i' | 'j' => ASCENDER,
        _ => X_HEIGHT,
    };
    let depth = match c {
        'f' | 'g' | 'j' | 'p' | 'q' | 'y' => DESCENDER,
        _ => 0.0,
    };
    let italic = match c {
        'f' => 0.108,
        'j' => 0.057,
        'v' | 'w' | 'y' => 0.036,
        'r' => 0.028,
        _ => 0.0,
    };
    GlyphMetrics::new(width, height, depth).with_italic(italic)
}

fn math_uppercase(c: char) -> GlyphMetrics {
    let width = match c {
        'I' => 0.44,
        'J' => 0.63,
        'M' => 0.97,
        'W' => 0.94,
        'L' => 0.68,
        _ => 0.75,
    };
    let depth = if c == 'Q' { DESCENDER } else { 0.0 };
    let italic = match c {
        'V' | 'Y' => 0.222,
        'T' | 'F' => 0.139,
        'W' | 'P' => 0.139,
        'U' | 'X' | 'Z' => 0.07,
        'C' | 'E' | 'G' | 'H' | 'I' | 'J' | 'K' | 'M' | 'N' | 'S' => 0.05,
        _ => 0.0,
    };
    GlyphMetrics::new(width, CAP_HEIGHT, depth).with_italic(italic)
}

fn text_metrics(c: char) -> GlyphMetrics {
    let width = match c {
        ' ' => 0.333,
        'i' | 'j' | 'l' | '.' | ',' | ';' | ':' | '!' | '\'' | '`' | '|' => 0.278,
        'f' | 'r' | 't' | '(' | ')' | '[' | ']' | '-' => 0.35,
        'm' | 'M' | 'W' => 0.833,
        'w' => 0.722,
        'I' => 0.361,
        c if c.is_ascii_digit() => 0.5,
        c if c.is_uppercase() => 0.722,
        _ => 0.5,
    };
    let height = match c {
        ' ' => 0.0,
        '.' | ',' | '_' => 0.106,
        '-' => 0.25,
        '(' | ')' | '[' | ']' | '{' | '}' | '|' | '/' => DELIM_HEIGHT,
        'a' | 'c' | 'e' | 'g' | 'm' | 'n' | 'o' | 'p' | 'q' | 'r' | 's' | 'u' | 'v' | 'w'
        | 'x' | 'y' | 'z' => X_HEIGHT,
        't' => 0.615,
        c if c.is_alphanumeric() && c.is_lowercase() => ASCENDER,
        _ => CAP_HEIGHT,
    };
    let depth = match c {
        'g' | 'j' | 'p' | 'q' | 'y' | ',' | ';' => DESCENDER,
        '(' | ')' | '[' | ']' | '{' | '}' | '|' | '/' => DELIM_DEPTH,
        _ => 0.0,
    };
    GlyphMetrics::new(width, height, depth)
}

fn builtin_data() -> FontTableData {
    let mut glyphs = Vec::new();
    let mut push = |ch: char, mode: GlyphMode, face: FontFace, metrics: GlyphMetrics| {
        glyphs.push(GlyphRecord {
            ch,
            mode,
            face,
            metrics,
        });
    };

    // Math mode: italic letters, upright digits, Greek, operators
    for c in 'a'..='z' {
        push(c, GlyphMode::Math, FontFace::MathItalic, math_lowercase(c));
    }
    for c in 'A'..='Z' {
        push(c, GlyphMode::Math, FontFace::MathItalic, math_uppercase(c));
    }
    for c in '0'..='9' {
        push(c, GlyphMode::Math, FontFace::MathUpright, GlyphMetrics::new(0.5, 0.644, 0.0));
    }
    for c in '\u{03B1}'..='\u{03C9}' {
        let depth = match c {
            '\u{03B2}' | '\u{03B3}' | '\u{03B6}' | '\u{03B7}' | '\u{03BC}' | '\u{03BE}'
            | '\u{03C1}' | '\u{03C6}' | '\u{03C7}' | '\u{03C8}' => DESCENDER,
            _ => 0.0,
        };
        push(
            c,
            GlyphMode::Math,
            FontFace::MathItalic,
            GlyphMetrics::new(0.58, X_HEIGHT, depth).with_italic(0.03),
        );
    }
    for c in [
        '\u{0393}', '\u{0394}', '\u{0398}', '\u{039B}', '\u{039E}', '\u{03A0}', '\u{03A3}',
        '\u{03A6}', '\u{03A8}', '\u{03A9}',
    ] {
        push(c, GlyphMode::Math, FontFace::MathUpright, GlyphMetrics::new(0.72, CAP_HEIGHT, 0.0));
    }
    let operators: &[(char, f32, f32, f32)] = &[
        ('+', 0.778, 0.583, 0.083),
        ('-', 0.778, 0.583, 0.083),
        ('\u{2212}', 0.778, 0.583, 0.083),
        ('\u{00D7}', 0.778, 0.491, 0.0),
        ('\u{00F7}', 0.778, 0.5, 0.0),
        ('\u{00B1}', 0.778, 0.666, 0.083),
        ('\u{2213}', 0.778, 0.5, 0.166),
        ('\u{22C5}', 0.278, 0.31, 0.0),
        ('*', 0.5, 0.465, 0.0),
        ('/', 0.5, DELIM_HEIGHT, DELIM_DEPTH),
        ('=', 0.778, 0.367, 0.0),
        ('<', 0.778, 0.54, 0.04),
        ('>', 0.778, 0.54, 0.04),
        ('\u{2264}', 0.778, 0.636, 0.136),
        ('\u{2265}', 0.778, 0.636, 0.136),
        ('\u{2260}', 0.778, 0.716, 0.215),
        ('\u{2248}', 0.778, 0.483, 0.0),
        ('\u{2208}', 0.667, 0.54, 0.04),
        ('\u{2192}', 1.0, 0.511, 0.011),
        ('(', 0.389, DELIM_HEIGHT, DELIM_DEPTH),
        (')', 0.389, DELIM_HEIGHT, DELIM_DEPTH),
        ('[', 0.278, DELIM_HEIGHT, DELIM_DEPTH),
        (']', 0.278, DELIM_HEIGHT, DELIM_DEPTH),
        ('{', 0.5, DELIM_HEIGHT, DELIM_DEPTH),
        ('}', 0.5, DELIM_HEIGHT, DELIM_DEPTH),
        ('|', 0.278, DELIM_HEIGHT, DELIM_DEPTH),
        (',', 0.278, 0.106, DESCENDER),
        (';', 0.278, X_HEIGHT, DESCENDER),
        (':', 0.278, X_HEIGHT, 0.0),
        ('.', 0.278, 0.106, 0.0),
        ('!', 0.278, ASCENDER, 0.0),
        ('?', 0.472, ASCENDER, 0.0),
        ('\'', 0.275, 0.56, 0.0),
        ('\u{221E}', 1.0, X_HEIGHT, 0.0),
        ('\u{2211}', 1.056, DELIM_HEIGHT, DELIM_DEPTH),
        ('\u{220F}', 0.944, DELIM_HEIGHT, DELIM_DEPTH),
    ];
    for &(c, w, h, d) in operators {
        push(c, GlyphMode::Math, FontFace::MathUpright, GlyphMetrics::new(w, h, d));
    }
    push(
        '\u{222B}',
        GlyphMode::Math,
        FontFace::MathUpright,
        GlyphMetrics::new(0.556, 0.805, 0.306).with_italic(0.111),
    );

    // Text mode: printable ASCII, Latin-1, ligature and dash glyphs
    for c in (' '..='~').chain('\u{00A0}'..='\u{00FF}') {
        push(c, GlyphMode::Text, FontFace::TextRoman, text_metrics(c));
    }
    let presentation: &[(char, f32)] = &[
        ('\u{FB00}', 0.583),
        ('\u{FB01}', 0.556),
        ('\u{FB02}', 0.556),
        ('\u{FB03}', 0.833),
        ('\u{FB04}', 0.833),
    ];
    for &(c, w) in presentation {
        push(c, GlyphMode::Text, FontFace::TextRoman, GlyphMetrics::new(w, ASCENDER, 0.0));
    }
    push('\u{2013}', GlyphMode::Text, FontFace::TextRoman, GlyphMetrics::new(0.5, 0.285, 0.0));
    push('\u{2014}', GlyphMode::Text, FontFace::TextRoman, GlyphMetrics::new(1.0, 0.285, 0.0));
    push('\u{201C}', GlyphMode::Text, FontFace::TextRoman, GlyphMetrics::new(0.5, ASCENDER, 0.0));
    push('\u{201D}', GlyphMode::Text, FontFace::TextRoman, GlyphMetrics::new(0.5, ASCENDER, 0.0));

    let lig = |left, right, result| LigatureRecord {
        mode: GlyphMode::Text,
        left,
        right,
        result,
    };
    let ligatures = vec![
        lig('f', 'f', '\u{FB00}'),
        lig('f', 'i', '\u{FB01}'),
        lig('f', 'l', '\u{FB02}'),
        lig('\u{FB00}', 'i', '\u{FB03}'),
        lig('\u{FB00}', 'l', '\u{FB04}'),
        lig('-', '-', '\u{2013}'),
        lig('\u{2013}', '-', '\u{2014}'),
        lig('`', '`', '\u{201C}'),
        lig('\'', '\'', '\u{201D}'),
    ];

    let text_kerns: &[(char, char, f32)] = &[
        ('A', 'V', -0.083),
        ('V', 'A', -0.083),
        ('A', 'W', -0.083),
        ('W', 'A', -0.083),
        ('A', 'T', -0.083),
        ('T', 'A', -0.083),
        ('A', 'Y', -0.083),
        ('Y', 'A', -0.083),
        ('L', 'T', -0.083),
        ('L', 'V', -0.111),
        ('L', 'Y', -0.083),
        ('T', 'o', -0.083),
        ('T', 'a', -0.083),
        ('T', 'e', -0.083),
        ('V', 'o', -0.083),
        ('V', 'a', -0.083),
        ('Y', 'o', -0.083),
        ('k', 'a', -0.028),
        ('o', 'x', -0.028),
        ('v', 'a', -0.028),
    ];
    let math_kerns: &[(char, char, f32)] = &[
        ('A', 'V', -0.028),
        ('V', 'A', -0.083),
        ('T', 'A', -0.056),
        ('L', 'T', -0.028),
        ('f', 'f', -0.056),
        ('P', 'A', -0.083),
    ];
    let kerns = text_kerns
        .iter()
        .map(|&(left, right, kern)| (GlyphMode::Text, left, right, kern))
        .chain(
            math_kerns
                .iter()
                .map(|&(left, right, kern)| (GlyphMode::Math, left, right, kern)),
        )
        .map(|(mode, left, right, kern)| KernRecord {
            mode,
            left,
            right,
            kern,
        })
        .collect();

    FontTableData {
        name: "builtin".to_string(),
        x_height: X_HEIGHT,
        fallback_width: 0.6,
        fallback_wide_width: 1.0,
        fallback_height: 0.8,
        fallback_depth: 0.2,
        glyphs,
        ligatures,
        kerns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn math(c: char) -> Glyph {
        FontTable::builtin().glyph(c, GlyphMode::Math).unwrap()
    }

    fn text(c: char) -> Glyph {
        FontTable::builtin().glyph(c, GlyphMode::Text).unwrap()
    }

    #[test]
    fn test_builtin_coverage() {
        let font = FontTable::builtin();
        assert!(font.glyph('x', GlyphMode::Math).is_some());
        assert!(font.glyph('\u{03C0}', GlyphMode::Math).is_some());
        assert!(font.glyph('\u{2264}', GlyphMode::Math).is_some());
        assert!(font.glyph('e', GlyphMode::Text).is_some());
        assert!(font.glyph('\u{00E9}', GlyphMode::Text).is_some());
        assert!(font.glyph('\u{4E2D}', GlyphMode::Math).is_none());
        assert!(font.glyph('\u{4E2D}', GlyphMode::Text).is_none());
        assert!(font.glyph('\u{03C0}', GlyphMode::Text).is_none());
    }

    #[test]
    fn test_builtin_is_shared() {
        let a = FontTable::builtin();
        let b = FontTable::builtin();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_math_letters_are_italic() {
        let g = math('f');
        assert_eq!(g.face, FontFace::MathItalic);
        assert!(g.metrics.italic > 0.0);
        assert_eq!(math('2').face, FontFace::MathUpright);
    }

    #[test]
    fn test_text_ligatures() {
        let font = FontTable::builtin();
        let ff = font.ligature(&text('f'), &text('f')).unwrap();
        assert_eq!(ff.code_point, '\u{FB00}');
        let ffi = font.ligature(&ff, &text('i')).unwrap();
        assert_eq!(ffi.code_point, '\u{FB03}');
        let en = font.ligature(&text('-'), &text('-')).unwrap();
        let em = font.ligature(&en, &text('-')).unwrap();
        assert_eq!(em.code_point, '\u{2014}');
    }

    #[test]
    fn test_no_ligature_across_modes() {
        let font = FontTable::builtin();
        assert!(font.ligature(&math('f'), &math('i')).is_none());
        assert!(font.ligature(&text('f'), &math('i')).is_none());
    }

    #[test]
    fn test_kerning() {
        let font = FontTable::builtin();
        assert!(font.kern(&text('A'), &text('V')) < 0.0);
        assert!(font.kern(&math('V'), &math('A')) < 0.0);
        assert_eq!(font.kern(&text('a'), &text('b')), 0.0);
        assert_eq!(font.kern(&text('A'), &math('V')), 0.0);
    }

    #[test]
    fn test_fallback_glyph_widths() {
        let font = FontTable::builtin();
        let cjk = font.fallback_glyph('\u{4E2D}');
        let latin = font.fallback_glyph('x');
        assert!(cjk.is_fallback());
        assert!(cjk.metrics.width > latin.metrics.width);
    }

    #[test]
    fn test_json_roundtrip() {
        let font = FontTable::builtin();
        let json = font.to_json().unwrap();
        let parsed = FontTable::from_json_str(&json).unwrap();
        assert_eq!(parsed.glyph_count(), font.glyph_count());
        assert_eq!(parsed.glyph('x', GlyphMode::Math), font.glyph('x', GlyphMode::Math));
    }

    #[test]
    fn test_rejects_missing_ligature_result() {
        let mut data = FontTable::builtin().data().clone();
        data.ligatures.push(LigatureRecord {
            mode: GlyphMode::Math,
            left: 'a',
            right: 'b',
            result: '\u{4E2D}',
        });
        let err = FontTable::from_data(data).unwrap_err();
        assert!(matches!(err, FontError::InvalidTable(_)));
    }

    #[test]
    fn test_rejects_bad_x_height() {
        let mut data = FontTable::builtin().data().clone();
        data.x_height = 0.0;
        assert!(FontTable::from_data(data).is_err());
    }

    #[test]
    fn test_rejects_duplicate_glyphs() {
        let mut data = FontTable::builtin().data().clone();
        let first = data.glyphs[0].clone();
        data.glyphs.push(first);
        assert!(FontTable::from_data(data).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.json");
        std::fs::write(&path, FontTable::builtin().to_json().unwrap()).unwrap();
        let table = FontTable::load(&path).unwrap();
        assert_eq!(table.name(), "builtin");
    }

    #[test]
    fn test_load_missing_file() {
        let err = FontTable::load("/nonexistent/font.json").unwrap_err();
        assert!(matches!(err, FontError::Io(_)));
    }

    proptest! {
        #[test]
        fn prop_printable_ascii_has_text_glyph(c in proptest::char::range(' ', '~')) {
            let font = FontTable::builtin();
            let glyph = font.glyph(c, GlyphMode::Text);
            prop_assert!(glyph.is_some());
            prop_assert!(glyph.unwrap().metrics.width > 0.0);
        }
    }
}
