//! Math Layout - the box tree produced by atoms
//!
//! Boxes follow TeX conventions: `height` above the baseline, `depth` below
//! it, and a positive `shift` moves a box down relative to its parent's
//! baseline. All dimensions are in points.

use crate::atom::Atom;
use crate::config::LayoutConfig;
use crate::env::{Env, MathStyle};
use crate::error::LayoutResult;
use math_font::{FontFace, Glyph};
use std::path::Path;

// =============================================================================
// Layout Types
// =============================================================================

/// Where a rotation pivots, relative to the box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOrigin {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BaselineLeft,
    BaselineCenter,
    BaselineRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl RotationOrigin {
    /// Parse the two-letter origin codes (`bl`, `cc`, `Br`, `tr`, ...).
    /// `B` selects the baseline, `b` the bottom edge.
    pub fn parse(code: &str) -> Option<Self> {
        let mut chars = code.trim().chars();
        let (v, h) = (chars.next()?, chars.next()?);
        if chars.next().is_some() {
            return None;
        }
        // accept "lb" style too
        let (v, h) = if matches!(v, 'l' | 'r') || (v == 'c' && matches!(h, 't' | 'b' | 'B')) {
            (h, v)
        } else {
            (v, h)
        };
        use RotationOrigin::*;
        let origin = match (v, h) {
            ('t', 'l') => TopLeft,
            ('t', 'c') => TopCenter,
            ('t', 'r') => TopRight,
            ('c', 'l') => CenterLeft,
            ('c', 'c') => Center,
            ('c', 'r') => CenterRight,
            ('B', 'l') => BaselineLeft,
            ('B', 'c') => BaselineCenter,
            ('B', 'r') => BaselineRight,
            ('b', 'l') => BottomLeft,
            ('b', 'c') => BottomCenter,
            ('b', 'r') => BottomRight,
            _ => return None,
        };
        Some(origin)
    }

    /// Pivot point `(x, y)` for a box, y measured upwards from the baseline
    pub fn point(&self, width: f32, height: f32, depth: f32) -> (f32, f32) {
        use RotationOrigin::*;
        let x = match self {
            TopLeft | CenterLeft | BaselineLeft | BottomLeft => 0.0,
            TopCenter | Center | BaselineCenter | BottomCenter => width / 2.0,
            TopRight | CenterRight | BaselineRight | BottomRight => width,
        };
        let y = match self {
            TopLeft | TopCenter | TopRight => height,
            CenterLeft | Center | CenterRight => (height - depth) / 2.0,
            BaselineLeft | BaselineCenter | BaselineRight => 0.0,
            BottomLeft | BottomCenter | BottomRight => -depth,
        };
        (x, y)
    }
}

/// Stroke drawn across a cancelled expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelStroke {
    /// Bottom-left to top-right
    Slash,
    /// Top-left to bottom-right
    BackSlash,
    /// Both diagonals
    Cross,
}

/// The content type of a layout box
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutContent {
    /// Horizontal list; `break_positions` index into `children`
    HBox { break_positions: Vec<usize> },
    /// A single glyph
    Glyph { glyph: Glyph, text_symbol: bool },
    /// Literal text set in one face
    Text { text: String, face: FontFace },
    /// Inter-atom glue
    Glue { space: f32, stretch: f32, shrink: f32 },
    /// Fixed horizontal offset
    Kern,
    /// Invisible box with dimensions only
    Strut,
    /// Single child rotated by `angle` degrees counterclockwise about `pivot`
    Rotated { angle: f32, pivot: (f32, f32) },
    /// Single child with a cancellation stroke
    Cancel { stroke: CancelStroke },
}

/// A laid out box
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub shift: f32,
    pub content: LayoutContent,
    pub children: Vec<LayoutBox>,
}

impl LayoutBox {
    fn leaf(width: f32, height: f32, depth: f32, content: LayoutContent) -> Self {
        Self {
            width,
            height,
            depth,
            shift: 0.0,
            content,
            children: Vec::new(),
        }
    }

    /// Zero-size strut
    pub fn empty() -> Self {
        Self::strut(0.0, 0.0, 0.0)
    }

    pub fn strut(width: f32, height: f32, depth: f32) -> Self {
        Self::leaf(width, height, depth, LayoutContent::Strut)
    }

    pub fn kern(width: f32) -> Self {
        Self::leaf(width, 0.0, 0.0, LayoutContent::Kern)
    }

    pub fn glue(space: f32, stretch: f32, shrink: f32) -> Self {
        Self::leaf(space, 0.0, 0.0, LayoutContent::Glue { space, stretch, shrink })
    }

    /// Glyph box at `size` points per em. The italic correction is added to
    /// the advance unless the glyph sits inside a text run.
    pub fn glyph(glyph: Glyph, size: f32, text_symbol: bool) -> Self {
        let m = glyph.metrics;
        let italic = if text_symbol { 0.0 } else { m.italic };
        Self::leaf(
            (m.width + italic) * size,
            m.height * size,
            m.depth * size,
            LayoutContent::Glyph { glyph, text_symbol },
        )
    }

    pub fn text(text: impl Into<String>, face: FontFace, width: f32, height: f32, depth: f32) -> Self {
        Self::leaf(
            width,
            height,
            depth,
            LayoutContent::Text {
                text: text.into(),
                face,
            },
        )
    }

    /// Horizontal list: widths add up, height and depth are the maxima over
    /// the (shifted) children.
    pub fn hbox(children: Vec<LayoutBox>, break_positions: Vec<usize>) -> Self {
        let mut width = 0.0f32;
        let mut height = 0.0f32;
        let mut depth = 0.0f32;
        for child in &children {
            width += child.width;
            height = height.max(child.height - child.shift);
            depth = depth.max(child.depth + child.shift);
        }
        Self {
            width,
            height,
            depth,
            shift: 0.0,
            content: LayoutContent::HBox { break_positions },
            children,
        }
    }

    /// Rotate `child` by `angle` degrees counterclockwise about `pivot`
    /// (x from the left edge, y upwards from the baseline).
    pub fn rotated(child: LayoutBox, angle: f32, pivot: (f32, f32)) -> Self {
        let (s, c) = angle.to_radians().sin_cos();
        let (x, y) = pivot;
        let (w, h, d) = (child.width, child.height, child.depth);
        let shift_x = x * (1.0 - c) + y * s;
        let shift_y = y * (1.0 - c) - x * s;

        let xs = [-h * s, d * s, c * w + d * s, c * w - h * s];
        let ys = [h * c, -d * c, w * s - d * c, w * s + h * c];
        let xmax = xs.iter().copied().fold(f32::MIN, f32::max) + shift_x;
        let xmin = xs.iter().copied().fold(f32::MAX, f32::min) + shift_x;
        let ymax = ys.iter().copied().fold(f32::MIN, f32::max);
        let ymin = ys.iter().copied().fold(f32::MAX, f32::min);

        Self {
            width: xmax - xmin,
            height: ymax + shift_y,
            depth: -ymin - shift_y,
            shift: 0.0,
            content: LayoutContent::Rotated { angle, pivot },
            children: vec![child],
        }
    }

    pub fn cancelled(child: LayoutBox, stroke: CancelStroke) -> Self {
        Self {
            width: child.width,
            height: child.height,
            depth: child.depth,
            shift: 0.0,
            content: LayoutContent::Cancel { stroke },
            children: vec![child],
        }
    }

    pub fn total_height(&self) -> f32 {
        self.height + self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0 && self.depth == 0.0 && self.children.is_empty()
    }

    pub fn is_glue(&self) -> bool {
        matches!(self.content, LayoutContent::Glue { .. })
    }

    pub fn is_kern(&self) -> bool {
        matches!(self.content, LayoutContent::Kern)
    }

    /// Break positions of a horizontal box
    pub fn break_positions(&self) -> &[usize] {
        match &self.content {
            LayoutContent::HBox { break_positions } => break_positions,
            _ => &[],
        }
    }

    /// Visible characters in left-to-right order, descending into children
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.content {
            LayoutContent::Glyph { glyph, .. } => out.push(glyph.code_point),
            LayoutContent::Text { text, .. } => out.push_str(text),
            _ => {}
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

// =============================================================================
// Layout Engine
// =============================================================================

/// Entry point that lays out top-level atoms under one configuration
pub struct LayoutEngine {
    env: Env,
}

impl LayoutEngine {
    /// Create a new layout engine with default configuration
    pub fn new() -> Self {
        Self { env: Env::default() }
    }

    /// Create with a specific configuration
    pub fn with_config(config: LayoutConfig) -> LayoutResult<Self> {
        config.validate()?;
        Ok(Self {
            env: Env::new(config),
        })
    }

    /// Create with a configuration file (defaults when the file is absent)
    pub fn from_config_file(path: impl AsRef<Path>) -> LayoutResult<Self> {
        Self::with_config(LayoutConfig::load(path)?)
    }

    /// Create with an existing context
    pub fn with_env(env: Env) -> Self {
        Self { env }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Layout an atom in text style
    pub fn layout(&self, atom: &dyn Atom) -> LayoutBox {
        atom.create_box(&self.env)
    }

    /// Layout an atom in the given style
    pub fn layout_in(&self, atom: &dyn Atom, style: MathStyle) -> LayoutBox {
        atom.create_box(&self.env.with_style(style))
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math_font::{GlyphMetrics, GlyphMode};

    fn glyph(c: char, width: f32, italic: f32) -> Glyph {
        Glyph::new(
            FontFace::MathItalic,
            c,
            GlyphMode::Math,
            GlyphMetrics::new(width, 0.5, 0.1).with_italic(italic),
        )
    }

    #[test]
    fn test_empty_box() {
        let b = LayoutBox::hbox(Vec::new(), Vec::new());
        assert_eq!(b.width, 0.0);
        assert_eq!(b.height, 0.0);
        assert_eq!(b.depth, 0.0);
        assert!(b.is_empty());
    }

    #[test]
    fn test_glyph_italic_correction() {
        let plain = LayoutBox::glyph(glyph('f', 0.5, 0.1), 10.0, false);
        let in_run = LayoutBox::glyph(glyph('f', 0.5, 0.1), 10.0, true);
        assert!((plain.width - 6.0).abs() < 1e-5);
        assert!((in_run.width - 5.0).abs() < 1e-5);
        assert!((plain.height - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_hbox_dimensions() {
        let mut lowered = LayoutBox::strut(2.0, 3.0, 1.0);
        lowered.shift = 2.0;
        let b = LayoutBox::hbox(
            vec![
                LayoutBox::strut(1.0, 4.0, 0.5),
                LayoutBox::glue(3.0, 1.0, 1.0),
                lowered,
            ],
            Vec::new(),
        );
        assert_eq!(b.width, 6.0);
        assert_eq!(b.height, 4.0);
        assert_eq!(b.depth, 3.0);
        assert_eq!(b.total_height(), 7.0);
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let child = LayoutBox::strut(4.0, 2.0, 1.0);
        let b = LayoutBox::rotated(child, 90.0, (0.0, 0.0));
        assert!((b.width - 3.0).abs() < 1e-4);
        assert!((b.height - 4.0).abs() < 1e-4);
        assert!(b.depth.abs() < 1e-4);
    }

    #[test]
    fn test_rotation_zero_is_identity() {
        let b = LayoutBox::rotated(LayoutBox::strut(4.0, 2.0, 1.0), 0.0, (2.0, 0.0));
        assert!((b.width - 4.0).abs() < 1e-4);
        assert!((b.height - 2.0).abs() < 1e-4);
        assert!((b.depth - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_origin_parse() {
        assert_eq!(RotationOrigin::parse("bl"), Some(RotationOrigin::BottomLeft));
        assert_eq!(RotationOrigin::parse("Br"), Some(RotationOrigin::BaselineRight));
        assert_eq!(RotationOrigin::parse("cc"), Some(RotationOrigin::Center));
        assert_eq!(RotationOrigin::parse("lt"), Some(RotationOrigin::TopLeft));
        assert_eq!(RotationOrigin::parse("xx"), None);
        assert_eq!(RotationOrigin::parse("blc"), None);
    }

    #[test]
    fn test_rotation_origin_point() {
        let (x, y) = RotationOrigin::TopRight.point(4.0, 2.0, 1.0);
        assert_eq!((x, y), (4.0, 2.0));
        let (x, y) = RotationOrigin::BottomCenter.point(4.0, 2.0, 1.0);
        assert_eq!((x, y), (2.0, -1.0));
    }

    #[test]
    fn test_text_content_order() {
        let b = LayoutBox::hbox(
            vec![
                LayoutBox::glyph(glyph('a', 0.5, 0.0), 10.0, false),
                LayoutBox::kern(1.0),
                LayoutBox::text("bc", FontFace::Fallback, 5.0, 5.0, 1.0),
            ],
            vec![1],
        );
        assert_eq!(b.text_content(), "abc");
        assert_eq!(b.break_positions(), &[1]);
    }
}
