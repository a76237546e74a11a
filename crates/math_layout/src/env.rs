//! Rendering context
//!
//! `Env` carries everything a layout pass reads: the current math style, the
//! session configuration and the font provider. It is cheap to clone and
//! immutable, so one tree can be laid out under several contexts at once.

use crate::config::LayoutConfig;
use math_font::{FontTable, MathFont};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// TeX math style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MathStyle {
    Display,
    #[default]
    Text,
    Script,
    ScriptScript,
}

impl MathStyle {
    /// Script and script-script styles suppress conditional spacing
    pub fn is_script(self) -> bool {
        matches!(self, MathStyle::Script | MathStyle::ScriptScript)
    }

    /// Style used for sub- and superscripts
    pub fn sub_style(self) -> Self {
        match self {
            MathStyle::Display | MathStyle::Text => MathStyle::Script,
            MathStyle::Script | MathStyle::ScriptScript => MathStyle::ScriptScript,
        }
    }

    /// Size multiplier relative to text style
    pub fn scale(self, config: &LayoutConfig) -> f32 {
        match self {
            MathStyle::Display | MathStyle::Text => 1.0,
            MathStyle::Script => config.script_scale,
            MathStyle::ScriptScript => config.script_script_scale,
        }
    }
}

/// Length units understood by the context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Em,
    Ex,
    /// 1/18 em
    Mu,
    Pt,
    /// 3/4 pt
    Px,
}

/// A length with a unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub value: f32,
    pub unit: Unit,
}

impl Length {
    pub const fn new(value: f32, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, Unit::Pt)
    }

    /// Parse `"1.5em"`, `"-3mu"`, `"2pt"`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (number, unit) = s.split_at(split);
        let value: f32 = number.trim().parse().ok()?;
        let unit = match unit.trim() {
            "em" => Unit::Em,
            "ex" => Unit::Ex,
            "mu" => Unit::Mu,
            "pt" | "" => Unit::Pt,
            "px" => Unit::Px,
            _ => return None,
        };
        Some(Self::new(value, unit))
    }
}

/// The rendering context passed to every `create_box` call
#[derive(Debug, Clone)]
pub struct Env {
    style: MathStyle,
    config: Arc<LayoutConfig>,
    font: Arc<dyn MathFont>,
}

impl Default for Env {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl Env {
    /// Text-style context using the built-in font table
    pub fn new(config: LayoutConfig) -> Self {
        Self::with_font(config, FontTable::builtin())
    }

    /// Text-style context using the given font provider
    pub fn with_font(config: LayoutConfig, font: Arc<dyn MathFont>) -> Self {
        Self {
            style: MathStyle::Text,
            config: Arc::new(config),
            font,
        }
    }

    /// Same context in another style
    pub fn with_style(&self, style: MathStyle) -> Self {
        Self {
            style,
            config: Arc::clone(&self.config),
            font: Arc::clone(&self.font),
        }
    }

    pub fn style(&self) -> MathStyle {
        self.style
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn font(&self) -> &dyn MathFont {
        self.font.as_ref()
    }

    pub fn break_everywhere(&self) -> bool {
        self.config.break_everywhere
    }

    /// Points per em at the current style
    pub fn size(&self) -> f32 {
        self.config.font_size * self.style.scale(&self.config)
    }

    pub fn em_to_pt(&self, em: f32) -> f32 {
        em * self.size()
    }

    pub fn mu_to_pt(&self, mu: f32) -> f32 {
        mu * self.size() / 18.0
    }

    /// Convert a length to points at the current style
    pub fn to_pt(&self, length: Length) -> f32 {
        match length.unit {
            Unit::Em => self.em_to_pt(length.value),
            Unit::Ex => self.em_to_pt(length.value * self.font.x_height()),
            Unit::Mu => self.mu_to_pt(length.value),
            Unit::Pt => length.value,
            Unit::Px => length.value * 0.75,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_scaling() {
        let config = LayoutConfig::default();
        assert_eq!(MathStyle::Display.scale(&config), 1.0);
        assert_eq!(MathStyle::Script.scale(&config), 0.7);
        assert_eq!(MathStyle::ScriptScript.scale(&config), 0.5);
        assert!(MathStyle::Script.is_script());
        assert!(!MathStyle::Display.is_script());
    }

    #[test]
    fn test_sub_style() {
        assert_eq!(MathStyle::Display.sub_style(), MathStyle::Script);
        assert_eq!(MathStyle::Script.sub_style(), MathStyle::ScriptScript);
        assert_eq!(MathStyle::ScriptScript.sub_style(), MathStyle::ScriptScript);
    }

    #[test]
    fn test_default_style() {
        assert_eq!(MathStyle::default(), MathStyle::Text);
        assert_eq!(Env::default().style(), MathStyle::Text);
    }

    #[test]
    fn test_unit_conversion() {
        let env = Env::new(LayoutConfig::for_size(18.0));
        assert_eq!(env.em_to_pt(1.0), 18.0);
        assert_eq!(env.mu_to_pt(18.0), 18.0);
        assert_eq!(env.to_pt(Length::new(3.0, Unit::Mu)), 3.0);
        assert_eq!(env.to_pt(Length::new(4.0, Unit::Px)), 3.0);
        assert_eq!(env.to_pt(Length::new(2.0, Unit::Pt)), 2.0);
        assert!(env.to_pt(Length::new(1.0, Unit::Ex)) < 18.0);
    }

    #[test]
    fn test_with_style_keeps_config() {
        let env = Env::new(LayoutConfig::for_size(10.0).with_break_everywhere(true));
        let script = env.with_style(MathStyle::Script);
        assert_eq!(script.style(), MathStyle::Script);
        assert!(script.break_everywhere());
        assert!((script.size() - 7.0).abs() < 1e-5);
        assert_eq!(env.style(), MathStyle::Text);
    }

    #[test]
    fn test_length_parse() {
        assert_eq!(Length::parse("1.5em"), Some(Length::new(1.5, Unit::Em)));
        assert_eq!(Length::parse(" -3mu "), Some(Length::new(-3.0, Unit::Mu)));
        assert_eq!(Length::parse("2"), Some(Length::new(2.0, Unit::Pt)));
        assert_eq!(Length::parse("2 furlongs"), None);
        assert_eq!(Length::parse("em"), None);
    }
}
