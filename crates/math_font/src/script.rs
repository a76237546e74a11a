//! Unicode script detection
//!
//! Character runs only merge into ligatures or receive kerns when their
//! members share a script.

use serde::{Deserialize, Serialize};

/// Script categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Script {
    /// Basic and extended Latin, including ASCII digits and punctuation
    Latin,
    Greek,
    Cyrillic,
    Arabic,
    Hebrew,
    /// CJK (Chinese, Japanese, Korean)
    Cjk,
    /// Math operators, arrows, general punctuation
    Symbol,
    Emoji,
    Unknown,
}

impl Script {
    /// Script of a single code point
    pub fn of(ch: char) -> Self {
        match ch {
            '\u{0000}'..='\u{024F}' => Script::Latin,
            '\u{0370}'..='\u{03FF}' | '\u{1F00}'..='\u{1FFF}' => Script::Greek,
            '\u{0400}'..='\u{04FF}' => Script::Cyrillic,
            '\u{0590}'..='\u{05FF}' => Script::Hebrew,
            '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}' => Script::Arabic,
            '\u{2000}'..='\u{2BFF}' => Script::Symbol,
            '\u{3040}'..='\u{30FF}' | '\u{4E00}'..='\u{9FFF}' | '\u{AC00}'..='\u{D7AF}' => {
                Script::Cjk
            }
            // Alphabetic presentation forms (ff, fi, fl ligatures)
            '\u{FB00}'..='\u{FB06}' => Script::Latin,
            '\u{1D400}'..='\u{1D7FF}' => Script::Symbol,
            '\u{1F300}'..='\u{1F9FF}' => Script::Emoji,
            _ => Script::Unknown,
        }
    }

    /// Whether glyphs of this script are set at full em width
    pub fn is_wide(&self) -> bool {
        matches!(self, Script::Cjk | Script::Emoji)
    }
}
