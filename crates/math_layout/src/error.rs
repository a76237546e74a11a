//! Error types for the math layout crate

use thiserror::Error;

/// Errors that can occur in math layout
#[derive(Error, Debug)]
pub enum LayoutError {
    /// A character accessor was used on a decoration that wraps no character
    #[error("Not a character symbol: {0}")]
    NotACharacter(String),

    /// Layout configuration failed validation
    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),

    /// Font table error
    #[error("Font error: {0}")]
    Font(#[from] math_font::FontError),

    /// JSON error from serde_json
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for math layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LayoutError::NotACharacter("SpaceAtom".to_string());
        assert_eq!(err.to_string(), "Not a character symbol: SpaceAtom");
    }

    #[test]
    fn test_error_from_font() {
        let font_err = math_font::FontError::InvalidTable("empty".to_string());
        let err: LayoutError = font_err.into();
        assert!(matches!(err, LayoutError::Font(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LayoutError = io_err.into();
        assert!(matches!(err, LayoutError::Io(_)));
    }
}
