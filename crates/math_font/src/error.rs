//! Error types for math font tables

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("Invalid font table: {0}")]
    InvalidTable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FontError::InvalidTable("ligature result missing".to_string());
        assert_eq!(err.to_string(), "Invalid font table: ligature result missing");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: FontError = json_err.into();
        assert!(matches!(err, FontError::Json(_)));
    }
}
