//! Error types for the doxy library.

use std::io;
use thiserror::Error;

/// Result type alias for doxy operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur outside the (total) text transform itself.
///
/// Transforming text never fails; these errors come from configuration,
/// I/O, serialization and pluggable math renderers.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A style name that is not one of the known style contexts.
    #[error("Invalid style variant: {0:?} (expected one of: modern, academic, creative)")]
    InvalidStyleVariant(String),

    /// The configuration file could not be parsed.
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    /// A math renderer failed on an expression.
    #[error("Math rendering error: {0}")]
    MathRender(String),

    /// Error during rendering (HTML, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidStyleVariant("brutalist".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid style variant: \"brutalist\" (expected one of: modern, academic, creative)"
        );

        let err = Error::MathRender("unbalanced braces".to_string());
        assert_eq!(err.to_string(), "Math rendering error: unbalanced braces");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("style = ").unwrap_err();
        let err: Error = toml_err.into();
        assert!(matches!(err, Error::ConfigParse(_)));
    }
}
