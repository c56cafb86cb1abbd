use thiserror::Error;

#[derive(Error, Debug)]
pub enum PropperError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Error parsing file: {0}")]
    Parse(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PropperError {
    /// Wrap any decoder failure so callers never see library-specific error types.
    pub fn parse(err: impl std::fmt::Display) -> Self {
        PropperError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PropperError>;
