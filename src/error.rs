//! Error types for the gameplay core.

/// Everything that can go wrong inside the core. None of these are fatal to
/// the process; the session layer turns each into a fallback.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// A sprite was constructed with coordinates, dimensions or speed out of range
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Save data was malformed, truncated or carried an unknown tag
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The save slot could not be opened, written or read
    #[error("IO failure: {0}")]
    IoFailure(#[from] std::io::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, GameError>;
