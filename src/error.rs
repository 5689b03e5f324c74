//! Error types for stylescout

use thiserror::Error;

/// Result type alias for stylescout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, inspecting or reporting on a page
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to initialize the page host
    #[error("Initialization failed: {0}")]
    InitializationError(String),

    /// Failed to load a URL
    #[error("Failed to load URL: {0}")]
    LoadError(String),

    /// Failed to produce a report or snapshot
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The inspector was driven into an invalid state
    #[error("Inspector error: {0}")]
    InspectorError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

