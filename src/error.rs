//! Error types for message parsing, corpus loading and configuration

use std::path::PathBuf;
use thiserror::Error;

/// Problems found while parsing a single message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Failed to parse the message structure
    #[error("Failed to parse email structure: {0}")]
    Structure(String),

    /// Failed to decode message content
    #[error("Failed to decode content: {0}")]
    Decode(String),

    /// Missing header
    #[error("Missing header: {0}")]
    MissingHeader(String),

    /// Invalid header format
    #[error("Invalid header format for {header}: {details}")]
    InvalidHeader { header: String, details: String },

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),
}

/// Failures that stop a corpus load before any message is read
#[derive(Error, Debug)]
pub enum LoadError {
    /// The corpus directory does not exist
    #[error("Directory not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The corpus path exists but is not a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The directory listing itself could not be read
    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The start of the date range lies after its end
    #[error("Invalid date range: {0}")]
    InvalidRange(String),
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Failures that stop an analysis run
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Reasons betweenness centrality could not be computed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentralityError {
    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("centrality produced a non-finite score")]
    NonFinite,
}
