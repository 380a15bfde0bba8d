//! Error types for wrangle core operations

use thiserror::Error;

/// Process exit status codes reported by the command-line tool
pub struct ExitStatus;

impl ExitStatus {
    pub const SUCCESS: i32 = 0;
    pub const BADCMD: i32 = 2;
    pub const MISSINGARG: i32 = 7;
    pub const UNEXPECTEDARGS: i32 = 8;
    pub const HTTPFAIL: i32 = 9;
    pub const GRAPHPARSE: i32 = 10;
    pub const UNKNOWNCMD: i32 = 11;
    pub const WRITEFAIL: i32 = 12;
    pub const CONFIG: i32 = 13;
}

/// Main error type for wrangle core operations
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Document write error: {0}")]
    Sink(#[from] SinkError),

    #[error("Expected {label} argument for {command} not present.  Supplied arguments: ({supplied})")]
    MissingArgument {
        command: String,
        label: String,
        supplied: String,
    },

    #[error("Unexpected arguments for {command}: ({supplied})")]
    UnexpectedArguments { command: String, supplied: String },

    #[error("Unrecognized command for {command}: ({topic})")]
    UnknownHelpTopic { command: String, topic: String },

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl CoreError {
    /// Exit status corresponding to this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CoreError::Fetch(FetchError::Parse { .. }) => ExitStatus::GRAPHPARSE,
            CoreError::Fetch(_) => ExitStatus::HTTPFAIL,
            CoreError::Sink(_) => ExitStatus::WRITEFAIL,
            CoreError::MissingArgument { .. } => ExitStatus::MISSINGARG,
            CoreError::UnexpectedArguments { .. } => ExitStatus::UNEXPECTEDARGS,
            CoreError::UnknownHelpTopic { .. } => ExitStatus::UNKNOWNCMD,
            CoreError::Configuration(_) => ExitStatus::CONFIG,
        }
    }
}

/// Errors raised while retrieving a graph from a location
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP error response {status:03} {reason} ({location})")]
    Status {
        location: String,
        status: u16,
        reason: String,
    },

    #[error("Transport failure for {location}: {message}")]
    Transport { location: String, message: String },

    #[error("Failed to parse graph at {location}: {message}")]
    Parse { location: String, message: String },

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Failed to read {location}: {message}")]
    Io { location: String, message: String },
}

impl FetchError {
    /// Location the failed fetch was addressed to, when known
    pub fn location(&self) -> &str {
        match self {
            FetchError::Status { location, .. }
            | FetchError::Transport { location, .. }
            | FetchError::Parse { location, .. }
            | FetchError::Io { location, .. } => location,
            FetchError::InvalidLocation(location) => location,
        }
    }
}

/// Errors raised by a document sink
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("I/O failure writing {path}: {message}")]
    Io { path: String, message: String },

    #[error("Identifier cannot be used as a path segment: {0:?}")]
    InvalidSegment(String),

    #[error("Failed to serialize document: {0}")]
    Serialization(String),
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type alias for document sink operations
pub type SinkResult<T> = Result<T, SinkError>;
