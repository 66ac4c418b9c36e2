//! Error types for media probing and processing.

use reely_core::AppError;

/// Media tool and classification errors
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("{tool} exited with status {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: i32,
        stderr: String,
    },

    #[error("{tool} timed out after {timeout_secs}s")]
    ToolTimeout { tool: String, timeout_secs: u64 },

    #[error("Failed to launch {tool}: {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse probe output: {0}")]
    ProbeParse(#[from] serde_json::Error),

    #[error("No video stream with dimensions found")]
    NoVideoStream,

    #[error("Invalid video dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Entropy source failure: {0}")]
    Entropy(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MediaResult<T> = Result<T, MediaError>;

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        AppError::MediaTool(err.to_string())
    }
}
