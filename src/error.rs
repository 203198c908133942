use std::process::ExitStatus;
use thiserror::Error;

/// Fatal errors: the pipeline stops and the process exits non-zero.
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "GEMINI_API_KEY environment variable is not set. Please set it before running the command."
    )]
    MissingApiKey,

    #[error("Not a git repository or git command failed")]
    NotARepository,

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("git commit failed: {0}")]
    CommitFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the text-generation call. Never fatal; the drafter degrades to
/// the fallback message.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("response contained no candidates")]
    NoCandidates,

    #[error("Invalid AI response: empty message")]
    EmptyResponse,

    #[error("Invalid AI response: {0}")]
    LowQualityResponse(String),
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::MalformedResponse(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to spawn editor '{editor}': {source}")]
    Spawn {
        editor: String,
        #[source]
        source: std::io::Error,
    },

    #[error("editor exited with {0}")]
    Failed(ExitStatus),

    #[error("editor command is empty")]
    NoEditor,
}
