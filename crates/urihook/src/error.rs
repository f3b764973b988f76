use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Tool(#[from] urihook_proc::Error),

    #[error(transparent)]
    Fs(#[from] urihook_fs::Error),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("malformed association entry in {path} at line {line}: {text:?}")]
    MalformedEntry {
        path: PathBuf,
        line: usize,
        text: String,
    },

    #[error("invalid scheme {0:?}")]
    InvalidScheme(String),

    #[error("home directory could not be resolved")]
    NoHomeDir,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
