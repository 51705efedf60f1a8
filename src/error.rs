
use thiserror::Error;

/// Broad category of a failure, independent of where it happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A parameter was out of range or missing.
    InvalidArgument,
    /// The tokenizer did not hold up its contract.
    TypeError,
    /// Reading or writing files failed.
    Io,
    /// A saved artifact could not be encoded or decoded.
    Format,
    /// Worker threads could not be started.
    Runtime,
}

#[derive(Error, Debug)]
pub enum CoocError {
    #[error("window_size must be non-negative, got {window_size}")]
    InvalidWindowSize { window_size: i32 },
    #[error("tokenizer did not return a sequence of strings for sentence {sentence}: {reason}")]
    TokenizerContract { sentence: usize, reason: String },
    #[error("token {0:?} is not in the vocabulary")]
    UnknownToken(String),
    #[error("bad configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("npy write error: {0}")]
    Npy(#[from] ndarray_npy::WriteNpyError),
    #[error("npy read error: {0}")]
    ReadNpy(#[from] ndarray_npy::ReadNpyError),
    #[error("could not build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("a {n_rows}x{n_cols} matrix does not fit a vocabulary of {vocab} tokens")]
    VocabMismatch { n_rows: usize, n_cols: usize, vocab: usize },
    #[error("malformed triplets: {0}")]
    Triplets(String),
}

impl CoocError {

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidWindowSize { .. } | Self::UnknownToken(_) | Self::Config(_) => ErrorKind::InvalidArgument,
            Self::TokenizerContract { .. } => ErrorKind::TypeError,
            Self::Io(_) => ErrorKind::Io,
            Self::Json(_)
            | Self::Bincode(_)
            | Self::Npy(_)
            | Self::ReadNpy(_)
            | Self::Triplets(_)
            | Self::VocabMismatch { .. } => ErrorKind::Format,
            Self::ThreadPool(_) => ErrorKind::Runtime,
        }
    }
}
