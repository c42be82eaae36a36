use chunk_error::ChunkError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not load options from {0}: {1}")]
    OptionsLoadError(String, ChunkError),

    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error(transparent)]
    ChunkError(#[from] ChunkError),
}
