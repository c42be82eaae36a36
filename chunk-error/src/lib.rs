use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChunkError>;

#[derive(Error, Debug)]
pub enum ChunkError {
    /// The caller asked for an empty, inverted or unaddressable range.
    #[error("Invalid range {start}:{stop}")]
    InvalidRange { start: u64, stop: u64 },
    /// The requested range reaches past the last byte of the source.
    #[error(
        "indexes {offset}:{stop} are beyond the end of data source {label:?}"
    )]
    OutOfRange { offset: u64, stop: u64, label: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    #[error("Transport error: {0} {1}")]
    Transport(String, String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ChunkError {
    /// True when the error reports that the source is shorter than the
    /// requested range, as opposed to a failure of the transport itself.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, ChunkError::OutOfRange { .. })
    }
}
