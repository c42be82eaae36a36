use std::fs;
use std::path::Path;

use chunk_error::{ChunkError, Result};
use serde::Deserialize;

use crate::{DEFAULT_CACHE_LIMIT, DEFAULT_CHUNK_SIZE};

/// Construction parameters of a [`crate::ChunkedSource`].
///
/// Every field has a default, so a configuration file only needs to name
/// the values it changes:
///
/// ```json
/// { "chunk_size": 65536, "cache_limit": null }
/// ```
///
/// A `null` cache limit keeps every fetched chunk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceOptions {
    /// Size of a chunk in bytes, the unit of fetching and caching.
    pub chunk_size: u64,
    /// Memory budget of the chunk cache in bytes, `None` for no bound.
    pub cache_limit: Option<usize>,
    /// Ask the transport for the source length when it is opened, so that
    /// requests past the end fail without a fetch.
    pub probe_len: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            cache_limit: Some(DEFAULT_CACHE_LIMIT),
            probe_len: false,
        }
    }
}

impl SourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn cache_limit(mut self, cache_limit: Option<usize>) -> Self {
        self.cache_limit = cache_limit;
        self
    }

    pub fn probe_len(mut self, probe_len: bool) -> Self {
        self.probe_len = probe_len;
        self
    }

    /// Loads options from a JSON file and validates them.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)?;
        let options: SourceOptions =
            serde_json::from_reader(file).map_err(|err| {
                ChunkError::Config(format!("{}: {}", path.display(), err))
            })?;
        options.validate()?;

        log::debug!("options: loaded {:?} from {}", options, path.display());
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ChunkError::Config(
                "chunk size must be positive".to_owned(),
            ));
        }
        if usize::try_from(self.chunk_size).is_err() {
            return Err(ChunkError::Config(format!(
                "chunk size {} does not fit in memory",
                self.chunk_size
            )));
        }
        if self.cache_limit == Some(0) {
            return Err(ChunkError::Config(
                "cache limit must be positive, use null for no bound"
                    .to_owned(),
            ));
        }
        Ok(())
    }
}
