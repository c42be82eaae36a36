//! Random access to large byte sources through fixed-size, cached chunks.
//!
//! A [`ChunkedSource`] answers `data(start, stop)` requests by fetching the
//! aligned chunks covering the range through a [`Transport`], keeping them
//! in a [`ChunkCache`] and stitching the requested bytes together.

pub mod options;
pub mod source;
pub mod transport;

pub use bytes::Bytes;
pub use chunk_cache::{
    ChunkCache, LruMemoryCache, MemoryCache, UnboundedCache,
    DEFAULT_CACHE_LIMIT,
};
pub use chunk_error::{ChunkError, Result};

pub use options::SourceOptions;
pub use source::ChunkedSource;
pub use transport::{FileTransport, HttpTransport, MemoryTransport, Transport};

/// Position of a chunk within its source: `offset / chunk_size`.
pub type ChunkIndex = u64;

/// Default chunk size: 8 KiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 8 * 1024;
