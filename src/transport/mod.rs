//! Access to the bytes behind a [`crate::ChunkedSource`].

mod file;
mod http;
mod memory;

pub use file::FileTransport;
pub use http::HttpTransport;
pub use memory::MemoryTransport;

use bytes::Bytes;
use chunk_error::Result;

use crate::ChunkIndex;

/// A byte source that can be read one aligned chunk at a time.
///
/// The reader opens a transport lazily, on its first cache miss, and keeps
/// the returned handle until it is dismissed or dropped. Dropping a handle
/// must release whatever it holds (file descriptor, connection pool).
pub trait Transport {
    type Handle;

    /// Identity of the source (path, URL, ...), used in logs and errors.
    fn locator(&self) -> String;

    /// Acquires the resource chunks are read through.
    fn open(&self) -> Result<Self::Handle>;

    /// Returns the bytes `[index * chunk_size, (index + 1) * chunk_size)`.
    ///
    /// The result may be shorter only when the chunk reaches the end of the
    /// source, and is empty for chunks entirely past it.
    fn fetch_chunk(
        &self,
        handle: &mut Self::Handle,
        index: ChunkIndex,
        chunk_size: u64,
    ) -> Result<Bytes>;

    /// Total length of the source, when the transport can tell cheaply.
    fn source_len(&self, _handle: &mut Self::Handle) -> Result<Option<u64>> {
        Ok(None)
    }

    /// Releases a handle.
    fn close(&self, handle: Self::Handle) {
        drop(handle);
    }
}

/// Global byte offset of a chunk, `None` when it is not addressable.
pub(crate) fn chunk_offset(index: ChunkIndex, chunk_size: u64) -> Option<u64> {
    index.checked_mul(chunk_size)
}
