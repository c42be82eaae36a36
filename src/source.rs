use std::path::Path;

use bytes::Bytes;
use chunk_cache::{ChunkCache, MemoryCache};
use chunk_error::{ChunkError, Result};

use crate::options::SourceOptions;
use crate::transport::{FileTransport, HttpTransport, Transport};
use crate::ChunkIndex;

/// Upper bound on the output buffer reserved before any chunk is read.
const MAX_PREALLOCATION: usize = 16 * 1024 * 1024;

/// Random access to a byte source through fixed-size, aligned chunks.
///
/// Every chunk fetched through the transport is offered to the cache, and
/// later requests touching the same chunk are served from there for as
/// long as the cache keeps it. The transport is opened on the first cache
/// miss and stays open until [`ChunkedSource::dismiss`] is called or the
/// reader is dropped.
pub struct ChunkedSource<T, C = MemoryCache<ChunkIndex, Bytes>>
where
    T: Transport,
    C: ChunkCache<ChunkIndex, Bytes>,
{
    /// Source identity, for logging and errors
    label: String,
    chunk_size: u64,
    transport: T,
    handle: Option<T::Handle>,
    cache: C,
    /// Total length of the source, once known
    known_len: Option<u64>,
    probe_len: bool,
}

impl<T: Transport> ChunkedSource<T> {
    /// Creates a reader with an in-memory cache sized from `options`.
    pub fn new(transport: T, options: &SourceOptions) -> Result<Self> {
        options.validate()?;
        let cache = MemoryCache::new(transport.locator(), options.cache_limit)?;
        Self::with_cache(transport, cache, options)
    }
}

impl ChunkedSource<FileTransport> {
    pub fn open_file<P: AsRef<Path>>(
        path: P,
        options: &SourceOptions,
    ) -> Result<Self> {
        Self::new(FileTransport::new(path), options)
    }
}

impl ChunkedSource<HttpTransport> {
    pub fn open_url(url: &str, options: &SourceOptions) -> Result<Self> {
        Self::new(HttpTransport::parse(url)?, options)
    }
}

impl<T, C> ChunkedSource<T, C>
where
    T: Transport,
    C: ChunkCache<ChunkIndex, Bytes>,
{
    /// Creates a reader on top of any cache, owned or borrowed. The cache
    /// limit in `options` is ignored.
    ///
    /// Entries are keyed by chunk index only, so readers sharing a cache
    /// must read the same source with the same chunk size. A cached chunk
    /// longer than this reader's chunk size is ignored and fetched again.
    pub fn with_cache(
        transport: T,
        cache: C,
        options: &SourceOptions,
    ) -> Result<Self> {
        options.validate()?;
        let label = transport.locator();

        log::debug!(
            "source/{}: created with {} bytes chunks",
            label,
            options.chunk_size
        );

        Ok(Self {
            label,
            chunk_size: options.chunk_size,
            transport,
            handle: None,
            cache,
            known_len: None,
            probe_len: options.probe_len,
        })
    }

    /// Declares the total length of the source, so that requests reaching
    /// past it fail without touching the transport.
    pub fn with_known_len(mut self, len: u64) -> Self {
        self.known_len = Some(len);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Total length of the source if it was declared, probed, or learned
    /// from a short final chunk.
    pub fn known_len(&self) -> Option<u64> {
        self.known_len
    }

    /// Whether a transport handle is currently held.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }

    /// Returns the bytes `[start, stop)` of the source.
    ///
    /// Fails with [`ChunkError::InvalidRange`] unless `start < stop`, and
    /// with [`ChunkError::OutOfRange`] when the source ends before `stop`.
    /// Transport errors are passed through as they are.
    pub fn data(&mut self, start: u64, stop: u64) -> Result<Vec<u8>> {
        if stop <= start {
            return Err(ChunkError::InvalidRange { start, stop });
        }
        let length = usize::try_from(stop - start)
            .map_err(|_| ChunkError::InvalidRange { start, stop })?;

        if let Some(len) = self.known_len {
            if stop > len {
                return Err(self.out_of_range(len.max(start), stop));
            }
        }

        let chunk_size = self.chunk_size;
        let chunk_start = start / chunk_size;
        let chunk_stop = if stop % chunk_size == 0 {
            stop / chunk_size
        } else {
            stop / chunk_size + 1
        };

        // Grows as chunks arrive, so a range reaching far past the end
        // fails on the short chunk instead of on the allocation
        let mut out = Vec::with_capacity(length.min(MAX_PREALLOCATION));

        for index in chunk_start..chunk_stop {
            let chunk = self.chunk(index)?;

            // Overlap of the chunk with the requested range, in global
            // offsets first, then relative to the chunk
            let chunk_begin = index * chunk_size;
            let gstart = chunk_begin.max(start);
            let gstop = chunk_begin.saturating_add(chunk_size).min(stop);
            let cstart = (gstart - chunk_begin) as usize;
            let cstop = (gstop - chunk_begin) as usize;

            // A partial chunk ends the source; an empty one only bounds it
            let chunk_end = chunk_begin + chunk.len() as u64;
            if !chunk.is_empty() && (chunk.len() as u64) < chunk_size {
                self.remember_len(chunk_end);
            }

            if cstop > chunk.len() {
                return Err(self.out_of_range(chunk_end.max(gstart), stop));
            }

            out.extend_from_slice(&chunk[cstart..cstop]);
        }

        Ok(out)
    }

    /// Releases the transport handle, if any. Cached chunks stay; the next
    /// miss opens the transport again.
    pub fn dismiss(&mut self) {
        if let Some(handle) = self.handle.take() {
            log::debug!("source/{}: closing transport", self.label);
            self.transport.close(handle);
        }
    }

    fn chunk(&mut self, index: ChunkIndex) -> Result<Bytes> {
        match self.cache.get(&index) {
            Some(chunk) if chunk.len() as u64 <= self.chunk_size => {
                log::trace!(
                    "source/{}: chunk {} from cache",
                    self.label,
                    index
                );
                return Ok(chunk);
            }
            Some(chunk) => log::debug!(
                "source/{}: cached chunk {} has {} bytes, fetching again",
                self.label,
                index,
                chunk.len()
            ),
            None => {}
        }

        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => self.open_transport()?,
        };
        let handle = self.handle.insert(handle);
        let chunk = self
            .transport
            .fetch_chunk(handle, index, self.chunk_size)?;

        if chunk.len() as u64 > self.chunk_size {
            return Err(ChunkError::Transport(
                self.label.clone(),
                format!(
                    "chunk {} has {} bytes, more than the chunk size {}",
                    index,
                    chunk.len(),
                    self.chunk_size
                ),
            ));
        }

        log::debug!(
            "source/{}: fetched chunk {} ({} bytes)",
            self.label,
            index,
            chunk.len()
        );
        self.cache.put(index, chunk.clone());
        Ok(chunk)
    }

    fn open_transport(&mut self) -> Result<T::Handle> {
        log::debug!("source/{}: opening transport", self.label);
        let mut handle = self.transport.open()?;

        if self.probe_len && self.known_len.is_none() {
            if let Some(len) = self.transport.source_len(&mut handle)? {
                log::debug!("source/{}: probed length {}", self.label, len);
                self.known_len = Some(len);
            }
        }
        Ok(handle)
    }

    fn remember_len(&mut self, len: u64) {
        if self.known_len.is_none() {
            log::debug!("source/{}: source ends at {}", self.label, len);
            self.known_len = Some(len);
        }
    }

    fn out_of_range(&self, offset: u64, stop: u64) -> ChunkError {
        ChunkError::OutOfRange {
            offset,
            stop,
            label: self.label.clone(),
        }
    }
}

impl<T, C> Drop for ChunkedSource<T, C>
where
    T: Transport,
    C: ChunkCache<ChunkIndex, Bytes>,
{
    fn drop(&mut self) {
        self.dismiss();
    }
}
