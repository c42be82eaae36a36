use bytes::Bytes;
use chunk_error::Result;

use super::{chunk_offset, Transport};
use crate::ChunkIndex;

/// Serves chunks out of a buffer already in memory.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    label: String,
    data: Bytes,
}

impl MemoryTransport {
    pub fn new(label: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

impl Transport for MemoryTransport {
    type Handle = ();

    fn locator(&self) -> String {
        self.label.clone()
    }

    fn open(&self) -> Result<()> {
        Ok(())
    }

    fn fetch_chunk(
        &self,
        _handle: &mut (),
        index: ChunkIndex,
        chunk_size: u64,
    ) -> Result<Bytes> {
        let len = self.data.len() as u64;
        let offset = match chunk_offset(index, chunk_size) {
            Some(offset) if offset < len => offset,
            _ => return Ok(Bytes::new()),
        };
        let end = offset.saturating_add(chunk_size).min(len);

        Ok(self.data.slice(offset as usize..end as usize))
    }

    fn source_len(&self, _handle: &mut ()) -> Result<Option<u64>> {
        Ok(Some(self.data.len() as u64))
    }
}
