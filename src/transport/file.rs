use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chunk_error::Result;

use super::{chunk_offset, Transport};
use crate::ChunkIndex;

/// Reads chunks from a file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileTransport {
    path: PathBuf,
}

impl FileTransport {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: PathBuf::from(path.as_ref()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Transport for FileTransport {
    type Handle = File;

    fn locator(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> Result<File> {
        log::debug!("file/{}: opening", self.path.display());
        Ok(File::open(&self.path)?)
    }

    fn fetch_chunk(
        &self,
        file: &mut File,
        index: ChunkIndex,
        chunk_size: u64,
    ) -> Result<Bytes> {
        let offset = match chunk_offset(index, chunk_size) {
            Some(offset) => offset,
            None => return Ok(Bytes::new()),
        };

        file.seek(SeekFrom::Start(offset))?;
        let mut buffer =
            Vec::with_capacity(usize::try_from(chunk_size).unwrap_or(0));
        // Reading past the end yields fewer bytes, never an error
        file.by_ref()
            .take(chunk_size)
            .read_to_end(&mut buffer)?;

        Ok(Bytes::from(buffer))
    }

    fn source_len(&self, file: &mut File) -> Result<Option<u64>> {
        Ok(Some(file.metadata()?.len()))
    }
}
