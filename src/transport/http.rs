use bytes::Bytes;
use chunk_error::{ChunkError, Result};
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_LENGTH, RANGE};
use reqwest::StatusCode;
use url::Url;

use super::{chunk_offset, Transport};
use crate::ChunkIndex;

/// Reads chunks of a remote object with HTTP range requests.
///
/// Servers answering `206 Partial Content` get one request per chunk.
/// A `200 OK` means the server ignored the range and sent the whole
/// object, which is then cut down to the chunk. `416 Range Not
/// Satisfiable` marks a chunk past the end of the object.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    url: Url,
}

impl HttpTransport {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn parse(url: &str) -> Result<Self> {
        Ok(Self::new(Url::parse(url)?))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn unexpected(&self, status: StatusCode, what: String) -> ChunkError {
        ChunkError::Transport(
            self.locator(),
            format!("unexpected status {} for {}", status, what),
        )
    }
}

impl Transport for HttpTransport {
    type Handle = Client;

    fn locator(&self) -> String {
        self.url.to_string()
    }

    fn open(&self) -> Result<Client> {
        log::debug!("http/{}: building client", self.url);
        Ok(Client::builder().build()?)
    }

    fn fetch_chunk(
        &self,
        client: &mut Client,
        index: ChunkIndex,
        chunk_size: u64,
    ) -> Result<Bytes> {
        let first = match chunk_offset(index, chunk_size) {
            Some(offset) => offset,
            None => return Ok(Bytes::new()),
        };
        let last = first.saturating_add(chunk_size.saturating_sub(1));

        log::trace!("http/{}: requesting bytes={}-{}", self.url, first, last);
        let response = client
            .get(self.url.clone())
            .header(RANGE, format!("bytes={}-{}", first, last))
            .send()?;

        match response.status() {
            StatusCode::PARTIAL_CONTENT => Ok(response.bytes()?),
            StatusCode::RANGE_NOT_SATISFIABLE => Ok(Bytes::new()),
            StatusCode::OK => {
                let body = response.bytes()?;
                let len = body.len() as u64;
                if first >= len {
                    return Ok(Bytes::new());
                }
                let end = first.saturating_add(chunk_size).min(len);
                Ok(body.slice(first as usize..end as usize))
            }
            status => Err(self.unexpected(status, format!("chunk {}", index))),
        }
    }

    fn source_len(&self, client: &mut Client) -> Result<Option<u64>> {
        let response = client.head(self.url.clone()).send()?;
        if !response.status().is_success() {
            return Err(self.unexpected(response.status(), "HEAD".to_owned()));
        }

        Ok(response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok()))
    }
}
