use std::io::{self, Write};
use std::path::PathBuf;

use chunked_source::{ChunkCache, ChunkedSource, SourceOptions, Transport};

use crate::models::format::Format;
use crate::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "read", about = "Read a byte range from a file or URL")]
pub struct Read {
    #[clap(help = "Path of a local file or an http(s) URL")]
    pub source: String,
    #[clap(long, help = "Offset of the first byte to read")]
    start: u64,
    #[clap(long, help = "Offset one past the last byte to read")]
    stop: u64,
    #[clap(long, help = "Chunk size in bytes")]
    chunk_size: Option<u64>,
    #[clap(
        long,
        conflicts_with = "unbounded",
        help = "Memory budget of the chunk cache in bytes"
    )]
    cache_limit: Option<usize>,
    #[clap(long, help = "Keep every fetched chunk in memory")]
    unbounded: bool,
    #[clap(long, help = "Ask the source for its length when opening it")]
    probe_len: bool,
    #[clap(long, value_parser, help = "JSON file with source options")]
    config: Option<PathBuf>,
    #[clap(
        short,
        long,
        value_enum,
        default_value_t = Format::Hex,
        help = "Output format"
    )]
    format: Format,
}

impl Read {
    pub fn run(&self) -> Result<(), AppError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_to(&mut out)?;
        out.flush()?;
        Ok(())
    }

    pub fn run_to<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        let options = self.options()?;

        let data = if is_url(&self.source) {
            let source = ChunkedSource::open_url(&self.source, &options)?;
            read_range(source, self.start, self.stop)?
        } else {
            let source = ChunkedSource::open_file(&self.source, &options)?;
            read_range(source, self.start, self.stop)?
        };

        self.format.write(out, self.start, &data)?;
        Ok(())
    }

    /// Options from the configuration file, if any, overridden by the
    /// command line flags.
    fn options(&self) -> Result<SourceOptions, AppError> {
        let mut options = match &self.config {
            Some(path) => SourceOptions::from_json_file(path).map_err(|err| {
                AppError::OptionsLoadError(path.display().to_string(), err)
            })?,
            None => SourceOptions::default(),
        };

        if let Some(chunk_size) = self.chunk_size {
            options = options.chunk_size(chunk_size);
        }
        if self.unbounded {
            options = options.cache_limit(None);
        } else if let Some(limit) = self.cache_limit {
            options = options.cache_limit(Some(limit));
        }
        if self.probe_len {
            options = options.probe_len(true);
        }

        options.validate()?;
        Ok(options)
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn read_range<T: Transport>(
    mut source: ChunkedSource<T>,
    start: u64,
    stop: u64,
) -> Result<Vec<u8>, AppError> {
    let data = source.data(start, stop)?;
    log::debug!(
        "read {} bytes from {}, {} chunks cached",
        data.len(),
        source.label(),
        source.cache().len()
    );
    source.dismiss();
    Ok(data)
}
