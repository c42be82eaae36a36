use anyhow::Context;
use clap::Parser;

mod commands;
mod error;
mod models;

pub use error::AppError;

use commands::Commands;

#[derive(Parser, Debug)]
#[clap(name = "chunk-cli")]
#[clap(
    about = "Read byte ranges of files and HTTP objects through a chunk cache",
    long_about = None
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

fn run(args: Cli) -> anyhow::Result<()> {
    match args.command {
        Commands::Read(read) => read
            .run()
            .with_context(|| format!("failed to read from {}", read.source)),
    }
}

fn main() {
    env_logger::init();

    let args = Cli::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempdir::TempDir;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_read_command() {
        let args = Cli::try_parse_from([
            "chunk-cli",
            "read",
            "https://example.com/file.bin",
            "--start",
            "10",
            "--stop",
            "20",
            "--unbounded",
        ])
        .unwrap();

        let Commands::Read(read) = args.command;
        assert_eq!(read.source, "https://example.com/file.bin");
    }

    #[test]
    fn test_cache_limit_conflicts_with_unbounded() {
        let args = Cli::try_parse_from([
            "chunk-cli",
            "read",
            "file.bin",
            "--start",
            "0",
            "--stop",
            "1",
            "--cache-limit",
            "4096",
            "--unbounded",
        ]);
        assert!(args.is_err());
    }

    #[test]
    fn test_run_reports_source_in_error() {
        let temp_dir = TempDir::new("chunk-cli")
            .expect("Failed to create temporary directory");
        let path = temp_dir.path().join("short.bin");
        fs::write(&path, b"0123456789").unwrap();
        let path = path.to_string_lossy().to_string();

        let args = Cli::try_parse_from([
            "chunk-cli",
            "read",
            path.as_str(),
            "--start",
            "5",
            "--stop",
            "50",
        ])
        .unwrap();

        let err = run(args).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.starts_with("failed to read from"));
        assert!(message.contains("beyond the end of data source"));
    }
}
