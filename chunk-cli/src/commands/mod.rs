use clap::Subcommand;

pub mod read;

#[derive(Debug, Subcommand)]
pub enum Commands {
    Read(read::Read),
}
