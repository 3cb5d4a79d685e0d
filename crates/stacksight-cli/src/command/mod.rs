use clap::{Parser, Subcommand};

use self::{encode::EncodeArg, search::SearchArg};

mod encode;
mod search;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Rank every placement pair of the current and next piece
    Search(#[clap(flatten)] SearchArg),
    /// Print the cache key of a search request
    Encode(#[clap(flatten)] EncodeArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Search(arg) => search::run(&arg)?,
        Mode::Encode(arg) => encode::run(&arg)?,
    }
    Ok(())
}
