use std::path::PathBuf;

use crate::{
    schema::request::SearchRequest,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EncodeArg {
    /// Request file (JSON); read from stdin when omitted
    #[arg(long)]
    request: Option<PathBuf>,
    /// Output file path; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &EncodeArg) -> anyhow::Result<()> {
    let EncodeArg { request, output } = arg;

    let request: SearchRequest = util::read_json_input("request", request.as_deref())?;
    let board = request.parse_board()?;
    let key = request.lookup_key(&board).to_string();

    let mut output = Output::from_output_path(output.as_deref())?;
    output.write_line(&key)?;
    Ok(())
}
