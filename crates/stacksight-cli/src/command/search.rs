use std::path::PathBuf;

use anyhow::Context as _;
use log::info;

use crate::{
    schema::{
        report::{OutcomeReport, SearchReport},
        request::SearchRequest,
    },
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SearchArg {
    /// Request file (JSON); read from stdin when omitted
    #[arg(long)]
    request: Option<PathBuf>,
    /// Output file path; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SearchArg) -> anyhow::Result<()> {
    let SearchArg { request, output } = arg;

    let request: SearchRequest = util::read_json_input("request", request.as_deref())?;
    let board = request.parse_board()?;

    let (possibilities, stats) = request
        .to_search()
        .run_with_stats(&board, request.first_piece, request.second_piece)
        .context("Search rejected the request")?;
    info!(
        "{} first placements, {} nodes evaluated, {} outcomes kept",
        stats.first_placements,
        stats.evaluated_nodes,
        possibilities.len()
    );

    let report = SearchReport {
        key: request.lookup_key(&board).to_string(),
        stats,
        outcomes: possibilities
            .iter()
            .enumerate()
            .map(|(i, possibility)| OutcomeReport::new(i + 1, possibility))
            .collect(),
    };

    let mut output = Output::from_output_path(output.as_deref())?;
    output.write_json(&report)?;
    Ok(())
}
