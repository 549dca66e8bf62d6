// cropmind - crop advisory web service
// Bootstrap: logging, CLI parsing, dispatch into serve/predict.

use clap::Parser;
use cropmind::cli::{dispatch, Cli};

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    dispatch(cli);
}
