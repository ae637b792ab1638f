//! src/main.rs

use clap::Parser;
use tracing::{error, info, info_span};

use flowpath_core::cli::{self, Cli};
use flowpath_core::telemetry::init_telemetry;

fn main() {
    let metrics = init_telemetry();
    let main_span = info_span!("main");
    let _guard = main_span.enter();

    info!("flowpath-cli starting up");
    metrics.inc_searches_run();

    let args = Cli::parse();
    if let Err(err) = cli::run(args, &metrics) {
        error!(%err, "search failed");
        std::process::exit(1);
    }
}
