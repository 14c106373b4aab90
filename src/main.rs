//! `rollcall` binary: parse config, install logging, serve until SIGTERM.

use std::process;

use clap::Parser;
use tracing::{error, info, warn};

use rollcall::config::Config;
use rollcall::{Server, UserStore, app, telemetry};

#[tokio::main]
async fn main() {
    let config = Config::parse();
    telemetry::init(config.log_format);

    if let Err(e) = run(config).await {
        error!("fatal: {e}");
        process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), rollcall::Error> {
    if config.diagnostic_routes {
        warn!("diagnostic routes enabled; GET /test/error always fails");
    }

    let store = UserStore::seeded();
    info!(users = store.len(), "store seeded");

    let app = app::build(store, config.diagnostic_routes);
    Server::bind(config.addr).await?.serve(app).await
}
