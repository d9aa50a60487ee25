#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ranch map API server binary.
//!
//! ```text
//! ranch_map_server [--profile range|pasture] [--port 8080] [--regions-path <geojson>]
//! ranch_map_server --interactive
//! ```
//!
//! Every flag can also be set through its environment variable
//! (`RANCH_PROFILE`, `BIND_ADDR`, `PORT`, `REGIONS_PATH`,
//! `RANCH_STATIC_DIR`, `HERD_SEED`).

use clap::Parser;
use ranch_map_server::{ServerError, ServerOptions, interactive, run_server};

#[derive(Parser)]
#[command(
    name = "ranch_map_server",
    about = "Serve the simulated herd tracking and ranch analysis API"
)]
struct Cli {
    /// Prompt for bind address, port and profile before starting
    #[arg(long)]
    interactive: bool,

    #[command(flatten)]
    options: ServerOptions,
}

#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    if cli.interactive {
        interactive::run(cli.options).await
    } else {
        run_server(cli.options).await
    }
}
