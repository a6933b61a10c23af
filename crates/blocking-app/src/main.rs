#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Binary entrypoint for the headless blocking settings console.

use blocking_app::{AppResult, Cli, run_app};
use clap::Parser;

/// Parses flags and runs the console until `quit` or end of input.
#[tokio::main]
async fn main() -> AppResult<()> {
    run_app(Cli::parse()).await
}
