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

//! Console host for the blocking settings synchronizer.
//!
//! Layout: `bootstrap.rs` (startup and the command loop), `cli.rs` (flags),
//! `commands.rs` (line parsing), `console.rs` (surface and collaborators).

/// Startup wiring and the console command loop.
pub mod bootstrap;
/// Command-line flags.
pub mod cli;
/// Console line commands.
pub mod commands;
/// Console presentation surface and collaborators.
pub mod console;
/// Application error types.
pub mod error;

pub use bootstrap::{run_app, run_console};
pub use cli::Cli;
pub use error::{AppError, AppResult, CommandError};
