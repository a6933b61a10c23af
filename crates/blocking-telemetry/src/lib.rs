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

//! Logging setup shared by the blocking settings binaries.
//!
//! Layout: `init.rs` (subscriber installation and configuration),
//! `context.rs` (host span guard), `error.rs` (error type).

pub mod context;
pub mod error;
pub mod init;

pub use context::HostSpanGuard;
pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_version, init_logging};
