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

//! Headless state synchronizer for the SMS blocking settings screen.
//!
//! Layout: `manager.rs` (blocking backends and labels), `tuning.rs` (spam
//! filter option tables), `state.rs` (`DisplayState`), `events.rs` (events
//! raised by the presentation layer), `surface.rs` (presentation and external
//! collaborator contracts), `session.rs` (state derivation and event routing),
//! `synchronizer.rs` (subscription lifecycle on a Tokio task).

pub mod error;
pub mod events;
pub mod manager;
pub mod session;
pub mod state;
pub mod surface;
pub mod synchronizer;
pub mod tuning;

pub use error::{SettingsError, SettingsResult};
pub use events::{EVENT_CHANNEL_CAPACITY, SettingsEvent, event_channel};
pub use manager::{ManagerKind, ManagerLabeler, default_labeler};
pub use session::SettingsSession;
pub use state::{DisplayState, TuningSelection};
pub use surface::{BlockingClient, DialogKind, NavTarget, PresentationSurface, SpamFilterReset};
pub use synchronizer::{OBSERVED_KEYS, SettingsSynchronizer, SyncHandle, SynchronizerDeps};
pub use tuning::{TuningKind, TuningOption, TuningTable, TuningTables};
