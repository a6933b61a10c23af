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

//! Observable preference storage for the blocking settings screen.
//!
//! Layout: `model.rs` (keys, values, defaults), `store.rs` (`PreferenceStore`
//! contract and the in-memory implementation), `file.rs` (JSON preference
//! file), `error.rs` (error taxonomy).

pub mod error;
pub mod file;
pub mod model;
pub mod store;

pub use error::{PrefsError, PrefsResult};
pub use file::PreferenceFile;
pub use model::{
    MANAGER_CODE_CALL_CONTROL, MANAGER_CODE_QKSMS, MANAGER_CODE_SIA, PrefKey, PrefKind, PrefValue,
};
pub use store::{MemoryPreferences, PreferenceStore, PreferenceStoreExt, PreferenceStream};
