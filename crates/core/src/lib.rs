//! FixIt core library.
//!
//! Client-side bookkeeping for the FixIt PH issue reporter: canonical
//! identifier resolution and ownership checks, the authority directory with
//! its persisted overrides, the key-value storage behind it, and the small
//! report helpers (status rules, relative-time labels, gallery navigation)
//! the pages share.

pub mod authority;
pub mod config;
pub mod db;
pub mod errors;
pub mod gallery;
pub mod ident;
pub mod report;
pub mod storage;
pub mod time_ago;

// Re-exports for convenience.
pub use authority::{Authority, AuthorityStore};
pub use config::AppConfig;
pub use db::Database;
pub use ident::{resolve, RawId};
pub use storage::{KeyValueStore, MemoryStore};
