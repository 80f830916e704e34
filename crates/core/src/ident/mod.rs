//! Identifier normalization.
//!
//! Records coming from the reports backend reference users and comments by
//! ids of several shapes. Everything in the crate compares ids through
//! [`resolve`], never by inspecting the raw shape at the call site.

pub mod ownership;
pub mod resolver;

pub use ownership::{Ownership, Viewer};
pub use resolver::{resolve, resolve_value, same_id, RawId};
