//! Storage module
//!
//! Cached, keyed collections persisted as whole JSON arrays.

pub mod collection;

pub use collection::{Collection, Record};
