//! JSON file backend for the Cuvée record store.
//!
//! The whole collection lives in one JSON document. Reads and writes go
//! through [`tokio::fs`], so they suspend the calling task instead of blocking
//! the runtime; every write replaces the file atomically.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::JsonFileStore;
