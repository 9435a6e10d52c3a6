//! Core types and operations for the Cuvée tasting-notes store.
//!
//! This crate owns the record model, the [`store::RecordStore`] abstraction,
//! and everything that works purely in terms of it: searching, composing new
//! records, deleting, and moving collections in and out. It has no file or
//! HTTP dependencies; backends live in their own crates.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod codec;
pub mod deletion;
pub mod error;
pub mod field;
pub mod form;
pub mod memory;
pub mod query;
pub mod record;
pub mod store;
pub mod transfer;

pub use error::{Error, Result};
