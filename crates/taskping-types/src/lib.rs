//! Shared types, adapter traits, and error types for the taskping dispatcher.
//!
//! This crate holds everything shared between the token minter, the dispatch
//! logic, and adapter implementations supplied by the embedding application.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod error;
pub mod meta_adapter;
pub mod prelude;
pub mod types;

pub use error::{Error, TpResult};

// vim: ts=4
