//! Database module for Upcheck.
//!
//! Provides SQLite storage with automatic migrations. Probe outcomes and
//! history travel as JSON text blobs in the targets table; corrupt blobs
//! decode to empty rather than failing the read.

mod models;
mod store;

pub use models::*;
pub use store::*;
