//! Catalog access: track/album models and the HTTP client for the backend.
//!
//! The catalog is read-only. Besides listing songs and albums the client
//! builds stream URLs and posts best-effort player-state reports.

mod client;
mod model;

pub use client::*;
pub use model::*;
