//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior (backend location, audio, remote control, logging) and helpers
//! to load configuration from disk and the environment.

mod load;
mod schema;

pub use schema::*;
