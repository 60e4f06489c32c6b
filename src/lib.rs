//! Textless - TMDb image provider with an optional textless-poster filter
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod error;
pub mod item;
pub mod metadata;
pub mod plugin;
pub mod server;

pub use error::{Error, Result};
