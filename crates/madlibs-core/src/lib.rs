//! Core library for the MadLibs terminal client.
//!
//! Holds everything that is not UI: configuration loading, logging setup,
//! and the HTTP client for the MadLibs backend.

pub mod api;
pub mod config;
pub mod logging;
