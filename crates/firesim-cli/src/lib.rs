//! Fire simulation CLI - headless event wiring for simulation sessions.
//!
//! This crate provides:
//! - config: environment-driven settings
//! - console_map: a map surface that reports overlay changes through tracing
//! - outcome: turning submission outcomes into driver errors
//! - the `run_simulation` binary

pub mod config;
pub mod console_map;
pub mod outcome;

pub use config::Config;
pub use console_map::ConsoleMap;
pub use outcome::ensure_installed;
