//! Fire simulation SDK - HTTP client for the simulation backend
//!
//! Wraps the backend's `/api/simulate`, `/api/weather` and `/api/health`
//! endpoints and plugs into a session as its [`SimulationBackend`].

pub mod client;

pub use client::{ApiEnvelope, FireSimClient, HealthStatus, DEFAULT_TIMEOUT};
pub use firesim_core::SimulationBackend;
