//! Fire-spread simulation session and zone visualization engine.
//!
//! Owns the lifecycle of a simulation run (origin, request, result, time
//! window) and turns a time-stepped list of fire zones into map overlays
//! that can be scrubbed through time without being rebuilt.

pub mod error;
pub mod geometry;
pub mod layer;
pub mod models;
pub mod overlay;
pub mod session;
pub mod style;

pub use error::{BackendError, SessionError};
pub use geometry::GeoBounds;
pub use layer::{ZoneVisualizationLayer, FIT_PADDING_PX};
pub use models::{
    FireOrigin, FireZone, LatLon, ResultParameters, SimulationParameters, SimulationRequest,
    SimulationResult, SimulationSummary, WeatherReport,
};
pub use overlay::{
    HeatOverlay, HeatPoint, InMemoryMap, MapSurface, Overlay, OverlayId, OverlayKind, ZoneOverlay,
};
pub use session::{SessionState, SimulationBackend, SimulationSession, SubmitOutcome, SubmitTicket};
pub use style::{clamp_intensity, HeatOptions, ZoneStyle};
