//! Simulation session lifecycle.
//!
//! A session holds at most one origin and at most one result. Submission is
//! split into [`SimulationSession::begin_submit`] and
//! [`SimulationSession::complete_submit`] so an event loop can keep handling
//! other commands while a request is outstanding. Setting a new origin or
//! clearing the session advances the session generation; responses issued
//! under an older generation are discarded as stale.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::{BackendError, SessionError};
use crate::layer::ZoneVisualizationLayer;
use crate::models::{FireOrigin, SimulationParameters, SimulationRequest, SimulationResult};
use crate::overlay::MapSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoOrigin,
    OriginSet,
    Submitting,
    ResultReady,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::NoOrigin => "no origin is set",
            SessionState::OriginSet => "origin is set",
            SessionState::Submitting => "a simulation is being submitted",
            SessionState::ResultReady => "a result is ready",
        };
        f.write_str(name)
    }
}

/// Backend that runs simulations.
#[allow(async_fn_in_trait)]
pub trait SimulationBackend {
    async fn simulate(&self, request: &SimulationRequest)
        -> Result<SimulationResult, BackendError>;
}

/// Proof of an outstanding submission, handed back to `complete_submit`.
#[derive(Debug)]
pub struct SubmitTicket {
    id: u64,
    generation: u64,
    request: SimulationRequest,
    issued_at: DateTime<Utc>,
}

impl SubmitTicket {
    pub fn request(&self) -> &SimulationRequest {
        &self.request
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Result stored and overlays rebuilt.
    Installed,
    /// Response belonged to an origin that is no longer active and was dropped.
    Stale,
}

/// Owns the lifecycle of one simulation run and the overlays derived from it.
pub struct SimulationSession<M: MapSurface> {
    state: SessionState,
    origin: Option<FireOrigin>,
    result: Option<SimulationResult>,
    layer: ZoneVisualizationLayer<M>,
    generation: u64,
    in_flight: Option<u64>,
    next_ticket: u64,
}

impl<M: MapSurface> SimulationSession<M> {
    pub fn new(map: M) -> Self {
        Self {
            state: SessionState::NoOrigin,
            origin: None,
            result: None,
            layer: ZoneVisualizationLayer::new(map),
            generation: 0,
            in_flight: None,
            next_ticket: 1,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn origin(&self) -> Option<FireOrigin> {
        self.origin
    }

    pub fn result(&self) -> Option<&SimulationResult> {
        self.result.as_ref()
    }

    pub fn layer(&self) -> &ZoneVisualizationLayer<M> {
        &self.layer
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Choose a new fire origin, discarding any previous result and overlays.
    pub fn set_origin(&mut self, latitude: f64, longitude: f64) -> Result<(), SessionError> {
        let origin = FireOrigin::new(latitude, longitude);
        if !origin.is_finite() {
            return Err(SessionError::Validation(format!(
                "origin coordinates must be finite, got ({}, {})",
                latitude, longitude
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(SessionError::Validation(format!(
                "origin ({}, {}) is outside valid latitude/longitude ranges",
                latitude, longitude
            )));
        }

        self.invalidate();
        self.origin = Some(origin);
        self.state = SessionState::OriginSet;
        info!(lat = latitude, lon = longitude, "fire origin set");
        Ok(())
    }

    /// Validate parameters and mark a request as outstanding.
    ///
    /// The caller sends `ticket.request()` to the backend and must pass the
    /// ticket and the backend's answer to [`Self::complete_submit`].
    pub fn begin_submit(
        &mut self,
        parameters: SimulationParameters,
    ) -> Result<SubmitTicket, SessionError> {
        if self.in_flight.is_some() {
            return Err(SessionError::AlreadyInFlight);
        }
        let origin = match (self.state, self.origin) {
            (SessionState::OriginSet | SessionState::ResultReady, Some(origin)) => origin,
            (state, _) => {
                return Err(SessionError::InvalidState {
                    operation: "submit",
                    state,
                })
            }
        };
        parameters.validate()?;

        let ticket = SubmitTicket {
            id: self.next_ticket,
            generation: self.generation,
            request: SimulationRequest::new(origin, &parameters),
            issued_at: Utc::now(),
        };
        self.next_ticket += 1;
        self.in_flight = Some(ticket.id);
        self.state = SessionState::Submitting;

        info!(
            ticket = ticket.id,
            wind_speed = parameters.wind_speed,
            building_density = parameters.building_density,
            time_steps = parameters.time_steps,
            "submitting simulation"
        );
        Ok(ticket)
    }

    /// Settle an outstanding submission with the backend's answer.
    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        response: Result<SimulationResult, BackendError>,
    ) -> Result<SubmitOutcome, SessionError> {
        if self.in_flight == Some(ticket.id) {
            self.in_flight = None;
        }
        let elapsed_ms = (Utc::now() - ticket.issued_at).num_milliseconds();

        if ticket.generation != self.generation {
            warn!(
                ticket = ticket.id,
                elapsed_ms, "discarding stale simulation response"
            );
            return Ok(SubmitOutcome::Stale);
        }

        let result = match response {
            Ok(result) => result,
            Err(err) => {
                self.restore_after_failure();
                warn!(ticket = ticket.id, elapsed_ms, error = %err, "simulation failed");
                return Err(err.into());
            }
        };

        if let Err(reason) = result.validate() {
            self.restore_after_failure();
            warn!(ticket = ticket.id, %reason, "rejecting malformed simulation result");
            return Err(SessionError::SimulationFailed(format!(
                "malformed result: {}",
                reason
            )));
        }

        self.layer.rebuild(&result.zones);
        self.layer
            .set_time_window(i64::from(result.parameters.time_steps));
        info!(
            ticket = ticket.id,
            elapsed_ms,
            zones = result.zones.len(),
            max_distance_m = result.summary.max_distance,
            "simulation result installed"
        );
        self.result = Some(result);
        self.state = SessionState::ResultReady;
        Ok(SubmitOutcome::Installed)
    }

    /// Run one full submission against `backend`.
    ///
    /// Timeouts are the backend's responsibility and surface as network errors.
    pub async fn submit<B>(
        &mut self,
        backend: &B,
        parameters: SimulationParameters,
    ) -> Result<SubmitOutcome, SessionError>
    where
        B: SimulationBackend,
    {
        let ticket = self.begin_submit(parameters)?;
        let response = backend.simulate(ticket.request()).await;
        self.complete_submit(ticket, response)
    }

    /// Move the time window so zones up to `step` are shown.
    pub fn set_visible_step(&mut self, step: u32) -> Result<(), SessionError> {
        let time_steps = match (self.state, &self.result) {
            (SessionState::ResultReady, Some(result)) => result.parameters.time_steps,
            (state, _) => {
                return Err(SessionError::InvalidState {
                    operation: "set visible step",
                    state,
                })
            }
        };
        if step > time_steps {
            return Err(SessionError::Validation(format!(
                "step {} is outside 0..={}",
                step, time_steps
            )));
        }
        self.layer.set_time_window(i64::from(step));
        Ok(())
    }

    /// Drop origin, result and overlays. Valid from any state.
    pub fn clear(&mut self) {
        self.invalidate();
        self.origin = None;
        self.state = SessionState::NoOrigin;
        info!("simulation session cleared");
    }

    /// Responses to requests still outstanding become stale, so the
    /// in-flight slot is released for the new generation.
    fn invalidate(&mut self) {
        self.generation += 1;
        self.in_flight = None;
        self.result = None;
        self.layer.clear();
    }

    fn restore_after_failure(&mut self) {
        self.state = if self.result.is_some() {
            SessionState::ResultReady
        } else {
            SessionState::OriginSet
        };
    }
}
