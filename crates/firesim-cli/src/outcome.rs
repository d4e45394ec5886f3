//! Interpreting submission outcomes for the headless driver.

use anyhow::{bail, Result};
use firesim_core::SubmitOutcome;

/// Fail unless the response was installed into the session.
///
/// A stale outcome means the origin changed or the session was cleared while
/// the request was outstanding, so there is no result to report.
pub fn ensure_installed(outcome: SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Installed => Ok(()),
        SubmitOutcome::Stale => {
            bail!("Simulation response was discarded because the session changed while it was running")
        }
    }
}
