//! Component lifecycle shared by the simulated units.
//!
//! A trace replay driver owns one or more components and, once per simulation
//! tick, calls [`Component::tick`] on each. When the trace ends it calls
//! [`Component::finish`] to collect reports and then tears the components down.

use std::io::Write;

use serde::Serialize;

use crate::common::error::SimError;

/// A unit driven by the global simulation tick.
pub trait Component {
    /// Short name used in reports (e.g. `"cache"`).
    fn name(&self) -> &'static str;

    /// Advances the component by one tick.
    ///
    /// Returns `true` while the component wants the simulation to continue.
    ///
    /// # Errors
    ///
    /// Returns an error if the tick uncovered a protocol violation.
    fn tick(&mut self) -> Result<bool, SimError>;

    /// Writes the component's end-of-run report to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    fn finish(&self, out: &mut dyn Write) -> Result<(), SimError>;
}

#[derive(Serialize)]
struct Report<'a, S: Serialize> {
    component: &'static str,
    stats: &'a S,
}

/// Writes `stats` as a single-line JSON report tagged with `component`.
///
/// # Errors
///
/// Returns [`SimError::Json`] or [`SimError::Io`] if writing fails.
pub fn write_report<S: Serialize>(
    out: &mut dyn Write,
    component: &'static str,
    stats: &S,
) -> Result<(), SimError> {
    serde_json::to_writer(&mut *out, &Report { component, stats })?;
    out.write_all(b"\n")?;
    Ok(())
}
