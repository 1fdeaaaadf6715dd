use serde::{Deserialize, Serialize};
use crate::state::SimulationState;

/// One noisy reading of the gas fluxes, as shown on the flux chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxSample {
    /// Session time (seconds) at which the sample was taken.
    pub time_s: f32,
    /// CO2 influx with sensor noise applied, never negative.
    pub co2_flux: f32,
    /// O2 efflux with sensor noise applied, never negative.
    pub o2_flux: f32,
}

/// The session state and the chart sample recorded at one sampler tick.
#[derive(Debug, Clone, Serialize, Deserialize)] // Derive traits for easy saving/loading
pub struct Snapshot {
    /// Session time (seconds).
    pub time_s: f32,
    /// Full state as published at this tick.
    pub state: SimulationState,
    pub sample: FluxSample,
}
