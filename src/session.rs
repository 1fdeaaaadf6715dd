use gas_exchange_common::{
    evaluate_with, normalize, resolve_preset, ControlEvent, ControlOverrides, GravityMode,
    InitialConditions, LightModel, SimulationState,
};
use log::{debug, info};

/// Owns the single simulation state of a session. Every change replaces the whole record.
#[derive(Debug)]
pub struct Session {
    state: SimulationState,
    model: LightModel,
    /// Number of state replacements since the session started.
    revision: u64,
}

impl Session {
    /// Starts a session from the initial inputs, evaluated once so the record is consistent.
    pub fn new(initial: &InitialConditions, model: LightModel) -> Self {
        let inputs = initial.to_inputs();
        let derived = evaluate_with(&inputs, model);
        let state = SimulationState::from_evaluation(initial.gravity_mode, &inputs, &derived);
        debug!("Initial state: {:#?}", state);
        Self { state, model, revision: 0 }
    }

    /// Current published snapshot.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn model(&self) -> LightModel {
        self.model
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Merges a control change into the held inputs and recomputes everything.
    pub fn apply_controls(&mut self, overrides: &ControlOverrides) -> &SimulationState {
        let inputs = normalize(&self.state, overrides);
        let derived = evaluate_with(&inputs, self.model);
        self.publish(SimulationState::from_evaluation(self.state.gravity_mode, &inputs, &derived))
    }

    /// Switches to a gravity preset, holding the other inputs.
    pub fn select_preset(&mut self, mode: GravityMode) -> &SimulationState {
        let next = resolve_preset(mode, &self.state, self.model);
        self.publish(next)
    }

    /// Applies a scripted event: preset first, then any overrides.
    pub fn apply_event(&mut self, event: &ControlEvent) -> &SimulationState {
        if let Some(mode) = event.preset {
            info!("t={:.2}s preset -> {}", event.at_s, mode.label());
            self.select_preset(mode);
        }
        if !event.controls.is_empty() {
            info!("t={:.2}s controls -> {:?}", event.at_s, event.controls);
            self.apply_controls(&event.controls);
        }
        &self.state
    }

    fn publish(&mut self, next: SimulationState) -> &SimulationState {
        self.state = next;
        self.revision += 1;
        debug!(
            "State r{}: thickness {:.3} mm | CO2 {:.2} | O2 {:.2} | leaf {:.1} °C | stress {:.1}",
            self.revision,
            self.state.boundary_layer_thickness,
            self.state.co2_flux,
            self.state.o2_flux,
            self.state.temperature,
            self.state.stress_level
        );
        &self.state
    }
}
