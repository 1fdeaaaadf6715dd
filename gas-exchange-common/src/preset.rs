use log::debug;

use crate::physics::evaluate_with;
use crate::state::{EvaluationInputs, GravityMode, LightModel, SimulationState};

/// Canonical base inputs of a gravity preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetInputs {
    pub gravity_factor: f32,
    /// Base boundary layer thickness (mm) before airflow thinning.
    pub base_thickness: f32,
}

impl GravityMode {
    pub fn preset(&self) -> PresetInputs {
        match self {
            GravityMode::Earth1g => PresetInputs { gravity_factor: 1.0, base_thickness: 0.4 },
            GravityMode::MicroUg => PresetInputs { gravity_factor: 0.0, base_thickness: 2.5 },
        }
    }
}

/// Switches to `mode`, keeping every other held input, and evaluates the result.
/// Transitions are unconditional.
pub fn resolve_preset(mode: GravityMode, current: &SimulationState, model: LightModel) -> SimulationState {
    let preset = mode.preset();
    let inputs = EvaluationInputs {
        gravity_factor: preset.gravity_factor,
        base_thickness: preset.base_thickness,
        ..current.held_inputs()
    };
    debug!("Resolving preset {:?}: {:?}", mode, inputs);

    let derived = evaluate_with(&inputs, model);
    SimulationState::from_evaluation(mode, &inputs, &derived)
}
