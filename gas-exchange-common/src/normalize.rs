use serde::{Deserialize, Serialize};

use crate::state::{EvaluationInputs, LightColor, SimulationState};

/// Input fields changed by one control event. Absent fields keep their held value.
///
/// Values are not range-checked here; out-of-range numbers are absorbed by the
/// evaluator's clamps.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(default)]
pub struct ControlOverrides {
    pub gravity_factor: Option<f32>,
    pub air_velocity: Option<f32>,
    /// Explicit base thickness (mm), e.g. while dragging the boundary layer slider.
    pub boundary_layer_thickness: Option<f32>,
    pub ambient_co2: Option<f32>,
    pub ambient_o2: Option<f32>,
    pub ambient_temperature: Option<f32>,
    pub light_intensity: Option<f32>,
    pub light_color: Option<LightColor>,
}

impl ControlOverrides {
    pub fn is_empty(&self) -> bool {
        *self == ControlOverrides::default()
    }
}

/// Merges a control event into the held state, producing the next evaluator input.
pub fn normalize(previous: &SimulationState, overrides: &ControlOverrides) -> EvaluationInputs {
    // An explicit thickness is the new authoritative base. Without one, the
    // previous effective thickness is carried forward as the base.
    let base_thickness = match overrides.boundary_layer_thickness {
        Some(requested) => requested,
        None => previous.boundary_layer_thickness,
    };

    EvaluationInputs {
        gravity_factor: overrides.gravity_factor.unwrap_or(previous.gravity_factor),
        air_velocity: overrides.air_velocity.unwrap_or(previous.air_velocity),
        base_thickness,
        ambient_co2: overrides.ambient_co2.unwrap_or(previous.ambient_co2),
        ambient_o2: overrides.ambient_o2.unwrap_or(previous.ambient_o2),
        ambient_temperature: overrides.ambient_temperature.unwrap_or(previous.ambient_temperature),
        light_intensity: overrides.light_intensity.unwrap_or(previous.light_intensity),
        light_color: overrides.light_color.unwrap_or(previous.light_color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::evaluate;
    use crate::state::GravityMode;

    fn held_state() -> SimulationState {
        let inputs = EvaluationInputs {
            gravity_factor: 0.0,
            air_velocity: 1.0,
            base_thickness: 3.0,
            ambient_co2: 800.0,
            ambient_o2: 18.0,
            ambient_temperature: 25.0,
            light_intensity: 1.5,
            light_color: LightColor::Blue,
        };
        SimulationState::from_evaluation(GravityMode::MicroUg, &inputs, &evaluate(&inputs))
    }

    #[test]
    fn test_empty_override_keeps_everything() {
        let previous = held_state();
        let overrides = ControlOverrides::default();
        assert!(overrides.is_empty());

        let merged = normalize(&previous, &overrides);
        assert_eq!(merged, previous.held_inputs());
    }

    #[test]
    fn test_explicit_thickness_is_authoritative() {
        let previous = held_state();
        let overrides = ControlOverrides {
            boundary_layer_thickness: Some(3.5),
            ..Default::default()
        };
        let merged = normalize(&previous, &overrides);
        assert_eq!(merged.base_thickness, 3.5);
        assert_eq!(merged.air_velocity, 1.0);
    }

    #[test]
    fn test_missing_thickness_uses_effective_output() {
        let previous = held_state();
        // 3.0 / (1 + 0.5) = 2.0 effective.
        assert!((previous.boundary_layer_thickness - 2.0).abs() < 1e-5);

        let overrides = ControlOverrides {
            air_velocity: Some(2.0),
            ..Default::default()
        };
        let merged = normalize(&previous, &overrides);
        assert_eq!(merged.base_thickness, previous.boundary_layer_thickness);
        assert_eq!(merged.air_velocity, 2.0);
    }

    #[test]
    fn test_out_of_range_values_pass_through() {
        let previous = held_state();
        let overrides = ControlOverrides {
            air_velocity: Some(-1.0),
            ambient_co2: Some(5000.0),
            light_color: Some(LightColor::FarRed),
            ..Default::default()
        };
        let merged = normalize(&previous, &overrides);
        assert_eq!(merged.air_velocity, -1.0);
        assert_eq!(merged.ambient_co2, 5000.0);
        assert_eq!(merged.light_color, LightColor::FarRed);
        assert_eq!(merged.ambient_o2, 18.0);
    }
}
