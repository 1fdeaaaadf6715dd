//! Closed-form leaf-surface gas exchange model.
//!
//! `evaluate` maps one complete input tuple to the derived physiological state.
//! Every step depends on the one before it:
//! boundary layer -> resistance -> flux -> temperature -> efficiency -> stress.
//! The model is illustrative, not a fluid solver.

use crate::state::{DerivedState, EvaluationInputs, LightModel};

// Boundary layer
pub const MIN_THICKNESS_MM: f32 = 0.2;
pub const MAX_THICKNESS_MM: f32 = 4.0;
pub const VELOCITY_THINNING: f32 = 0.5;

// Diffusion
pub const RESISTANCE_PER_MM: f32 = 2.0;
pub const MIN_RESISTANCE: f32 = 0.5;
pub const CO2_UPTAKE_COEFF: f32 = 0.2;
/// O2 released per unit of CO2 taken up.
pub const O2_PER_CO2: f32 = 0.9;

// Heat balance
pub const HEAT_TRAP_PER_MM: f32 = 3.0;
pub const RADIANT_HEAT_PER_INTENSITY: f32 = 2.5;

// Photosynthesis
pub const SATURATING_INTENSITY: f32 = 2.0;
pub const MAX_INTENSITY_FACTOR: f32 = 1.2;
pub const OPTIMAL_TEMP_MIN_C: f32 = 15.0;
pub const OPTIMAL_TEMP_MAX_C: f32 = 30.0;
pub const TEMP_PENALTY_PER_DEGREE: f32 = 0.1;
pub const CO2_SATURATING_FLUX: f32 = 40.0;

// Stress
pub const BASE_STRESS: f32 = 10.0;
pub const THICK_LAYER_THRESHOLD_MM: f32 = 1.5;
pub const THICK_LAYER_STRESS: f32 = 30.0;
pub const LOW_FLUX_THRESHOLD: f32 = 15.0;
pub const LOW_FLUX_STRESS: f32 = 30.0;
pub const HEAT_STRESS_ONSET_C: f32 = 30.0;
pub const HEAT_STRESS_PER_DEGREE: f32 = 5.0;
pub const LOW_EFFICIENCY_THRESHOLD: f32 = 30.0;
pub const LOW_EFFICIENCY_STRESS: f32 = 20.0;

/// Clamps a value between a minimum and maximum. NaN collapses to `min`.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Evaluates the canonical light-aware model.
pub fn evaluate(inputs: &EvaluationInputs) -> DerivedState {
    evaluate_with(inputs, LightModel::Spectral)
}

/// Evaluates the model with an explicit choice of formula set.
pub fn evaluate_with(inputs: &EvaluationInputs, model: LightModel) -> DerivedState {
    let thickness = effective_thickness(inputs.base_thickness, inputs.air_velocity);
    let resistance = thickness * RESISTANCE_PER_MM;

    let co2_flux = (inputs.ambient_co2 * CO2_UPTAKE_COEFF) / resistance.max(MIN_RESISTANCE);
    let o2_flux = co2_flux * O2_PER_CO2;

    let heat_trap = thickness * HEAT_TRAP_PER_MM;
    let radiant_heat = match model {
        LightModel::Spectral => inputs.light_intensity * RADIANT_HEAT_PER_INTENSITY,
        LightModel::Ambient => 0.0,
    };
    let temperature = inputs.ambient_temperature + heat_trap + radiant_heat;

    let photosynthetic_efficiency = match model {
        LightModel::Spectral => Some(photosynthetic_efficiency(inputs, temperature, co2_flux)),
        LightModel::Ambient => None,
    };

    let stress_level = stress_level(thickness, co2_flux, temperature, photosynthetic_efficiency);

    DerivedState {
        boundary_layer_thickness: thickness,
        resistance,
        co2_flux,
        o2_flux,
        heat_trap,
        radiant_heat,
        temperature,
        photosynthetic_efficiency,
        stress_level,
    }
}

/// Airflow thins the stagnant layer; the result never leaves the clamp band.
pub fn effective_thickness(base_thickness: f32, air_velocity: f32) -> f32 {
    let thinned = base_thickness / (1.0 + air_velocity * VELOCITY_THINNING);
    clamp(thinned, MIN_THICKNESS_MM, MAX_THICKNESS_MM)
}

/// 1.0 inside the optimal band, losing 0.1 per degree outside it, never negative.
pub fn temperature_penalty(temperature: f32) -> f32 {
    let excursion = if temperature < OPTIMAL_TEMP_MIN_C {
        OPTIMAL_TEMP_MIN_C - temperature
    } else if temperature > OPTIMAL_TEMP_MAX_C {
        temperature - OPTIMAL_TEMP_MAX_C
    } else {
        0.0
    };
    (1.0 - excursion * TEMP_PENALTY_PER_DEGREE).max(0.0)
}

fn photosynthetic_efficiency(inputs: &EvaluationInputs, temperature: f32, co2_flux: f32) -> f32 {
    let spectral = inputs.light_color.spectral_efficiency();
    // Soft ceiling only; strong light is never penalized.
    let intensity_factor = (inputs.light_intensity / SATURATING_INTENSITY).min(MAX_INTENSITY_FACTOR);
    let temp_penalty = temperature_penalty(temperature);
    let co2_penalty = (co2_flux / CO2_SATURATING_FLUX).min(1.0);

    clamp(100.0 * spectral * intensity_factor * temp_penalty * co2_penalty, 0.0, 100.0)
}

fn stress_level(thickness: f32, co2_flux: f32, temperature: f32, efficiency: Option<f32>) -> f32 {
    let mut stress = BASE_STRESS;
    if thickness > THICK_LAYER_THRESHOLD_MM {
        stress += THICK_LAYER_STRESS;
    }
    if co2_flux < LOW_FLUX_THRESHOLD {
        stress += LOW_FLUX_STRESS;
    }
    if temperature > HEAT_STRESS_ONSET_C {
        stress += (temperature - HEAT_STRESS_ONSET_C) * HEAT_STRESS_PER_DEGREE;
    }
    if let Some(efficiency) = efficiency {
        if efficiency < LOW_EFFICIENCY_THRESHOLD {
            stress += LOW_EFFICIENCY_STRESS;
        }
    }
    clamp(stress, 0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LightColor;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn inputs(base_thickness: f32, air_velocity: f32) -> EvaluationInputs {
        EvaluationInputs {
            gravity_factor: 1.0,
            air_velocity,
            base_thickness,
            ambient_co2: 400.0,
            ambient_o2: 21.0,
            ambient_temperature: 22.0,
            light_intensity: 2.0,
            light_color: LightColor::Red,
        }
    }

    #[test]
    fn test_clamp_absorbs_nan() {
        assert_eq!(clamp(f32::NAN, 0.2, 4.0), 0.2);
        assert_eq!(clamp(-3.0, 0.0, 100.0), 0.0);
        assert_eq!(clamp(250.0, 0.0, 100.0), 100.0);
    }

    #[test]
    fn test_effective_thickness_bounds() {
        assert!(approx(effective_thickness(2.0, 2.0), 1.0));
        assert_eq!(effective_thickness(0.4, 5.0), MIN_THICKNESS_MM);
        assert_eq!(effective_thickness(10.0, 0.0), MAX_THICKNESS_MM);
        // Negative velocity thickens the layer, -2 divides by zero.
        assert!(approx(effective_thickness(1.0, -1.0), 2.0));
        assert_eq!(effective_thickness(1.0, -2.0), MAX_THICKNESS_MM);
        assert_eq!(effective_thickness(0.0, -2.0), MIN_THICKNESS_MM);
        assert_eq!(effective_thickness(1.0, -4.0), MIN_THICKNESS_MM);
    }

    #[test]
    fn test_resistance_floor_caps_flux() {
        let derived = evaluate(&inputs(0.2, 0.0));
        assert!(approx(derived.resistance, 0.4));
        assert!(approx(derived.co2_flux, 160.0));
    }

    #[test]
    fn test_temperature_penalty_band() {
        assert_eq!(temperature_penalty(15.0), 1.0);
        assert_eq!(temperature_penalty(30.0), 1.0);
        assert!(approx(temperature_penalty(32.0), 0.8));
        assert!(approx(temperature_penalty(10.0), 0.5));
        assert_eq!(temperature_penalty(45.0), 0.0);
        assert_eq!(temperature_penalty(-20.0), 0.0);
    }

    #[test]
    fn test_efficiency_saturates_without_photoinhibition() {
        let mut lamp = inputs(0.4, 0.0);
        lamp.light_color = LightColor::Green;
        lamp.ambient_temperature = 15.0;
        lamp.light_intensity = 2.4;
        let at_cap = evaluate(&lamp).photosynthetic_efficiency.unwrap();

        // Same leaf temperature, intensity far past the cap.
        lamp.light_intensity = 5.0;
        lamp.ambient_temperature = 15.0 - 2.5 * 2.6;
        let past_cap = evaluate(&lamp).photosynthetic_efficiency.unwrap();

        assert!(approx(at_cap, 48.0));
        assert!(approx(past_cap, 48.0));
    }

    #[test]
    fn test_efficiency_components_multiply() {
        // Leaf at 22 + 1.2 + 2.5 = 25.7 °C, flux 100, intensity factor 0.5.
        let mut green = inputs(0.4, 0.0);
        green.light_intensity = 1.0;
        green.light_color = LightColor::Green;
        let derived = evaluate(&green);
        assert!(approx(derived.temperature, 25.7));
        assert!(approx(derived.photosynthetic_efficiency.unwrap(), 20.0));
        // Below 30% efficiency adds its stress term.
        assert!(approx(derived.stress_level, 30.0));
    }

    #[test]
    fn test_ambient_model_ignores_light() {
        let lit = inputs(0.4, 0.0);
        let derived = evaluate_with(&lit, LightModel::Ambient);
        assert_eq!(derived.radiant_heat, 0.0);
        assert!(approx(derived.temperature, 23.2));
        assert_eq!(derived.photosynthetic_efficiency, None);
        assert!(approx(derived.stress_level, 10.0));
    }

    #[test]
    fn test_heat_stress_is_linear_above_onset() {
        let mut hot = inputs(0.4, 0.0);
        hot.light_intensity = 0.0;
        hot.ambient_temperature = 30.8; // leaf at 32.0
        let derived = evaluate_with(&hot, LightModel::Ambient);
        assert!(approx(derived.temperature, 32.0));
        assert!(approx(derived.stress_level, 20.0));
    }
}
