//! Reference scenarios and model-wide properties of the gas exchange evaluator.
//!
//! Scenarios A-C are the light-less reference points: with the light-aware
//! model, zero light means zero efficiency, which adds the low-efficiency
//! stress term on top of the listed values.

use gas_exchange_common::{
    evaluate, evaluate_with, resolve_preset, DerivedState, EvaluationInputs, GravityMode,
    LightColor, LightModel, SimulationState,
};

const TOLERANCE: f32 = 1e-4;

fn assert_close(actual: f32, expected: f32, what: &str) {
    assert!(
        (actual - expected).abs() <= TOLERANCE,
        "{}: got {}, expected {}",
        what, actual, expected
    );
}

fn dark_inputs(gravity_factor: f32, air_velocity: f32, base_thickness: f32) -> EvaluationInputs {
    EvaluationInputs {
        gravity_factor,
        air_velocity,
        base_thickness,
        ambient_co2: 400.0,
        ambient_o2: 21.0,
        ambient_temperature: 22.0,
        light_intensity: 0.0,
        light_color: LightColor::White,
    }
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn test_scenario_a_earth_still_air() {
    let derived = evaluate_with(&dark_inputs(1.0, 0.0, 0.4), LightModel::Ambient);

    assert_close(derived.boundary_layer_thickness, 0.4, "thickness");
    assert_close(derived.resistance, 0.8, "resistance");
    assert_close(derived.co2_flux, 100.0, "co2 flux");
    assert_close(derived.o2_flux, 90.0, "o2 flux");
    assert_close(derived.heat_trap, 1.2, "heat trap");
    assert_close(derived.temperature, 23.2, "temperature");
    assert_close(derived.stress_level, 10.0, "stress");
}

#[test]
fn test_scenario_a_dark_leaf_is_inefficient() {
    let derived = evaluate(&dark_inputs(1.0, 0.0, 0.4));
    assert_eq!(derived.photosynthetic_efficiency, Some(0.0));
    assert_close(derived.temperature, 23.2, "temperature");
    assert_close(derived.stress_level, 30.0, "stress");
}

#[test]
fn test_scenario_b_strong_airflow_hits_floor() {
    let derived = evaluate_with(&dark_inputs(1.0, 5.0, 0.4), LightModel::Ambient);

    assert_close(derived.boundary_layer_thickness, 0.2, "thickness");
    assert_close(derived.resistance, 0.4, "resistance");
    // 80 / max(0.4, 0.5)
    assert_close(derived.co2_flux, 160.0, "co2 flux");
    assert_close(derived.o2_flux, 144.0, "o2 flux");
}

#[test]
fn test_scenario_c_microgravity_still_air() {
    let derived = evaluate_with(&dark_inputs(0.0, 0.0, 2.5), LightModel::Ambient);

    assert_close(derived.boundary_layer_thickness, 2.5, "thickness");
    assert_close(derived.resistance, 5.0, "resistance");
    assert_close(derived.co2_flux, 16.0, "co2 flux");
    assert_close(derived.temperature, 29.5, "temperature");
    // Thick layer only; flux 16 stays above the low-flux threshold.
    assert_close(derived.stress_level, 40.0, "stress");

    let lit_model = evaluate(&dark_inputs(0.0, 0.0, 2.5));
    assert_close(lit_model.stress_level, 60.0, "stress with efficiency term");
}

#[test]
fn test_scenario_d_all_stress_terms_sum() {
    let mut inputs = dark_inputs(0.0, 0.0, 4.0);
    inputs.ambient_temperature = 19.0;
    let derived = evaluate(&inputs);

    assert_close(derived.boundary_layer_thickness, 4.0, "thickness");
    assert_close(derived.co2_flux, 10.0, "co2 flux");
    assert_close(derived.temperature, 31.0, "temperature");
    assert!(derived.photosynthetic_efficiency.unwrap() < 30.0);
    // 10 + 30 + 30 + 5 + 20
    assert_close(derived.stress_level, 95.0, "stress");
}

#[test]
fn test_scenario_d_stress_clamps_at_100() {
    let mut inputs = dark_inputs(0.0, 0.0, 4.0);
    inputs.ambient_temperature = 23.0;
    let derived = evaluate(&inputs);

    assert_close(derived.temperature, 35.0, "temperature");
    // Raw sum 115
    assert_eq!(derived.stress_level, 100.0);
}

// ============================================================================
// Properties
// ============================================================================

fn input_grid() -> Vec<EvaluationInputs> {
    let mut grid = Vec::new();
    let colors = [LightColor::White, LightColor::Red, LightColor::Blue, LightColor::Green, LightColor::FarRed];
    for &velocity in &[0.0, 0.5, 1.0, 2.5, 5.0] {
        for &thickness in &[0.2, 0.4, 1.5, 2.5, 4.0] {
            for &co2 in &[200.0, 400.0, 1500.0] {
                for &temp in &[15.0, 25.0, 35.0] {
                    for &light in &[0.0, 1.0, 2.4, 5.0] {
                        for &color in &colors {
                            grid.push(EvaluationInputs {
                                gravity_factor: 1.0,
                                air_velocity: velocity,
                                base_thickness: thickness,
                                ambient_co2: co2,
                                ambient_o2: 21.0,
                                ambient_temperature: temp,
                                light_intensity: light,
                                light_color: color,
                            });
                        }
                    }
                }
            }
        }
    }
    grid
}

#[test]
fn test_thickness_monotone_in_velocity() {
    for i in 0..=40 {
        let base = 0.2 + 3.8 * i as f32 / 40.0;
        let mut previous = f32::INFINITY;
        for step in 0..=100 {
            let mut inputs = dark_inputs(1.0, step as f32 * 0.05, base);
            inputs.light_intensity = 1.0;
            let thickness = evaluate(&inputs).boundary_layer_thickness;
            assert!((0.2..=4.0).contains(&thickness), "thickness {} out of band", thickness);
            assert!(thickness <= previous, "thickness grew with velocity at base {}", base);
            previous = thickness;
        }
    }
}

#[test]
fn test_o2_is_fixed_fraction_of_co2() {
    for inputs in input_grid() {
        for model in [LightModel::Spectral, LightModel::Ambient] {
            let derived = evaluate_with(&inputs, model);
            assert_eq!(derived.o2_flux, derived.co2_flux * 0.9);
        }
    }
}

#[test]
fn test_bounded_outputs() {
    for inputs in input_grid() {
        let derived = evaluate(&inputs);
        assert!((0.0..=100.0).contains(&derived.stress_level));
        let efficiency = derived.photosynthetic_efficiency.unwrap();
        assert!((0.0..=100.0).contains(&efficiency));
        assert!(derived.co2_flux >= 0.0);
    }
}

#[test]
fn test_bounded_outputs_for_wild_inputs() {
    let wild = [-10.0, -2.0, -1.0, 0.0, 1e6, f32::INFINITY];
    for &velocity in &wild {
        for &thickness in &wild {
            for &temp in &[-50.0, 80.0] {
                let mut inputs = dark_inputs(1.0, velocity, thickness);
                inputs.ambient_temperature = temp;
                inputs.light_intensity = 1e3;
                let derived = evaluate(&inputs);
                assert!((0.2..=4.0).contains(&derived.boundary_layer_thickness));
                assert!((0.0..=100.0).contains(&derived.stress_level));
                assert!((0.0..=100.0).contains(&derived.photosynthetic_efficiency.unwrap()));
            }
        }
    }
}

fn bits(derived: &DerivedState) -> Vec<u32> {
    vec![
        derived.boundary_layer_thickness.to_bits(),
        derived.resistance.to_bits(),
        derived.co2_flux.to_bits(),
        derived.o2_flux.to_bits(),
        derived.heat_trap.to_bits(),
        derived.radiant_heat.to_bits(),
        derived.temperature.to_bits(),
        derived.photosynthetic_efficiency.unwrap_or(f32::NAN).to_bits(),
        derived.stress_level.to_bits(),
    ]
}

#[test]
fn test_evaluate_is_idempotent() {
    for inputs in input_grid() {
        assert_eq!(bits(&evaluate(&inputs)), bits(&evaluate(&inputs)));
    }
}

#[test]
fn test_presets_ignore_prior_thickness() {
    for &prior_thickness in &[0.2, 0.4, 1.7, 2.5, 4.0] {
        let mut inputs = dark_inputs(0.5, 0.0, prior_thickness);
        inputs.light_intensity = 1.0;
        let current = SimulationState::from_evaluation(GravityMode::MicroUg, &inputs, &evaluate(&inputs));

        let earth = resolve_preset(GravityMode::Earth1g, &current, LightModel::Spectral);
        assert_eq!(earth.gravity_factor, 1.0);
        assert_close(earth.boundary_layer_thickness, 0.4, "earth thickness");

        let micro = resolve_preset(GravityMode::MicroUg, &current, LightModel::Spectral);
        assert_eq!(micro.gravity_factor, 0.0);
        assert_close(micro.boundary_layer_thickness, 2.5, "micro thickness");
    }
}
