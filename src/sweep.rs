use gas_exchange_common::{evaluate_with, EvaluationInputs, GravityMode, InitialConditions, LightModel, SweepConfig};
use log::info;
use rayon::prelude::*;
use serde::Serialize;

/// One evaluated point of the response table.
#[derive(Debug, Clone, Serialize)]
pub struct SweepRow {
    pub gravity_mode: GravityMode,
    pub air_velocity: f32,
    pub base_thickness: f32,
    pub boundary_layer_thickness: f32,
    pub co2_flux: f32,
    pub o2_flux: f32,
    pub temperature: f32,
    pub photosynthetic_efficiency: Option<f32>,
    pub stress_level: f32,
}

/// Evaluates every (gravity preset, base thickness, velocity) combination.
///
/// Gases, temperature and light come from `held`. The preset supplies the
/// gravity factor; the base thickness comes from the sweep grid.
pub fn run_sweep(sweep: &SweepConfig, held: &InitialConditions, model: LightModel) -> Vec<SweepRow> {
    let velocities = sweep.velocities();
    let mut grid = Vec::with_capacity(2 * sweep.base_thicknesses.len() * velocities.len());
    for mode in [GravityMode::Earth1g, GravityMode::MicroUg] {
        for &base_thickness in &sweep.base_thicknesses {
            for &air_velocity in &velocities {
                grid.push((mode, base_thickness, air_velocity));
            }
        }
    }
    info!(
        "Sweeping {} points ({} velocities x {} thicknesses x 2 presets) on {} threads.",
        grid.len(),
        velocities.len(),
        sweep.base_thicknesses.len(),
        rayon::current_num_threads()
    );

    let template = held.to_inputs();
    grid.par_iter()
        .map(|&(mode, base_thickness, air_velocity)| {
            let inputs = EvaluationInputs {
                gravity_factor: mode.preset().gravity_factor,
                air_velocity,
                base_thickness,
                ..template
            };
            let derived = evaluate_with(&inputs, model);
            SweepRow {
                gravity_mode: mode,
                air_velocity,
                base_thickness,
                boundary_layer_thickness: derived.boundary_layer_thickness,
                co2_flux: derived.co2_flux,
                o2_flux: derived.o2_flux,
                temperature: derived.temperature,
                photosynthetic_efficiency: derived.photosynthetic_efficiency,
                stress_level: derived.stress_level,
            }
        })
        .collect()
}
