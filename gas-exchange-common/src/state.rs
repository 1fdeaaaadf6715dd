use serde::{Deserialize, Serialize};

/// Symbolic gravity preset currently active.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GravityMode {
    /// Full gravity, natural convection thins the boundary layer.
    #[serde(rename = "earth_1g")]
    Earth1g,
    /// Microgravity, no buoyant convection.
    #[serde(rename = "micro_ug")]
    MicroUg,
}

impl GravityMode {
    pub fn label(&self) -> &'static str {
        match self {
            GravityMode::Earth1g => "Earth (1g)",
            GravityMode::MicroUg => "Microgravity (µg)",
        }
    }
}

/// Light color of the grow lamp. Each color carries a fixed spectral efficiency.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LightColor {
    White,
    Red,
    Blue,
    Green,
    FarRed,
}

impl LightColor {
    /// Fraction of the incoming light usable for photosynthesis.
    pub fn spectral_efficiency(&self) -> f32 {
        match self {
            LightColor::White => 0.9,
            LightColor::Red => 1.0,
            LightColor::Blue => 1.0,
            LightColor::Green => 0.4,
            LightColor::FarRed => 0.2,
        }
    }
}

/// Which formula set the evaluator applies.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LightModel {
    /// Light-aware model: radiant heating, photosynthetic efficiency and the efficiency stress term.
    #[default]
    Spectral,
    /// Light-less model: light inputs are carried but have no effect.
    Ambient,
}

/// The complete input tuple consumed by the physics evaluator.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct EvaluationInputs {
    /// 1 = full gravity, 0 = microgravity.
    pub gravity_factor: f32,
    /// Forced airflow across the leaf (m/s).
    pub air_velocity: f32,
    /// Boundary layer thickness before airflow thinning (mm).
    pub base_thickness: f32,
    /// Ambient CO2 (ppm).
    pub ambient_co2: f32,
    /// Ambient O2 (%).
    pub ambient_o2: f32,
    /// Ambient temperature (°C).
    pub ambient_temperature: f32,
    /// Unitless light multiplier.
    pub light_intensity: f32,
    pub light_color: LightColor,
}

/// Everything the evaluator derives from one set of inputs.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DerivedState {
    /// Effective boundary layer thickness (mm), always within the clamp band.
    pub boundary_layer_thickness: f32,
    pub resistance: f32,
    pub co2_flux: f32,
    pub o2_flux: f32,
    pub heat_trap: f32,
    pub radiant_heat: f32,
    /// Leaf surface temperature (°C).
    pub temperature: f32,
    /// Percent, `None` under the light-less model.
    pub photosynthetic_efficiency: Option<f32>,
    /// Composite stress in [0, 100].
    pub stress_level: f32,
}

/// The one persistent record of the session. Replaced wholesale on every recomputation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub gravity_mode: GravityMode,
    pub gravity_factor: f32,
    pub air_velocity: f32,
    pub boundary_layer_thickness: f32,
    pub co2_flux: f32,
    pub o2_flux: f32,
    pub temperature: f32,
    pub ambient_temperature: f32,
    pub stress_level: f32,
    pub ambient_co2: f32,
    pub ambient_o2: f32,
    pub light_intensity: f32,
    pub light_color: LightColor,
    pub photosynthetic_efficiency: Option<f32>,
}

impl SimulationState {
    /// Assembles a full record from the inputs that were evaluated and their derived values.
    pub fn from_evaluation(
        gravity_mode: GravityMode,
        inputs: &EvaluationInputs,
        derived: &DerivedState,
    ) -> Self {
        SimulationState {
            gravity_mode,
            gravity_factor: inputs.gravity_factor,
            air_velocity: inputs.air_velocity,
            boundary_layer_thickness: derived.boundary_layer_thickness,
            co2_flux: derived.co2_flux,
            o2_flux: derived.o2_flux,
            temperature: derived.temperature,
            ambient_temperature: inputs.ambient_temperature,
            stress_level: derived.stress_level,
            ambient_co2: inputs.ambient_co2,
            ambient_o2: inputs.ambient_o2,
            light_intensity: inputs.light_intensity,
            light_color: inputs.light_color,
            photosynthetic_efficiency: derived.photosynthetic_efficiency,
        }
    }

    /// Input tuple as currently held, using the effective thickness as the base.
    pub fn held_inputs(&self) -> EvaluationInputs {
        EvaluationInputs {
            gravity_factor: self.gravity_factor,
            air_velocity: self.air_velocity,
            base_thickness: self.boundary_layer_thickness,
            ambient_co2: self.ambient_co2,
            ambient_o2: self.ambient_o2,
            ambient_temperature: self.ambient_temperature,
            light_intensity: self.light_intensity,
            light_color: self.light_color,
        }
    }
}
