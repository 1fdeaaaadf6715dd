use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::normalize::ControlOverrides;
use crate::state::{EvaluationInputs, GravityMode, LightColor, LightModel};
use std::path::Path;

// Initial snapshot of the session, loaded from config.toml. Missing fields use the fixed literals.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct InitialConditions {
    pub gravity_mode: GravityMode,
    pub air_velocity: f32,
    pub boundary_layer_thickness: f32,
    pub ambient_co2: f32,
    pub ambient_o2: f32,
    pub ambient_temperature: f32,
    pub light_intensity: f32,
    pub light_color: LightColor,
}

impl Default for InitialConditions {
    fn default() -> Self {
        InitialConditions {
            gravity_mode: GravityMode::Earth1g,
            air_velocity: 0.0,
            boundary_layer_thickness: 0.4,
            ambient_co2: 400.0,
            ambient_o2: 21.0,
            ambient_temperature: 22.0,
            light_intensity: 1.0,
            light_color: LightColor::White,
        }
    }
}

impl InitialConditions {
    /// Input tuple for the first evaluation of the session.
    pub fn to_inputs(&self) -> EvaluationInputs {
        EvaluationInputs {
            gravity_factor: self.gravity_mode.preset().gravity_factor,
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

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct ModelConfig {
    #[serde(default)]
    pub light_model: LightModel,
}

// Configuration for timing
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    pub duration_s: f32,
    pub sample_interval_s: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig { duration_s: 60.0, sample_interval_s: 0.5 }
    }
}

// Flux chart sampler settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SamplerConfig {
    #[serde(default = "default_noise_std_dev")]
    pub noise_std_dev: f32,
    #[serde(default = "default_history_len")]
    pub history_len: usize,
    #[serde(default)]
    pub seed: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            noise_std_dev: default_noise_std_dev(),
            history_len: default_history_len(),
            seed: 0,
        }
    }
}

fn default_noise_std_dev() -> f32 {
    2.0 // flux units
}

fn default_history_len() -> usize {
    50
}

/// One scripted control event. A preset, if present, is applied before the overrides.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ControlEvent {
    pub at_s: f32,
    #[serde(default)]
    pub preset: Option<GravityMode>,
    #[serde(flatten)]
    pub controls: ControlOverrides,
}

// Grid of the parameter sweep
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct SweepConfig {
    pub velocity_min: f32,
    pub velocity_max: f32,
    pub velocity_steps: u32,
    pub base_thicknesses: Vec<f32>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            velocity_min: 0.0,
            velocity_max: 5.0,
            velocity_steps: 51,
            base_thicknesses: vec![0.4, 1.0, 2.5, 4.0],
        }
    }
}

impl SweepConfig {
    /// Evenly spaced velocities from min to max, both ends included.
    pub fn velocities(&self) -> Vec<f32> {
        if self.velocity_steps <= 1 {
            return vec![self.velocity_min];
        }
        let step = (self.velocity_max - self.velocity_min) / (self.velocity_steps - 1) as f32;
        (0..self.velocity_steps)
            .map(|i| self.velocity_min + step * i as f32)
            .collect()
    }
}

// Configuration for output settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    #[serde(default = "default_true")]
    pub save_snapshots: bool,
    #[serde(default = "default_true")]
    pub save_samples: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            base_filename: String::from("leaf_session"),
            save_snapshots: true,
            save_samples: true,
            format: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Longest session the engine will record, in sampler ticks.
pub const MAX_TICKS: u32 = 10_000_000;

// Main session configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SessionConfig {
    #[serde(default)]
    pub initial: InitialConditions,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub events: Vec<ControlEvent>,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl SessionConfig {
    /// Loads the session configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let mut config: SessionConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;

        // Replay order is by time; ties keep file order.
        config.events.sort_by(|a, b| a.at_s.total_cmp(&b.at_s));
        Ok(config)
    }

    // Control values themselves are deliberately not range-checked.
    fn validate(&self) -> Result<()> {
        if !self.timing.sample_interval_s.is_finite() || self.timing.sample_interval_s <= 0.0 {
            anyhow::bail!("sample_interval_s must be positive and finite.");
        }
        if !self.timing.duration_s.is_finite() || self.timing.duration_s < 0.0 {
            anyhow::bail!("duration_s must be finite and not negative.");
        }
        let ticks = (self.timing.duration_s as f64 / self.timing.sample_interval_s as f64).ceil();
        if ticks > MAX_TICKS as f64 {
            anyhow::bail!(
                "Session of {} s at {} s intervals needs {} ticks, more than the limit of {}.",
                self.timing.duration_s, self.timing.sample_interval_s, ticks, MAX_TICKS
            );
        }
        if !self.sampler.noise_std_dev.is_finite() || self.sampler.noise_std_dev < 0.0 {
            anyhow::bail!("noise_std_dev must be finite and not negative.");
        }
        if self.sampler.history_len == 0 {
            anyhow::bail!("history_len must be greater than 0.");
        }
        if self.sweep.velocity_steps == 0 {
            anyhow::bail!("sweep velocity_steps must be greater than 0.");
        }
        for event in &self.events {
            if !event.at_s.is_finite() || event.at_s < 0.0 {
                anyhow::bail!("event time {} must be finite and not negative.", event.at_s);
            }
            // Unknown keys land nowhere under flatten, so an empty event is usually a typo.
            if event.preset.is_none() && event.controls.is_empty() {
                anyhow::bail!("event at {} s sets neither a preset nor any known control.", event.at_s);
            }
        }
        Ok(())
    }

    /// Number of sampler ticks after t = 0 covering the whole session. Bounded by `MAX_TICKS` after validation.
    pub fn total_ticks(&self) -> u32 {
        let ticks = (self.timing.duration_s as f64 / self.timing.sample_interval_s as f64).ceil();
        ticks.min(MAX_TICKS as f64) as u32
    }
}
