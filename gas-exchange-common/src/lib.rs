pub mod config;
pub mod normalize;
pub mod physics;
pub mod preset;
pub mod snapshot;
pub mod state;

// Re-export key types for easier use by dependent crates
pub use config::{
    ControlEvent, InitialConditions, ModelConfig, OutputConfig, SamplerConfig, SessionConfig, SweepConfig,
    TimingConfig, MAX_TICKS,
};
pub use normalize::{normalize, ControlOverrides};
pub use physics::{clamp, evaluate, evaluate_with};
pub use preset::{resolve_preset, PresetInputs};
pub use snapshot::{FluxSample, Snapshot};
pub use state::{DerivedState, EvaluationInputs, GravityMode, LightColor, LightModel, SimulationState};
