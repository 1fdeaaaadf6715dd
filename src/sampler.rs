use anyhow::Result;
use gas_exchange_common::{FluxSample, SamplerConfig, SimulationState};
use log::trace;
use rand::prelude::*;
use rand_distr::Normal;
use std::collections::VecDeque;

/// Polls the published fluxes at a fixed interval and adds synthetic sensor noise.
/// Keeps a rolling window for the live chart; never touches the session state.
pub struct FluxSampler {
    rng: StdRng,
    noise: Normal<f32>,
    history: VecDeque<FluxSample>,
    history_len: usize,
}

impl FluxSampler {
    pub fn new(config: &SamplerConfig) -> Result<Self> {
        let noise = Normal::new(0.0, config.noise_std_dev)
            .map_err(|e| anyhow::anyhow!("Invalid noise standard deviation {}: {}", config.noise_std_dev, e))?;
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            noise,
            history: VecDeque::with_capacity(config.history_len),
            history_len: config.history_len,
        })
    }

    /// Takes one noisy reading of `state` and appends it to the window.
    pub fn sample(&mut self, time_s: f32, state: &SimulationState) -> FluxSample {
        let co2_noise = self.rng.sample(self.noise);
        let o2_noise = self.rng.sample(self.noise);
        let sample = FluxSample {
            time_s,
            co2_flux: (state.co2_flux + co2_noise).max(0.0),
            o2_flux: (state.o2_flux + o2_noise).max(0.0),
        };
        trace!("Sample t={:.2}s CO2 {:.2} O2 {:.2}", time_s, sample.co2_flux, sample.o2_flux);

        if self.history.len() == self.history_len {
            self.history.pop_front();
        }
        self.history.push_back(sample);
        sample
    }

    /// Most recent samples, oldest first.
    pub fn history(&self) -> &VecDeque<FluxSample> {
        &self.history
    }
}
