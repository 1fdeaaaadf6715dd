use anyhow::Result;
use gas_exchange_common::{SessionConfig, Snapshot};
use log::{info, trace};
use std::time::Instant;

use crate::sampler::FluxSampler;
use crate::session::Session;

/// Replays the scripted control events on the sampler clock and records one snapshot per tick.
pub fn run_session(config: &SessionConfig) -> Result<Vec<Snapshot>> {
    let mut session = Session::new(&config.initial, config.model.light_model);
    let mut sampler = FluxSampler::new(&config.sampler)?;

    let interval = config.timing.sample_interval_s;
    let total_ticks = config.total_ticks();
    let mut snapshots = Vec::with_capacity(total_ticks as usize + 1);
    let mut next_event = 0;

    info!(
        "Running session for {:.1} s: {} ticks of {:.2} s, {} scripted events, {:?} model.",
        config.timing.duration_s,
        total_ticks,
        interval,
        config.events.len(),
        session.model()
    );
    let start_time = Instant::now();

    for tick in 0..=total_ticks {
        let time_s = tick as f32 * interval;

        // Events are sorted by time at load.
        while next_event < config.events.len() && config.events[next_event].at_s <= time_s {
            session.apply_event(&config.events[next_event]);
            next_event += 1;
        }

        let state = *session.state();
        let sample = sampler.sample(time_s, &state);
        snapshots.push(Snapshot { time_s, state, sample });
        trace!("Tick {}/{} recorded (revision {})", tick, total_ticks, session.revision());
    }

    if next_event < config.events.len() {
        info!(
            "{} events scheduled after the end of the session were not applied.",
            config.events.len() - next_event
        );
    }

    let window = sampler.history();
    if !window.is_empty() {
        let mean_co2 = window.iter().map(|s| s.co2_flux).sum::<f32>() / window.len() as f32;
        info!("Chart window: last {} samples, mean CO2 reading {:.2}", window.len(), mean_co2);
    }

    let final_state = session.state();
    info!(
        "Session finished in {:.3} ms | {} state revisions | final: {} thickness {:.3} mm, CO2 {:.2}, stress {:.1}",
        start_time.elapsed().as_secs_f64() * 1000.0,
        session.revision(),
        final_state.gravity_mode.label(),
        final_state.boundary_layer_thickness,
        final_state.co2_flux,
        final_state.stress_level
    );
    Ok(snapshots)
}
