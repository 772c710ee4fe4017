use crate::core::SimError;
use crate::domain::TickInput;

use super::events::SimEvent;
use super::{PerfTimer, SimulationCore};

/// What one committed tick produced
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// Particles that turned dynamic this tick
    pub activated: u32,
    pub active_fraction: f32,
    /// Events raised by this tick (also left in the queue for `drain_events`)
    pub events: Vec<SimEvent>,
}

pub(super) fn step(core: &mut SimulationCore, dt: f32) -> Result<TickReport, SimError> {
    let perf_on = core.perf_enabled;
    let step_start = if perf_on { Some(PerfTimer::start()) } else { None };

    let mut events = Vec::new();
    let mut input = TickInput {
        dt,
        trigger: core.trigger,
        activation_request: core.activation_request,
    };

    // Nothing to explode around: acknowledge immediately, the backend never sees it
    if input.activation_request && input.trigger.is_none() {
        log::warn!("activation requested without a trigger point");
        input.activation_request = false;
        core.activation_request = false;
        events.push(SimEvent::ActivationCompleted { tick: core.tick + 1, activated: 0 });
    }

    let stats = core.backend.advance_tick(&mut core.store, &core.config, &input)?;
    core.tick += 1;

    // Completion follows the backend's acknowledgement, not the request itself
    if input.activation_request {
        if stats.activation_served {
            core.activation_request = false;
            log::info!("activation served on tick {}: {} particles", core.tick, stats.activated);
            events.push(SimEvent::ActivationCompleted { tick: core.tick, activated: stats.activated });
        } else {
            log::debug!("activation request not acknowledged on tick {}, still pending", core.tick);
        }
    }

    let non_finite = core.store.non_finite_count();
    if non_finite > 0 {
        log::warn!("{} particles hold non-finite state after tick {}", non_finite, core.tick);
    }

    let active_fraction = core.store.active_fraction();
    if !core.completion_reported && active_fraction >= core.config.completion_threshold {
        core.completion_reported = true;
        log::info!("completion threshold reached on tick {} ({:.3})", core.tick, active_fraction);
        events.push(SimEvent::CompletionReached { tick: core.tick, fraction: active_fraction });
    }

    core.render.update(&core.store);

    for event in &events {
        core.events.push(*event);
    }

    if let Some(t0) = step_start {
        core.perf_stats.reset();
        core.perf_stats.record_tick(&stats);
        core.perf_stats.non_finite = non_finite as u32;
        core.perf_stats.dynamic_count = core.store.dynamic_count() as u32;
        core.perf_stats.step_ms = t0.elapsed_ms();
    }

    Ok(TickReport {
        tick: core.tick,
        activated: stats.activated,
        active_fraction,
        events,
    })
}

/// Run as many fixed ticks as the clock releases for `frame_dt`
pub(super) fn advance(core: &mut SimulationCore, frame_dt: f32) -> Result<u32, SimError> {
    let steps = core.clock.consume_steps(frame_dt);
    let dt = core.clock.fixed_dt;
    for _ in 0..steps {
        step(core, dt)?;
    }
    Ok(steps)
}
