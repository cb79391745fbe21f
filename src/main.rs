//! Astro Siege headless demo driver
//!
//! Stands in for a real host loop: advances the simulation at its fixed
//! cadence with a small scripted pilot, then dumps the final HUD stats as
//! JSON. A real frontend renders between ticks and forwards device events
//! through the same intent entry points the autopilot uses here.

use astro_siege::SimulationState;
use astro_siege::sim::Phase;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .map(|s| s.parse().expect("seed must be a u64"))
        .unwrap_or(0xA57E0);
    // Ten minutes of play at 60 Hz unless asked otherwise
    let ticks: u64 = args
        .next()
        .map(|s| s.parse().expect("tick count must be a u64"))
        .unwrap_or(36_000);

    log::info!("starting session: seed {seed}, up to {ticks} ticks");
    let mut state = SimulationState::new(seed);

    for t in 0..ticks {
        autopilot(&mut state, t);
        state.advance();
        if state.phase == Phase::GameOver {
            break;
        }
    }

    let stats = state.hud_stats();
    println!(
        "{}",
        serde_json::to_string_pretty(&stats).expect("stats serialize")
    );
}

/// Chase the nearest threat's lane and keep the trigger warm
fn autopilot(state: &mut SimulationState, t: u64) {
    let target_x = state.boss.as_ref().map(|b| b.pos.x).or_else(|| {
        state
            .asteroids
            .iter()
            .min_by(|a, b| {
                a.pos
                    .z
                    .partial_cmp(&b.pos.z)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|a| a.pos.x)
    });

    if let Some(x) = target_x {
        let dx = x - state.player.pos.x;
        if dx.abs() > 0.1 {
            state.strafe(dx.signum());
        }
    }

    if t % 10 == 0 {
        state.fire();
    }

    // Panic button once the field gets crowded
    if state.asteroids.len() > 15 {
        state.activate_bomb();
    }
}
