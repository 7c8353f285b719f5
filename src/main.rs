//! Headless demo runner
//!
//! Drives the simulation with a scripted pilot on a synthetic clock and
//! prints the HUD as JSON once per second. Useful for smoke-testing balance
//! changes and for replaying a seed seen in the field:
//!
//! ```text
//! skyfire [seed] [seconds]
//! ```

use skyfire::consts::TICK_MS;
use skyfire::sim::{tick, GamePhase, GameState, InputSnapshot};
use skyfire::{PlaceholderAssets, Tuning};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    let seconds: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60);

    let mut state = GameState::new(seed, Tuning::default(), &PlaceholderAssets);
    log::info!("running seed={seed} for {seconds}s");

    let ticks = seconds * 1000 / TICK_MS;
    for i in 1..=ticks {
        let now_ms = i * TICK_MS;
        let input = scripted_input(i, &state);
        tick(&mut state, &input, now_ms);

        if now_ms % 1000 < TICK_MS {
            match serde_json::to_string(&state.hud()) {
                Ok(json) => println!("{json}"),
                Err(err) => log::error!("hud serialization failed: {err}"),
            }
        }
        if state.phase != GamePhase::Playing {
            break;
        }
    }

    let hud = state.hud();
    log::info!(
        "finished after {} ticks: score={} level={} phase={:?}",
        state.tick_count,
        hud.score,
        hud.level,
        state.phase
    );
}

/// Simple pilot: sweeps left and right, holds fire, and rips a charge shot
/// every few seconds
fn scripted_input(tick_index: u64, state: &GameState) -> InputSnapshot {
    let sweep_left = (tick_index / 90) % 2 == 0;
    let charging = (tick_index % 300) < 70;
    InputSnapshot {
        left: sweep_left && state.player.pos.x > 60.0,
        right: !sweep_left && state.player.pos.x < 540.0,
        fire: !charging,
        charge: charging,
    }
}
