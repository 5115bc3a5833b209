//! Per-frame simulation step
//!
//! Order within a tick: juice resolves the time scale, then the player,
//! weapons, grenades, enemies, score and missions each run once on the
//! scaled delta. Nothing calls back into an earlier stage.

use glam::Vec2;

use super::director::PlayerTarget;
use super::events::SimEvent;
use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Slow-motion when a wave is cleared
const WAVE_CLEAR_SLOWMO_SCALE: f32 = 0.2;
const WAVE_CLEAR_SLOWMO_SECS: f32 = 0.8;

/// Semantic input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired movement direction (any length; normalized by the player)
    pub move_dir: Vec2,
    /// Aim direction; zero keeps the previous aim
    pub aim: Vec2,
    pub fire: bool,
    pub sprint: bool,
    pub dash: bool,
    pub reload: bool,
    pub throw_grenade: bool,
    /// Cycle weapons by this many slots
    pub switch_weapon: i32,
    /// Equip a slot directly
    pub select_weapon: Option<usize>,
    /// Start / restart a run
    pub start: bool,
    /// Demo mode - autopilot drives the player
    pub idle_mode: bool,
}

/// Advance the game by one frame of `raw_dt` real seconds
pub fn tick(state: &mut GameState, input: &TickInput, raw_dt: f32) {
    let scale = state.juice.update(raw_dt);
    let dt = raw_dt * scale;
    state.time_ticks += 1;

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }

    match state.phase {
        GamePhase::Idle | GamePhase::GameOver => {
            if input.start {
                state.start_run();
            }
        }
        GamePhase::Playing => {
            play(state, &input, dt);
            if state.phase == GamePhase::Playing && state.enemies.is_wave_complete() {
                log::info!("Wave {} complete, score {}", state.wave, state.score.score());
                state.events.push(SimEvent::WaveCleared { wave: state.wave });
                state.juice.slowmo(WAVE_CLEAR_SLOWMO_SCALE, WAVE_CLEAR_SLOWMO_SECS);
                state.pause_timer = WAVE_PAUSE_SECS;
                state.phase = GamePhase::WavePause;
            }
        }
        GamePhase::WavePause => {
            rest(state, &input, dt);
            state.pause_timer -= raw_dt;
            if state.pause_timer <= 0.0 {
                state.pause_timer = 0.0;
                state.player.heal(WAVE_CLEAR_HEAL);
                state.grenades.add_grenades(WAVE_CLEAR_GRENADES);
                let next = state.wave + 1;
                state.begin_wave(next);
            }
        }
    }
}

/// One gameplay step on the scaled delta
fn play(state: &mut GameState, input: &TickInput, dt: f32) {
    let events = &mut state.events;

    state
        .player
        .update(dt, input.move_dir, input.aim, input.sprint, &state.world);
    if input.dash && state.player.try_dash(input.move_dir) {
        events.push(SimEvent::Dash);
    }

    if input.switch_weapon != 0 {
        state.weapons.switch(input.switch_weapon);
    }
    if let Some(slot) = input.select_weapon {
        state.weapons.select(slot);
    }
    if input.reload {
        state.weapons.reload(events);
    }
    if input.fire && state.player.can_fire() {
        state
            .weapons
            .fire(state.player.muzzle(), state.player.aim, &mut state.juice, events);
    }
    if input.throw_grenade && state.player.is_alive() {
        state
            .grenades
            .throw(state.player.muzzle(), state.player.aim, events);
    }

    state
        .weapons
        .update(dt, &mut state.world, &mut state.enemies, events);
    state
        .grenades
        .update(dt, &mut state.enemies, &mut state.juice, events);
    state.enemies.update(
        dt,
        &mut state.player,
        &mut state.score,
        &mut state.juice,
        events,
    );
    state.score.update(dt);
    state
        .missions
        .update(dt, state.player.position(), &mut state.score, events);

    if !state.player.is_alive() {
        game_over(state);
    }
}

/// Between waves the player can only move; popups and combo still wind down
fn rest(state: &mut GameState, input: &TickInput, dt: f32) {
    state
        .player
        .update(dt, input.move_dir, input.aim, input.sprint, &state.world);
    state.score.update(dt);
}

fn game_over(state: &mut GameState) {
    state.enemies.clear_all();
    state.phase = GamePhase::GameOver;
    let score = state.score.score();
    log::info!(
        "Game over on wave {}: score {}, rank {}, {} kills, best combo {}",
        state.wave,
        score,
        state.score.rank().as_str(),
        state.score.kills(),
        state.score.max_combo()
    );
    state.events.push(SimEvent::GameOver { score });
}

/// Demo/idle AI: kite the nearest enemy, shoot it, grenade crowds, and
/// wander to the mission marker when nothing is close
fn autopilot(state: &GameState, input: &mut TickInput) {
    if matches!(state.phase, GamePhase::Idle | GamePhase::GameOver) {
        input.start = true;
        return;
    }

    let me = state.player.pos;
    let nearest = state
        .enemies
        .alive_enemies()
        .map(|e| (e.pos(), e.pos().distance(me)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    match nearest {
        Some((target, dist)) if dist < 25.0 => {
            let away = (me - target).normalize_or_zero();
            input.aim = target - me;
            input.fire = true;
            // Back off when close, otherwise circle
            input.move_dir = if dist < 8.0 {
                away
            } else {
                away.perp()
            };
            input.dash = dist < 2.5;

            let crowd = state
                .enemies
                .alive_enemies()
                .filter(|e| e.pos().distance(target) < 6.0)
                .count();
            input.throw_grenade = crowd >= 5 && dist > 6.0 && dist < 14.0;
        }
        other => {
            if let Some((target, _)) = other {
                input.aim = target - me;
            }
            input.move_dir = state
                .missions
                .active()
                .map(|m| m.pos - me)
                .unwrap_or(-me);
            input.fire = false;
            input.reload = state.weapons.ammo() == Some(0);
        }
    }
}
