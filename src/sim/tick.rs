//! Fixed-timestep tick orchestration
//!
//! One call advances the whole simulation by one frame. The wall clock is
//! sampled once by the caller and threaded through every timer, so a tick is
//! a pure function of (state, input, now).

use glam::Vec2;

use super::collision::resolve_collisions;
use super::enemy::{BigBoss, Enemy, MidBoss, Rock, Volley};
use super::projectile::{Beam, EnemyShot, PlayerShot};
use super::spawner::{EndBossGate, MidBossGate};
use super::state::{GamePhase, GameState, InputSnapshot};
use crate::assets::SpriteId;
use crate::consts::OFFSCREEN_MARGIN;

const BIG_BOSS_MUZZLE_OFFSET: f32 = 40.0;
const BIG_BOSS_SHOT_SPEED: f32 = 10.0;
const SPIRAL_COUNT: u32 = 10;
const SPIRAL_STEP_DEG: f32 = 36.0;
const SPIRAL_SPEED: f32 = 5.5;
const SCATTER_COUNT: u32 = 10;
const SCATTER_ARC_DEG: f32 = 100.0;
const SCATTER_SPEED: f32 = 6.0;
const MID_BOSS_WARNING_TICKS: u32 = 180;

/// Advance the simulation by one tick.
///
/// `now_ms` must come from a monotonic source; a sample that runs backwards
/// is clamped to the previous tick's clock so timers never regress.
pub fn tick(state: &mut GameState, input: &InputSnapshot, now_ms: u64) {
    let now_ms = now_ms.max(state.now_ms);
    state.tick_count += 1;
    if state.director.started_ms.is_none() {
        state.director.started_ms = Some(now_ms);
    }

    // After the run ends only explosions keep animating
    if state.phase != GamePhase::Playing {
        for x in &mut state.explosions {
            x.advance(now_ms);
        }
        state.explosions.retain(|x| !x.done);
        state.now_ms = now_ms;
        return;
    }

    if state.player.expire_powerup_if_needed(now_ms) {
        state.beam = None;
    }

    director_tick(state, now_ms);

    let dt_ms = now_ms.saturating_sub(state.now_ms);
    if state.spawner.advance(dt_ms) {
        spawn_wave(state, now_ms);
    }

    apply_player_input(state, input, now_ms);
    advance_entities(state, now_ms);
    resolve_collisions(state, now_ms);
    state.purge();

    state.now_ms = now_ms;
}

/// Boss arrivals. The mid-boss opens on score, the end boss on the clock.
fn director_tick(state: &mut GameState, now_ms: u64) {
    if state.director.end == EndBossGate::Pending && state.mid_boss_due() {
        let id = state.next_entity_id();
        state.mid_boss = Some(MidBoss::spawn(
            id,
            state.extents.mid_boss,
            state.tuning.mid_boss_health,
            state.tuning.boss_score_value,
            now_ms,
        ));
        state.director.mid = MidBossGate::Active;
        state.director.mid_warning_ticks = MID_BOSS_WARNING_TICKS;
        state.spawner.suspend();
        log::info!("mid-boss summoned at {now_ms}ms, score={}", state.score);
    }
    if state.director.mid_warning_ticks > 0 {
        state.director.mid_warning_ticks -= 1;
    }

    if let Some(due_ms) = state.director.end_boss_eligible_at(&state.tuning) {
        if state.director.end == EndBossGate::Pending
            && now_ms >= due_ms.saturating_sub(state.tuning.boss_warning_lead_ms)
        {
            state.director.end = EndBossGate::Warning;
            log::info!("end boss inbound");
        }
        if state.director.end == EndBossGate::Warning && now_ms >= due_ms {
            let id = state.next_entity_id();
            state.big_boss = Some(BigBoss::spawn(
                id,
                state.extents.big_boss,
                state.tuning.big_boss_health,
                state.tuning.boss_score_value,
                now_ms,
            ));
            state.director.end = EndBossGate::Active;
            state.spawner.suspend();
            log::info!("end boss arrived at {now_ms}ms");
        }
    }
}

/// One wave: an enemy and a rock, both randomized
fn spawn_wave(state: &mut GameState, now_ms: u64) {
    let level = state.level;
    let enemy_id = state.next_entity_id();
    let enemy_size = state.extents.enemy;
    let enemy = Enemy::spawn(enemy_id, level, enemy_size, &mut state.rng, now_ms);
    state.enemies.push(enemy);

    let rock_id = state.next_entity_id();
    let rock_size = state.extents.rock;
    let rock = Rock::spawn(rock_id, level, rock_size, &mut state.rng);
    state.rocks.push(rock);
}

fn apply_player_input(state: &mut GameState, input: &InputSnapshot, now_ms: u64) {
    let requests = state.player.apply_input(input, now_ms, &state.tuning);
    let muzzle = Vec2::new(state.player.pos.x, state.player.top());

    for vx in &requests.bullet_vx {
        let id = state.next_entity_id();
        state.player_shots.push(PlayerShot::bullet(
            id,
            muzzle,
            *vx,
            state.extents.player_bullet,
            state.tuning.player_bullet_speed,
        ));
    }
    if requests.charge_shot {
        let id = state.next_entity_id();
        state.player_shots.push(PlayerShot::charge(
            id,
            muzzle,
            state.extents.charge_shot,
            state.tuning.charge_shot_speed,
            state.tuning.charge_shot_damage,
        ));
    }

    if requests.beam_wanted {
        if state.beam.is_none() {
            state.beam = Some(Beam::new(&state.player, state.extents.beam));
        }
    } else {
        state.beam = None;
    }
}

fn advance_entities(state: &mut GameState, now_ms: u64) {
    let target = state.aim_target();

    // Enemy movement and fire. Muzzles are collected first so shot ids come
    // from the state allocator afterwards.
    let mut aimed: Vec<(Vec2, f32)> = Vec::new();
    for enemy in &mut state.enemies {
        enemy.advance();
        if enemy.wants_to_fire(now_ms) {
            let muzzle = Vec2::new(enemy.pos.x, enemy.aabb().bottom());
            let vy = (2.5 * enemy.fall_speed).max(7.0);
            aimed.push((muzzle, vy));
        }
    }
    for (muzzle, vy) in aimed {
        let id = state.next_entity_id();
        let damage = state.tuning.enemy_bullet_damage;
        let size = state.extents.enemy_bullet;
        state
            .enemy_shots
            .push(EnemyShot::aimed(id, muzzle, target, vy, damage, size, SpriteId::EnemyBullet));
    }

    for rock in &mut state.rocks {
        rock.advance();
    }

    // End boss: twin aimed shots from both wing muzzles
    let mut boss_muzzles: Vec<Vec2> = Vec::new();
    if let Some(boss) = state.big_boss.as_mut() {
        boss.advance();
        if boss.wants_to_fire(now_ms) {
            let bottom = boss.aabb().bottom();
            boss_muzzles.push(Vec2::new(boss.pos.x - BIG_BOSS_MUZZLE_OFFSET, bottom));
            boss_muzzles.push(Vec2::new(boss.pos.x + BIG_BOSS_MUZZLE_OFFSET, bottom));
        }
    }
    for muzzle in boss_muzzles {
        let id = state.next_entity_id();
        let damage = state.tuning.enemy_bullet_damage;
        let size = state.extents.enemy_bullet;
        state.enemy_shots.push(EnemyShot::aimed(
            id,
            muzzle,
            target,
            BIG_BOSS_SHOT_SPEED,
            damage,
            size,
            SpriteId::EnemyBullet,
        ));
    }

    // Mid-boss: movement, then at most one volley per tick
    let mut volley: Option<(Volley, Vec2)> = None;
    if let Some(boss) = state.mid_boss.as_mut() {
        boss.advance(now_ms, &mut state.rng);
        if let Some(v) = boss.try_volley(now_ms) {
            volley = Some((v, boss.pos));
        }
    }
    if let Some((volley, origin)) = volley {
        spawn_volley(state, volley, origin);
    }

    for shot in &mut state.player_shots {
        shot.advance();
        if shot.offscreen(OFFSCREEN_MARGIN) {
            shot.alive = false;
        }
    }
    for shot in &mut state.enemy_shots {
        shot.advance();
        if shot.offscreen(OFFSCREEN_MARGIN) {
            shot.alive = false;
        }
    }
    if let Some(beam) = state.beam.as_mut() {
        beam.follow(&state.player);
    }
    for item in &mut state.items {
        item.advance();
    }
    for x in &mut state.explosions {
        x.advance(now_ms);
    }
}

fn spawn_volley(state: &mut GameState, volley: Volley, origin: Vec2) {
    let damage = state.tuning.enemy_bullet_damage;
    let size = state.extents.mid_boss_bullet;
    match volley {
        Volley::Spiral { base_deg } => {
            for i in 0..SPIRAL_COUNT {
                let angle = base_deg + i as f32 * SPIRAL_STEP_DEG;
                let id = state.next_entity_id();
                state.enemy_shots.push(EnemyShot::radial(
                    id,
                    origin,
                    angle,
                    SPIRAL_SPEED,
                    damage,
                    size,
                    SpriteId::MidBossBullet,
                ));
            }
        }
        Volley::Scatter => {
            // Fan centered straight down, launched a little below the hull
            let origin = origin + Vec2::new(0.0, 20.0);
            let start = 90.0 - SCATTER_ARC_DEG / 2.0;
            let step = SCATTER_ARC_DEG / (SCATTER_COUNT - 1) as f32;
            for i in 0..SCATTER_COUNT {
                let angle = start + i as f32 * step;
                let id = state.next_entity_id();
                state.enemy_shots.push(EnemyShot::radial(
                    id,
                    origin,
                    angle,
                    SCATTER_SPEED,
                    damage,
                    size,
                    SpriteId::MidBossBullet,
                ));
            }
        }
    }
}
