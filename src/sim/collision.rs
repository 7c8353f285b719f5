//! Collision detection and ordered resolution
//!
//! The only collision primitive is the axis-aligned bounding box. Resolution
//! runs once per tick as a fixed sequence of passes; pass order matters for
//! score and explosion correctness, pairs within a pass are unordered.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState};
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};

/// Axis-aligned bounding box, stored as center + half extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() <= self.half.x + other.half.x
            && (self.center.y - other.center.y).abs() <= self.half.y + other.half.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.half.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half.y
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    /// True once the box has cleared the playfield by `margin` on any side
    pub fn outside_playfield(&self, margin: f32) -> bool {
        self.top() > PLAYFIELD_HEIGHT + margin
            || self.bottom() < -margin
            || self.left() > PLAYFIELD_WIDTH + margin
            || self.right() < -margin
    }
}

/// Run every resolution pass for this tick.
///
/// Damage, death, score, item drops and the difficulty ramp all happen here.
/// Kills are idempotent: an entity driven to zero health is resolved to dead
/// exactly once no matter how many projectiles overlap it this tick.
pub(crate) fn resolve_collisions(state: &mut GameState, now_ms: u64) {
    if state.phase != GamePhase::Playing {
        return;
    }

    let mut destroyed = 0u32;

    // Pass 1: player fire vs basic enemies
    for si in 0..state.player_shots.len() {
        if !state.player_shots[si].alive {
            continue;
        }
        let shot_box = state.player_shots[si].aabb();
        let piercing = state.player_shots[si].piercing;
        let damage = state.player_shots[si].damage;
        for ei in 0..state.enemies.len() {
            if !state.enemies[ei].alive {
                continue;
            }
            if !shot_box.intersects(&state.enemies[ei].aabb()) {
                continue;
            }
            if !piercing {
                state.player_shots[si].alive = false;
            }
            if state.enemies[ei].hit(damage) {
                state.enemies[ei].alive = false;
                let pos = state.enemies[ei].pos;
                let value = state.enemies[ei].score_value;
                state.on_enemy_killed(pos, value, now_ms);
                destroyed += 1;
            }
            if !piercing {
                break;
            }
        }
    }

    // The beam persists through everything it touches: one hit per enemy per tick
    if let Some(beam) = &state.beam {
        let beam_box = beam.aabb();
        for ei in 0..state.enemies.len() {
            if !state.enemies[ei].alive || !beam_box.intersects(&state.enemies[ei].aabb()) {
                continue;
            }
            if state.enemies[ei].hit(1) {
                state.enemies[ei].alive = false;
                let pos = state.enemies[ei].pos;
                let value = state.enemies[ei].score_value;
                state.on_enemy_killed(pos, value, now_ms);
                destroyed += 1;
            }
        }
    }

    // Pass 2: player fire vs mid-boss, then vs end boss
    resolve_mid_boss_hits(state, now_ms);
    resolve_big_boss_hits(state, now_ms, &mut destroyed);

    // Passes 3-7 act on the player; skip them once the run has ended
    if state.phase == GamePhase::Playing && !state.player.hidden {
        resolve_player_contacts(state, now_ms);
    }

    // Difficulty ramp: recompute only on ticks that destroyed something,
    // and never while a boss owns the screen
    if destroyed > 0 && !state.director.boss_active() {
        let level = (state.score / 10) as u32;
        if level > state.level {
            state.level = level;
            state.level_up_at_ms = now_ms;
            let interval = state.tuning.spawn_interval_ms(level);
            state.spawner.reschedule(interval);
            log::info!("level up: level={level} spawn_interval={interval}ms");
        }
    }
}

fn resolve_mid_boss_hits(state: &mut GameState, now_ms: u64) {
    let Some(boss) = state.mid_boss.as_mut() else {
        return;
    };
    if !boss.alive {
        return;
    }
    let boss_box = boss.aabb();
    let mut dead = false;
    for shot in &mut state.player_shots {
        if dead || !shot.alive || !shot.aabb().intersects(&boss_box) {
            continue;
        }
        if !shot.piercing {
            shot.alive = false;
        }
        dead = boss.hit(shot.damage);
    }
    if dead {
        boss.alive = false;
        let pos = boss.pos;
        let value = boss.score_value;
        state.score += value;
        state.spawn_explosion(pos, super::item::ExplosionSize::Large, now_ms);
        state.director.on_mid_boss_defeated(now_ms);
        let interval = state.tuning.spawn_interval_ms(state.level);
        state.spawner.resume(interval);
        log::info!("mid-boss defeated at {now_ms}ms, score={}", state.score);
    }
}

fn resolve_big_boss_hits(state: &mut GameState, now_ms: u64, destroyed: &mut u32) {
    let Some(boss) = state.big_boss.as_mut() else {
        return;
    };
    if !boss.alive {
        return;
    }
    let mut dead = false;
    for shot in &mut state.player_shots {
        if dead || !shot.alive {
            continue;
        }
        // Re-read the box each hit: the boss shrinks as thresholds latch
        if !shot.aabb().intersects(&boss.aabb()) {
            continue;
        }
        if !shot.piercing {
            shot.alive = false;
        }
        dead = boss.hit(shot.damage);
    }
    if !dead {
        if let Some(beam) = &state.beam {
            if beam.aabb().intersects(&boss.aabb()) {
                dead = boss.hit(1);
            }
        }
    }
    if dead {
        boss.alive = false;
        let pos = boss.pos;
        let value = boss.score_value;
        state.score += value;
        *destroyed += 1;
        state.spawn_explosion(pos, super::item::ExplosionSize::Large, now_ms);
        state.director.end = super::spawner::EndBossGate::Defeated;
        state.phase = GamePhase::Victory;
        log::info!("end boss defeated at {now_ms}ms, final score={}", state.score);
    }
}

fn resolve_player_contacts(state: &mut GameState, now_ms: u64) {
    let player_box = state.player.aabb();

    // Pass 3: body contact with basic enemies. Every touching enemy is
    // destroyed but the damage applies once per tick, not per body.
    let mut enemy_contact = false;
    for enemy in &mut state.enemies {
        if enemy.alive && player_box.intersects(&enemy.aabb()) {
            enemy.alive = false;
            enemy_contact = true;
        }
    }
    if enemy_contact {
        let damage = state.tuning.enemy_body_damage;
        state.damage_player(damage, now_ms);
        if state.phase != GamePhase::Playing {
            return;
        }
    }

    // Pass 4: enemy bullets; simultaneous hits stack within the tick
    let mut bullet_damage = 0i32;
    for shot in &mut state.enemy_shots {
        if shot.alive && player_box.intersects(&shot.aabb()) {
            shot.alive = false;
            bullet_damage += shot.damage;
        }
    }
    if bullet_damage > 0 && state.phase == GamePhase::Playing {
        state.damage_player(bullet_damage, now_ms);
    }

    // Pass 5: rock hazards, always removed on contact; damage once per tick
    let mut rock_contact = false;
    for rock in &mut state.rocks {
        if rock.alive && player_box.intersects(&rock.aabb()) {
            rock.alive = false;
            rock_contact = true;
        }
    }
    if rock_contact {
        let damage = state.tuning.rock_body_damage;
        state.damage_player(damage, now_ms);
        if state.phase != GamePhase::Playing {
            return;
        }
    }

    // Pass 6: item pickups
    for ii in 0..state.items.len() {
        if !state.items[ii].alive || !player_box.intersects(&state.items[ii].aabb()) {
            continue;
        }
        state.items[ii].alive = false;
        let item = state.items[ii].clone();
        item.apply_effect(&mut state.player, &state.tuning, now_ms);
    }

    // Pass 7: boss body contact ends the run outright
    if state.phase == GamePhase::Playing {
        let boss_contact = state
            .mid_boss
            .as_ref()
            .is_some_and(|b| b.alive && player_box.intersects(&b.aabb()))
            || state
                .big_boss
                .as_ref()
                .is_some_and(|b| b.alive && player_box.intersects(&b.aabb()));
        if boss_contact {
            state.game_over(now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::PlaceholderAssets;
    use crate::sim::enemy::Enemy;
    use crate::sim::projectile::PlayerShot;
    use crate::tuning::Tuning;

    #[test]
    fn simultaneous_lethal_hits_resolve_to_one_kill() {
        let mut s = GameState::new(5, Tuning::default(), &PlaceholderAssets);
        let id = s.next_entity_id();
        let size = s.extents.enemy;
        let mut enemy = Enemy::spawn(id, 0, size, &mut s.rng, 0);
        enemy.pos = Vec2::new(300.0, 400.0);
        s.enemies.push(enemy);
        // Three bullets overlap the same health-1 enemy this tick
        for _ in 0..3 {
            let id = s.next_entity_id();
            let size = s.extents.player_bullet;
            s.player_shots
                .push(PlayerShot::bullet(id, Vec2::new(300.0, 400.0), 0.0, size, 10.0));
        }
        resolve_collisions(&mut s, 16);
        assert!(!s.enemies[0].alive);
        assert_eq!(s.score, 1);
        assert_eq!(s.explosions.len(), 1);
        // Only the killing bullet was consumed
        assert_eq!(s.player_shots.iter().filter(|b| b.alive).count(), 2);
    }

    #[test]
    fn aabb_overlap_and_separation() {
        let a = Aabb::from_center_size(Vec2::new(100.0, 100.0), Vec2::new(40.0, 40.0));
        let b = Aabb::from_center_size(Vec2::new(130.0, 100.0), Vec2::new(40.0, 40.0));
        let c = Aabb::from_center_size(Vec2::new(200.0, 100.0), Vec2::new(40.0, 40.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn aabb_edge_touch_counts_as_hit() {
        let a = Aabb::from_center_size(Vec2::new(0.0, 0.0), Vec2::new(40.0, 40.0));
        let b = Aabb::from_center_size(Vec2::new(40.0, 0.0), Vec2::new(40.0, 40.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn offscreen_margin() {
        let above = Aabb::from_center_size(Vec2::new(300.0, -100.0), Vec2::new(12.0, 15.0));
        assert!(above.outside_playfield(60.0));
        assert!(!above.outside_playfield(200.0));
        let inside = Aabb::from_center_size(Vec2::new(300.0, 400.0), Vec2::new(12.0, 15.0));
        assert!(!inside.outside_playfield(60.0));
    }
}
