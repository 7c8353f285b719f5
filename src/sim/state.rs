//! Game state: the single source of truth for a run
//!
//! Everything the simulation touches lives here, including the RNG, so two
//! states built from the same seed and fed the same inputs stay identical
//! tick for tick. The whole struct serializes for snapshots and replays.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{BigBoss, Enemy, MidBoss, Rock};
use super::item::{Explosion, ExplosionSize, Item, ItemKind};
use super::player::Player;
use super::projectile::{Beam, EnemyShot, PlayerShot};
use super::spawner::{BossDirector, MidBossGate, Spawner};
use crate::assets::{AssetResolver, SpriteExtents, SpriteId};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    GameOver,
    Victory,
}

/// Edge-free input sample for one tick. The sim only sees held/not-held;
/// press and release edges are derived internally where they matter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub charge: bool,
}

/// Draw order, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RenderLayer {
    Items,
    Actors,
    Projectiles,
    Effects,
}

/// One sprite to draw this frame. The sim emits these; a presentation layer
/// maps them to whatever draw calls it owns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RenderItem {
    pub sprite: SpriteId,
    pub pos: Vec2,
    pub size: Vec2,
    pub layer: RenderLayer,
    /// Animation frame, zero for static sprites
    pub frame: u32,
}

/// HUD readout derived from state, recomputed every tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub level: u32,
    pub health_frac: f32,
    pub charge_frac: f32,
    /// Health bar for whichever boss is on screen
    pub boss_health_frac: Option<f32>,
    pub boss_warning: bool,
    pub mid_boss_warning: bool,
    pub level_up: bool,
    pub game_over: bool,
    pub victory: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub extents: SpriteExtents,
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    /// Clock value of the last completed tick
    pub now_ms: u64,
    pub tick_count: u64,
    pub level_up_at_ms: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub rocks: Vec<Rock>,
    pub mid_boss: Option<MidBoss>,
    pub big_boss: Option<BigBoss>,
    pub player_shots: Vec<PlayerShot>,
    pub enemy_shots: Vec<EnemyShot>,
    pub beam: Option<Beam>,
    pub items: Vec<Item>,
    pub explosions: Vec<Explosion>,
    pub spawner: Spawner,
    pub director: BossDirector,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning, assets: &dyn AssetResolver) -> Self {
        let extents = SpriteExtents::capture(assets);
        let player = Player::new(extents.player, &tuning);
        let spawner = Spawner::new(tuning.initial_spawn_interval_ms);
        log::debug!("new game, seed={seed}");
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            extents,
            phase: GamePhase::Playing,
            score: 0,
            level: 0,
            now_ms: 0,
            tick_count: 0,
            level_up_at_ms: 0,
            player,
            enemies: Vec::new(),
            rocks: Vec::new(),
            mid_boss: None,
            big_boss: None,
            player_shots: Vec::new(),
            enemy_shots: Vec::new(),
            beam: None,
            items: Vec::new(),
            explosions: Vec::new(),
            spawner,
            director: BossDirector::default(),
            next_id: 1,
        }
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_explosion(&mut self, pos: Vec2, size: ExplosionSize, now_ms: u64) {
        let id = self.next_entity_id();
        self.explosions.push(Explosion::new(id, pos, size, now_ms));
    }

    /// Book a kill: explosion, score, and the drop roll
    pub(crate) fn on_enemy_killed(&mut self, pos: Vec2, score_value: u64, now_ms: u64) {
        self.spawn_explosion(pos, ExplosionSize::Normal, now_ms);
        self.score += score_value;
        if self.rng.random_bool(self.tuning.item_drop_chance) {
            let kind = if self.rng.random_bool(0.5) {
                ItemKind::Heal
            } else {
                ItemKind::AttackUp
            };
            let id = self.next_entity_id();
            let size = self.extents.item;
            self.items.push(Item::new(id, pos, size, kind, &self.tuning));
        }
    }

    /// Apply damage to the player, ending the run if it was lethal
    pub(crate) fn damage_player(&mut self, amount: i32, now_ms: u64) {
        if self.player.hidden {
            return;
        }
        let pos = self.player.pos;
        if self.player.take_damage(amount) {
            self.game_over(now_ms);
        } else {
            self.spawn_explosion(pos, ExplosionSize::Normal, now_ms);
        }
    }

    pub(crate) fn game_over(&mut self, now_ms: u64) {
        let pos = self.player.pos;
        self.spawn_explosion(pos, ExplosionSize::Large, now_ms);
        self.player.hide();
        self.beam = None;
        self.phase = GamePhase::GameOver;
        log::info!("game over at {now_ms}ms, score={}", self.score);
    }

    /// Drop everything resolved to dead or fallen offscreen this tick
    pub(crate) fn purge(&mut self) {
        self.enemies.retain(|e| e.alive && !e.below_playfield());
        self.rocks.retain(|r| r.alive && !r.below_playfield());
        self.player_shots.retain(|s| s.alive);
        self.enemy_shots.retain(|s| s.alive);
        self.items.retain(|i| i.alive && !i.below_playfield());
        self.explosions.retain(|x| !x.done);
        if self.mid_boss.as_ref().is_some_and(|b| !b.alive) {
            self.mid_boss = None;
        }
        if self.big_boss.as_ref().is_some_and(|b| !b.alive) {
            self.big_boss = None;
        }
    }

    /// Everything to draw this frame, grouped back-to-front by layer
    pub fn render_items(&self) -> Vec<RenderItem> {
        let mut out = Vec::new();
        for item in &self.items {
            out.push(RenderItem {
                sprite: item.sprite(),
                pos: item.pos,
                size: item.size,
                layer: RenderLayer::Items,
                frame: 0,
            });
        }
        for enemy in &self.enemies {
            out.push(RenderItem {
                sprite: SpriteId::Enemy,
                pos: enemy.pos,
                size: enemy.size,
                layer: RenderLayer::Actors,
                frame: 0,
            });
        }
        for rock in &self.rocks {
            out.push(RenderItem {
                sprite: SpriteId::Rock,
                pos: rock.pos,
                size: rock.size,
                layer: RenderLayer::Actors,
                frame: 0,
            });
        }
        if let Some(boss) = &self.mid_boss {
            out.push(RenderItem {
                sprite: SpriteId::MidBoss,
                pos: boss.pos,
                size: boss.size,
                layer: RenderLayer::Actors,
                frame: 0,
            });
        }
        if let Some(boss) = &self.big_boss {
            out.push(RenderItem {
                sprite: SpriteId::BigBoss,
                pos: boss.pos,
                size: boss.size(),
                layer: RenderLayer::Actors,
                frame: 0,
            });
        }
        if !self.player.hidden {
            out.push(RenderItem {
                sprite: SpriteId::Player,
                pos: self.player.pos,
                size: self.player.size,
                layer: RenderLayer::Actors,
                frame: 0,
            });
        }
        if let Some(beam) = &self.beam {
            out.push(RenderItem {
                sprite: SpriteId::Beam,
                pos: beam.pos,
                size: beam.size,
                layer: RenderLayer::Projectiles,
                frame: 0,
            });
        }
        for shot in &self.player_shots {
            out.push(RenderItem {
                sprite: shot.sprite,
                pos: shot.pos,
                size: shot.size,
                layer: RenderLayer::Projectiles,
                frame: 0,
            });
        }
        for shot in &self.enemy_shots {
            out.push(RenderItem {
                sprite: shot.sprite,
                pos: shot.pos,
                size: shot.size,
                layer: RenderLayer::Projectiles,
                frame: 0,
            });
        }
        for x in &self.explosions {
            let size = match x.size {
                ExplosionSize::Normal => self.extents.explosion,
                ExplosionSize::Large => self.extents.explosion_large,
            };
            out.push(RenderItem {
                sprite: x.sprite(),
                pos: x.pos,
                size,
                layer: RenderLayer::Effects,
                frame: x.frame,
            });
        }
        out.sort_by_key(|r| r.layer);
        out
    }

    pub fn hud(&self) -> Hud {
        let boss_health_frac = self
            .mid_boss
            .as_ref()
            .map(|b| b.health as f32 / b.max_health as f32)
            .or_else(|| {
                self.big_boss
                    .as_ref()
                    .map(|b| b.health as f32 / b.max_health as f32)
            });
        Hud {
            score: self.score,
            level: self.level,
            health_frac: self.player.health as f32 / self.player.max_health as f32,
            charge_frac: self.player.charge_frac(self.now_ms, &self.tuning),
            boss_health_frac,
            boss_warning: self.director.end == super::spawner::EndBossGate::Warning,
            mid_boss_warning: self.director.mid_warning_ticks > 0,
            level_up: self.level_up_at_ms > 0
                && self.now_ms.saturating_sub(self.level_up_at_ms) < 1000,
            game_over: self.phase == GamePhase::GameOver,
            victory: self.phase == GamePhase::Victory,
        }
    }

    /// Player position while they can still be targeted
    pub(crate) fn aim_target(&self) -> Option<Vec2> {
        if self.phase == GamePhase::Playing && !self.player.hidden {
            Some(self.player.pos)
        } else {
            None
        }
    }

    /// True while the mid-boss score gate is primed to open
    pub(crate) fn mid_boss_due(&self) -> bool {
        self.director.mid == MidBossGate::Pending && self.score >= self.tuning.mid_boss_score
    }
}
