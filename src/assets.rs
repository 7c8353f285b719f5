//! Sprite identity and extents resolution
//!
//! The simulation never touches pixel data. It identifies visuals by
//! `SpriteId` and only needs each sprite's natural extents to derive
//! bounding boxes. A presentation layer maps the same ids to whatever
//! render handles it owns.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Logical sprite identity, stable across asset reloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    Player,
    Enemy,
    Rock,
    BigBoss,
    MidBoss,
    PlayerBullet,
    ChargeShot,
    Beam,
    EnemyBullet,
    MidBossBullet,
    HealItem,
    AttackItem,
    Explosion,
    ExplosionLarge,
}

/// Maps a logical sprite id to its natural extents (width, height).
///
/// Implementations must always return a usable size: a missing asset is
/// resolved to a deterministic placeholder, never an error, so bounding-box
/// math downstream cannot fail.
pub trait AssetResolver {
    fn extents(&self, id: SpriteId) -> Vec2;
}

/// Resolver returning the fixed placeholder extents used when no art is
/// loaded. These match the sizes the sprites are displayed at, so the
/// simulation behaves identically with or without real assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderAssets;

impl AssetResolver for PlaceholderAssets {
    fn extents(&self, id: SpriteId) -> Vec2 {
        match id {
            SpriteId::Player => Vec2::new(40.0, 40.0),
            SpriteId::Enemy => Vec2::new(40.0, 40.0),
            SpriteId::Rock => Vec2::new(100.0, 100.0),
            SpriteId::BigBoss => Vec2::new(120.0, 100.0),
            SpriteId::MidBoss => Vec2::new(120.0, 120.0),
            SpriteId::PlayerBullet => Vec2::new(12.0, 15.0),
            SpriteId::ChargeShot => Vec2::new(60.0, 120.0),
            SpriteId::Beam => Vec2::new(20.0, crate::consts::PLAYFIELD_HEIGHT),
            SpriteId::EnemyBullet => Vec2::new(15.0, 30.0),
            SpriteId::MidBossBullet => Vec2::new(24.0, 24.0),
            SpriteId::HealItem | SpriteId::AttackItem => Vec2::new(30.0, 30.0),
            SpriteId::Explosion => Vec2::new(60.0, 60.0),
            SpriteId::ExplosionLarge => Vec2::new(90.0, 90.0),
        }
    }
}

/// Extents snapshot captured from a resolver at game start.
///
/// Stored on the game state so bounding boxes stay consistent for the whole
/// run even if the presentation layer hot-reloads assets mid-game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteExtents {
    pub player: Vec2,
    pub enemy: Vec2,
    pub rock: Vec2,
    pub big_boss: Vec2,
    pub mid_boss: Vec2,
    pub player_bullet: Vec2,
    pub charge_shot: Vec2,
    pub beam: Vec2,
    pub enemy_bullet: Vec2,
    pub mid_boss_bullet: Vec2,
    pub item: Vec2,
    pub explosion: Vec2,
    pub explosion_large: Vec2,
}

impl SpriteExtents {
    pub fn capture(assets: &dyn AssetResolver) -> Self {
        Self {
            player: assets.extents(SpriteId::Player),
            enemy: assets.extents(SpriteId::Enemy),
            rock: assets.extents(SpriteId::Rock),
            big_boss: assets.extents(SpriteId::BigBoss),
            mid_boss: assets.extents(SpriteId::MidBoss),
            player_bullet: assets.extents(SpriteId::PlayerBullet),
            charge_shot: assets.extents(SpriteId::ChargeShot),
            beam: assets.extents(SpriteId::Beam),
            enemy_bullet: assets.extents(SpriteId::EnemyBullet),
            mid_boss_bullet: assets.extents(SpriteId::MidBossBullet),
            item: assets.extents(SpriteId::HealItem),
            explosion: assets.extents(SpriteId::Explosion),
            explosion_large: assets.extents(SpriteId::ExplosionLarge),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_extents_are_nonzero() {
        let assets = PlaceholderAssets;
        let ids = [
            SpriteId::Player,
            SpriteId::Enemy,
            SpriteId::Rock,
            SpriteId::BigBoss,
            SpriteId::MidBoss,
            SpriteId::PlayerBullet,
            SpriteId::ChargeShot,
            SpriteId::Beam,
            SpriteId::EnemyBullet,
            SpriteId::MidBossBullet,
            SpriteId::HealItem,
            SpriteId::AttackItem,
            SpriteId::Explosion,
            SpriteId::ExplosionLarge,
        ];
        for id in ids {
            let e = assets.extents(id);
            assert!(e.x > 0.0 && e.y > 0.0, "{id:?} has degenerate extents");
        }
    }
}
