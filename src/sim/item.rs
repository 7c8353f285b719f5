//! Pickups dropped by destroyed enemies, and explosion effects

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::player::Player;
use crate::assets::SpriteId;
use crate::consts::PLAYFIELD_HEIGHT;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Heal,
    AttackUp,
}

/// Falling pickup. Applies its effect on player contact, otherwise drifts
/// off the bottom and is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub fall_speed: f32,
    pub kind: ItemKind,
    pub alive: bool,
}

impl Item {
    pub fn new(id: u32, pos: Vec2, size: Vec2, kind: ItemKind, tuning: &Tuning) -> Self {
        Self {
            id,
            pos,
            size,
            fall_speed: tuning.item_fall_speed,
            kind,
            alive: true,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }

    pub fn advance(&mut self) {
        self.pos.y += self.fall_speed;
    }

    pub fn below_playfield(&self) -> bool {
        self.aabb().top() > PLAYFIELD_HEIGHT + 10.0
    }

    pub fn sprite(&self) -> SpriteId {
        match self.kind {
            ItemKind::Heal => SpriteId::HealItem,
            ItemKind::AttackUp => SpriteId::AttackItem,
        }
    }

    pub fn apply_effect(&self, player: &mut Player, tuning: &Tuning, now_ms: u64) {
        match self.kind {
            ItemKind::Heal => player.heal(tuning.heal_amount),
            ItemKind::AttackUp => player.power_up(now_ms, tuning),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionSize {
    Normal,
    Large,
}

/// Frame-stepped explosion effect. Purely visual: it has no bounding box and
/// keeps animating even after the run ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub id: u32,
    pub pos: Vec2,
    pub size: ExplosionSize,
    pub frame: u32,
    pub frame_ms: u64,
    pub last_frame_ms: u64,
    pub done: bool,
}

impl Explosion {
    const FRAME_COUNT: u32 = 8;

    pub fn new(id: u32, pos: Vec2, size: ExplosionSize, now_ms: u64) -> Self {
        let frame_ms = match size {
            ExplosionSize::Normal => 70,
            ExplosionSize::Large => 100,
        };
        Self {
            id,
            pos,
            size,
            frame: 0,
            frame_ms,
            last_frame_ms: now_ms,
            done: false,
        }
    }

    pub fn advance(&mut self, now_ms: u64) {
        if self.done {
            return;
        }
        if now_ms.saturating_sub(self.last_frame_ms) >= self.frame_ms {
            self.last_frame_ms = now_ms;
            self.frame += 1;
            if self.frame >= Self::FRAME_COUNT {
                self.done = true;
            }
        }
    }

    pub fn sprite(&self) -> SpriteId {
        match self.size {
            ExplosionSize::Normal => SpriteId::Explosion,
            ExplosionSize::Large => SpriteId::ExplosionLarge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetResolver, PlaceholderAssets};

    #[test]
    fn heal_item_clamps_at_max_health() {
        let tuning = Tuning::default();
        let mut player = Player::new(
            PlaceholderAssets.extents(SpriteId::Player),
            &tuning,
        );
        player.take_damage(10);
        let item = Item::new(1, Vec2::ZERO, Vec2::new(30.0, 30.0), ItemKind::Heal, &tuning);
        item.apply_effect(&mut player, &tuning, 0);
        assert_eq!(player.health, 100);
    }

    #[test]
    fn attack_item_raises_level_and_resets_expiry() {
        let tuning = Tuning::default();
        let mut player = Player::new(
            PlaceholderAssets.extents(SpriteId::Player),
            &tuning,
        );
        let item = Item::new(
            1,
            Vec2::ZERO,
            Vec2::new(30.0, 30.0),
            ItemKind::AttackUp,
            &tuning,
        );
        item.apply_effect(&mut player, &tuning, 1000);
        assert_eq!(player.powerup_level, 1);
        assert_eq!(player.powerup_expires_ms, 8000);
        // Picking up another at max level keeps the cap but extends the window
        item.apply_effect(&mut player, &tuning, 2000);
        item.apply_effect(&mut player, &tuning, 3000);
        assert_eq!(player.powerup_level, 2);
        assert_eq!(player.powerup_expires_ms, 10_000);
    }

    #[test]
    fn explosion_steps_frames_on_its_own_clock() {
        let mut x = Explosion::new(1, Vec2::ZERO, ExplosionSize::Normal, 1000);
        x.advance(1050);
        assert_eq!(x.frame, 0);
        x.advance(1070);
        assert_eq!(x.frame, 1);
        let mut now = 1070;
        while !x.done {
            now += 70;
            x.advance(now);
        }
        assert_eq!(x.frame, 8);
        // 8 frames at 70ms each
        assert_eq!(now - 1000, 560);
    }

    #[test]
    fn large_explosion_runs_slower() {
        let mut x = Explosion::new(1, Vec2::ZERO, ExplosionSize::Large, 0);
        x.advance(99);
        assert_eq!(x.frame, 0);
        x.advance(100);
        assert_eq!(x.frame, 1);
        assert_eq!(x.sprite(), SpriteId::ExplosionLarge);
    }
}
