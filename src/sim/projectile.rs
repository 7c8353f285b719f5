//! Projectiles: player fire, enemy shots, the beam

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::player::Player;
use crate::assets::SpriteId;
use crate::dir_from_degrees;

/// Homing shots lead the player at most this many times their fall speed
const AIM_CLAMP_RATIO: f32 = 1.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerShot {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub damage: i32,
    /// Piercing shots survive hits and keep travelling
    pub piercing: bool,
    pub alive: bool,
    pub sprite: SpriteId,
}

impl PlayerShot {
    /// Regular bullet launched from the player's nose. `vx` spreads the
    /// multi-shot patterns; vertical speed is always straight up.
    pub fn bullet(id: u32, muzzle: Vec2, vx: f32, size: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos: muzzle,
            size,
            vel: Vec2::new(vx, -speed),
            damage: 1,
            piercing: false,
            alive: true,
            sprite: SpriteId::PlayerBullet,
        }
    }

    /// Fully charged shot: slow-built, fast, and piercing
    pub fn charge(id: u32, muzzle: Vec2, size: Vec2, speed: f32, damage: i32) -> Self {
        Self {
            id,
            pos: muzzle,
            size,
            vel: Vec2::new(0.0, -speed),
            damage,
            piercing: true,
            alive: true,
            sprite: SpriteId::ChargeShot,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    pub fn offscreen(&self, margin: f32) -> bool {
        self.aabb().outside_playfield(margin)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyShot {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub damage: i32,
    pub alive: bool,
    pub sprite: SpriteId,
}

impl EnemyShot {
    /// Shot aimed at the player's position at launch. Velocity is fixed at
    /// spawn; there is no in-flight tracking. Aiming only happens when the
    /// target is strictly below the muzzle, otherwise the shot drops straight
    /// down, and the lead is clamped so point-blank shots stay dodgeable.
    pub fn aimed(
        id: u32,
        muzzle: Vec2,
        target: Option<Vec2>,
        vy: f32,
        damage: i32,
        size: Vec2,
        sprite: SpriteId,
    ) -> Self {
        let vx = match target {
            Some(t) if t.y > muzzle.y => {
                let raw = (t.x - muzzle.x) / (t.y - muzzle.y) * vy;
                raw.clamp(-AIM_CLAMP_RATIO * vy, AIM_CLAMP_RATIO * vy)
            }
            _ => 0.0,
        };
        Self {
            id,
            pos: muzzle,
            size,
            vel: Vec2::new(vx, vy),
            damage,
            alive: true,
            sprite,
        }
    }

    /// Shot launched along a fixed angle (0 degrees = right, 90 = down)
    pub fn radial(
        id: u32,
        origin: Vec2,
        angle_deg: f32,
        speed: f32,
        damage: i32,
        size: Vec2,
        sprite: SpriteId,
    ) -> Self {
        Self {
            id,
            pos: origin,
            size,
            vel: dir_from_degrees(angle_deg) * speed,
            damage,
            alive: true,
            sprite,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    pub fn offscreen(&self, margin: f32) -> bool {
        self.aabb().outside_playfield(margin)
    }
}

/// Continuous beam anchored above the player. Exists only while the max
/// power-up is active and the fire button is held; it never despawns by
/// travel, it is torn down by the tick loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beam {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Beam {
    pub fn new(player: &Player, size: Vec2) -> Self {
        let mut beam = Self {
            pos: Vec2::ZERO,
            size,
        };
        beam.follow(player);
        beam
    }

    /// Re-anchor to the player: same x, spanning upward from the nose
    pub fn follow(&mut self, player: &Player) {
        self.pos = Vec2::new(player.pos.x, player.top() - self.size.y * 0.5);
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }
}
