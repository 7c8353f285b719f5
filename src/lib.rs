//! Skyfire - a vertically scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `assets`: Sprite identity and bounding-box extents resolution
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod sim;
pub mod tuning;

pub use assets::{AssetResolver, PlaceholderAssets, SpriteId};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions in world units (x grows right, y grows down)
    pub const PLAYFIELD_WIDTH: f32 = 600.0;
    pub const PLAYFIELD_HEIGHT: f32 = 800.0;

    /// Fixed simulation rate (one tick per rendered frame)
    pub const TICK_RATE: u32 = 60;
    /// Milliseconds advanced per tick when driven by a synthetic clock
    pub const TICK_MS: u64 = 1000 / TICK_RATE as u64;

    /// Projectiles despawn once this far outside the playfield
    pub const OFFSCREEN_MARGIN: f32 = 60.0;
}

/// Unit direction vector for an angle in degrees (0° = right, 90° = down)
#[inline]
pub fn dir_from_degrees(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}
