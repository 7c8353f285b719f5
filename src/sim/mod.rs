//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep, one tick per rendered frame
//! - Seeded RNG only
//! - Monotonic clock sampled once per tick, threaded through all timers
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod item;
pub mod player;
pub mod projectile;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use enemy::{BigBoss, Enemy, FirePattern, MidBoss, Rock};
pub use item::{Explosion, ExplosionSize, Item, ItemKind};
pub use player::{ChargeState, Player};
pub use projectile::{Beam, EnemyShot, PlayerShot};
pub use spawner::{BossDirector, EndBossGate, MidBossGate, Spawner};
pub use state::{GamePhase, GameState, Hud, InputSnapshot, RenderItem, RenderLayer};
pub use tick::tick;
