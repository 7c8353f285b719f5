//! Data-driven game balance
//!
//! The source material disagrees on several numeric constants across
//! revisions (damage amounts, boss thresholds, delays), so they are
//! configuration rather than contract. `Tuning::default()` gives the
//! canonical values.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Horizontal movement per tick while a direction is held
    pub player_speed: f32,
    pub player_max_health: i32,
    /// Minimum gap between tap-fire shots (ms)
    pub shoot_delay_ms: u64,
    /// Hold duration required for a full charge shot (ms)
    pub charge_max_ms: u64,
    /// How long a power-up level lasts before reverting (ms)
    pub powerup_duration_ms: u64,
    pub player_bullet_speed: f32,
    pub charge_shot_speed: f32,
    /// Hits applied per overlap-tick by a charge shot
    pub charge_shot_damage: i32,

    // === Damage to the player ===
    pub enemy_bullet_damage: i32,
    pub enemy_body_damage: i32,
    pub rock_body_damage: i32,

    // === Items ===
    pub heal_amount: i32,
    /// Chance an enemy death drops a pickup
    pub item_drop_chance: f64,
    pub item_fall_speed: f32,

    // === Spawning / difficulty ===
    pub initial_spawn_interval_ms: u64,
    pub spawn_interval_floor_ms: u64,
    /// Geometric shrink applied to the spawn interval per level
    pub spawn_interval_decay: f64,

    // === Bosses ===
    /// Score that summons the mid-boss
    pub mid_boss_score: u64,
    pub mid_boss_health: i32,
    pub big_boss_health: i32,
    pub boss_score_value: u64,
    /// Delay from mid-boss defeat to end-boss arrival (ms)
    pub end_boss_delay_ms: u64,
    /// Elapsed-time fallback trigger if the mid-boss gate is never reached (ms)
    pub end_boss_fallback_ms: u64,
    /// How far ahead of a boss arrival the warning shows (ms)
    pub boss_warning_lead_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 7.0,
            player_max_health: 100,
            shoot_delay_ms: 250,
            charge_max_ms: 1000,
            powerup_duration_ms: 7000,
            player_bullet_speed: 10.0,
            charge_shot_speed: 12.0,
            charge_shot_damage: 10,
            enemy_bullet_damage: 10,
            enemy_body_damage: 20,
            rock_body_damage: 30,
            heal_amount: 25,
            item_drop_chance: 0.2,
            item_fall_speed: 3.0,
            initial_spawn_interval_ms: 1000,
            spawn_interval_floor_ms: 150,
            spawn_interval_decay: 0.9,
            mid_boss_score: 50,
            mid_boss_health: 30,
            big_boss_health: 100,
            boss_score_value: 50,
            end_boss_delay_ms: 10_000,
            end_boss_fallback_ms: 30_000,
            boss_warning_lead_ms: 2000,
        }
    }
}

impl Tuning {
    /// Spawn interval for a difficulty level: geometric decay with a floor
    pub fn spawn_interval_ms(&self, level: u32) -> u64 {
        let scaled =
            self.initial_spawn_interval_ms as f64 * self.spawn_interval_decay.powi(level as i32);
        (scaled as u64).max(self.spawn_interval_floor_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn spawn_interval_hits_floor() {
        let t = Tuning::default();
        assert_eq!(t.spawn_interval_ms(0), 1000);
        assert_eq!(t.spawn_interval_ms(1), 900);
        assert_eq!(t.spawn_interval_ms(100), 150);
    }

    proptest! {
        // Interval never increases with level and never drops below the floor
        #[test]
        fn spawn_interval_monotone(level in 0u32..200) {
            let t = Tuning::default();
            let cur = t.spawn_interval_ms(level);
            let next = t.spawn_interval_ms(level + 1);
            prop_assert!(next <= cur);
            prop_assert!(next >= t.spawn_interval_floor_ms);
        }
    }
}
