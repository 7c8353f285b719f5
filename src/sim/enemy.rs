//! Hostile entities: basic enemies, rock hazards, the two bosses

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};

/// Basic enemy: falls straight down, fires aimed shots on its own timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub fall_speed: f32,
    pub health: i32,
    pub score_value: u64,
    pub shoot_interval_ms: u64,
    pub last_shot_ms: u64,
    pub alive: bool,
}

impl Enemy {
    /// Randomized spawn above the playfield. Fall speed scales with the
    /// difficulty level; the fire timer starts with a random jitter so a
    /// wave spawned together does not volley in lockstep.
    pub fn spawn(id: u32, level: u32, size: Vec2, rng: &mut Pcg32, now_ms: u64) -> Self {
        let half = size * 0.5;
        let x = rng.random_range(half.x..PLAYFIELD_WIDTH - half.x);
        let top = rng.random_range(-100.0f32..-40.0);
        let ramp = 0.4 * level as f32;
        let shoot_interval_ms = rng.random_range(2000u64..2500);
        let jitter = rng.random_range(0..shoot_interval_ms);
        Self {
            id,
            pos: Vec2::new(x, top + half.y),
            size,
            fall_speed: rng.random_range(2.0 + ramp..5.0 + ramp),
            health: 1,
            score_value: 1,
            shoot_interval_ms,
            last_shot_ms: now_ms.saturating_sub(jitter),
            alive: true,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }

    pub fn advance(&mut self) {
        debug_assert!(self.alive);
        self.pos.y += self.fall_speed;
    }

    /// Fallen past the bottom edge and due for removal
    pub fn below_playfield(&self) -> bool {
        self.aabb().top() > PLAYFIELD_HEIGHT + 10.0
    }

    /// Consumes the fire timer when it has elapsed
    pub fn wants_to_fire(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_shot_ms) >= self.shoot_interval_ms {
            self.last_shot_ms = now_ms;
            return true;
        }
        false
    }

    /// Apply damage; true when this hit was lethal
    pub fn hit(&mut self, damage: i32) -> bool {
        self.health = (self.health - damage).max(0);
        self.health == 0
    }
}

/// Indestructible falling hazard. Ignores all projectiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rock {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub fall_speed: f32,
    pub alive: bool,
}

impl Rock {
    pub fn spawn(id: u32, level: u32, size: Vec2, rng: &mut Pcg32) -> Self {
        let half = size * 0.5;
        let x = rng.random_range(half.x..PLAYFIELD_WIDTH - half.x);
        let top = rng.random_range(-150.0f32..-100.0);
        let ramp = 0.4 * level as f32;
        Self {
            id,
            pos: Vec2::new(x, top + half.y),
            size,
            fall_speed: rng.random_range(5.0 + ramp..9.0 + ramp),
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
}

/// End boss. Descends to an anchor row, patrols horizontally and fires twin
/// aimed shots. Shrinks by half at each health threshold it crosses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BigBoss {
    pub id: u32,
    pub pos: Vec2,
    pub base_size: Vec2,
    pub scale: f32,
    pub health: i32,
    pub max_health: i32,
    pub score_value: u64,
    /// Horizontal patrol direction, +1 or -1
    pub dir: f32,
    pub shoot_interval_ms: u64,
    pub last_shot_ms: u64,
    /// Last health percentage threshold already latched (100 = none yet)
    pub last_threshold: u8,
    pub alive: bool,
}

impl BigBoss {
    const ANCHOR_TOP: f32 = 100.0;
    const DESCEND_SPEED: f32 = 1.0;
    const PATROL_SPEED: f32 = 3.0;
    /// Each crossing halves the sprite, down to 1/16th scale at the last one
    const SHRINK_THRESHOLDS: [u8; 4] = [80, 60, 40, 20];

    pub fn spawn(id: u32, base_size: Vec2, health: i32, score_value: u64, now_ms: u64) -> Self {
        Self {
            id,
            pos: Vec2::new(PLAYFIELD_WIDTH / 2.0, -100.0 + base_size.y * 0.5),
            base_size,
            scale: 1.0,
            health,
            max_health: health,
            score_value,
            dir: 1.0,
            shoot_interval_ms: 1000,
            last_shot_ms: now_ms,
            last_threshold: 100,
            alive: true,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.base_size * self.scale
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size())
    }

    pub fn advance(&mut self) {
        let half = self.size() * 0.5;
        if self.pos.y - half.y < Self::ANCHOR_TOP {
            self.pos.y += Self::DESCEND_SPEED;
            return;
        }
        self.pos.x += self.dir * Self::PATROL_SPEED;
        if self.pos.x - half.x <= 0.0 || self.pos.x + half.x >= PLAYFIELD_WIDTH {
            self.dir = -self.dir;
            self.pos.x = self.pos.x.clamp(half.x, PLAYFIELD_WIDTH - half.x);
        }
    }

    /// Consumes the fire timer when it has elapsed. Fires during the
    /// descent too, once the initial delay passes.
    pub fn wants_to_fire(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_shot_ms) >= self.shoot_interval_ms {
            self.last_shot_ms = now_ms;
            return true;
        }
        false
    }

    pub fn hit(&mut self, damage: i32) -> bool {
        self.health = (self.health - damage).max(0);
        self.refresh_scale();
        self.health == 0
    }

    /// Latch every threshold the current health percentage has crossed.
    /// A big hit can cross several at once; each halves the scale exactly
    /// once regardless of how health moves afterwards.
    fn refresh_scale(&mut self) {
        let pct = (self.health as f32 / self.max_health as f32 * 100.0) as u8;
        for threshold in Self::SHRINK_THRESHOLDS {
            if self.last_threshold > threshold && pct <= threshold {
                self.scale *= 0.5;
                self.last_threshold = threshold;
            }
        }
    }
}

/// Mid-boss volley shapes, alternated on a fixed tick cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirePattern {
    Spiral,
    Scatter,
}

/// One mid-boss volley, resolved into bullets by the tick loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Volley {
    /// Ten bullets 36 degrees apart, rotated by a creeping base angle
    Spiral { base_deg: f32 },
    /// Ten bullets fanned across 100 degrees centered straight down
    Scatter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MidBossPhase {
    /// Descending into view; holds fire but can already be hit
    Entry,
    Combat,
}

/// Mid-boss. Patrols with a sinusoidal bob, occasionally dashes, and
/// alternates between spiral and scatter volleys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MidBoss {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub score_value: u64,
    pub dir: f32,
    pub phase: MidBossPhase,
    pub pattern: FirePattern,
    /// Ticks spent in the current pattern; alternates every 180
    pub pattern_ticks: u32,
    pub spiral_angle_deg: f32,
    pub shoot_interval_ms: u64,
    pub last_shot_ms: u64,
    /// Remaining ticks of the current dash, zero when cruising
    pub dash_ticks: u32,
    pub alive: bool,
}

impl MidBoss {
    const ENTRY_SPEED: f32 = 2.0;
    const ENTRY_STOP_TOP: f32 = 50.0;
    const PATROL_SPEED: f32 = 3.0;
    const PATROL_MARGIN: f32 = 10.0;
    const DASH_CHANCE: f64 = 0.003;
    const DASH_TICKS: u32 = 60;
    const PATTERN_TICKS: u32 = 180;

    pub fn spawn(id: u32, size: Vec2, health: i32, score_value: u64, now_ms: u64) -> Self {
        Self {
            id,
            pos: Vec2::new(PLAYFIELD_WIDTH / 2.0, -150.0 + size.y * 0.5),
            size,
            health,
            max_health: health,
            score_value,
            dir: 1.0,
            phase: MidBossPhase::Entry,
            pattern: FirePattern::Spiral,
            pattern_ticks: 0,
            spiral_angle_deg: 0.0,
            shoot_interval_ms: 900,
            last_shot_ms: now_ms,
            dash_ticks: 0,
            alive: true,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }

    pub fn advance(&mut self, now_ms: u64, rng: &mut Pcg32) {
        let half = self.size * 0.5;
        match self.phase {
            MidBossPhase::Entry => {
                self.pos.y += Self::ENTRY_SPEED;
                if self.pos.y - half.y >= Self::ENTRY_STOP_TOP {
                    self.phase = MidBossPhase::Combat;
                }
            }
            MidBossPhase::Combat => {
                if self.dash_ticks == 0 && rng.random_bool(Self::DASH_CHANCE) {
                    self.dash_ticks = Self::DASH_TICKS;
                }
                let (speed, bob) = if self.dash_ticks > 0 {
                    self.dash_ticks -= 1;
                    (
                        Self::PATROL_SPEED * 3.0,
                        (now_ms as f32 * 0.01).sin() * 3.0,
                    )
                } else {
                    (Self::PATROL_SPEED, (now_ms as f32 * 0.005).sin() * 1.5)
                };
                self.pos.x += self.dir * speed;
                self.pos.y += bob;
                if self.pos.x - half.x <= Self::PATROL_MARGIN
                    || self.pos.x + half.x >= PLAYFIELD_WIDTH - Self::PATROL_MARGIN
                {
                    self.dir = -self.dir;
                    self.pos.x = self.pos.x.clamp(
                        Self::PATROL_MARGIN + half.x,
                        PLAYFIELD_WIDTH - Self::PATROL_MARGIN - half.x,
                    );
                }
                self.pattern_ticks += 1;
                if self.pattern_ticks >= Self::PATTERN_TICKS {
                    self.pattern_ticks = 0;
                    self.pattern = match self.pattern {
                        FirePattern::Spiral => FirePattern::Scatter,
                        FirePattern::Scatter => FirePattern::Spiral,
                    };
                }
            }
        }
    }

    /// Consume the volley timer when it has elapsed. Entry phase never fires.
    pub fn try_volley(&mut self, now_ms: u64) -> Option<Volley> {
        if self.phase == MidBossPhase::Entry {
            return None;
        }
        if now_ms.saturating_sub(self.last_shot_ms) < self.shoot_interval_ms {
            return None;
        }
        self.last_shot_ms = now_ms;
        match self.pattern {
            FirePattern::Spiral => {
                let base_deg = self.spiral_angle_deg;
                self.spiral_angle_deg += 10.0;
                Some(Volley::Spiral { base_deg })
            }
            FirePattern::Scatter => Some(Volley::Scatter),
        }
    }

    pub fn hit(&mut self, damage: i32) -> bool {
        self.health = (self.health - damage).max(0);
        self.health == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn enemy_spawn_ranges() {
        let mut rng = rng();
        for _ in 0..50 {
            let e = Enemy::spawn(1, 0, Vec2::new(40.0, 40.0), &mut rng, 5000);
            assert!(e.aabb().left() >= 0.0 && e.aabb().right() <= PLAYFIELD_WIDTH);
            assert!(e.aabb().top() >= -100.0 && e.aabb().top() < -40.0);
            assert!(e.fall_speed >= 2.0 && e.fall_speed < 5.0);
            assert!(e.shoot_interval_ms >= 2000 && e.shoot_interval_ms < 2500);
            assert!(e.last_shot_ms <= 5000);
        }
    }

    #[test]
    fn enemy_fall_speed_scales_with_level() {
        let mut rng = rng();
        for _ in 0..50 {
            let e = Enemy::spawn(1, 10, Vec2::new(40.0, 40.0), &mut rng, 0);
            assert!(e.fall_speed >= 6.0 && e.fall_speed < 9.0);
        }
    }

    #[test]
    fn enemy_fire_timer_consumes() {
        let mut rng = rng();
        let mut e = Enemy::spawn(1, 0, Vec2::new(40.0, 40.0), &mut rng, 0);
        e.last_shot_ms = 0;
        e.shoot_interval_ms = 2000;
        assert!(!e.wants_to_fire(1999));
        assert!(e.wants_to_fire(2000));
        // Timer was reset by the successful check
        assert!(!e.wants_to_fire(2016));
        assert!(e.wants_to_fire(4000));
    }

    #[test]
    fn big_boss_descends_then_patrols() {
        let mut b = BigBoss::spawn(1, Vec2::new(120.0, 100.0), 100, 50, 0);
        let start_x = b.pos.x;
        // Still descending, no lateral motion
        b.advance();
        assert_eq!(b.pos.x, start_x);
        while b.aabb().top() < BigBoss::ANCHOR_TOP {
            b.advance();
        }
        let y = b.pos.y;
        b.advance();
        assert_eq!(b.pos.y, y);
        assert_ne!(b.pos.x, start_x);
    }

    #[test]
    fn big_boss_shrinks_once_per_threshold() {
        let mut b = BigBoss::spawn(1, Vec2::new(120.0, 100.0), 100, 50, 0);
        assert!(!b.hit(25)); // 75% -> crosses 80
        assert_eq!(b.scale, 0.5);
        assert!(!b.hit(1)); // 74%, same band, no further shrink
        assert_eq!(b.scale, 0.5);
        assert!(!b.hit(20)); // 54% -> crosses 60
        assert_eq!(b.scale, 0.25);
        assert!(!b.hit(50)); // 4% -> crosses 40 and 20 in one hit
        assert_eq!(b.scale, 0.0625);
        assert!(b.hit(10));
        assert_eq!(b.scale, 0.0625);
    }

    #[test]
    fn big_boss_shrinks_exactly_at_threshold() {
        // Whole-number shot damage lands health right on the breakpoints;
        // each must latch on that hit, not one hit later
        let mut b = BigBoss::spawn(1, Vec2::new(120.0, 100.0), 100, 50, 0);
        assert!(!b.hit(20)); // exactly 80%
        assert_eq!(b.scale, 0.5);
        assert!(!b.hit(20)); // exactly 60%
        assert_eq!(b.scale, 0.25);
        assert!(!b.hit(20)); // exactly 40%
        assert_eq!(b.scale, 0.125);
        assert!(!b.hit(20)); // exactly 20%
        assert_eq!(b.scale, 0.0625);
    }

    #[test]
    fn big_boss_fires_on_its_interval_even_while_descending() {
        let mut b = BigBoss::spawn(1, Vec2::new(120.0, 100.0), 100, 50, 0);
        assert!(b.aabb().top() < BigBoss::ANCHOR_TOP);
        assert!(!b.wants_to_fire(999));
        assert!(b.wants_to_fire(1000));
        assert!(!b.wants_to_fire(1500));
        assert!(b.wants_to_fire(2000));
    }

    #[test]
    fn mid_boss_enters_then_fights() {
        let mut rng = rng();
        let mut b = MidBoss::spawn(1, Vec2::new(120.0, 120.0), 30, 50, 0);
        assert_eq!(b.phase, MidBossPhase::Entry);
        assert!(b.try_volley(10_000).is_none());
        let mut now = 0u64;
        while b.phase == MidBossPhase::Entry {
            b.advance(now, &mut rng);
            now += 16;
        }
        assert!(b.aabb().top() >= MidBoss::ENTRY_STOP_TOP);
        assert!(b.try_volley(now + 1000).is_some());
    }

    #[test]
    fn mid_boss_alternates_patterns() {
        let mut rng = rng();
        let mut b = MidBoss::spawn(1, Vec2::new(120.0, 120.0), 30, 50, 0);
        b.phase = MidBossPhase::Combat;
        assert_eq!(b.pattern, FirePattern::Spiral);
        for i in 0..MidBoss::PATTERN_TICKS {
            b.advance(i as u64 * 16, &mut rng);
        }
        assert_eq!(b.pattern, FirePattern::Scatter);
    }

    #[test]
    fn spiral_base_angle_creeps() {
        let mut b = MidBoss::spawn(1, Vec2::new(120.0, 120.0), 30, 50, 0);
        b.phase = MidBossPhase::Combat;
        let Some(Volley::Spiral { base_deg }) = b.try_volley(1000) else {
            panic!("expected a spiral volley");
        };
        assert_eq!(base_deg, 0.0);
        let Some(Volley::Spiral { base_deg }) = b.try_volley(2000) else {
            panic!("expected a spiral volley");
        };
        assert_eq!(base_deg, 10.0);
    }
}
