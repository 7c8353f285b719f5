//! Wave spawning cadence and boss scheduling

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Countdown driving the regular enemy/rock waves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    pub interval_ms: u64,
    pub countdown_ms: u64,
    /// Set while a boss owns the screen; no waves spawn
    pub suspended: bool,
}

impl Spawner {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            countdown_ms: interval_ms,
            suspended: false,
        }
    }

    /// Burn down the countdown. Returns true on ticks where a wave is due.
    /// The overshoot past zero carries into the next countdown so the wave
    /// period does not drift with the tick size.
    pub fn advance(&mut self, dt_ms: u64) -> bool {
        if self.suspended {
            return false;
        }
        if self.countdown_ms > dt_ms {
            self.countdown_ms -= dt_ms;
            return false;
        }
        let overshoot = dt_ms - self.countdown_ms;
        self.countdown_ms = self.interval_ms.saturating_sub(overshoot).max(1);
        true
    }

    /// Tighten the cadence after a level-up. An already shorter countdown
    /// is left alone so the ramp never pushes a due wave further out.
    pub fn reschedule(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
        self.countdown_ms = self.countdown_ms.min(interval_ms);
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self, interval_ms: u64) {
        self.suspended = false;
        self.interval_ms = interval_ms;
        self.countdown_ms = interval_ms;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MidBossGate {
    /// Score threshold not reached yet
    Pending,
    Active,
    Defeated { at_ms: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndBossGate {
    Pending,
    /// Arrival announced, boss not yet spawned
    Warning,
    Active,
    Defeated,
}

/// Tracks boss progression across the run. The mid-boss arrives on score,
/// the end boss a fixed delay after the mid-boss falls, with an elapsed-time
/// fallback so a run that never reaches the score still ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossDirector {
    pub mid: MidBossGate,
    pub end: EndBossGate,
    /// Remaining ticks of the mid-boss arrival banner
    pub mid_warning_ticks: u32,
    /// Clock value of the first tick, anchor for the fallback trigger
    pub started_ms: Option<u64>,
}

impl Default for BossDirector {
    fn default() -> Self {
        Self {
            mid: MidBossGate::Pending,
            end: EndBossGate::Pending,
            mid_warning_ticks: 0,
            started_ms: None,
        }
    }
}

impl BossDirector {
    /// True while a boss fight is in progress; waves and the difficulty
    /// ramp both pause
    pub fn boss_active(&self) -> bool {
        self.mid == MidBossGate::Active || self.end == EndBossGate::Active
    }

    pub fn on_mid_boss_defeated(&mut self, now_ms: u64) {
        self.mid = MidBossGate::Defeated { at_ms: now_ms };
    }

    /// When the end boss becomes due, if it is still ahead of us
    pub fn end_boss_eligible_at(&self, tuning: &Tuning) -> Option<u64> {
        if !matches!(self.end, EndBossGate::Pending | EndBossGate::Warning) {
            return None;
        }
        match self.mid {
            MidBossGate::Defeated { at_ms } => Some(at_ms + tuning.end_boss_delay_ms),
            MidBossGate::Pending => self
                .started_ms
                .map(|start| start + tuning.end_boss_fallback_ms),
            MidBossGate::Active => None,
        }
    }
}
