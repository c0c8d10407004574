use serde::{Deserialize, Serialize};

use crate::clock::Millis;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationRules {
    pub tolerance: f64,
    pub min_value: f64,
    pub max_value: f64,
    pub step: f64,
}

impl Default for CalibrationRules {
    fn default() -> Self {
        Self {
            tolerance: 0.1,
            min_value: 0.0,
            max_value: 10.0,
            step: 0.05,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryRules {
    pub length: usize,
    /// How long each symbol stays on screen during the reveal.
    pub symbol_ms: Millis,
}

impl Default for MemoryRules {
    fn default() -> Self {
        Self {
            length: 4,
            symbol_ms: 1000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhythmRules {
    pub taps: u32,
    pub interval_ms: Millis,
    /// Allowed deviation either side of `interval_ms`.
    pub window_ms: Millis,
    /// Extra time past `interval_ms` before the attempt times out.
    pub grace_ms: Millis,
}

impl RhythmRules {
    pub fn earliest(&self) -> Millis {
        self.interval_ms.saturating_sub(self.window_ms)
    }

    pub fn latest(&self) -> Millis {
        self.interval_ms + self.window_ms
    }

    pub fn timeout(&self) -> Millis {
        self.interval_ms + self.grace_ms
    }
}

impl Default for RhythmRules {
    fn default() -> Self {
        Self {
            taps: 5,
            interval_ms: 1500,
            window_ms: 300,
            grace_ms: 500,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitRules {
    pub engage_radius: f64,
    pub disengage_radius: f64,
    pub sustain_ms: Millis,
    pub arena_width: f64,
    pub arena_height: f64,
    pub amplitude_x: f64,
    pub amplitude_y: f64,
    /// Angular speed of the horizontal sweep, radians per millisecond.
    pub speed_x: f64,
    /// Angular speed of the vertical sweep, radians per millisecond.
    pub speed_y: f64,
}

impl Default for PursuitRules {
    fn default() -> Self {
        Self {
            engage_radius: 30.0,
            disengage_radius: 35.0,
            sustain_ms: 3000,
            arena_width: 400.0,
            arena_height: 200.0,
            amplitude_x: 150.0,
            amplitude_y: 60.0,
            speed_x: 0.003,
            speed_y: 0.005,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmationRules {
    pub hold_ms: Millis,
}

impl Default for ConfirmationRules {
    fn default() -> Self {
        Self { hold_ms: 5000 }
    }
}

/// Every timing window and tolerance the session enforces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub calibration: CalibrationRules,
    pub memory: MemoryRules,
    pub rhythm: RhythmRules,
    pub pursuit: PursuitRules,
    pub confirmation: ConfirmationRules,
}

impl Rules {
    /// Replace values that would make a challenge unwinnable with defaults.
    pub fn normalize(&mut self) {
        let calibration = CalibrationRules::default();
        if self.calibration.max_value <= self.calibration.min_value
            || self.calibration.tolerance <= 0.0
            || self.calibration.step <= 0.0
        {
            self.calibration = calibration;
        }

        if self.memory.length == 0 || self.memory.symbol_ms == 0 {
            self.memory = MemoryRules::default();
        }

        if self.rhythm.taps == 0 || self.rhythm.window_ms >= self.rhythm.interval_ms {
            self.rhythm = RhythmRules::default();
        }

        let p = &self.pursuit;
        if p.engage_radius <= 0.0
            || p.disengage_radius < p.engage_radius
            || p.arena_width <= 0.0
            || p.arena_height <= 0.0
        {
            self.pursuit = PursuitRules::default();
        }
    }
}
