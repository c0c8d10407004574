use rand::Rng;
use tracing::debug;

use crate::engine::Status;
use crate::engine::rules::CalibrationRules;

pub const SLIDER_COUNT: usize = 3;

/// Three sliders that must all sit on their targets at the same time.
#[derive(Clone, Debug)]
pub struct Calibration {
    targets: [f64; SLIDER_COUNT],
    current: [f64; SLIDER_COUNT],
    rules: CalibrationRules,
    status: Status,
}

impl Calibration {
    /// Targets are drawn independently from {1.5, 2.5, ..., 8.5}.
    pub fn start<R: Rng + ?Sized>(rules: CalibrationRules, rng: &mut R) -> Self {
        let targets = std::array::from_fn(|_| rng.gen_range(1..9) as f64 + 0.5);
        Self::with_targets(targets, rules)
    }

    pub fn with_targets(targets: [f64; SLIDER_COUNT], rules: CalibrationRules) -> Self {
        Self {
            targets,
            current: [rules.min_value; SLIDER_COUNT],
            rules,
            status: Status::Pending,
        }
    }

    pub fn targets(&self) -> &[f64; SLIDER_COUNT] {
        &self.targets
    }

    pub fn current(&self) -> &[f64; SLIDER_COUNT] {
        &self.current
    }

    pub fn rules(&self) -> &CalibrationRules {
        &self.rules
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_aligned(&self, index: usize) -> bool {
        match (self.current.get(index), self.targets.get(index)) {
            (Some(current), Some(target)) => (current - target).abs() <= self.rules.tolerance,
            _ => false,
        }
    }

    /// Move slider `index` to `value`, clamped to the slider range.
    pub fn set(&mut self, index: usize, value: f64) -> Status {
        if self.status != Status::Pending || index >= SLIDER_COUNT || value.is_nan() {
            return self.status;
        }

        self.current[index] = value.clamp(self.rules.min_value, self.rules.max_value);

        if (0..SLIDER_COUNT).all(|i| self.is_aligned(i)) {
            debug!(current = ?self.current, targets = ?self.targets, "calibration aligned");
            self.status = Status::Succeeded;
        }
        self.status
    }
}
