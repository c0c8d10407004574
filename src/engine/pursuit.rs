use tracing::debug;

use crate::clock::{Millis, elapsed, progress};
use crate::engine::Status;
use crate::engine::rules::PursuitRules;

/// A position in arena units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerAction {
    Down,
    Up,
    Move,
}

/// Where the moving target sits at `now`.
pub fn target_at(rules: &PursuitRules, now: Millis) -> Point {
    let t = now as f64;
    Point::new(
        rules.arena_width / 2.0 + (t * rules.speed_x).sin() * rules.amplitude_x,
        rules.arena_height / 2.0 + (t * rules.speed_y).cos() * rules.amplitude_y,
    )
}

/// Keep the pointer on a moving target for an unbroken stretch of time.
#[derive(Clone, Debug)]
pub struct PursuitTracking {
    rules: PursuitRules,
    pointer: Option<Point>,
    held: bool,
    engaged_at: Option<Millis>,
    status: Status,
}

impl PursuitTracking {
    pub fn start(rules: PursuitRules) -> Self {
        Self {
            rules,
            pointer: None,
            held: false,
            engaged_at: None,
            status: Status::Pending,
        }
    }

    pub fn rules(&self) -> &PursuitRules {
        &self.rules
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn target(&self, now: Millis) -> Point {
        target_at(&self.rules, now)
    }

    pub fn pointer_position(&self) -> Option<Point> {
        self.pointer
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged_at.is_some()
    }

    pub fn engaged_at(&self) -> Option<Millis> {
        self.engaged_at
    }

    /// Fraction of the sustain window completed; zero while not engaged.
    pub fn progress(&self, now: Millis) -> f64 {
        match self.engaged_at {
            Some(start) => progress(start, now, self.rules.sustain_ms),
            None => 0.0,
        }
    }

    pub fn pointer(&mut self, action: PointerAction, pos: Point, now: Millis) -> Status {
        if self.status != Status::Pending {
            return self.status;
        }

        self.pointer = Some(pos);
        match action {
            PointerAction::Down => self.held = true,
            PointerAction::Up => {
                self.held = false;
                if self.engaged_at.take().is_some() {
                    debug!("pursuit released");
                }
            }
            PointerAction::Move => {}
        }

        if self.held
            && self.engaged_at.is_none()
            && pos.distance(self.target(now)) < self.rules.engage_radius
        {
            debug!(now, "pursuit engaged");
            self.engaged_at = Some(now);
        }
        self.status
    }

    pub fn tick(&mut self, now: Millis) -> Status {
        if self.status != Status::Pending {
            return self.status;
        }

        let Some(start) = self.engaged_at else {
            return self.status;
        };

        let drifted = self
            .pointer
            .is_none_or(|p| p.distance(self.target(now)) > self.rules.disengage_radius);
        if drifted {
            debug!(held_for = elapsed(start, now), "pursuit lost target");
            self.engaged_at = None;
        } else if elapsed(start, now) >= self.rules.sustain_ms {
            self.status = Status::Succeeded;
        }
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: Millis = 20_000;

    fn pursuit() -> PursuitTracking {
        PursuitTracking::start(PursuitRules::default())
    }

    /// Follow the target exactly from `from` to `to` in 20ms frames.
    fn follow(p: &mut PursuitTracking, from: Millis, to: Millis) -> Status {
        let mut now = from;
        let mut status = Status::Pending;
        while now <= to {
            let pos = p.target(now);
            p.pointer(PointerAction::Move, pos, now);
            status = p.tick(now);
            now += 20;
        }
        status
    }

    #[test]
    fn test_target_path_is_deterministic() {
        let rules = PursuitRules::default();
        assert_eq!(target_at(&rules, 1234), target_at(&rules, 1234));
        let origin = target_at(&rules, 0);
        assert_eq!(origin, Point::new(200.0, 160.0));
    }

    #[test]
    fn test_press_far_from_target_does_not_engage() {
        let mut p = pursuit();
        let far = Point::new(p.target(T0).x + 100.0, p.target(T0).y);
        p.pointer(PointerAction::Down, far, T0);
        assert!(!p.is_engaged());
    }

    #[test]
    fn test_move_without_press_does_not_engage() {
        let mut p = pursuit();
        p.pointer(PointerAction::Move, p.target(T0), T0);
        assert!(!p.is_engaged());
    }

    #[test]
    fn test_sustained_tracking_succeeds() {
        let mut p = pursuit();
        p.pointer(PointerAction::Down, p.target(T0), T0);
        assert!(p.is_engaged());
        assert_eq!(follow(&mut p, T0, T0 + 2980), Status::Pending);
        let pos = p.target(T0 + 3000);
        p.pointer(PointerAction::Move, pos, T0 + 3000);
        assert_eq!(p.tick(T0 + 3000), Status::Succeeded);
    }

    #[test]
    fn test_drift_disengages_and_restarts_window() {
        let mut p = pursuit();
        p.pointer(PointerAction::Down, p.target(T0), T0);
        follow(&mut p, T0, T0 + 1980);

        let off = Point::new(p.target(T0 + 2000).x + 50.0, p.target(T0 + 2000).y);
        p.pointer(PointerAction::Move, off, T0 + 2000);
        assert_eq!(p.tick(T0 + 2000), Status::Pending);
        assert!(!p.is_engaged());
        assert_eq!(p.progress(T0 + 2000), 0.0);

        // button still held: coming back onto the target re-engages
        p.pointer(PointerAction::Move, p.target(T0 + 2100), T0 + 2100);
        assert_eq!(p.engaged_at(), Some(T0 + 2100));

        assert_eq!(follow(&mut p, T0 + 2100, T0 + 5080), Status::Pending);
        let pos = p.target(T0 + 5100);
        p.pointer(PointerAction::Move, pos, T0 + 5100);
        assert_eq!(p.tick(T0 + 5100), Status::Succeeded);
    }

    #[test]
    fn test_release_disengages() {
        let mut p = pursuit();
        p.pointer(PointerAction::Down, p.target(T0), T0);
        follow(&mut p, T0, T0 + 1000);
        p.pointer(PointerAction::Up, p.target(T0 + 1020), T0 + 1020);
        assert!(!p.is_engaged());
        p.pointer(PointerAction::Move, p.target(T0 + 1040), T0 + 1040);
        assert!(!p.is_engaged());
    }

    #[test]
    fn test_between_radii_stays_engaged() {
        let mut p = pursuit();
        p.pointer(PointerAction::Down, p.target(T0), T0);
        let near = Point::new(p.target(T0 + 20).x + 33.0, p.target(T0 + 20).y);
        p.pointer(PointerAction::Move, near, T0 + 20);
        p.tick(T0 + 20);
        assert!(p.is_engaged());
    }

    #[test]
    fn test_progress_tracks_engaged_time() {
        let mut p = pursuit();
        p.pointer(PointerAction::Down, p.target(T0), T0);
        assert_eq!(p.progress(T0 + 1500), 0.5);
        assert_eq!(p.progress(T0 + 9000), 1.0);
    }
}
