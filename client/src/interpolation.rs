//! Motion interpolation between authoritative positions
//!
//! The rendered position walks toward the server's position one unit per axis
//! per step. The step interval is derived from the sprite's animation period,
//! so sprites that animate faster also move faster on screen.

use shared::Position;

/// Animation period divided by this gives the movement step interval.
pub const STEP_DIVISOR: u64 = 40;

pub fn step_interval_ms(animation_period_ms: u64) -> u64 {
    animation_period_ms / STEP_DIVISOR
}

/// Moves `current` exactly one unit toward `target` on every differing axis.
pub fn step_toward(current: Position, target: Position) -> Position {
    Position {
        x: current.x + target.x.cmp(&current.x) as i32,
        y: current.y + target.y.cmp(&current.y) as i32,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionState {
    /// Where the player last came to rest.
    pub last_position: Position,
    pub current: Position,
    pub moving: bool,
    pub last_step_time: Option<u64>,
}

impl MotionState {
    pub fn at_rest(position: Position) -> Self {
        Self {
            last_position: position,
            current: position,
            moving: false,
            last_step_time: None,
        }
    }

    /// Advances the walk toward `target`. Returns true if a step was taken.
    pub fn advance(&mut self, target: Position, animation_period_ms: u64, now: u64) -> bool {
        if self.current == target {
            self.moving = false;
            return false;
        }

        let last_step = *self.last_step_time.get_or_insert(now);
        self.moving = true;

        if now.saturating_sub(last_step) < step_interval_ms(animation_period_ms) {
            return false;
        }

        self.current = step_toward(self.current, target);
        self.last_step_time = Some(now);

        if self.current == target {
            self.moving = false;
            self.last_position = target;
        }
        true
    }
}
