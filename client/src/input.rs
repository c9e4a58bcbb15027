//! Client input capture with throttled directional intents

use macroquad::prelude::*;
use shared::Direction;

pub const DEFAULT_COOLDOWN_MS: u64 = 200;

/// Maps a key to the directional intent it stands for, if any.
pub fn direction_for_key(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

/// Drops key events that arrive within the cooldown of the last accepted one,
/// and every key that is not a direction.
#[derive(Debug, Clone)]
pub struct InputGate {
    cooldown_ms: u64,
    last_accepted: u64,
}

impl InputGate {
    pub fn new(cooldown_ms: u64, now: u64) -> Self {
        Self {
            cooldown_ms,
            last_accepted: now,
        }
    }

    pub fn on_key(&mut self, key: KeyCode, now: u64) -> Option<Direction> {
        if now.saturating_sub(self.last_accepted) < self.cooldown_ms {
            return None;
        }
        let direction = direction_for_key(key)?;
        self.last_accepted = now;
        Some(direction)
    }

    pub fn last_accepted(&self) -> u64 {
        self.last_accepted
    }
}

/// Session controls sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub connect: bool,
    pub quit: bool,
}

pub fn poll_controls() -> Controls {
    Controls {
        connect: is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter),
        quit: is_key_pressed(KeyCode::Escape),
    }
}

/// Keys currently held. Held keys repeat every frame; the gate throttles them.
pub fn held_keys() -> Vec<KeyCode> {
    get_keys_down().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: u64 = 200;

    #[test]
    fn test_key_mapping() {
        assert_eq!(direction_for_key(KeyCode::Up), Some(Direction::Up));
        assert_eq!(direction_for_key(KeyCode::Down), Some(Direction::Down));
        assert_eq!(direction_for_key(KeyCode::Left), Some(Direction::Left));
        assert_eq!(direction_for_key(KeyCode::Right), Some(Direction::Right));
        assert_eq!(direction_for_key(KeyCode::Escape), None);
        assert_eq!(direction_for_key(KeyCode::W), None);
    }

    #[test]
    fn test_throttle_drops_events_inside_cooldown() {
        let mut gate = InputGate::new(COOLDOWN, 0);
        let t = 1_000;

        assert_eq!(gate.on_key(KeyCode::Right, t), Some(Direction::Right));
        assert_eq!(gate.on_key(KeyCode::Right, t + 1), None);
        assert_eq!(
            gate.on_key(KeyCode::Right, t + COOLDOWN + 1),
            Some(Direction::Right)
        );
        assert_eq!(gate.last_accepted(), t + COOLDOWN + 1);
    }

    #[test]
    fn test_keys_right_after_connect_are_dropped() {
        let mut gate = InputGate::new(COOLDOWN, 500);
        assert_eq!(gate.on_key(KeyCode::Up, 550), None);
        assert_eq!(gate.on_key(KeyCode::Up, 700), Some(Direction::Up));
    }

    #[test]
    fn test_unrecognized_key_is_never_forwarded() {
        let mut gate = InputGate::new(COOLDOWN, 0);
        for now in [0, 1, 1_000, 5_000, 10_000] {
            assert_eq!(gate.on_key(KeyCode::Escape, now), None);
        }
    }

    #[test]
    fn test_rejected_key_does_not_consume_cooldown() {
        let mut gate = InputGate::new(COOLDOWN, 0);
        assert_eq!(gate.on_key(KeyCode::Space, 1_000), None);
        assert_eq!(gate.last_accepted(), 0);
        assert_eq!(gate.on_key(KeyCode::Left, 1_001), Some(Direction::Left));
    }
}
