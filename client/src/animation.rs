//! Two-frame sprite animation, independent of motion

use shared::{FrameRect, SpriteDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationPhase {
    #[default]
    Idle,
    Alternate,
}

impl AnimationPhase {
    pub fn toggled(self) -> Self {
        match self {
            AnimationPhase::Idle => AnimationPhase::Alternate,
            AnimationPhase::Alternate => AnimationPhase::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnimationState {
    pub phase: AnimationPhase,
    pub last_toggle_time: u64,
}

impl AnimationState {
    /// Flips the phase once more than `animation_period_ms` has passed since the last flip.
    pub fn advance(&mut self, animation_period_ms: u64, now: u64) -> bool {
        if now.saturating_sub(self.last_toggle_time) <= animation_period_ms {
            return false;
        }
        self.phase = self.phase.toggled();
        self.last_toggle_time = now;
        true
    }

    pub fn frame<'a>(&self, sprite: &'a SpriteDescriptor) -> &'a FrameRect {
        match self.phase {
            AnimationPhase::Idle => &sprite.base,
            AnimationPhase::Alternate => &sprite.animation,
        }
    }
}
