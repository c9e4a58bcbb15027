use crate::animation::AnimationState;
use crate::interpolation::MotionState;
use shared::{FrameRect, PlayerSnapshot, Position};

/// Client-only bookkeeping for one player. The server never sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRenderState {
    pub motion: MotionState,
    pub animation: AnimationState,
}

impl PlayerRenderState {
    pub fn new(position: Position) -> Self {
        Self {
            motion: MotionState::at_rest(position),
            animation: AnimationState::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerEntry {
    pub snapshot: PlayerSnapshot,
    pub render: PlayerRenderState,
}

impl PlayerEntry {
    pub fn is_moving(&self) -> bool {
        self.render.motion.moving
    }

    pub fn render_position(&self) -> Position {
        self.render.motion.current
    }

    pub fn current_frame(&self) -> &FrameRect {
        self.render.animation.frame(&self.snapshot.sprite)
    }

    fn advance(&mut self, now: u64) {
        let period = self.snapshot.sprite.animation_period;
        self.render.animation.advance(period, now);
        self.render
            .motion
            .advance(self.snapshot.position(), period, now);
    }
}

/// Latest broadcast joined with per-player render state, in broadcast order.
#[derive(Debug, Clone, Default)]
pub struct WorldState {
    players: Vec<PlayerEntry>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every snapshot. Render state stays with its broadcast slot;
    /// new slots start at rest on their authoritative position.
    pub fn apply_broadcast(&mut self, snapshots: Vec<PlayerSnapshot>) {
        let mut previous = std::mem::take(&mut self.players)
            .into_iter()
            .map(|entry| entry.render);

        self.players = snapshots
            .into_iter()
            .map(|snapshot| {
                let render = previous
                    .next()
                    .unwrap_or_else(|| PlayerRenderState::new(snapshot.position()));
                PlayerEntry { snapshot, render }
            })
            .collect();
    }

    /// Runs one render tick of animation and motion for every player.
    pub fn advance(&mut self, now: u64) {
        for player in &mut self.players {
            player.advance(now);
        }
    }

    pub fn players(&self) -> &[PlayerEntry] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }
}
