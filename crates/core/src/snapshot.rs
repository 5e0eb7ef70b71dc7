use arrayvec::ArrayVec;

use crate::types::{Mode, SessionPhase, Tile, MAX_SEQUENCE_LEN, POOL_CAPACITY};

/// One slot of the track as the player sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackCell {
    /// Tile shown from the start of the round.
    Shown(Tile),
    /// Gap still waiting for its value.
    Open(u8),
    /// Gap the player filled.
    Placed(Tile),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub phase: SessionPhase,
    pub session_id: u32,
    pub score: u32,
    pub lives: u8,
    pub max_lives: u8,
    pub rounds_completed: u32,
    /// 1-based number of the round on screen.
    pub round: u32,
    pub track: ArrayVec<TrackCell, MAX_SEQUENCE_LEN>,
    /// Slot of the gap that must be filled next.
    pub next_gap: Option<usize>,
    pub expected: Option<u8>,
    pub pool_rows: usize,
    pub pool_cols: usize,
    pub pool: ArrayVec<Option<Tile>, POOL_CAPACITY>,
    /// Traversal fraction in [0, 1].
    pub progress: f32,
    pub remaining_ms: u64,
    /// Score saved when the last session ran out of lives.
    pub final_score: Option<u32>,
}

impl SessionSnapshot {
    pub fn clear(&mut self) {
        self.mode = Mode::Uniform;
        self.phase = SessionPhase::NotStarted;
        self.session_id = 0;
        self.score = 0;
        self.lives = 0;
        self.max_lives = 0;
        self.rounds_completed = 0;
        self.round = 0;
        self.track.clear();
        self.next_gap = None;
        self.expected = None;
        self.pool_rows = 0;
        self.pool_cols = 0;
        self.pool.clear();
        self.progress = 0.0;
        self.remaining_ms = 0;
        self.final_score = None;
    }

    /// Taps are only judged while a round is in play.
    pub fn playable(&self) -> bool {
        self.phase == SessionPhase::InRound
    }

    pub fn game_over(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    /// Pool cell at grid coordinates.
    pub fn pool_cell(&self, row: usize, col: usize) -> Option<Tile> {
        if row >= self.pool_rows || col >= self.pool_cols {
            return None;
        }
        self.pool.get(row * self.pool_cols + col).copied().flatten()
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            mode: Mode::Uniform,
            phase: SessionPhase::NotStarted,
            session_id: 0,
            score: 0,
            lives: 0,
            max_lives: 0,
            rounds_completed: 0,
            round: 0,
            track: ArrayVec::new(),
            next_gap: None,
            expected: None,
            pool_rows: 0,
            pool_cols: 0,
            pool: ArrayVec::new(),
            progress: 0.0,
            remaining_ms: 0,
            final_score: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Family;

    #[test]
    fn test_pool_cell_bounds() {
        let tile = Tile::new(Family::Bamboo, 2).unwrap();
        let mut snap = SessionSnapshot {
            pool_rows: 1,
            pool_cols: 2,
            ..SessionSnapshot::default()
        };
        snap.pool.push(None);
        snap.pool.push(Some(tile));
        assert_eq!(snap.pool_cell(0, 1), Some(tile));
        assert_eq!(snap.pool_cell(0, 0), None);
        assert_eq!(snap.pool_cell(1, 0), None);
        assert_eq!(snap.pool_cell(0, 2), None);
    }

    #[test]
    fn test_clear_resets() {
        let mut snap = SessionSnapshot {
            score: 90,
            phase: SessionPhase::Ended,
            ..SessionSnapshot::default()
        };
        snap.clear();
        assert_eq!(snap, SessionSnapshot::default());
        assert!(!snap.playable());
    }
}
