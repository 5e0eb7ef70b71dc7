//! Renderer collaborator - receives session state changes
//!
//! Every method has a no-op default so a frontend only overrides what it
//! draws. `()` is the null renderer.

use crate::pool::SelectionPool;
use crate::records::RoundRecord;
use crate::sequence::Sequence;
use crate::types::Tile;

pub trait Renderer {
    fn on_round_started(&mut self, _round: u32, _sequence: &Sequence, _pool: &SelectionPool) {}

    fn on_score_changed(&mut self, _score: u32) {}

    fn on_lives_changed(&mut self, _lives: u8) {}

    /// `round` is 1-based and matches the following `on_round_started`.
    fn on_round_changed(&mut self, _round: u32) {}

    fn on_gap_filled(&mut self, _queue_position: usize, _slot: usize, _tile: Tile) {}

    fn on_wrong_selection(&mut self, _tile: Tile, _expected: u8) {}

    fn on_round_complete(&mut self) {}

    fn on_time_expired(&mut self, _missed: &[u8]) {}

    /// `record` is `None` when the player quit.
    fn on_session_ended(&mut self, _record: Option<&RoundRecord>) {}
}

impl Renderer for () {}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn on_round_started(&mut self, round: u32, sequence: &Sequence, pool: &SelectionPool) {
        (**self).on_round_started(round, sequence, pool)
    }

    fn on_score_changed(&mut self, score: u32) {
        (**self).on_score_changed(score)
    }

    fn on_lives_changed(&mut self, lives: u8) {
        (**self).on_lives_changed(lives)
    }

    fn on_round_changed(&mut self, round: u32) {
        (**self).on_round_changed(round)
    }

    fn on_gap_filled(&mut self, queue_position: usize, slot: usize, tile: Tile) {
        (**self).on_gap_filled(queue_position, slot, tile)
    }

    fn on_wrong_selection(&mut self, tile: Tile, expected: u8) {
        (**self).on_wrong_selection(tile, expected)
    }

    fn on_round_complete(&mut self) {
        (**self).on_round_complete()
    }

    fn on_time_expired(&mut self, missed: &[u8]) {
        (**self).on_time_expired(missed)
    }

    fn on_session_ended(&mut self, record: Option<&RoundRecord>) {
        (**self).on_session_ended(record)
    }
}

/// Owned copy of one renderer notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    RoundStarted { round: u32, gaps: usize },
    ScoreChanged(u32),
    LivesChanged(u8),
    RoundChanged(u32),
    GapFilled {
        queue_position: usize,
        slot: usize,
        tile: Tile,
    },
    WrongSelection { tile: Tile, expected: u8 },
    RoundComplete,
    TimeExpired { missed: Vec<u8> },
    SessionEnded { record: Option<RoundRecord> },
}

/// Renderer that buffers every notification as a [`SessionEvent`].
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<SessionEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Take the buffered events, oldest first.
    pub fn drain(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn count(&self, pred: impl Fn(&SessionEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Renderer for EventLog {
    fn on_round_started(&mut self, round: u32, sequence: &Sequence, _pool: &SelectionPool) {
        self.events.push(SessionEvent::RoundStarted {
            round,
            gaps: sequence.gap_count(),
        });
    }

    fn on_score_changed(&mut self, score: u32) {
        self.events.push(SessionEvent::ScoreChanged(score));
    }

    fn on_lives_changed(&mut self, lives: u8) {
        self.events.push(SessionEvent::LivesChanged(lives));
    }

    fn on_round_changed(&mut self, round: u32) {
        self.events.push(SessionEvent::RoundChanged(round));
    }

    fn on_gap_filled(&mut self, queue_position: usize, slot: usize, tile: Tile) {
        self.events.push(SessionEvent::GapFilled {
            queue_position,
            slot,
            tile,
        });
    }

    fn on_wrong_selection(&mut self, tile: Tile, expected: u8) {
        self.events
            .push(SessionEvent::WrongSelection { tile, expected });
    }

    fn on_round_complete(&mut self) {
        self.events.push(SessionEvent::RoundComplete);
    }

    fn on_time_expired(&mut self, missed: &[u8]) {
        self.events.push(SessionEvent::TimeExpired {
            missed: missed.to_vec(),
        });
    }

    fn on_session_ended(&mut self, record: Option<&RoundRecord>) {
        self.events.push(SessionEvent::SessionEnded {
            record: record.cloned(),
        });
    }
}
