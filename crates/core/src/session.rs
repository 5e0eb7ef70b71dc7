//! Game session - cross-round state and the round lifecycle
//!
//! ```text
//! NotStarted → InRound → (RoundComplete → InRound)* → Ended
//! ```
//!
//! The session owns the score, lives and round count, the active
//! [`RoundEngine`], and the [`ScrollTimer`] for the track. It is driven
//! synchronously by the host: taps through [`GameSession::submit_selection`],
//! time through [`GameSession::tick`]. Nothing here panics or returns an
//! error; calls that make no sense in the current phase are no-ops.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::catalog::TileCatalog;
use crate::clock::{Clock, SystemClock};
use crate::config::GameConfig;
use crate::pool::SelectionPoolGenerator;
use crate::records::{RecordStore, RoundRecord};
use crate::renderer::Renderer;
use crate::rng::{RandomSource, SimpleRng};
use crate::round::{Outcome, RoundEngine};
use crate::sequence::SequenceGenerator;
use crate::snapshot::{SessionSnapshot, TrackCell};
use crate::timer::{ScrollTimer, TimerToken};
use crate::types::{Mode, SequenceSlot, SessionPhase, Tile, LIVES_CAP};

/// Score, lives and progress of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    score: u32,
    lives: u8,
    rounds_completed: u32,
    started_at: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }
}

pub struct GameSession<S: RecordStore, V: Renderer = ()> {
    mode: Mode,
    config: GameConfig,
    catalog: TileCatalog,
    rng: Box<dyn RandomSource>,
    clock: Box<dyn Clock>,
    store: S,
    renderer: V,

    phase: SessionPhase,
    state: SessionState,
    round: Option<RoundEngine>,
    timer: ScrollTimer,
    /// Time left before the next round while in `RoundComplete`.
    delay: Option<Duration>,
    /// Monotonic session id (increments on every start).
    session_id: u32,
    last_record: Option<RoundRecord>,
}

impl<S: RecordStore, V: Renderer> GameSession<S, V> {
    pub fn new(mode: Mode, config: GameConfig, store: S, renderer: V) -> Self {
        Self {
            mode,
            config,
            catalog: TileCatalog::standard(),
            rng: Box::new(SimpleRng::from_time()),
            clock: Box::new(SystemClock),
            store,
            renderer,
            phase: SessionPhase::NotStarted,
            state: SessionState::default(),
            round: None,
            timer: ScrollTimer::new(),
            delay: None,
            session_id: 0,
            last_record: None,
        }
    }

    pub fn with_rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Deterministic sessions: same seed, same tracks and pools.
    pub fn with_seed(self, seed: u32) -> Self {
        self.with_rng(SimpleRng::new(seed))
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_catalog(mut self, catalog: TileCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Switch modes for the next `start`. Ignored while a session is running.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if self.is_running() {
            return false;
        }
        self.mode = mode;
        true
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn lives(&self) -> u8 {
        self.state.lives
    }

    pub fn rounds_completed(&self) -> u32 {
        self.state.rounds_completed
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    pub fn round(&self) -> Option<&RoundEngine> {
        self.round.as_ref()
    }

    pub fn timer(&self) -> &ScrollTimer {
        &self.timer
    }

    /// Token of the traversal countdown for the active round.
    pub fn current_token(&self) -> Option<TimerToken> {
        self.round.as_ref().and_then(|r| r.token())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn renderer(&self) -> &V {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut V {
        &mut self.renderer
    }

    /// Record saved when the most recent session ran out of lives.
    pub fn last_record(&self) -> Option<&RoundRecord> {
        self.last_record.as_ref()
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::InRound | SessionPhase::RoundComplete
        )
    }

    /// Reset score and lives and begin the first round.
    ///
    /// Valid from `NotStarted` and `Ended`; ignored while a session is running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        self.session_id = self.session_id.wrapping_add(1);
        self.state = SessionState {
            score: 0,
            lives: self.config.max_lives.clamp(1, LIVES_CAP),
            rounds_completed: 0,
            started_at: Some(self.clock.now()),
        };
        self.delay = None;
        self.last_record = None;
        self.phase = SessionPhase::InRound;
        info!(
            session = self.session_id,
            mode = self.mode.as_str(),
            lives = self.state.lives,
            "session started"
        );

        self.renderer.on_score_changed(self.state.score);
        self.renderer.on_lives_changed(self.state.lives);
        self.begin_round();
        true
    }

    /// Judge a tapped tile. No-op outside `InRound`.
    pub fn submit_selection(&mut self, tile: Tile) -> Option<Outcome> {
        if self.phase != SessionPhase::InRound {
            return None;
        }
        let outcome = self.round.as_mut()?.submit_selection(tile)?;
        match outcome {
            Outcome::Correct {
                queue_position,
                slot,
                tile,
                points,
            } => self.handle_correct(queue_position, slot, tile, points),
            Outcome::Incorrect { tile, expected } => self.handle_incorrect(tile, expected),
        }
        Some(outcome)
    }

    /// Advance the scroll timer and the pause after a cleared round.
    ///
    /// Returns true if the phase or the active round changed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        match self.phase {
            SessionPhase::InRound => match self.timer.tick(dt) {
                Some(token) => self.on_time_expired(token),
                None => false,
            },
            SessionPhase::RoundComplete => {
                let remaining = self.delay.unwrap_or_default().saturating_sub(dt);
                if remaining.is_zero() {
                    self.advance()
                } else {
                    self.delay = Some(remaining);
                    false
                }
            }
            SessionPhase::NotStarted | SessionPhase::Ended => false,
        }
    }

    /// Skip the rest of the pause after a cleared round.
    pub fn advance(&mut self) -> bool {
        if self.phase != SessionPhase::RoundComplete {
            return false;
        }
        self.delay = None;
        self.phase = SessionPhase::InRound;
        self.next_round();
        true
    }

    /// The track finished crossing the screen.
    ///
    /// Ignored unless `token` belongs to the active round's countdown.
    pub fn on_time_expired(&mut self, token: TimerToken) -> bool {
        let owned = self.phase == SessionPhase::InRound && self.current_token() == Some(token);
        if !owned || !self.timer.claim(token) {
            debug!(
                generation = token.generation(),
                current = self.timer.generation(),
                "stale timer expiry ignored"
            );
            return false;
        }

        let Some(miss) = self.round.as_mut().and_then(|r| r.on_time_expired()) else {
            return false;
        };
        debug!(missed = ?miss.unresolved.as_slice(), "track expired with open gaps");
        self.renderer.on_time_expired(&miss.unresolved);
        if !self.lose_life() {
            self.next_round();
        }
        true
    }

    /// Leave the session without saving a record.
    pub fn quit(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.timer.cancel();
        self.delay = None;
        self.phase = SessionPhase::Ended;
        info!(
            session = self.session_id,
            score = self.state.score,
            "session quit, progress discarded"
        );
        self.renderer.on_session_ended(None);
        true
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut snapshot = SessionSnapshot::default();
        self.snapshot_into(&mut snapshot);
        snapshot
    }

    /// Fill `out` with the render-ready state, reusing its buffers.
    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.clear();
        out.mode = self.mode;
        out.phase = self.phase;
        out.session_id = self.session_id;
        out.score = self.state.score;
        out.lives = self.state.lives;
        out.max_lives = self.config.max_lives;
        out.rounds_completed = self.state.rounds_completed;
        out.round = self.state.rounds_completed + 1;
        out.progress = self.timer.progress();
        out.remaining_ms = self.timer.remaining().as_millis().min(u64::MAX as u128) as u64;
        out.final_score = self.last_record.as_ref().map(|r| r.score);

        let Some(round) = self.round.as_ref() else {
            return;
        };
        for (slot, cell) in round.sequence().slots().iter().enumerate() {
            let cell = match (*cell, round.placed(slot)) {
                (SequenceSlot::Filled(tile), _) => TrackCell::Shown(tile),
                (SequenceSlot::Gap(_), Some(tile)) => TrackCell::Placed(tile),
                (SequenceSlot::Gap(value), None) => TrackCell::Open(value),
            };
            out.track.push(cell);
        }
        out.next_gap = round.next_gap().map(|g| g.slot);
        out.expected = round.expected();
        out.pool_rows = round.pool().rows();
        out.pool_cols = round.pool().cols();
        out.pool.extend(round.pool().cells().iter().copied());
    }

    fn handle_correct(&mut self, queue_position: usize, slot: usize, tile: Tile, points: u32) {
        self.state.score = self.state.score.saturating_add(points);
        debug!(
            queue_position,
            slot,
            value = tile.value(),
            score = self.state.score,
            "gap filled"
        );
        self.renderer.on_gap_filled(queue_position, slot, tile);
        self.renderer.on_score_changed(self.state.score);

        if self.round.as_ref().is_some_and(|r| r.is_cleared()) {
            self.timer.cancel();
            self.phase = SessionPhase::RoundComplete;
            self.delay = Some(self.config.presentation_delay());
            debug!(round = self.state.rounds_completed + 1, "round cleared");
            self.renderer.on_round_complete();
        }
    }

    fn handle_incorrect(&mut self, tile: Tile, expected: u8) {
        debug!(
            family = tile.family().as_str(),
            value = tile.value(),
            expected,
            "wrong selection"
        );
        self.renderer.on_wrong_selection(tile, expected);
        if self.lose_life() {
            return;
        }
        if self.config.forfeit_round_on_miss {
            if let Some(round) = self.round.as_mut() {
                round.on_time_expired();
            }
            self.next_round();
        }
    }

    /// Take one life. Returns true if that ended the session.
    fn lose_life(&mut self) -> bool {
        self.state.lives = self.state.lives.saturating_sub(1);
        self.renderer.on_lives_changed(self.state.lives);
        if self.state.lives == 0 {
            self.end_session();
            return true;
        }
        false
    }

    fn next_round(&mut self) {
        self.state.rounds_completed = self.state.rounds_completed.saturating_add(1);
        self.begin_round();
    }

    fn begin_round(&mut self) {
        let sequence = SequenceGenerator::new(&self.catalog).generate(self.mode, self.rng.as_mut());
        let pool = SelectionPoolGenerator::new(&self.catalog).generate(
            self.mode,
            sequence.family(),
            self.rng.as_mut(),
        );
        let token = self.timer.arm(self.config.traversal(self.mode));
        let round = RoundEngine::new(sequence, pool, self.config.points_per_gap).with_token(token);

        let number = self.state.rounds_completed + 1;
        debug!(
            round = number,
            start = round.sequence().start(),
            len = round.sequence().len(),
            gaps = round.sequence().gap_count(),
            requested = round.sequence().requested_gaps(),
            generation = token.generation(),
            "round started"
        );
        self.renderer.on_round_changed(number);
        self.renderer
            .on_round_started(number, round.sequence(), round.pool());
        self.round = Some(round);
    }

    fn end_session(&mut self) {
        self.timer.cancel();
        self.delay = None;
        self.phase = SessionPhase::Ended;

        let now = self.clock.now();
        let duration_seconds = self
            .state
            .started_at
            .map(|at| (now - at).num_seconds().max(0) as u64)
            .unwrap_or(0);
        let record = RoundRecord::new(self.state.score, self.mode, duration_seconds, now);
        info!(
            session = self.session_id,
            score = record.score,
            rounds = self.state.rounds_completed,
            duration_seconds,
            "session ended"
        );

        if let Err(err) = self.store.save(&record) {
            warn!(error = %err, record = %record.id, "failed to save session record");
        }
        self.renderer.on_session_ended(Some(&record));
        self.last_record = Some(record);
    }
}
