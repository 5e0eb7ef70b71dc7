use std::rc::Rc;
use std::time::Duration;

use gap_runner::core::{
    Clock, EventLog, GameConfig, GameSession, ManualClock, MemoryRecordStore, RandomSource,
    RecordId, RecordStore, RoundRecord, SessionEvent, SimpleRng, StoreError,
};
use gap_runner::types::{Mode, SessionPhase, Tile};

type TestSession = GameSession<MemoryRecordStore, EventLog>;

fn session_with(mode: Mode, config: GameConfig, seed: u32) -> TestSession {
    GameSession::new(mode, config, MemoryRecordStore::new(), EventLog::new()).with_seed(seed)
}

fn expected_tile<S: RecordStore>(session: &GameSession<S, EventLog>) -> Tile {
    let round = session.round().unwrap();
    let value = round.expected().unwrap();
    round.pool().tiles().find(|t| t.value() == value).unwrap()
}

fn wrong_tile<S: RecordStore>(session: &GameSession<S, EventLog>) -> Tile {
    let round = session.round().unwrap();
    let value = round.expected().unwrap();
    round.pool().tiles().find(|t| t.value() != value).unwrap()
}

#[test]
fn losing_the_last_life_saves_exactly_one_record() {
    let config = GameConfig {
        max_lives: 1,
        ..GameConfig::default()
    };
    let clock = Rc::new(ManualClock::default());
    let mut session = session_with(Mode::Uniform, config, 11).with_clock(clock.clone());
    session.start();

    // Bank some points first.
    session.submit_selection(expected_tile(&session));
    if session.phase() == SessionPhase::RoundComplete {
        session.advance();
    }
    let score = session.score();
    assert_eq!(score, 10);

    clock.advance(Duration::from_secs(42));
    session.submit_selection(wrong_tile(&session));

    assert_eq!(session.phase(), SessionPhase::Ended);
    assert_eq!(session.lives(), 0);
    let records = session.store().fetch_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].score, score);
    assert_eq!(records[0].mode, Mode::Uniform);
    assert_eq!(records[0].duration_seconds, 42);
    assert_eq!(records[0].completed_at, clock.now());

    // Nothing after the end saves again.
    assert!(!session.quit());
    assert!(!session.tick(Duration::from_secs(60)));
    assert_eq!(session.store().len(), 1);

    let ended = session
        .renderer()
        .count(|e| matches!(e, SessionEvent::SessionEnded { record: Some(_) }));
    assert_eq!(ended, 1);
}

#[test]
fn traversal_expiry_costs_one_life_and_starts_a_new_round() {
    let mut session = session_with(Mode::Uniform, GameConfig::default(), 5);
    session.start();
    let unresolved: Vec<u8> = session.round().unwrap().gap_queue().values().collect();

    assert!(!session.tick(Duration::from_millis(17_999)));
    assert_eq!(session.lives(), 5);
    assert!(session.tick(Duration::from_millis(1)));

    assert_eq!(session.lives(), 4);
    assert_eq!(session.rounds_completed(), 1);
    assert_eq!(session.phase(), SessionPhase::InRound);
    assert!(session.timer().is_running());

    let expired: Vec<_> = session
        .renderer()
        .events()
        .iter()
        .filter_map(|e| match e {
            SessionEvent::TimeExpired { missed } => Some(missed.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(expired, vec![unresolved]);
}

#[test]
fn diverse_traversal_is_shorter() {
    let mut session = session_with(Mode::Diverse, GameConfig::default(), 5);
    session.start();
    assert!(session.tick(Duration::from_secs(12)));
    assert_eq!(session.lives(), 4);
}

#[test]
fn stale_timer_token_is_ignored() {
    let mut session = session_with(Mode::Uniform, GameConfig::default(), 8);
    session.start();
    let old = session.current_token().unwrap();

    session.submit_selection(wrong_tile(&session));
    assert_eq!(session.lives(), 4);
    assert_ne!(session.current_token(), Some(old));

    assert!(!session.on_time_expired(old));
    assert_eq!(session.lives(), 4);
    assert_eq!(session.rounds_completed(), 1);
}

#[test]
fn current_token_expires_the_round_once() {
    let mut session = session_with(Mode::Uniform, GameConfig::default(), 8);
    session.start();
    let token = session.current_token().unwrap();
    assert!(session.on_time_expired(token));
    assert!(!session.on_time_expired(token));
    assert_eq!(session.lives(), 4);
}

#[test]
fn expiry_after_clearing_a_round_is_ignored() {
    let mut session = session_with(Mode::Uniform, GameConfig::default(), 21);
    session.start();
    let token = session.current_token().unwrap();
    while session.phase() == SessionPhase::InRound {
        session.submit_selection(expected_tile(&session));
    }
    assert_eq!(session.phase(), SessionPhase::RoundComplete);
    assert!(!session.on_time_expired(token));
    assert_eq!(session.lives(), 5);
}

#[test]
fn quitting_never_saves() {
    let mut session = session_with(Mode::Diverse, GameConfig::default(), 3);
    session.start();
    session.submit_selection(expected_tile(&session));
    assert!(session.quit());
    assert_eq!(session.phase(), SessionPhase::Ended);
    assert!(session.store().is_empty());
    assert!(session.last_record().is_none());
}

#[test]
fn score_never_drops_and_lives_never_rise() {
    let mut session = session_with(Mode::Diverse, GameConfig::default(), 99);
    let mut picker = SimpleRng::new(1234);
    session.start();

    let mut last_score = 0;
    let mut last_lives = session.lives();
    for _ in 0..5000 {
        if session.phase() == SessionPhase::Ended {
            break;
        }
        if session.phase() == SessionPhase::InRound && picker.below(4) == 0 {
            let tiles: Vec<Tile> = session.round().unwrap().pool().tiles().collect();
            let tile = tiles[picker.index(tiles.len())];
            session.submit_selection(tile);
        } else {
            session.tick(Duration::from_millis(250));
        }
        assert!(session.score() >= last_score);
        assert!(session.lives() <= last_lives);
        last_score = session.score();
        last_lives = session.lives();
    }
    assert_eq!(session.phase(), SessionPhase::Ended);
    assert_eq!(session.store().len(), 1);
}

#[test]
fn restart_resets_counters() {
    let config = GameConfig {
        max_lives: 1,
        ..GameConfig::default()
    };
    let mut session = session_with(Mode::Uniform, config, 2);
    session.start();
    session.submit_selection(wrong_tile(&session));
    assert_eq!(session.phase(), SessionPhase::Ended);

    assert!(session.start());
    assert_eq!(session.phase(), SessionPhase::InRound);
    assert_eq!(session.score(), 0);
    assert_eq!(session.lives(), 1);
    assert_eq!(session.rounds_completed(), 0);
    assert!(session.last_record().is_none());
}

#[test]
fn points_per_gap_is_configurable() {
    let config = GameConfig {
        points_per_gap: 25,
        ..GameConfig::default()
    };
    let mut session = session_with(Mode::Uniform, config, 6);
    session.start();
    session.submit_selection(expected_tile(&session));
    assert_eq!(session.score(), 25);
}

struct BrokenStore;

impl RecordStore for BrokenStore {
    fn save(&mut self, _record: &RoundRecord) -> Result<(), StoreError> {
        Err(StoreError::Io {
            path: "unwritable.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }

    fn fetch_all(&self) -> Result<Vec<RoundRecord>, StoreError> {
        Ok(Vec::new())
    }

    fn delete(&mut self, _id: RecordId) -> Result<bool, StoreError> {
        Ok(false)
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[test]
fn store_failure_does_not_change_game_state() {
    let config = GameConfig {
        max_lives: 1,
        ..GameConfig::default()
    };
    let mut session =
        GameSession::new(Mode::Uniform, config, BrokenStore, EventLog::new()).with_seed(4);
    session.start();
    session.submit_selection(wrong_tile(&session));
    assert_eq!(session.phase(), SessionPhase::Ended);
    assert!(session.last_record().is_some());
}

#[test]
fn round_numbers_agree_across_hooks() {
    let mut session = session_with(Mode::Uniform, GameConfig::default(), 13);
    session.start();

    while session.phase() == SessionPhase::InRound {
        session.submit_selection(expected_tile(&session));
    }
    assert!(session.advance());
    session.submit_selection(wrong_tile(&session));
    assert_eq!(session.lives(), 4);

    let changed: Vec<u32> = session
        .renderer()
        .events()
        .iter()
        .filter_map(|e| match e {
            SessionEvent::RoundChanged(round) => Some(*round),
            _ => None,
        })
        .collect();
    let started: Vec<u32> = session
        .renderer()
        .events()
        .iter()
        .filter_map(|e| match e {
            SessionEvent::RoundStarted { round, .. } => Some(*round),
            _ => None,
        })
        .collect();
    assert_eq!(changed, vec![1, 2, 3]);
    assert_eq!(started, changed);
    assert_eq!(session.snapshot().round, 3);
}
