use std::time::Duration;

use gap_runner::core::{GameConfig, GameSession, MemoryRecordStore, SessionSnapshot};
use gap_runner::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use gap_runner::types::{Mode, SessionPhase};

fn started(mode: Mode, seed: u32) -> GameSession<MemoryRecordStore> {
    let mut session =
        GameSession::new(mode, GameConfig::default(), MemoryRecordStore::new(), ()).with_seed(seed);
    session.start();
    session
}

#[test]
fn idle_session_asks_to_start() {
    let session = GameSession::new(
        Mode::Uniform,
        GameConfig::default(),
        MemoryRecordStore::new(),
        (),
    );
    let fb = GameView::default().render(&session.snapshot(), Viewport::new(80, 24));
    let text = fb.to_text();
    assert!(text.contains("PRESS R TO START"));
    assert!(text.contains("SCORE"));
    assert!(text.contains("LIVES"));
}

#[test]
fn in_round_frame_shows_the_pool_and_panel() {
    let session = started(Mode::Diverse, 17);
    let snap = session.snapshot();
    let view = GameView::default();
    let fb = view.render(&snap, Viewport::new(100, 30));
    let text = fb.to_text();

    assert!(text.contains("TIME"));
    assert!(text.contains("diverse"));
    let layout = view.layout(&snap, Viewport::new(100, 30));
    assert_eq!(fb.get(layout.pool_x, layout.pool_y).unwrap().ch, '┌');
    // Every tile on offer is drawn somewhere in the pool frame.
    let pool_text: String = (layout.pool_y..layout.pool_y + layout.pool_h)
        .map(|y| fb.row_text(y))
        .collect();
    for tile in session.round().unwrap().pool().tiles() {
        let label = format!("[{}{}]", tile.family().letter(), tile.value());
        assert!(pool_text.contains(&label), "missing {label}");
    }
}

#[test]
fn track_starts_off_screen_and_scrolls_left() {
    let mut session = started(Mode::Uniform, 3);
    let view = GameView::default();

    let before = view.track_offset(&session.snapshot());
    session.tick(Duration::from_secs(6));
    let after = view.track_offset(&session.snapshot());
    assert_eq!(before, 40);
    assert!(after < before);
}

#[test]
fn game_over_overlay_after_last_life() {
    let config = GameConfig {
        max_lives: 1,
        ..GameConfig::default()
    };
    let mut session =
        GameSession::new(Mode::Uniform, config, MemoryRecordStore::new(), ()).with_seed(9);
    session.start();
    session.tick(Duration::from_secs(18));
    assert_eq!(session.phase(), SessionPhase::Ended);

    let text = GameView::default()
        .render(&session.snapshot(), Viewport::new(80, 24))
        .to_text();
    assert!(text.contains("GAME OVER"));
    assert!(text.contains("R: AGAIN"));
}

#[test]
fn small_viewports_do_not_panic() {
    let session = started(Mode::Diverse, 1);
    let mut snap = SessionSnapshot::default();
    session.snapshot_into(&mut snap);
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    for (w, h) in [(0, 0), (1, 1), (10, 4), (30, 8)] {
        view.render_into_with_cursor(&snap, Some(29), Viewport::new(w, h), &mut fb);
        assert_eq!(fb.width(), w);
        assert_eq!(fb.height(), h);
    }
}

#[test]
fn terminal_renderer_sends_less_when_nothing_changed() {
    let session = started(Mode::Uniform, 5);
    let snap = session.snapshot();
    let view = GameView::default();
    let mut term = TerminalRenderer::with_writer(Vec::new());

    let mut fb = view.render(&snap, Viewport::new(80, 24));
    let first = term.draw_swap(&mut fb).unwrap();
    let mut fb = view.render(&snap, Viewport::new(80, 24));
    let second = term.draw_swap(&mut fb).unwrap();
    assert!(second < first);
}
