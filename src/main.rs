//! Gap Runner terminal game (default binary).
//!
//! `play` runs the game with crossterm input and the framebuffer renderer.
//! `records` lists or deletes saved session summaries. Logs go to a file
//! because the terminal is in raw mode while playing.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

use gap_runner::cli::{Cli, Command, PlayArgs, RecordsAction};
use gap_runner::core::{
    GameConfig, GameSession, JsonRecordStore, RecordId, RecordStore, SessionSnapshot,
};
use gap_runner::input::{handle_key_event, GridCursor};
use gap_runner::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use gap_runner::types::{InputAction, Mode, SessionPhase, TICK_MS};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = GameConfig::load(cli.config.as_deref()).context("load configuration")?;
    init_logging(&config)?;

    match cli.resolved_command() {
        Command::Play(args) => play(args, config),
        Command::Records { action } => records(action, &config),
    }
}

fn init_logging(config: &GameConfig) -> Result<()> {
    if let Some(dir) = config.log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("open log file {}", config.log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();
    Ok(())
}

fn play(args: PlayArgs, config: GameConfig) -> Result<()> {
    let mode = Mode::from(args.mode);
    let store = JsonRecordStore::new(&config.records_path);
    let mut session = GameSession::new(mode, config, store, ());
    if let Some(seed) = args.seed {
        session = session.with_seed(seed);
    }
    info!(mode = mode.as_str(), seed = ?args.seed, "starting terminal game");
    session.start();

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session);

    // Always try to restore terminal state.
    if let Err(err) = term.exit() {
        warn!(error = %err, "failed to restore terminal");
    }
    result
}

fn run<S: RecordStore>(term: &mut TerminalRenderer, session: &mut GameSession<S>) -> Result<()> {
    let view = GameView::default();
    let mut cursor = GridCursor::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = SessionSnapshot::default();

    let tick_duration = Duration::from_millis(TICK_MS);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        session.snapshot_into(&mut snap);
        cursor.resize(snap.pool_rows, snap.pool_cols);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into_with_cursor(&snap, Some(cursor.index()), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(action) = handle_key_event(key) {
                        if !apply_action(session, &mut cursor, &snap, action) {
                            return Ok(());
                        }
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            session.tick(elapsed);
        }
    }
}

/// Returns false when the player asked to leave.
fn apply_action<S: RecordStore>(
    session: &mut GameSession<S>,
    cursor: &mut GridCursor,
    snap: &SessionSnapshot,
    action: InputAction,
) -> bool {
    match action {
        InputAction::Quit => {
            session.quit();
            return false;
        }
        InputAction::Move(direction) => cursor.move_by(direction),
        InputAction::Select => match session.phase() {
            SessionPhase::InRound => {
                if let Some(tile) = snap.pool.get(cursor.index()).copied().flatten() {
                    session.submit_selection(tile);
                }
            }
            SessionPhase::RoundComplete => {
                session.advance();
            }
            SessionPhase::NotStarted | SessionPhase::Ended => {}
        },
        InputAction::Restart => {
            session.quit();
            session.start();
            cursor.reset();
        }
        InputAction::ToggleMode => {
            let next = session.mode().toggled();
            session.set_mode(next);
        }
    }
    true
}

fn records(action: RecordsAction, config: &GameConfig) -> Result<()> {
    let mut store = JsonRecordStore::new(&config.records_path);
    match action {
        RecordsAction::List => {
            let records = store.fetch_all().context("read records")?;
            if records.is_empty() {
                println!("no records in {}", store.path().display());
                return Ok(());
            }
            println!(
                "{:<36}  {:>6}  {:<12}  {:>6}  {}",
                "ID", "SCORE", "MODE", "TIME", "COMPLETED"
            );
            for record in records {
                println!(
                    "{:<36}  {:>6}  {:<12}  {:>6}  {}",
                    record.id,
                    record.score,
                    record.mode.label(),
                    record.duration_label(),
                    record.completed_at.format("%Y-%m-%d %H:%M:%S UTC"),
                );
            }
        }
        RecordsAction::Delete { id } => {
            let id: RecordId = id
                .parse()
                .with_context(|| format!("invalid record id {id:?}"))?;
            if store.delete(id).context("delete record")? {
                info!(record = %id, "record deleted");
                println!("deleted {id}");
            } else {
                println!("no record {id}");
            }
        }
        RecordsAction::Clear => {
            store.clear_all().context("clear records")?;
            info!(path = %store.path().display(), "records cleared");
            println!("cleared {}", store.path().display());
        }
    }
    Ok(())
}
