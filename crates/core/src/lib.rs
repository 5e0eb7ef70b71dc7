//! Core game logic - pure, deterministic, and testable
//!
//! Round generation, gap resolution and the session state machine. Nothing
//! in here draws, reads the keyboard or sleeps: randomness, wall time,
//! persistence and rendering are all injected.
//!
//! # Module Structure
//!
//! - [`catalog`]: the 27 tiles (3 families × values 1..=9)
//! - [`sequence`]: scrolling tracks with gaps, no three gaps in a row
//! - [`pool`]: the grid of tappable tiles
//! - [`round`]: ordered gap queue and tap resolution
//! - [`timer`]: traversal countdown with generation tokens
//! - [`session`]: score, lives and the round lifecycle
//! - [`records`]: finished-session summaries and their stores
//! - [`config`]: tunable constants
//!
//! # Game Rules
//!
//! - Gaps are filled strictly left to right; only the leftmost open gap counts.
//! - Each correct tile scores 10 points by default.
//! - A wrong tap, or the track finishing its traversal with gaps open, costs
//!   one life and starts a new round. Five lives per session.
//! - Uniform mode uses one family per round (3×3 pool, 18 s traversal);
//!   diverse mode mixes families (5×6 pool, 12 s traversal).
//!
//! # Example
//!
//! ```
//! use gap_runner_core::{GameConfig, GameSession, MemoryRecordStore};
//! use gap_runner_core::types::{Mode, SessionPhase};
//!
//! let mut session = GameSession::new(Mode::Uniform, GameConfig::default(), MemoryRecordStore::new(), ())
//!     .with_seed(12345);
//! session.start();
//!
//! // Tap the tile the leftmost gap expects.
//! let round = session.round().unwrap();
//! let value = round.expected().unwrap();
//! let tile = round.pool().tiles().find(|t| t.value() == value).unwrap();
//! assert!(session.submit_selection(tile).unwrap().is_correct());
//! assert_eq!(session.score(), 10);
//! assert_ne!(session.phase(), SessionPhase::Ended);
//! ```

pub mod catalog;
pub mod clock;
pub mod config;
pub mod pool;
pub mod records;
pub mod renderer;
pub mod rng;
pub mod round;
pub mod sequence;
pub mod session;
pub mod snapshot;
pub mod timer;

pub use gap_runner_types as types;

pub use catalog::TileCatalog;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, GameConfig};
pub use pool::{SelectionPool, SelectionPoolGenerator};
pub use records::{JsonRecordStore, MemoryRecordStore, RecordId, RecordStore, RoundRecord, StoreError};
pub use renderer::{EventLog, Renderer, SessionEvent};
pub use rng::{RandomSource, SimpleRng};
pub use round::{Gap, GapQueue, Miss, Outcome, RoundEngine};
pub use sequence::{FamilyPlan, Sequence, SequenceError, SequenceGenerator};
pub use session::{GameSession, SessionState};
pub use snapshot::{SessionSnapshot, TrackCell};
pub use timer::{ScrollTimer, TimerToken};
