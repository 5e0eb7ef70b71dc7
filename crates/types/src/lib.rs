//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! All types are plain data with no behavior beyond parsing and formatting,
//! so they can be used by the engine, the terminal view and the record store.
//!
//! # Tiles
//!
//! A tile is identified by its family and its value:
//!
//! - **Families**: bamboo, character, dot
//! - **Values**: 1 to 9 in every family (27 tiles total)
//!
//! # Sequence Constraints
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_SEQUENCE_LEN` | 3 | Shortest scrolling sequence |
//! | `MAX_SEQUENCE_LEN` | 7 | Longest scrolling sequence |
//! | `MAX_GAPS` | 6 | Upper bound on gaps (`MAX_SEQUENCE_LEN - 1`) |
//! | `MAX_GAP_RUN` | 2 | Longest allowed run of adjacent gaps |
//!
//! # Session Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_MAX_LIVES` | 5 | Lives at session start |
//! | `DEFAULT_POINTS_PER_GAP` | 10 | Points per filled gap |
//! | `UNIFORM_TRAVERSAL_MS` | 18000 | Track traversal time in uniform mode |
//! | `DIVERSE_TRAVERSAL_MS` | 12000 | Track traversal time in diverse mode |
//! | `PRESENTATION_DELAY_MS` | 1500 | Pause after a cleared round |
//!
//! # Examples
//!
//! ```
//! use gap_runner_types::{Family, Mode, SequenceSlot, Tile};
//!
//! let tile = Tile::new(Family::Dot, 4).unwrap();
//! assert_eq!(tile.value(), 4);
//! assert!(Tile::new(Family::Dot, 10).is_none());
//!
//! assert_eq!(Mode::from_str("diverse"), Some(Mode::Diverse));
//! assert_eq!(SequenceSlot::Gap(5).value(), 5);
//! ```

use serde::{Deserialize, Serialize};

/// Lowest tile value in every family.
pub const MIN_TILE_VALUE: u8 = 1;

/// Highest tile value in every family.
pub const MAX_TILE_VALUE: u8 = 9;

/// Number of tiles per family.
pub const TILES_PER_FAMILY: usize = 9;

/// Number of tile families.
pub const FAMILY_COUNT: usize = 3;

/// Shortest scrolling sequence.
pub const MIN_SEQUENCE_LEN: usize = 3;

/// Longest scrolling sequence.
pub const MAX_SEQUENCE_LEN: usize = 7;

/// Upper bound on gaps in one sequence (at least one slot stays filled).
pub const MAX_GAPS: usize = MAX_SEQUENCE_LEN - 1;

/// Longest run of adjacent gap positions a sequence may contain.
pub const MAX_GAP_RUN: usize = 2;

/// Lives at session start.
pub const DEFAULT_MAX_LIVES: u8 = 5;

/// Hard cap on configurable lives.
pub const LIVES_CAP: u8 = 5;

/// Points awarded per correctly filled gap.
pub const DEFAULT_POINTS_PER_GAP: u32 = 10;

/// Track traversal time in uniform mode.
pub const UNIFORM_TRAVERSAL_MS: u64 = 18_000;

/// Track traversal time in diverse mode.
pub const DIVERSE_TRAVERSAL_MS: u64 = 12_000;

/// Pause between a cleared round and the next one.
pub const PRESENTATION_DELAY_MS: u64 = 1_500;

/// Host loop tick interval (16ms ≈ 60 FPS).
pub const TICK_MS: u64 = 16;

/// Selection grid for uniform mode (rows, cols).
pub const UNIFORM_GRID: (usize, usize) = (3, 3);

/// Selection grid for diverse mode (rows, cols).
pub const DIVERSE_GRID: (usize, usize) = (5, 6);

/// Largest selection grid (cells).
pub const POOL_CAPACITY: usize = DIVERSE_GRID.0 * DIVERSE_GRID.1;

/// Tile families (suits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Bamboo,
    Character,
    Dot,
}

impl Family {
    /// All families in catalog order.
    pub const ALL: [Family; FAMILY_COUNT] = [Family::Bamboo, Family::Character, Family::Dot];

    /// Parse family from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use gap_runner_types::Family;
    ///
    /// assert_eq!(Family::from_str("Bamboo"), Some(Family::Bamboo));
    /// assert_eq!(Family::from_str("dot"), Some(Family::Dot));
    /// assert_eq!(Family::from_str("wind"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bamboo" => Some(Family::Bamboo),
            "character" => Some(Family::Character),
            "dot" => Some(Family::Dot),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Bamboo => "bamboo",
            Family::Character => "character",
            Family::Dot => "dot",
        }
    }

    /// Single-letter tag used by compact views.
    pub fn letter(&self) -> char {
        match self {
            Family::Bamboo => 'B',
            Family::Character => 'C',
            Family::Dot => 'D',
        }
    }

    /// Position of this family in [`Family::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Family::Bamboo => 0,
            Family::Character => 1,
            Family::Dot => 2,
        }
    }
}

/// A numbered tile
///
/// Identity is `(family, value)`. Values are always within
/// `MIN_TILE_VALUE..=MAX_TILE_VALUE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawTile")]
pub struct Tile {
    family: Family,
    value: u8,
}

/// Unchecked wire form of [`Tile`]; deserializing goes through `Tile::new`.
#[doc(hidden)]
#[derive(Deserialize)]
pub struct RawTile {
    family: Family,
    value: u8,
}

/// A tile value outside 1..=9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTileValue(pub u8);

impl std::fmt::Display for InvalidTileValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tile value {} outside 1..=9", self.0)
    }
}

impl std::error::Error for InvalidTileValue {}

impl TryFrom<RawTile> for Tile {
    type Error = InvalidTileValue;

    fn try_from(raw: RawTile) -> Result<Self, Self::Error> {
        Tile::new(raw.family, raw.value).ok_or(InvalidTileValue(raw.value))
    }
}

impl Tile {
    /// Create a tile, rejecting values outside 1..=9.
    pub fn new(family: Family, value: u8) -> Option<Self> {
        if (MIN_TILE_VALUE..=MAX_TILE_VALUE).contains(&value) {
            Some(Self { family, value })
        } else {
            None
        }
    }

    /// All nine tiles of a family in value order.
    pub fn suite(family: Family) -> [Tile; TILES_PER_FAMILY] {
        std::array::from_fn(|i| Tile {
            family,
            value: MIN_TILE_VALUE + i as u8,
        })
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn value(&self) -> u8 {
        self.value
    }
}

/// Gameplay modes
///
/// - **Uniform**: filled tiles and the selection pool share one family
/// - **Diverse**: filled tiles mix families; the pool offers all 27 tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Uniform,
    Diverse,
}

impl Mode {
    /// Parse mode from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use gap_runner_types::Mode;
    ///
    /// assert_eq!(Mode::from_str("uniform"), Some(Mode::Uniform));
    /// assert_eq!(Mode::from_str("DIVERSE"), Some(Mode::Diverse));
    /// assert_eq!(Mode::from_str("mixed"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "uniform" => Some(Mode::Uniform),
            "diverse" => Some(Mode::Diverse),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Uniform => "uniform",
            Mode::Diverse => "diverse",
        }
    }

    /// Human readable label for record listings.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Uniform => "Uniform Mode",
            Mode::Diverse => "Diverse Mode",
        }
    }

    /// Selection grid dimensions (rows, cols) for this mode.
    pub fn grid(&self) -> (usize, usize) {
        match self {
            Mode::Uniform => UNIFORM_GRID,
            Mode::Diverse => DIVERSE_GRID,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Mode::Uniform => Mode::Diverse,
            Mode::Diverse => Mode::Uniform,
        }
    }
}

/// One slot of the scrolling sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceSlot {
    /// A visible tile.
    Filled(Tile),
    /// A withheld tile; carries the value the player must supply.
    Gap(u8),
}

impl SequenceSlot {
    /// The value this slot stands for, whether shown or withheld.
    pub fn value(&self) -> u8 {
        match self {
            SequenceSlot::Filled(tile) => tile.value(),
            SequenceSlot::Gap(value) => *value,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, SequenceSlot::Gap(_))
    }
}

/// Session lifecycle phase
///
/// `NotStarted → InRound → (RoundComplete → InRound)* → Ended`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    NotStarted,
    InRound,
    RoundComplete,
    Ended,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::NotStarted => "notStarted",
            SessionPhase::InRound => "inRound",
            SessionPhase::RoundComplete => "roundComplete",
            SessionPhase::Ended => "ended",
        }
    }
}

/// Cursor movement over the selection grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Player intent decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Move(Direction),
    /// Tap the tile under the cursor (or skip the pause after a cleared round).
    Select,
    Restart,
    /// Switch between uniform and diverse mode before the next session.
    ToggleMode,
    Quit,
}

impl InputAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputAction::Move(Direction::Up) => "moveUp",
            InputAction::Move(Direction::Down) => "moveDown",
            InputAction::Move(Direction::Left) => "moveLeft",
            InputAction::Move(Direction::Right) => "moveRight",
            InputAction::Select => "select",
            InputAction::Restart => "restart",
            InputAction::ToggleMode => "toggleMode",
            InputAction::Quit => "quit",
        }
    }
}
