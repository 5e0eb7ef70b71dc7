//! Round engine - resolves selections against the ordered gap queue
//!
//! Gaps are filled strictly left to right. Only the front of the queue can be
//! satisfied: a tile whose value matches a later gap is still a wrong pick.

use arrayvec::ArrayVec;

use crate::pool::SelectionPool;
use crate::sequence::Sequence;
use crate::timer::TimerToken;
use crate::types::{Tile, MAX_GAPS, MAX_SEQUENCE_LEN};

/// One outstanding gap: its slot in the sequence and the value it expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gap {
    pub slot: usize,
    pub value: u8,
}

/// Front-consumed queue of gaps in ascending slot order
///
/// The queue is never reordered. Consumed entries stay in the backing array
/// so the queue position of each gap remains addressable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapQueue {
    gaps: ArrayVec<Gap, MAX_GAPS>,
    head: usize,
}

impl GapQueue {
    pub fn from_sequence(sequence: &Sequence) -> Self {
        let gaps = sequence
            .gap_positions()
            .take(MAX_GAPS)
            .map(|slot| Gap {
                slot,
                value: sequence.slots()[slot].value(),
            })
            .collect();
        Self { gaps, head: 0 }
    }

    /// The gap that must be filled next.
    pub fn front(&self) -> Option<Gap> {
        self.gaps.get(self.head).copied()
    }

    /// Consume the front gap, returning its queue position.
    pub fn pop_front(&mut self) -> Option<(usize, Gap)> {
        let gap = self.front()?;
        let position = self.head;
        self.head += 1;
        Some((position, gap))
    }

    /// Drop every outstanding gap, returning their values.
    pub fn drain(&mut self) -> ArrayVec<u8, MAX_GAPS> {
        let values = self.values().collect();
        self.head = self.gaps.len();
        values
    }

    /// Outstanding gaps, front first.
    pub fn iter(&self) -> impl Iterator<Item = Gap> + '_ {
        self.gaps[self.head..].iter().copied()
    }

    /// Outstanding expected values, front first.
    pub fn values(&self) -> impl Iterator<Item = u8> + '_ {
        self.iter().map(|g| g.value)
    }

    pub fn len(&self) -> usize {
        self.gaps.len() - self.head
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gaps consumed so far (filled or forfeited).
    pub fn consumed(&self) -> usize {
        self.head
    }

    /// Gaps the round started with.
    pub fn total(&self) -> usize {
        self.gaps.len()
    }
}

/// Result of a selection that the engine accepted for judging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct {
        /// Queue position consumed (0 = leftmost gap).
        queue_position: usize,
        /// Sequence slot that was filled.
        slot: usize,
        tile: Tile,
        points: u32,
    },
    Incorrect {
        tile: Tile,
        expected: u8,
    },
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct { .. })
    }
}

/// A traversal that ended with gaps still open. Always costs one life.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Miss {
    pub unresolved: ArrayVec<u8, MAX_GAPS>,
}

/// Per-round state: the track, its gap queue and the pool
#[derive(Debug, Clone)]
pub struct RoundEngine {
    sequence: Sequence,
    placed: [Option<Tile>; MAX_SEQUENCE_LEN],
    gaps: GapQueue,
    pool: SelectionPool,
    points_per_gap: u32,
    forfeited: bool,
    token: Option<TimerToken>,
}

impl RoundEngine {
    pub fn new(sequence: Sequence, pool: SelectionPool, points_per_gap: u32) -> Self {
        let gaps = GapQueue::from_sequence(&sequence);
        Self {
            sequence,
            placed: [None; MAX_SEQUENCE_LEN],
            gaps,
            pool,
            points_per_gap,
            forfeited: false,
            token: None,
        }
    }

    /// Bind the round to the traversal countdown armed for it.
    pub fn with_token(mut self, token: TimerToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Token of the traversal countdown that belongs to this round.
    pub fn token(&self) -> Option<TimerToken> {
        self.token
    }

    /// Judge a tapped tile.
    ///
    /// Returns `None` (no-op) when the round has no open gaps or the tile is
    /// not on offer. A wrong pick leaves the tile in the pool.
    pub fn submit_selection(&mut self, tile: Tile) -> Option<Outcome> {
        let expected = self.gaps.front()?;
        if !self.pool.contains(tile) {
            return None;
        }

        if tile.value() != expected.value {
            return Some(Outcome::Incorrect {
                tile,
                expected: expected.value,
            });
        }

        self.pool.take(tile);
        let (queue_position, gap) = self.gaps.pop_front()?;
        self.placed[gap.slot] = Some(tile);
        Some(Outcome::Correct {
            queue_position,
            slot: gap.slot,
            tile,
            points: self.points_per_gap,
        })
    }

    /// True once no gaps are open (all filled, or forfeited).
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }

    /// True when every gap was filled by the player.
    pub fn is_cleared(&self) -> bool {
        self.is_complete() && !self.forfeited
    }

    pub fn is_forfeited(&self) -> bool {
        self.forfeited
    }

    /// The track finished its traversal. Forfeits every open gap and reports
    /// a single miss, or `None` if the round was already complete.
    pub fn on_time_expired(&mut self) -> Option<Miss> {
        if self.gaps.is_empty() {
            return None;
        }
        self.forfeited = true;
        Some(Miss {
            unresolved: self.gaps.drain(),
        })
    }

    /// The value the next tap must match.
    pub fn expected(&self) -> Option<u8> {
        self.gaps.front().map(|g| g.value)
    }

    pub fn next_gap(&self) -> Option<Gap> {
        self.gaps.front()
    }

    pub fn gap_queue(&self) -> &GapQueue {
        &self.gaps
    }

    pub fn remaining_gaps(&self) -> usize {
        self.gaps.len()
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn pool(&self) -> &SelectionPool {
        &self.pool
    }

    /// Tile the player placed into `slot`, if any.
    pub fn placed(&self, slot: usize) -> Option<Tile> {
        self.placed.get(slot).copied().flatten()
    }

    pub fn points_per_gap(&self) -> u32 {
        self.points_per_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TileCatalog;
    use crate::sequence::sequence_from_values;
    use crate::types::Family;

    fn uniform_round(values: &[Option<u8>], start: u8, family: Family) -> (RoundEngine, TileCatalog) {
        let catalog = TileCatalog::standard();
        let sequence = sequence_from_values(family, values, start).unwrap();
        let pool = SelectionPool::from_tiles(3, 3, catalog.suite(family).iter().copied());
        (RoundEngine::new(sequence, pool, 10), catalog)
    }

    #[test]
    fn test_correct_pick_fills_front_gap() {
        let (mut round, catalog) = uniform_round(&[Some(2), None, Some(4)], 2, Family::Bamboo);
        let three = catalog.tile(Family::Bamboo, 3).unwrap();

        let outcome = round.submit_selection(three).unwrap();
        assert_eq!(
            outcome,
            Outcome::Correct {
                queue_position: 0,
                slot: 1,
                tile: three,
                points: 10
            }
        );
        assert!(round.is_complete());
        assert!(round.is_cleared());
        assert!(!round.pool().contains(three));
        assert_eq!(round.placed(1), Some(three));
    }

    #[test]
    fn test_later_gap_value_is_incorrect() {
        let (mut round, catalog) =
            uniform_round(&[None, Some(4), None, Some(6)], 3, Family::Dot);
        let five = catalog.tile(Family::Dot, 5).unwrap();

        let outcome = round.submit_selection(five).unwrap();
        assert_eq!(
            outcome,
            Outcome::Incorrect {
                tile: five,
                expected: 3
            }
        );
        // Wrong picks stay on offer.
        assert!(round.pool().contains(five));
        assert_eq!(round.remaining_gaps(), 2);
    }

    #[test]
    fn test_queue_positions_advance_in_order() {
        let (mut round, catalog) =
            uniform_round(&[None, Some(4), None, Some(6)], 3, Family::Dot);
        let three = catalog.tile(Family::Dot, 3).unwrap();
        let five = catalog.tile(Family::Dot, 5).unwrap();

        match round.submit_selection(three) {
            Some(Outcome::Correct { queue_position, .. }) => assert_eq!(queue_position, 0),
            other => panic!("unexpected {:?}", other),
        }
        match round.submit_selection(five) {
            Some(Outcome::Correct {
                queue_position,
                slot,
                ..
            }) => {
                assert_eq!(queue_position, 1);
                assert_eq!(slot, 2);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(round.is_complete());
    }

    #[test]
    fn test_submit_after_complete_is_noop() {
        let (mut round, catalog) = uniform_round(&[Some(2), None, Some(4)], 2, Family::Bamboo);
        round.submit_selection(catalog.tile(Family::Bamboo, 3).unwrap());
        assert_eq!(
            round.submit_selection(catalog.tile(Family::Bamboo, 5).unwrap()),
            None
        );
    }

    #[test]
    fn test_tile_not_in_pool_is_noop() {
        let (mut round, catalog) = uniform_round(&[Some(2), None, Some(4)], 2, Family::Bamboo);
        // Right value, wrong family: not offered in a uniform bamboo pool.
        let other = catalog.tile(Family::Character, 3).unwrap();
        assert_eq!(round.submit_selection(other), None);
        assert_eq!(round.remaining_gaps(), 1);
    }

    #[test]
    fn test_expiry_is_a_single_miss() {
        let (mut round, _) =
            uniform_round(&[Some(4), None, Some(6), None], 4, Family::Character);
        assert_eq!(round.gap_queue().values().collect::<Vec<_>>(), vec![5, 7]);

        let miss = round.on_time_expired().unwrap();
        assert_eq!(miss.unresolved.as_slice(), &[5, 7]);
        assert!(round.is_complete());
        assert!(!round.is_cleared());
        assert_eq!(round.on_time_expired(), None);
    }

    #[test]
    fn test_is_complete_is_idempotent() {
        let (round, _) = uniform_round(&[Some(2), None, Some(4)], 2, Family::Bamboo);
        let first = round.is_complete();
        for _ in 0..5 {
            assert_eq!(round.is_complete(), first);
        }
    }

    #[test]
    fn test_gap_queue_bookkeeping() {
        let sequence =
            sequence_from_values(Family::Dot, &[None, Some(2), None, None, Some(5)], 1).unwrap();
        let mut queue = GapQueue::from_sequence(&sequence);
        assert_eq!(queue.total(), 3);
        assert_eq!(queue.front(), Some(Gap { slot: 0, value: 1 }));
        assert_eq!(queue.pop_front(), Some((0, Gap { slot: 0, value: 1 })));
        assert_eq!(queue.consumed(), 1);
        assert_eq!(queue.values().collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(queue.drain().as_slice(), &[3, 4]);
        assert!(queue.is_empty());
        assert_eq!(queue.pop_front(), None);
    }
}
