//! Sequence generation - builds one round's scrolling track
//!
//! A sequence is a run of consecutive values (3 to 7 slots, all within 1..=9)
//! where some slots are gaps. Gap positions are picked one at a time among
//! the positions that would not create three adjacent gaps; when no such
//! position is left the sequence simply ends up with fewer gaps than asked.

use arrayvec::ArrayVec;
use thiserror::Error;
use tracing::debug;

use crate::catalog::TileCatalog;
use crate::rng::RandomSource;
use crate::types::{
    Family, Mode, SequenceSlot, Tile, MAX_GAPS, MAX_GAP_RUN, MAX_SEQUENCE_LEN, MAX_TILE_VALUE,
    MIN_SEQUENCE_LEN, MIN_TILE_VALUE,
};

/// Sequence gap positions, ascending.
pub type GapPositions = ArrayVec<usize, MAX_GAPS>;

/// Why a hand-built sequence was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("sequence length {0} outside 3..=7")]
    Length(usize),
    #[error("slot {index} has value {found}, expected {expected}")]
    NotConsecutive { index: usize, expected: u8, found: u8 },
    #[error("slot values leave the 1..=9 range")]
    OutOfRange,
    #[error("sequence has no gaps")]
    NoGaps,
    #[error("sequence has no visible tiles")]
    NoFilledSlots,
    #[error("sequence has more than two adjacent gaps")]
    GapRun,
    #[error("slot {index} is {found:?}, sequence family is {expected:?}")]
    FamilyMismatch {
        index: usize,
        expected: Family,
        found: Family,
    },
}

/// How filled slots pick their family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyPlan {
    /// Every filled slot uses this family (uniform mode).
    Single(Family),
    /// Each filled slot draws its own random family (diverse mode).
    PerSlot,
}

/// One round's scrolling track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    start: u8,
    slots: ArrayVec<SequenceSlot, MAX_SEQUENCE_LEN>,
    family: Option<Family>,
    requested_gaps: usize,
}

impl Sequence {
    /// Build a sequence from explicit slots, checking every track invariant.
    ///
    /// `family` is the uniform-mode family, if any.
    pub fn from_slots(slots: &[SequenceSlot], family: Option<Family>) -> Result<Self, SequenceError> {
        if !(MIN_SEQUENCE_LEN..=MAX_SEQUENCE_LEN).contains(&slots.len()) {
            return Err(SequenceError::Length(slots.len()));
        }
        let start = slots[0].value();
        let last = start as usize + slots.len() - 1;
        if start < MIN_TILE_VALUE || last > MAX_TILE_VALUE as usize {
            return Err(SequenceError::OutOfRange);
        }
        for (index, slot) in slots.iter().enumerate() {
            let expected = start + index as u8;
            if slot.value() != expected {
                return Err(SequenceError::NotConsecutive {
                    index,
                    expected,
                    found: slot.value(),
                });
            }
        }

        if let Some(expected) = family {
            for (index, slot) in slots.iter().enumerate() {
                if let SequenceSlot::Filled(tile) = slot {
                    if tile.family() != expected {
                        return Err(SequenceError::FamilyMismatch {
                            index,
                            expected,
                            found: tile.family(),
                        });
                    }
                }
            }
        }

        let gaps = slots.iter().filter(|s| s.is_gap()).count();
        if gaps == 0 {
            return Err(SequenceError::NoGaps);
        }
        if gaps == slots.len() {
            return Err(SequenceError::NoFilledSlots);
        }

        let sequence = Self {
            start,
            slots: slots.iter().copied().collect(),
            family,
            requested_gaps: gaps,
        };
        if sequence.longest_gap_run() > MAX_GAP_RUN {
            return Err(SequenceError::GapRun);
        }
        Ok(sequence)
    }

    pub fn start(&self) -> u8 {
        self.start
    }

    /// Value of the last slot.
    pub fn end(&self) -> u8 {
        self.start + self.slots.len() as u8 - 1
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[SequenceSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<SequenceSlot> {
        self.slots.get(index).copied()
    }

    /// The single family of a uniform-mode sequence.
    pub fn family(&self) -> Option<Family> {
        self.family
    }

    /// Gap count asked for before the adjacency filter.
    pub fn requested_gaps(&self) -> usize {
        self.requested_gaps
    }

    pub fn gap_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_gap()).count()
    }

    /// Gap positions in ascending order.
    pub fn gap_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_gap())
            .map(|(i, _)| i)
    }

    /// Expected gap values in ascending position order.
    pub fn gap_values(&self) -> impl Iterator<Item = u8> + '_ {
        self.slots.iter().filter(|s| s.is_gap()).map(|s| s.value())
    }

    /// Longest run of adjacent gap slots.
    pub fn longest_gap_run(&self) -> usize {
        let mut longest = 0;
        let mut run = 0;
        for slot in &self.slots {
            if slot.is_gap() {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 0;
            }
        }
        longest
    }
}

/// Whether choosing `candidate` would create a run of more than
/// [`MAX_GAP_RUN`] adjacent gap positions.
pub fn creates_gap_run(chosen: &[bool], candidate: usize) -> bool {
    let left = chosen[..candidate].iter().rev().take_while(|c| **c).count();
    let right = chosen[candidate + 1..].iter().take_while(|c| **c).count();
    left + 1 + right > MAX_GAP_RUN
}

/// Pick up to `requested` gap positions in `0..length`.
///
/// Positions are drawn one at a time, uniformly among the positions that are
/// still free and would not create a long gap run. Stops early when no such
/// position remains. The result is sorted ascending.
pub fn choose_gap_positions<R: RandomSource + ?Sized>(
    length: usize,
    requested: usize,
    rng: &mut R,
) -> GapPositions {
    let length = length.min(MAX_SEQUENCE_LEN);
    let requested = requested.min(length.saturating_sub(1)).min(MAX_GAPS);
    let mut chosen = [false; MAX_SEQUENCE_LEN];
    let mut positions = GapPositions::new();

    while positions.len() < requested {
        let candidates: ArrayVec<usize, MAX_SEQUENCE_LEN> = (0..length)
            .filter(|&p| !chosen[p] && !creates_gap_run(&chosen[..length], p))
            .collect();
        if candidates.is_empty() {
            break;
        }
        let pick = candidates[rng.index(candidates.len())];
        chosen[pick] = true;
        positions.push(pick);
    }

    positions.sort_unstable();
    positions
}

/// Builds sequences for a mode from the catalog
#[derive(Debug, Clone, Copy)]
pub struct SequenceGenerator<'a> {
    catalog: &'a TileCatalog,
}

impl<'a> SequenceGenerator<'a> {
    pub fn new(catalog: &'a TileCatalog) -> Self {
        Self { catalog }
    }

    /// Generate a random sequence for `mode`.
    ///
    /// Never returns a sequence without gaps; such draws are retried.
    pub fn generate<R: RandomSource + ?Sized>(&self, mode: Mode, rng: &mut R) -> Sequence {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let length = rng.range_inclusive(MIN_SEQUENCE_LEN as u32, MAX_SEQUENCE_LEN as u32) as usize;
            let gap_count = rng.range_inclusive(1, length as u32 - 1) as usize;
            let last_start = MAX_TILE_VALUE as usize - length + 1;
            let start = rng.range_inclusive(MIN_TILE_VALUE as u32, last_start as u32) as u8;
            let plan = match mode {
                Mode::Uniform => FamilyPlan::Single(Family::ALL[rng.index(Family::ALL.len())]),
                Mode::Diverse => FamilyPlan::PerSlot,
            };

            let sequence = self.generate_with(length, gap_count, start, plan, rng);
            if sequence.gap_count() > 0 {
                return sequence;
            }
            debug!(attempts, length, "sequence came out without gaps, regenerating");
        }
    }

    /// Generate with explicit parameters.
    ///
    /// Out-of-range arguments are clamped: `length` to 3..=7, `start` so the
    /// track stays within 1..=9, and `requested_gaps` to `length - 1`.
    pub fn generate_with<R: RandomSource + ?Sized>(
        &self,
        length: usize,
        requested_gaps: usize,
        start: u8,
        plan: FamilyPlan,
        rng: &mut R,
    ) -> Sequence {
        let length = length.clamp(MIN_SEQUENCE_LEN, MAX_SEQUENCE_LEN);
        let last_start = MAX_TILE_VALUE - length as u8 + 1;
        let start = start.clamp(MIN_TILE_VALUE, last_start);
        let requested_gaps = requested_gaps.min(length - 1);

        let gaps = choose_gap_positions(length, requested_gaps, rng);

        let mut slots = ArrayVec::new();
        for i in 0..length {
            let value = start + i as u8;
            if gaps.contains(&i) {
                slots.push(SequenceSlot::Gap(value));
                continue;
            }
            let family = match plan {
                FamilyPlan::Single(family) => family,
                FamilyPlan::PerSlot => Family::ALL[rng.index(Family::ALL.len())],
            };
            slots.push(self.filled_slot(family, value));
        }

        Sequence {
            start,
            slots,
            family: match plan {
                FamilyPlan::Single(family) => Some(family),
                FamilyPlan::PerSlot => None,
            },
            requested_gaps,
        }
    }

    fn filled_slot(&self, family: Family, value: u8) -> SequenceSlot {
        match self.catalog.tile(family, value) {
            Some(tile) => SequenceSlot::Filled(tile),
            // Values are clamped into 1..=9 above, so the catalog always has the tile.
            None => SequenceSlot::Gap(value),
        }
    }
}

/// Convenience for building test and demo tracks: `None` marks a gap.
pub fn sequence_from_values(
    family: Family,
    values: &[Option<u8>],
    start: u8,
) -> Result<Sequence, SequenceError> {
    if values.len() > MAX_SEQUENCE_LEN {
        return Err(SequenceError::Length(values.len()));
    }
    let mut slots: ArrayVec<SequenceSlot, MAX_SEQUENCE_LEN> = ArrayVec::new();
    for (i, value) in values.iter().enumerate() {
        let slot = match *value {
            Some(v) => {
                let tile = Tile::new(family, v).ok_or(SequenceError::OutOfRange)?;
                SequenceSlot::Filled(tile)
            }
            None => SequenceSlot::Gap(start.saturating_add(i as u8)),
        };
        slots.push(slot);
    }
    Sequence::from_slots(&slots, Some(family))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;

    #[test]
    fn test_creates_gap_run() {
        let chosen = [true, true, false, false, false];
        assert!(creates_gap_run(&chosen, 2));
        assert!(!creates_gap_run(&chosen, 3));

        let chosen = [false, true, false, true, false];
        assert!(creates_gap_run(&chosen, 2));
        assert!(!creates_gap_run(&chosen, 0));
        assert!(!creates_gap_run(&chosen, 4));
    }

    #[test]
    fn test_choose_gap_positions_sorted_and_distinct() {
        let mut rng = SimpleRng::new(42);
        for _ in 0..200 {
            let positions = choose_gap_positions(7, 4, &mut rng);
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
            assert!(positions.iter().all(|p| *p < 7));
        }
    }

    #[test]
    fn test_choose_gap_positions_caps_request() {
        let mut rng = SimpleRng::new(1);
        let positions = choose_gap_positions(3, 10, &mut rng);
        assert!(positions.len() <= 2);
        assert!(!positions.is_empty());
    }

    #[test]
    fn test_generate_with_respects_family_plan() {
        let catalog = TileCatalog::standard();
        let generator = SequenceGenerator::new(&catalog);
        let mut rng = SimpleRng::new(8);

        let seq = generator.generate_with(6, 2, 3, FamilyPlan::Single(Family::Dot), &mut rng);
        assert_eq!(seq.family(), Some(Family::Dot));
        for slot in seq.slots() {
            if let SequenceSlot::Filled(tile) = slot {
                assert_eq!(tile.family(), Family::Dot);
            }
        }

        let seq = generator.generate_with(6, 2, 3, FamilyPlan::PerSlot, &mut rng);
        assert_eq!(seq.family(), None);
    }

    #[test]
    fn test_generate_with_clamps_arguments() {
        let catalog = TileCatalog::standard();
        let generator = SequenceGenerator::new(&catalog);
        let mut rng = SimpleRng::new(8);

        let seq = generator.generate_with(12, 9, 8, FamilyPlan::PerSlot, &mut rng);
        assert_eq!(seq.len(), 7);
        assert_eq!(seq.start(), 3);
        assert_eq!(seq.end(), 9);
        assert_eq!(seq.requested_gaps(), 6);
    }

    #[test]
    fn test_generate_never_returns_gapless_sequences() {
        let catalog = TileCatalog::standard();
        let generator = SequenceGenerator::new(&catalog);
        let mut rng = SimpleRng::new(2024);
        for _ in 0..500 {
            let seq = generator.generate(Mode::Diverse, &mut rng);
            assert!(seq.gap_count() >= 1);
            assert!(seq.gap_count() < seq.len());
        }
    }

    #[test]
    fn test_from_slots_validates() {
        let f = Family::Bamboo;
        assert!(sequence_from_values(f, &[Some(2), None, Some(4)], 2).is_ok());
        assert_eq!(
            sequence_from_values(f, &[Some(2), Some(3), Some(4)], 2),
            Err(SequenceError::NoGaps)
        );
        assert_eq!(
            sequence_from_values(f, &[None, None, None], 2),
            Err(SequenceError::NoFilledSlots)
        );
        assert_eq!(
            sequence_from_values(f, &[Some(1), None, None, None, Some(5)], 1),
            Err(SequenceError::GapRun)
        );
        assert_eq!(
            sequence_from_values(f, &[Some(2), Some(5), None], 2),
            Err(SequenceError::NotConsecutive {
                index: 1,
                expected: 3,
                found: 5
            })
        );
        assert_eq!(
            sequence_from_values(f, &[Some(2), None], 2),
            Err(SequenceError::Length(2))
        );
    }

    #[test]
    fn test_invalid_tile_value_is_rejected_not_gapped() {
        assert_eq!(
            sequence_from_values(Family::Dot, &[Some(0), None, Some(2)], 0),
            Err(SequenceError::OutOfRange)
        );
        assert_eq!(
            sequence_from_values(Family::Dot, &[Some(7), Some(8), None, Some(10)], 7),
            Err(SequenceError::OutOfRange)
        );
    }

    #[test]
    fn test_from_slots_rejects_foreign_family() {
        let dot = |v| SequenceSlot::Filled(Tile::new(Family::Dot, v).unwrap());
        let bamboo = |v| SequenceSlot::Filled(Tile::new(Family::Bamboo, v).unwrap());
        let slots = [dot(3), SequenceSlot::Gap(4), bamboo(5)];

        assert_eq!(
            Sequence::from_slots(&slots, Some(Family::Dot)),
            Err(SequenceError::FamilyMismatch {
                index: 2,
                expected: Family::Dot,
                found: Family::Bamboo
            })
        );
        // Diverse tracks mix families freely.
        assert!(Sequence::from_slots(&slots, None).is_ok());
    }

    #[test]
    fn test_gap_values_follow_positions() {
        let seq =
            sequence_from_values(Family::Character, &[None, Some(4), None, Some(6), None], 3)
                .unwrap();
        assert_eq!(seq.gap_positions().collect::<Vec<_>>(), vec![0, 2, 4]);
        assert_eq!(seq.gap_values().collect::<Vec<_>>(), vec![3, 5, 7]);
        assert_eq!(seq.longest_gap_run(), 1);
    }
}
