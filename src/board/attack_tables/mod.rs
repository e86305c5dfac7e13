//! Attack tables for move generation.
//!
//! Sliding pieces use magic bitboards: the occupancy relevant to a square is
//! multiplied by a precomputed constant and shifted down to a table index.
//! The constants come from `magics.rs` and are never searched for at runtime,
//! but every one of them is checked exhaustively when the tables are built:
//! each subset of a square's relevance mask is ray-cast and must land on a
//! slot that holds either nothing yet or the same attack set.

mod magics;
mod tables;

use std::fmt;

use log::info;
use once_cell::sync::Lazy;
use thiserror::Error;

use crate::board::types::{Bitboard, Color, Square};

pub(crate) use magics::{BISHOP_MAGICS, ROOK_MAGICS};

/// Widest lookup index accepted per square
const MAX_INDEX_BITS: u32 = 16;

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// The two sliding movement patterns with their own magic tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slider {
    Rook,
    Bishop,
}

impl Slider {
    const fn directions(self) -> &'static [(i8, i8); 4] {
        match self {
            Slider::Rook => &ROOK_DIRECTIONS,
            Slider::Bishop => &BISHOP_DIRECTIONS,
        }
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slider::Rook => write!(f, "rook"),
            Slider::Bishop => write!(f, "bishop"),
        }
    }
}

/// Per-square magic multipliers and right-shift amounts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MagicSet {
    pub magics: [u64; 64],
    pub shifts: [u32; 64],
}

/// Attack-table construction failure. Always fatal for the process table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MagicError {
    /// Two occupancies with different attack sets hash to the same slot
    #[error("{slider} magic for {square} maps different attack sets to one slot")]
    Collision { slider: Slider, square: Square },
    /// The shift does not produce a usable index width
    #[error("{slider} shift {shift} for {square} gives an index width outside 1..={max} bits")]
    InvalidShift {
        slider: Slider,
        square: Square,
        shift: u32,
        max: u32,
    },
}

#[derive(Clone, Copy, Debug, Default)]
struct MagicEntry {
    mask: u64,
    magic: u64,
    shift: u32,
    offset: usize,
}

impl MagicEntry {
    #[inline(always)]
    fn index(&self, occupancy: u64) -> usize {
        ((occupancy & self.mask).wrapping_mul(self.magic) >> self.shift) as usize
    }
}

/// One flat table per slider, each square owning `1 << (64 - shift)` slots.
struct SliderTable {
    entries: [MagicEntry; 64],
    attacks: Vec<Bitboard>,
}

impl SliderTable {
    fn build(slider: Slider, set: &MagicSet) -> Result<Self, MagicError> {
        let mut entries = [MagicEntry::default(); 64];
        let mut attacks = Vec::new();

        for (idx, entry) in entries.iter_mut().enumerate() {
            let square = Square::from_index(idx);
            let shift = set.shifts[idx];
            if shift >= 64 || 64 - shift > MAX_INDEX_BITS {
                return Err(MagicError::InvalidShift {
                    slider,
                    square,
                    shift,
                    max: MAX_INDEX_BITS,
                });
            }

            let mask = relevance_mask(slider, square);
            *entry = MagicEntry {
                mask: mask.0,
                magic: set.magics[idx],
                shift,
                offset: attacks.len(),
            };

            let size = 1usize << (64 - shift);
            let mut slots: Vec<Option<Bitboard>> = vec![None; size];
            for occupancy in mask.subsets() {
                let attack = ray_attacks(slider, square, occupancy);
                let slot = &mut slots[entry.index(occupancy.0)];
                match *slot {
                    None => *slot = Some(attack),
                    Some(existing) if existing == attack => {}
                    Some(_) => return Err(MagicError::Collision { slider, square }),
                }
            }
            attacks.extend(slots.into_iter().map(Option::unwrap_or_default));
        }

        Ok(SliderTable { entries, attacks })
    }

    #[inline(always)]
    fn lookup(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let entry = &self.entries[sq.index()];
        self.attacks[entry.offset + entry.index(occupancy.0)]
    }
}

/// Every attack lookup the move generator needs.
pub struct AttackTables {
    rook: SliderTable,
    bishop: SliderTable,
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    pawn: [[Bitboard; 64]; 2],
}

impl AttackTables {
    /// Build and verify all tables from the given magic sets.
    pub fn build(rook: &MagicSet, bishop: &MagicSet) -> Result<Self, MagicError> {
        Ok(AttackTables {
            rook: SliderTable::build(Slider::Rook, rook)?,
            bishop: SliderTable::build(Slider::Bishop, bishop)?,
            knight: tables::knight_table(),
            king: tables::king_table(),
            pawn: tables::pawn_table(),
        })
    }

    #[inline]
    #[must_use]
    pub fn rook(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        self.rook.lookup(sq, occupancy)
    }

    #[inline]
    #[must_use]
    pub fn bishop(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        self.bishop.lookup(sq, occupancy)
    }

    /// Number of slots in the rook and bishop tables
    #[must_use]
    pub fn slot_counts(&self) -> (usize, usize) {
        (self.rook.attacks.len(), self.bishop.attacks.len())
    }
}

static ATTACK_TABLES: Lazy<AttackTables> = Lazy::new(|| {
    match AttackTables::build(&ROOK_MAGICS, &BISHOP_MAGICS) {
        Ok(tables) => {
            let (rook, bishop) = tables.slot_counts();
            info!("attack tables verified: {rook} rook slots, {bishop} bishop slots");
            tables
        }
        Err(err) => panic!("attack table construction failed: {err}"),
    }
});

/// Build the process-wide tables now instead of on first lookup.
pub fn init_attack_tables() -> &'static AttackTables {
    &*ATTACK_TABLES
}

#[inline]
#[must_use]
pub fn rook_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    ATTACK_TABLES.rook.lookup(sq, occupancy)
}

#[inline]
#[must_use]
pub fn bishop_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    ATTACK_TABLES.bishop.lookup(sq, occupancy)
}

#[inline]
#[must_use]
pub fn queen_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    rook_attacks(sq, occupancy) | bishop_attacks(sq, occupancy)
}

#[inline]
#[must_use]
pub fn knight_attacks(sq: Square) -> Bitboard {
    ATTACK_TABLES.knight[sq.index()]
}

#[inline]
#[must_use]
pub fn king_attacks(sq: Square) -> Bitboard {
    ATTACK_TABLES.king[sq.index()]
}

/// Squares a pawn of `color` standing on `sq` attacks
#[inline]
#[must_use]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    ATTACK_TABLES.pawn[color.index()][sq.index()]
}

/// Squares whose occupancy can change a slider's attacks from `sq`.
///
/// Each ray stops one short of the board edge, since the last square in a
/// direction is attacked whether or not it is occupied.
pub(crate) fn relevance_mask(slider: Slider, sq: Square) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    for &(dr, df) in slider.directions() {
        let mut current = sq;
        while let Some(next) = current.offset(dr, df) {
            if next.offset(dr, df).is_none() {
                break;
            }
            mask |= Bitboard::from_square(next);
            current = next;
        }
    }
    mask
}

/// Attacks found by walking each ray until a blocker (included) or the edge.
pub(crate) fn ray_attacks(slider: Slider, sq: Square, occupancy: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &(dr, df) in slider.directions() {
        let mut current = sq;
        while let Some(next) = current.offset(dr, df) {
            attacks |= Bitboard::from_square(next);
            if occupancy.contains(next) {
                break;
            }
            current = next;
        }
    }
    attacks
}
