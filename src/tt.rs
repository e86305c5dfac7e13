//! Transposition table for caching search results.
//!
//! Fixed capacity, bucketed, keyed by the position hash. Each slot holds
//! two atomic words written with the XOR technique (`key ^ data`, `data`),
//! so a slot overwritten between the two loads fails verification instead
//! of returning another position's entry.

use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::board::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundType {
    Exact,      // Score is the exact value
    LowerBound, // Score is at least this value (failed high - score >= beta)
    UpperBound, // Score is at most this value (failed low - score <= alpha)
}

impl BoundType {
    fn to_bits(self) -> u64 {
        match self {
            BoundType::Exact => 0,
            BoundType::LowerBound => 1,
            BoundType::UpperBound => 2,
        }
    }

    fn from_bits(v: u64) -> Self {
        match v & 0x3 {
            0 => BoundType::Exact,
            1 => BoundType::LowerBound,
            _ => BoundType::UpperBound,
        }
    }
}

/// Unpacked TT entry for reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    pub depth: u8,
    pub score: i16,
    pub bound_type: BoundType,
    pub best_move: Option<Move>,
    pub generation: u8,
}

impl TTEntry {
    pub fn depth(&self) -> u32 {
        u32::from(self.depth)
    }

    pub fn score(&self) -> i32 {
        i32::from(self.score)
    }

    pub fn bound_type(&self) -> BoundType {
        self.bound_type
    }

    pub fn best_move(&self) -> Option<Move> {
        self.best_move
    }
}

const MOVE_BITS: u32 = 19;
const SCORE_SHIFT: u32 = MOVE_BITS;
const DEPTH_SHIFT: u32 = SCORE_SHIFT + 16;
const BOUND_SHIFT: u32 = DEPTH_SHIFT + 8;
const GEN_SHIFT: u32 = BOUND_SHIFT + 2;
const GEN_MASK: u64 = 0x3F;
/// Set in every stored entry so an all-zero payload never looks empty
const OCCUPIED: u64 = 1 << 63;

/// Packed entry format (one u64):
/// - bits 0-18:  move (0 = no move)
/// - bits 19-34: score (i16 as u16)
/// - bits 35-42: depth
/// - bits 43-44: bound
/// - bits 45-50: generation
/// - bit 63:     occupied
fn pack_entry(
    depth: u8,
    score: i16,
    bound_type: BoundType,
    best_move: Option<Move>,
    generation: u8,
) -> u64 {
    let mv = u64::from(best_move.map_or(0, Move::as_u32));
    mv | (u64::from(score as u16) << SCORE_SHIFT)
        | (u64::from(depth) << DEPTH_SHIFT)
        | (bound_type.to_bits() << BOUND_SHIFT)
        | ((u64::from(generation) & GEN_MASK) << GEN_SHIFT)
        | OCCUPIED
}

fn unpack_entry(data: u64) -> TTEntry {
    let mv = Move::from_u32((data & ((1 << MOVE_BITS) - 1)) as u32);
    TTEntry {
        depth: (data >> DEPTH_SHIFT) as u8,
        score: (data >> SCORE_SHIFT) as u16 as i16,
        bound_type: BoundType::from_bits(data >> BOUND_SHIFT),
        best_move: (!mv.is_null()).then_some(mv),
        generation: ((data >> GEN_SHIFT) & GEN_MASK) as u8,
    }
}

#[repr(C)]
struct TTSlot {
    /// hash ^ packed data
    key_xor: AtomicU64,
    data: AtomicU64,
}

impl TTSlot {
    fn new() -> Self {
        TTSlot {
            key_xor: AtomicU64::new(0),
            data: AtomicU64::new(0),
        }
    }

    fn store(&self, hash: u64, packed: u64) {
        self.data.store(packed, Ordering::Relaxed);
        self.key_xor.store(hash ^ packed, Ordering::Relaxed);
    }

    fn probe(&self, hash: u64) -> Option<TTEntry> {
        let key_xor = self.key_xor.load(Ordering::Relaxed);
        let data = self.data.load(Ordering::Relaxed);
        (data != 0 && key_xor ^ data == hash).then(|| unpack_entry(data))
    }

    fn is_empty(&self) -> bool {
        self.data.load(Ordering::Relaxed) == 0
    }

    fn clear(&self) {
        self.key_xor.store(0, Ordering::Relaxed);
        self.data.store(0, Ordering::Relaxed);
    }

    fn generation(&self) -> u8 {
        ((self.data.load(Ordering::Relaxed) >> GEN_SHIFT) & GEN_MASK) as u8
    }

    fn depth(&self) -> u8 {
        (self.data.load(Ordering::Relaxed) >> DEPTH_SHIFT) as u8
    }
}

const BUCKET_SIZE: usize = 4;

#[repr(C)]
struct TTBucket {
    slots: [TTSlot; BUCKET_SIZE],
}

impl TTBucket {
    fn new() -> Self {
        TTBucket {
            slots: std::array::from_fn(|_| TTSlot::new()),
        }
    }
}

/// Fixed-capacity transposition table.
pub struct TranspositionTable {
    buckets: Vec<TTBucket>,
    mask: usize,
}

impl TranspositionTable {
    /// Create a table using at most `size_mb` megabytes.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let bucket_size = mem::size_of::<TTBucket>();
        let num_buckets = match (size_mb * 1024 * 1024) / bucket_size {
            0 => 1024,
            n if n.is_power_of_two() => n,
            n => n.next_power_of_two() / 2,
        };

        TranspositionTable {
            buckets: (0..num_buckets).map(|_| TTBucket::new()).collect(),
            mask: num_buckets - 1,
        }
    }

    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Number of entry slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len() * BUCKET_SIZE
    }

    /// Probe the table for an entry matching the given hash.
    pub fn probe(&self, hash: u64) -> Option<TTEntry> {
        self.buckets[self.index(hash)]
            .slots
            .iter()
            .find_map(|slot| slot.probe(hash))
    }

    /// Store an entry in the table.
    ///
    /// Replacement prefers, in order: an empty slot, the slot already holding
    /// this position, then the slot with the lowest depth adjusted for age.
    pub fn store(
        &self,
        hash: u64,
        depth: u32,
        score: i32,
        bound_type: BoundType,
        best_move: Option<Move>,
        generation: u8,
    ) {
        let depth_u8 = depth.min(u32::from(u8::MAX)) as u8;
        let score_i16 = score.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
        let gen_u8 = generation & GEN_MASK as u8;

        let packed = pack_entry(depth_u8, score_i16, bound_type, best_move, gen_u8);
        let bucket = &self.buckets[self.index(hash)];

        for slot in &bucket.slots {
            if slot.is_empty() || slot.probe(hash).is_some() {
                slot.store(hash, packed);
                return;
            }
        }

        let victim = bucket
            .slots
            .iter()
            .min_by_key(|slot| {
                let age = gen_u8.wrapping_sub(slot.generation()) & GEN_MASK as u8;
                i32::from(slot.depth()) * 2 - i32::from(age)
            })
            .unwrap_or(&bucket.slots[0]);
        victim.store(hash, packed);
    }

    /// Table fullness in per mille (0-1000), sampled from the first buckets.
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let sample_size = self.buckets.len().min(1000);
        let occupied = self
            .buckets
            .iter()
            .take(sample_size)
            .flat_map(|bucket| bucket.slots.iter())
            .filter(|slot| !slot.is_empty())
            .count();

        ((occupied * 1000) / (sample_size * BUCKET_SIZE)) as u32
    }

    /// Clear all entries from the table.
    pub fn clear(&self) {
        for bucket in &self.buckets {
            for slot in &bucket.slots {
                slot.clear();
            }
        }
    }
}
