//! Bucketed transposition table.
//!
//! The table is a flat array of cache-line-sized buckets, each holding
//! [`BUCKET_SIZE`] entries (spec requires at least 4 per bucket). A probe
//! scans the bucket linearly for a matching key; on a miss it also picks
//! the weakest entry in the bucket as a replacement candidate, the same
//! `depth - relative_age` scoring an aging replacement policy needs.

use super::entry::{TTData, TTEntry};
use crate::types::{Bound, Depth, Value};
use std::sync::atomic::{AtomicU8, Ordering};

pub const BUCKET_SIZE: usize = 4;
/// Generation bump applied once per top-level search (`evolve()` in the
/// original engine); left coarser than 1 so low-order bits stay free for
/// future per-entry flags without colliding with the generation counter.
pub const GENERATION_DELTA: u8 = 1;

#[repr(C, align(64))]
struct Bucket {
    entries: [TTEntry; BUCKET_SIZE],
}

const _: () = assert!(std::mem::size_of::<Bucket>() == 64);

impl Bucket {
    const fn new() -> Bucket {
        Bucket {
            entries: [TTEntry::new(), TTEntry::new(), TTEntry::new(), TTEntry::new()],
        }
    }
}

pub struct TranspositionTable {
    buckets: Vec<Bucket>,
    bucket_count: usize,
    generation: AtomicU8,
}

impl TranspositionTable {
    /// `mb_size` megabytes, rounded down to a whole number of buckets
    /// (minimum 1).
    pub fn new(mb_size: usize) -> TranspositionTable {
        let bucket_count = ((mb_size * 1024 * 1024) / std::mem::size_of::<Bucket>()).max(1);
        let mut buckets = Vec::with_capacity(bucket_count);
        buckets.resize_with(bucket_count, Bucket::new);
        TranspositionTable {
            buckets,
            bucket_count,
            generation: AtomicU8::new(0),
        }
    }

    pub fn resize(&mut self, mb_size: usize) {
        let bucket_count = ((mb_size * 1024 * 1024) / std::mem::size_of::<Bucket>()).max(1);
        if bucket_count != self.bucket_count {
            let mut buckets = Vec::with_capacity(bucket_count);
            buckets.resize_with(bucket_count, Bucket::new);
            self.buckets = buckets;
            self.bucket_count = bucket_count;
        }
    }

    pub fn clear(&mut self) {
        self.generation.store(0, Ordering::Relaxed);
        for bucket in &mut self.buckets {
            *bucket = Bucket::new();
        }
    }

    /// Bumps the generation counter. Called once per `before()` at the
    /// start of a new top-level search so stale entries start aging out.
    pub fn evolve(&self) {
        self.generation.fetch_add(GENERATION_DELTA, Ordering::Relaxed);
    }

    pub fn generation(&self) -> u8 {
        self.generation.load(Ordering::Relaxed)
    }

    #[inline]
    fn bucket_index(&self, key: u64) -> usize {
        ((key as u128 * self.bucket_count as u128) >> 64) as usize
    }

    /// Looks up `key`. On a hit, `value` is still root-normalized (ply
    /// `0`); callers must `from_tt(ply)` it themselves before comparing
    /// against the current node's window.
    pub fn probe(&self, key: u64) -> Option<TTData> {
        let bucket = &self.buckets[self.bucket_index(key)];
        for entry in &bucket.entries {
            if let Some(data) = entry.read(key) {
                return Some(data);
            }
        }
        None
    }

    /// Stores a search result. `value` must already be root-normalized
    /// (`Value::to_tt`). `ply` is passed only so callers of `probe`/
    /// `store` share one normalization convention with the searcher;
    /// the table itself does not need it.
    ///
    /// Move-preservation rule: if this key is already present, a new
    /// entry at depth >= the stored depth promotes its move to the
    /// primary slot (demoting the old primary to the secondary hint);
    /// a shallower new entry keeps the deeper, more trusted primary
    /// move and records the new move only as the secondary hint.
    pub fn store(&self, key: u64, value: Value, bound: Bound, depth: Depth, best_move_code: u16) {
        let bucket = &self.buckets[self.bucket_index(key)];
        let generation = self.generation();

        for entry in &bucket.entries {
            if let Some(existing) = entry.read(key) {
                let (move1, move2) = if best_move_code == 0 {
                    (existing.move1, existing.move2)
                } else if depth >= existing.depth {
                    (best_move_code, existing.move1)
                } else {
                    (existing.move1, best_move_code)
                };
                entry.write(
                    key,
                    TTData { move1, move2, value, depth, generation, bound },
                );
                return;
            }
        }

        let mut replace = &bucket.entries[0];
        let mut min_score = i32::MAX;
        for entry in &bucket.entries {
            let score = entry.depth().raw() - entry.relative_age(generation) as i32;
            if score < min_score {
                min_score = score;
                replace = entry;
            }
        }
        replace.write(
            key,
            TTData { move1: best_move_code, move2: 0, value, depth, generation, bound },
        );
    }

    /// Fraction of sampled buckets occupied, in permille, for `info`
    /// reporting.
    pub fn hashfull(&self) -> i32 {
        let sample = self.bucket_count.min(250);
        if sample == 0 {
            return 0;
        }
        let mut occupied = 0;
        for bucket in self.buckets.iter().take(sample) {
            for entry in &bucket.entries {
                if entry.is_occupied() {
                    occupied += 1;
                }
            }
        }
        ((occupied * 1000) / (sample * BUCKET_SIZE)) as i32
    }
}
