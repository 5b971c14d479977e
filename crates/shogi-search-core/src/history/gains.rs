//! Per (piece, to-square) maximum observed positional gain, used to
//! tighten futility pruning estimates. Kept as its own type rather than
//! folded into [`super::table::HistoryTable`], mirroring the original
//! engine's `Gains` class being a sibling of `History`, not a part of it.

use crate::board::{ShogiMove, PIECE_INDEX_COUNT};
use crate::types::{Square, Value};
use std::sync::atomic::{AtomicI32, Ordering};

pub struct Gains {
    values: Vec<AtomicI32>,
}

fn key(piece_index: usize, to: Square) -> usize {
    piece_index * Square::NUM + to.index()
}

impl Gains {
    pub fn new() -> Gains {
        let len = PIECE_INDEX_COUNT * Square::NUM;
        Gains { values: (0..len).map(|_| AtomicI32::new(0)).collect() }
    }

    pub fn clear(&self) {
        for v in &self.values {
            v.store(0, Ordering::Relaxed);
        }
    }

    /// `ref = max(ref - 1, gain)`: a non-improving move's recorded gain
    /// decays by one centipawn per update instead of snapping to the new
    /// (lower) observation, so a single bad sample doesn't erase a
    /// history of genuinely good ones.
    pub fn update<M: ShogiMove>(&self, mv: &M, gain: Value) {
        let i = key(mv.piece_index(), mv.to());
        self.values[i]
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                Some(Value::max(Value::new(v) - Value::new(1), gain).raw())
            })
            .ok();
    }

    pub fn get<M: ShogiMove>(&self, mv: &M) -> Value {
        let i = key(mv.piece_index(), mv.to());
        Value::new(self.values[i].load(Ordering::Relaxed))
    }
}

impl Default for Gains {
    fn default() -> Self {
        Gains::new()
    }
}
