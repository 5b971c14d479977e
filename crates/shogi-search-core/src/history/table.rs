//! History heuristic: per (piece, to-square) counters of how often a
//! move was tried (`appear`) versus how often it caused a beta-cut or
//! improved the best move (`good`). Move ordering and late-move
//! reduction both read the `good / appear` ratio; see
//! [`HistoryTable::reduction_depth`].

use crate::board::{ShogiMove, PIECE_INDEX_COUNT};
use crate::types::{Depth, Square};
use std::sync::atomic::{AtomicU32, Ordering};

/// Real OS worker threads in a parallel search (§4.G.7) update this
/// table concurrently; it is advisory and tolerates races, so plain
/// relaxed atomics are enough — no lock, no `UnsafeCell`.
pub struct HistoryTable {
    appear: Vec<AtomicU32>,
    good: Vec<AtomicU32>,
}

fn key(piece_index: usize, to: Square) -> usize {
    piece_index * Square::NUM + to.index()
}

impl HistoryTable {
    pub fn new() -> HistoryTable {
        let len = PIECE_INDEX_COUNT * Square::NUM;
        HistoryTable {
            appear: (0..len).map(|_| AtomicU32::new(0)).collect(),
            good: (0..len).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    pub fn clear(&self) {
        for a in &self.appear {
            a.store(0, Ordering::Relaxed);
        }
        for g in &self.good {
            g.store(0, Ordering::Relaxed);
        }
    }

    pub fn add(&self, piece_index: usize, to: Square, appear: u32, good: u32) {
        let i = key(piece_index, to);
        self.appear[i].fetch_add(appear, Ordering::Relaxed);
        self.good[i].fetch_add(good, Ordering::Relaxed);
    }

    pub fn get(&self, piece_index: usize, to: Square) -> (u32, u32) {
        let i = key(piece_index, to);
        (self.appear[i].load(Ordering::Relaxed), self.good[i].load(Ordering::Relaxed))
    }

    /// Halves every counter; called once per `before()` between
    /// top-level searches so old statistics decay rather than persist
    /// forever.
    pub fn reduce(&self) {
        for a in &self.appear {
            a.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| Some(v / 2)).ok();
        }
        for g in &self.good {
            g.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| Some(v / 2)).ok();
        }
    }

    /// Move-ordering score for sorting quiet moves/evasions before the
    /// reduction brackets apply (the original engine's `sortHistory`).
    /// No surviving source fixes an exact scale for this — only relative
    /// order feeds into move ordering, so this uses `good / (appear + 1)`
    /// scaled into an integer range wide enough to sort stably.
    pub fn sort_ratio(&self, piece_index: usize, to: Square) -> i32 {
        let (appear, good) = self.get(piece_index, to);
        ((good as i64 * 1024) / (appear as i64 + 1)) as i32
    }

    /// Late-move-reduction amount for `mv`, in `Depth` subunits. The
    /// brackets differ between a wide (PV) window and a null-window
    /// scout node — the null window tolerates a more aggressive
    /// reduction since a fail-low there is cheap to recheck.
    pub fn reduction_depth(&self, mv: &impl ShogiMove, is_null_window: bool) -> Depth {
        let (appear, good) = self.get(mv.piece_index(), mv.to());
        let good = good as u64;
        let appear = appear as u64;

        if !is_null_window {
            if good * 20 < appear {
                Depth(Depth::ONE_PLY * 3 / 2)
            } else if good * 7 < appear {
                Depth(Depth::ONE_PLY * 2 / 2)
            } else if good * 3 < appear {
                Depth(Depth::ONE_PLY * 1 / 2)
            } else {
                Depth(0)
            }
        } else if good * 10 < appear {
            Depth(Depth::ONE_PLY * 4 / 2)
        } else if good * 6 < appear {
            Depth(Depth::ONE_PLY * 3 / 2)
        } else if good * 4 < appear {
            Depth(Depth::ONE_PLY * 2 / 2)
        } else if good * 2 < appear {
            Depth(Depth::ONE_PLY * 1 / 2)
        } else {
            Depth(0)
        }
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        HistoryTable::new()
    }
}
