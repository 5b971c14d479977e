//! Repetition and hand-superiority detection (superior-hand/equal-hand/
//! king-repetition table, "SHEK").
//!
//! Every position made during the search (plus the game's move history,
//! primed once per top-level search via [`ShekTable::prime`]) is pushed
//! onto a per-board-key bucket. At each node the current position is
//! checked against every ancestor sharing its board (pieces on the
//! board and side to move, ignoring hands): an identical hand is a
//! repetition, a strictly better hand repeats a position the search
//! already explored from a worse starting material, and a strictly
//! worse hand is the symmetric loss.

use crate::board::{HandCompare, ShogiBoard};
use std::collections::HashMap;

/// Classification of the current position against its ancestors with a
/// matching [`ShogiBoard::board_only_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShekStat {
    /// No ancestor shares this position's board.
    None,
    /// Strictly dominates every matching ancestor's hand: the position
    /// was already searched from a worse footing, so this subtree can
    /// be scored as a win without searching further.
    Superior,
    /// Symmetric loss: a matching ancestor had a strictly better hand.
    Inferior,
    /// An ancestor has the identical hand: a repetition.
    ///
    /// TODO: this does not special-case perpetual check (continuous
    /// check repetition is a loss for the checking side, not a draw);
    /// it always scores as a draw.
    Equal,
}

pub struct ShekTable<B: ShogiBoard> {
    buckets: HashMap<u64, Vec<B>>,
}

impl<B: ShogiBoard> ShekTable<B> {
    pub fn new() -> ShekTable<B> {
        ShekTable { buckets: HashMap::new() }
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Pushes `board` as an ancestor. Called once per ply made during
    /// the search, and once per position in the game's prior move
    /// history when priming a top-level search.
    pub fn set(&mut self, board: &B) {
        self.buckets.entry(board.board_only_key()).or_default().push(board.clone());
    }

    /// Pops the most recently [`set`](Self::set) ancestor for `board`'s
    /// key. Must be called in exact LIFO order with `set` (mirroring
    /// make/unmake pairing) or the bucket desyncs from the real stack.
    pub fn unset(&mut self, board: &B) {
        if let Some(bucket) = self.buckets.get_mut(&board.board_only_key()) {
            bucket.pop();
            if bucket.is_empty() {
                self.buckets.remove(&board.board_only_key());
            }
        }
    }

    /// Classifies `board` against the ancestors sharing its board-only
    /// key. A single matching-hand ancestor reports [`ShekStat::Equal`]
    /// regardless of what the others say (a repetition is a repetition
    /// even if other ancestors in the bucket compare differently).
    pub fn check(&self, board: &B) -> ShekStat {
        let bucket = match self.buckets.get(&board.board_only_key()) {
            Some(b) if !b.is_empty() => b,
            _ => return ShekStat::None,
        };

        let mut all_superior = true;
        let mut all_inferior = true;
        for ancestor in bucket {
            match board.hand_compare(ancestor) {
                HandCompare::Equal => return ShekStat::Equal,
                HandCompare::Superior => all_inferior = false,
                HandCompare::Inferior => all_superior = false,
                HandCompare::Incomparable => {
                    all_superior = false;
                    all_inferior = false;
                }
            }
        }

        if all_superior {
            ShekStat::Superior
        } else if all_inferior {
            ShekStat::Inferior
        } else {
            ShekStat::None
        }
    }

    /// Primes the table with the game's move history so repetitions
    /// spanning the actual game (not just this search's own tree) are
    /// detected. `ancestors` must be ordered oldest-first, exactly as
    /// replayed by unmaking `record` from the search's starting
    /// position.
    pub fn prime(&mut self, ancestors: &[B]) {
        for board in ancestors {
            self.set(board);
        }
    }

    /// Inverse of `prime`, called with the same slice once the
    /// top-level search completes.
    pub fn unprime(&mut self, ancestors: &[B]) {
        for board in ancestors.iter().rev() {
            self.unset(board);
        }
    }
}

impl<B: ShogiBoard> Default for ShekTable<B> {
    fn default() -> Self {
        ShekTable::new()
    }
}
