//! Per-recursion flags controlling which pruning/ordering techniques a
//! node is allowed to use. Threaded down through recursive calls and
//! selectively cleared (never set) as the search descends, mirroring
//! the original `NodeStat` bitfield.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStat {
    hash_cut: bool,
    null_move: bool,
    mate: bool,
    recapture: bool,
}

impl NodeStat {
    pub const fn new() -> NodeStat {
        NodeStat { hash_cut: true, null_move: true, mate: true, recapture: true }
    }

    pub const fn is_hash_cut(self) -> bool {
        self.hash_cut
    }

    pub const fn is_null_move(self) -> bool {
        self.null_move
    }

    pub const fn is_mate(self) -> bool {
        self.mate
    }

    pub const fn is_recapture(self) -> bool {
        self.recapture
    }

    pub const fn unset_hash_cut(mut self) -> NodeStat {
        self.hash_cut = false;
        self
    }

    pub const fn unset_null_move(mut self) -> NodeStat {
        self.null_move = false;
        self
    }

    pub const fn unset_mate(mut self) -> NodeStat {
        self.mate = false;
        self
    }

    pub const fn unset_recapture(mut self) -> NodeStat {
        self.recapture = false;
        self
    }
}

impl Default for NodeStat {
    fn default() -> Self {
        NodeStat::new()
    }
}
