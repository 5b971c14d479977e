//! Search bookkeeping counters, mirroring `SearchInfoBase`/`SearchInfo`.
//! Advisory instrumentation only — nothing here feeds back into the
//! search algorithm's decisions.

use crate::board::ShogiMove;
use crate::types::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchInfoBase {
    pub fail_high: u64,
    pub fail_high_first: u64,
    pub hash_probed: u64,
    pub hash_hit: u64,
    pub hash_exact: u64,
    pub hash_lower: u64,
    pub hash_upper: u64,
    pub shek_probed: u64,
    pub shek_superior: u64,
    pub shek_inferior: u64,
    pub shek_equal: u64,
    pub null_move_pruning: u64,
    pub null_move_pruning_tried: u64,
    pub futility_pruning: u64,
    pub extended_futility_pruning: u64,
    pub expanded: u64,
    pub check_extension: u64,
    pub onerep_extension: u64,
    pub recap_extension: u64,
    pub node: u64,
    pub qnode: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchInfo<M> {
    pub base: SearchInfoBase,
    pub time: f64,
    pub nps: f64,
    pub best_move: Option<M>,
    pub eval: Value,
    pub last_depth: i32,
}

impl<M: ShogiMove> SearchInfo<M> {
    pub fn new() -> SearchInfo<M> {
        SearchInfo {
            base: SearchInfoBase::default(),
            time: 0.0,
            nps: 0.0,
            best_move: None,
            eval: Value::ZERO,
            last_depth: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = SearchInfo::new();
    }

    /// Short human-readable counter dump, grounded on
    /// `Searcher::getInfoString`.
    pub fn info_string(&self) -> String {
        format!(
            "node={} qnode={} time={:.3}s nps={:.0} hash={}/{} shek={}/{}/{} \
             nmp={}/{} fut={}/{} fh={}/{} eval={} depth={}",
            self.base.node,
            self.base.qnode,
            self.time,
            self.nps,
            self.base.hash_hit,
            self.base.hash_probed,
            self.base.shek_superior,
            self.base.shek_inferior,
            self.base.shek_equal,
            self.base.null_move_pruning,
            self.base.null_move_pruning_tried,
            self.base.futility_pruning,
            self.base.extended_futility_pruning,
            self.base.fail_high_first,
            self.base.fail_high,
            self.eval,
            self.last_depth,
        )
    }
}

impl<M: ShogiMove> Default for SearchInfo<M> {
    fn default() -> Self {
        SearchInfo::new()
    }
}
