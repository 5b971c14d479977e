//! The searcher: quiescence, the main negamax, root/aspiration search,
//! iterative deepening, and the interrupt model, all tied to one board
//! generic over [`ShogiBoard`]/[`MoveGenerator`]/[`Evaluator`].
//!
//! Grounded line-by-line on the original engine's `Searcher::searchr`/
//! `qsearch`/`search`/`asp`/`idsearch`. The single-threaded path (§4.G.7's
//! `treeSize = 1, workerSize = 1` specialization) is the only one
//! implemented — parallel split is explicitly optional in the source this
//! is grounded on, and a correct single-threaded searcher is a strict
//! prerequisite for it.

use std::sync::atomic::{AtomicBool, Ordering};

use log::info;

use crate::board::{Evaluator, MoveGenerator, ShogiBoard, ShogiMove};
use crate::history::{Gains, HistoryTable, Killers};
use crate::record::Record;
use crate::see::{static_exchange_eval, SeeCache};
use crate::shek::ShekStat;
use crate::time::Timer;
use crate::tree::{GenPhase, Tree, STACK_SIZE};
use crate::tt::TranspositionTable;
use crate::types::{Bound, Depth, Value};

use super::{Config, NodeStat, SearchInfo};

const ONE_PLY: i32 = Depth::ONE_PLY;
const FUT_MGN: i32 = 400;
const EXT_CHECK: i32 = ONE_PLY;
const EXT_ONEREP: i32 = ONE_PLY / 2;
const EXT_RECAP: i32 = ONE_PLY / 4;
const NULL_MOVE_REDUCTION: i32 = 7 * ONE_PLY / 2;
const NULL_MOVE_MIN_DEPTH: i32 = 2 * ONE_PLY;
const IID_DEPTH_THRESHOLD: i32 = 3 * ONE_PLY;
const ASPIRATION_NARROW: i32 = 320;
const ASPIRATION_WIDE: i32 = 1280;
/// Quiescence ply at which capture sorting switches to its cheaper
/// "light" mode (`Searcher::sortSee`'s `exceptSmallCapture`).
const LIGHT_QSEARCH_QPLY: i32 = 7;
/// Threshold below which a captured piece counts as "small" for the
/// light-qsearch capture filter. The original checks the captured piece's
/// literal kind (pawn); this crate's `ShogiMove` only exposes an opaque
/// `captured_piece_index`, so the filter is redefined in terms of the
/// evaluator's own piece value instead — the adaptation this crate takes
/// wherever a concrete piece kind would otherwise be needed.
const SMALL_CAPTURE_THRESHOLD: i32 = 100;
/// Odd multiplier folding a move's 16-bit code into the SEE cache key
/// alongside the position key. No surviving source defines this
/// composition (`See.cpp`/`.h` did not survive distillation, unlike
/// `SeeEntity.h`'s packing layout) — any odd constant keeps the fold
/// invertible-enough to avoid systematic collisions between sibling moves
/// sharing a `to` square.
const SEE_KEY_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;

struct AspWindow {
    base: Value,
    alpha: Value,
    lower: usize,
    upper: usize,
}

/// Iterative-deepening alpha-beta searcher, generic over an external move
/// generator and evaluator. Owns every piece of shared search state
/// (transposition table, history/killers/gains, SEE cache) and the
/// per-search [`Tree`] stack; holds no board-representation or
/// move-generation logic of its own.
pub struct Searcher<B: ShogiBoard, G: MoveGenerator<B>, E: Evaluator<B>> {
    generator: G,
    evaluator: E,
    config: Config,
    tt: TranspositionTable,
    history: HistoryTable,
    killers: Killers,
    gains: Gains,
    see_cache: SeeCache,
    info: SearchInfo<B::Move>,
    timer: Timer,
    record: Record<B::Move>,
    force_interrupt: AtomicBool,
    is_running: AtomicBool,
    tree: Option<Tree<B>>,
    shek_ancestors: Vec<B>,
}

impl<B: ShogiBoard, G: MoveGenerator<B>, E: Evaluator<B>> Searcher<B, G, E> {
    pub fn new(generator: G, evaluator: E, tt_size_mb: usize) -> Searcher<B, G, E> {
        Searcher {
            generator,
            evaluator,
            config: Config::default(),
            tt: TranspositionTable::new(tt_size_mb),
            history: HistoryTable::new(),
            killers: Killers::new(STACK_SIZE),
            gains: Gains::new(),
            see_cache: SeeCache::new(),
            info: SearchInfo::new(),
            timer: Timer::new(),
            record: Record::new(),
            force_interrupt: AtomicBool::new(false),
            is_running: AtomicBool::new(false),
            tree: None,
            shek_ancestors: Vec::new(),
        }
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn info(&self) -> &SearchInfo<B::Move> {
        &self.info
    }

    pub fn get_info_string(&self) -> String {
        self.info.info_string()
    }

    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    pub fn clear_history(&self) {
        self.history.clear();
        self.killers.clear();
        self.gains.clear();
    }

    pub fn clear_record(&mut self) {
        self.record.clear();
    }

    pub fn set_record(&mut self, record: Record<B::Move>) {
        self.record = record;
    }

    pub fn force_interrupt(&self) {
        self.force_interrupt.store(true, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    fn is_interrupted(&self) -> bool {
        self.force_interrupt.load(Ordering::Relaxed)
            || (self.config.limit_enable && self.timer.elapsed_seconds() >= self.config.limit_seconds)
    }

    fn tree(&self) -> &Tree<B> {
        self.tree.as_ref().expect("tree initialized by before()")
    }

    /// Fixed-depth search at `config.max_depth`. Returns `false` if the
    /// position is lost (`value <= -Mate`) or the search was interrupted.
    pub fn search(&mut self, initial_board: &B, best: &mut B::Move) -> bool {
        self.before(initial_board);
        let depth = self.config.max_depth * ONE_PLY + ONE_PLY / 2;
        let mut value = -Value::INFINITE;
        let ok = self.root_search(depth, best, true, &mut value);
        self.after(initial_board);
        ok
    }

    /// Iterative deepening up to `config.max_depth`. Returns `false` if
    /// the position is lost or interrupted before a usable depth-1 result.
    pub fn idsearch(&mut self, initial_board: &B, best: &mut B::Move) -> bool {
        self.before(initial_board);
        let ok = self.idsearch_inner(best);
        self.after(initial_board);
        ok
    }

    fn before(&mut self, initial_board: &B) {
        self.info.reset();
        self.timer.set();
        self.tt.evolve();
        self.history.reduce();
        self.tree = Some(Tree::new(initial_board.clone(), &self.evaluator));

        let mut replay = initial_board.clone();
        let mut ancestors = Vec::with_capacity(self.record.len());
        for i in (0..self.record.len()).rev() {
            if let Some(mv) = self.record.get(i) {
                replay.unmake_move(&mv);
                ancestors.push(replay.clone());
            }
        }
        // `ancestors` was built newest-first (unmaking the most recent
        // game move first); reverse so index 0 is the oldest, matching
        // `ShekTable::prime`'s documented convention.
        ancestors.reverse();
        self.tree.as_mut().unwrap().shek_table_mut().prime(&ancestors);
        self.shek_ancestors = ancestors;

        self.force_interrupt.store(false, Ordering::Relaxed);
        self.is_running.store(true, Ordering::Relaxed);
    }

    fn after(&mut self, _initial_board: &B) {
        if let Some(tree) = self.tree.as_mut() {
            tree.shek_table_mut().unprime(&self.shek_ancestors);
        }
        self.shek_ancestors.clear();
        self.info.time = self.timer.elapsed_seconds();
        self.info.nps = if self.info.time > 0.0 {
            self.info.base.node as f64 / self.info.time
        } else {
            0.0
        };
        self.info.best_move = self.tree.as_ref().and_then(|t| t.pv().get(0));
        self.is_running.store(false, Ordering::Relaxed);
        self.force_interrupt.store(false, Ordering::Relaxed);
    }

    fn idsearch_inner(&mut self, best: &mut B::Move) -> bool {
        let mut value = -Value::INFINITE;
        let mut gen = true;
        let mut result = true;
        for depth in 1..=self.config.max_depth {
            self.info.last_depth = depth;
            let search_depth = depth * ONE_PLY + ONE_PLY / 2;
            let ok = self.root_search(search_depth, best, gen, &mut value);
            gen = false;
            self.show_pv(depth, value);
            if !ok {
                result = false;
                break;
            }
            if value >= Value::MATE {
                result = true;
                break;
            }
            if value <= -Value::MATE {
                result = false;
                break;
            }
            result = true;
            if self.is_interrupted() {
                break;
            }
        }
        result
    }

    fn show_pv(&self, depth: i32, value: Value) {
        let pv: Vec<String> = self.tree().pv().moves().iter().map(|mv| format!("{mv:?}")).collect();
        info!(
            "depth={} node={} pv=[{}] value={} time={:.3}s",
            depth,
            self.info.base.node,
            pv.join(" "),
            value,
            self.timer.elapsed_seconds(),
        );
    }

    /// One root-search iteration at `depth` (already in `Depth` subunits).
    /// `gen` is true only on the first iterative-deepening depth, when the
    /// root move list still needs generating; later iterations reuse and
    /// re-sort the same list.
    fn root_search(&mut self, depth: i32, best: &mut B::Move, gen: bool, prevval: &mut Value) -> bool {
        let black = self.tree().board().side_to_move().is_black();

        if gen {
            self.tree.as_mut().unwrap().init_gen_phase(GenPhase::Prior);
            let mut moves = Vec::new();
            self.generator.generate_all(self.tree().board(), &mut moves);
            self.tree.as_mut().unwrap().extend_moves(moves);
            self.tree.as_mut().unwrap().finish_gen_phase();
        }
        self.tree.as_mut().unwrap().reset_gen_phase();

        let mut astat = AspWindow { base: *prevval, alpha: -Value::INFINITE, lower: 0, upper: 0 };
        let mut value = -Value::INFINITE;
        let mut count = 0usize;

        while let Some(mv) = self.tree.as_mut().unwrap().select_next_move() {
            count += 1;
            let mut new_depth = depth - ONE_PLY;
            let is_check = self.tree().is_checking() || self.tree().board().gives_check(&mv);
            let mut reduced = 0;
            if new_depth >= ONE_PLY && count != 1 && !is_check && !mv.is_silver_promotion() {
                reduced = self.history.reduction_depth(&mv, false).raw();
                new_depth -= reduced;
            }

            let made = self.tree.as_mut().unwrap().make_move(mv, &self.evaluator);
            if !made {
                let idx = self.tree().cursor() - 1;
                self.tree.as_mut().unwrap().remove_current(idx);
                continue;
            }

            let curr = if value == -Value::INFINITE {
                astat.alpha = value;
                self.asp(!black, new_depth, &mut astat)
            } else {
                let mut scout =
                    -self.searchr::<true>(!black, new_depth, -value - Value::new(1), -value, NodeStat::default());
                if !self.is_interrupted() && scout > value {
                    new_depth += reduced;
                    scout = -self.searchr::<true>(!black, new_depth, -Value::INFINITE, -value, NodeStat::default());
                }
                scout
            };

            self.tree.as_mut().unwrap().unmake_move();
            if self.is_interrupted() {
                return false;
            }

            let idx = self.tree.as_ref().unwrap().cursor() - 1;
            let sort_value = if curr != value { curr.raw() } else { curr.raw() - 1 };
            self.tree.as_mut().unwrap().set_sort_value(idx, sort_value);

            if curr > value {
                *best = mv;
                value = curr;
                self.tree.as_mut().unwrap().update_pv_with(mv);
            }
        }

        self.tree.as_mut().unwrap().sort_all_by_value();
        self.info.eval = value;
        *prevval = value;
        value > -Value::MATE
    }

    fn asp(&mut self, black: bool, depth: i32, astat: &mut AspWindow) -> Value {
        let alphas = [
            astat.base - Value::new(ASPIRATION_NARROW),
            astat.base - Value::new(ASPIRATION_WIDE),
            -Value::INFINITE,
        ];
        let betas = [
            astat.base + Value::new(ASPIRATION_NARROW),
            astat.base + Value::new(ASPIRATION_WIDE),
            Value::INFINITE,
        ];
        if astat.base == -Value::INFINITE {
            astat.lower = 2;
            astat.upper = 2;
        }

        loop {
            let alpha = Value::max(astat.alpha, alphas[astat.lower]);
            let beta = Value::max(astat.alpha + Value::new(1), betas[astat.upper]);
            let value = -self.searchr::<true>(black, depth, -beta, -alpha, NodeStat::default());
            if self.is_interrupted() {
                return Value::ZERO;
            }
            if value > alpha && value < beta {
                return value;
            }
            if value <= astat.alpha {
                return value;
            }

            let mut widened = false;
            while astat.lower < 2 && value <= alphas[astat.lower] {
                astat.lower += 1;
                widened = true;
            }
            while astat.upper < 2 && value >= betas[astat.upper] {
                astat.upper += 1;
                widened = true;
            }
            if !widened {
                return value;
            }
        }
    }

    fn qsearch(&mut self, black: bool, qply: i32, alpha: Value, beta: Value) -> Value {
        self.info.base.qnode += 1;

        let stand_pat = {
            let v = self.tree().value();
            if black { v } else { -v }
        };
        if self.tree().is_stack_full() || stand_pat >= beta {
            return stand_pat;
        }

        let mut value = stand_pat;
        self.tree.as_mut().unwrap().init_gen_phase(GenPhase::CaptureOnly);

        while let Some(mv) = self.next_move_quies(qply) {
            let new_alpha = Value::max(alpha, value);
            let made = self.tree.as_mut().unwrap().make_move(mv, &self.evaluator);
            if !made {
                let idx = self.tree().cursor() - 1;
                self.tree.as_mut().unwrap().remove_current(idx);
                continue;
            }
            let curr = -self.qsearch(!black, qply + 1, -beta, -new_alpha);
            self.tree.as_mut().unwrap().unmake_move();
            if self.is_interrupted() {
                return Value::ZERO;
            }
            if curr > value {
                value = curr;
                self.tree.as_mut().unwrap().update_pv_with(mv);
                if curr >= beta {
                    break;
                }
            }
        }

        value
    }

    fn searchr<const PV_NODE: bool>(
        &mut self,
        black: bool,
        depth: i32,
        alpha: Value,
        beta: Value,
        stat: NodeStat,
    ) -> Value {
        let ply = self.tree().ply() as i32;
        let maxv = Value::INFINITE - Value::new(ply);
        if alpha >= maxv {
            return maxv;
        }

        self.info.base.shek_probed += 1;
        let shek_stat = self.tree().check_shek();
        self.tree.as_mut().unwrap().commit_shek();
        match shek_stat {
            ShekStat::Superior => {
                self.info.base.shek_superior += 1;
                return maxv;
            }
            ShekStat::Inferior => {
                self.info.base.shek_inferior += 1;
                return -maxv;
            }
            ShekStat::Equal => {
                self.info.base.shek_equal += 1;
                return Value::ZERO;
            }
            ShekStat::None => {}
        }

        let stand_pat = {
            let v = self.tree().value();
            if black { v } else { -v }
        };
        if self.tree().is_stack_full() {
            return stand_pat;
        }

        let is_checking = self.tree().is_checking();
        if !is_checking && depth < ONE_PLY {
            return self.qsearch(black, 0, alpha, beta);
        }

        self.info.base.node += 1;
        let key = self.tree().board().position_key();

        let mut hash1 = 0u16;
        let mut hash2 = 0u16;
        let mut hash_ok = false;
        self.info.base.hash_probed += 1;
        if let Some(data) = self.tt.probe(key) {
            self.info.base.hash_hit += 1;
            let tt_value = data.value.from_tt(ply);
            let superior = data.depth.raw() >= depth;
            match data.bound {
                Bound::Exact => {
                    self.info.base.hash_exact += 1;
                    if !PV_NODE && stat.is_hash_cut() && superior {
                        return tt_value;
                    }
                    hash1 = data.move1;
                    hash2 = data.move2;
                    hash_ok = data.move1 != 0;
                }
                Bound::Lower => {
                    self.info.base.hash_lower += 1;
                    if tt_value >= beta && !PV_NODE && stat.is_hash_cut() && superior {
                        return tt_value;
                    }
                    hash1 = data.move1;
                    hash2 = data.move2;
                    hash_ok = data.move1 != 0;
                }
                Bound::Upper => {
                    self.info.base.hash_upper += 1;
                    if !PV_NODE && stat.is_hash_cut() && tt_value <= alpha && superior {
                        return tt_value;
                    }
                    hash1 = data.move1;
                    hash2 = data.move2;
                    hash_ok = data.move1 != 0;
                }
            }
        }

        if !PV_NODE && stat.is_null_move() && beta <= stand_pat && depth >= NULL_MOVE_MIN_DEPTH {
            self.info.base.null_move_pruning_tried += 1;
            let new_depth = depth - NULL_MOVE_REDUCTION;
            self.tree.as_mut().unwrap().make_null_move();
            let curr =
                -self.searchr::<false>(!black, new_depth, -beta, -beta + Value::new(1), stat.unset_null_move());
            self.tree.as_mut().unwrap().unmake_null_move();
            if self.is_interrupted() {
                return Value::ZERO;
            }
            if curr >= beta {
                self.info.base.null_move_pruning += 1;
                self.tree.as_mut().unwrap().update_pv();
                return beta;
            }
        }

        if !hash_ok && depth >= IID_DEPTH_THRESHOLD {
            let iid_stat = stat.unset_null_move().unset_mate().unset_hash_cut();
            self.searchr::<PV_NODE>(black, depth - ONE_PLY, alpha, beta, iid_stat);
            if self.is_interrupted() {
                return Value::ZERO;
            }
            if let Some(data) = self.tt.probe(key) {
                hash1 = data.move1;
                hash2 = data.move2;
            }
        }

        let mut value = -Value::INFINITE + Value::new(ply);
        let mut best = B::Move::none();
        let mut count = 0usize;

        self.tree.as_mut().unwrap().init_gen_phase(GenPhase::Prior);
        self.add_prior_move(hash1);
        self.add_prior_move(hash2);
        let (k1, k2) = self.killers.get(self.tree().ply());
        self.add_prior_move(k1);
        self.add_prior_move(k2);

        while let Some(mv) = self.next_move() {
            count += 1;
            self.info.base.expanded += 1;
            let mut new_depth = depth - ONE_PLY;
            let mut new_stat = NodeStat::default();
            let new_alpha = Value::max(alpha, value);
            let is_check_curr = self.tree().board().gives_check(&mv);
            let is_check_prev = self.tree().is_checking();
            let is_check = is_check_curr || is_check_prev;
            let is_prior = self.is_prior_move(&mv, hash1, hash2);

            if is_check_curr {
                new_depth += EXT_CHECK;
                self.info.base.check_extension += 1;
            } else if is_check_prev
                && count == 1
                && self.tree().gen_phase() == GenPhase::End
                && self.tree().remaining_moves().is_empty()
            {
                new_depth += EXT_ONEREP;
                self.info.base.onerep_extension += 1;
            } else if !is_check_prev && stat.is_recapture() && self.tree().is_recapture(&mv) {
                new_depth += EXT_RECAP;
                new_stat = new_stat.unset_recapture();
                self.info.base.recap_extension += 1;
            }

            let mut reduced = 0;
            if new_depth >= ONE_PLY && count != 1 && !is_check && !mv.is_silver_promotion() && !is_prior {
                reduced = self.history.reduction_depth(&mv, beta == new_alpha + Value::new(1)).raw();
                new_depth -= reduced;
            }

            if !is_check {
                let estimate = self.evaluator.estimate(self.tree().board(), &mv) + self.gains.get(&mv);
                if stand_pat + estimate + Value::new(FUT_MGN) <= new_alpha {
                    self.info.base.futility_pruning += 1;
                    value = Value::max(value, new_alpha);
                    continue;
                }
            }

            let made = self.tree.as_mut().unwrap().make_move(mv, &self.evaluator);
            if !made {
                let idx = self.tree().cursor() - 1;
                self.tree.as_mut().unwrap().remove_current(idx);
                continue;
            }

            if !is_check {
                let new_stand_pat = {
                    let v = self.tree().value();
                    if black { v } else { -v }
                };
                if new_stand_pat + Value::new(FUT_MGN) <= new_alpha {
                    self.info.base.extended_futility_pruning += 1;
                    self.tree.as_mut().unwrap().unmake_move();
                    value = Value::max(value, new_alpha);
                    continue;
                }
            }

            let curr = if count == 1 {
                -self.searchr::<PV_NODE>(!black, new_depth, -beta, -new_alpha, new_stat)
            } else {
                let mut scout =
                    -self.searchr::<false>(!black, new_depth, -new_alpha - Value::new(1), -new_alpha, new_stat);
                if !self.is_interrupted() && scout > new_alpha && scout < beta {
                    new_depth += reduced;
                    scout = -self.searchr::<PV_NODE>(!black, new_depth, -beta, -new_alpha, new_stat);
                }
                scout
            };

            self.tree.as_mut().unwrap().unmake_move();
            if self.is_interrupted() {
                return Value::ZERO;
            }

            if curr > value {
                value = curr;
                best = mv;
                self.tree.as_mut().unwrap().update_pv_with(mv);
                if curr >= beta {
                    self.info.base.fail_high += 1;
                    if count == 1 {
                        self.info.base.fail_high_first += 1;
                    }
                    break;
                }
            }
        }

        if !best.is_empty() && value > alpha {
            self.update_history(depth, &best, value - stand_pat, value >= beta);
        }
        if !best.is_empty() {
            let tt_value = value.to_tt(ply);
            let bound = Bound::classify(value, alpha, beta);
            self.tt.store(key, tt_value, bound, Depth(depth), best.encode16());
        }

        value
    }

    /// Drives the main search's phase machine (§4.G.2): `Prior` moves are
    /// already in the list by the time this is called (pushed via
    /// `add_prior_move`), so the first empty-cursor hit just advances past
    /// it into `Capture`.
    fn next_move(&mut self) -> Option<B::Move> {
        loop {
            if let Some(mv) = self.tree.as_mut().unwrap().select_next_move() {
                return Some(mv);
            }
            match self.tree().gen_phase() {
                GenPhase::Prior => {
                    self.tree.as_mut().unwrap().advance_gen_phase();
                }
                GenPhase::Capture => {
                    if self.tree().is_checking() {
                        let mut moves = Vec::new();
                        self.generator.generate_evasions(self.tree().board(), &mut moves);
                        self.tree.as_mut().unwrap().extend_moves(moves);
                        self.remove_prior_duplicates();
                        self.sort_history();
                        self.tree.as_mut().unwrap().finish_gen_phase();
                    } else {
                        let mut moves = Vec::new();
                        self.generator.generate_captures(self.tree().board(), &mut moves);
                        self.tree.as_mut().unwrap().extend_moves(moves);
                        self.remove_prior_duplicates();
                        self.sort_see(false, false);
                        self.tree.as_mut().unwrap().advance_gen_phase();
                    }
                }
                GenPhase::NoCapture => {
                    let mut moves = Vec::new();
                    self.generator.generate_quiet(self.tree().board(), &mut moves);
                    self.generator.generate_drops(self.tree().board(), &mut moves);
                    self.tree.as_mut().unwrap().extend_moves(moves);
                    self.remove_prior_duplicates();
                    self.sort_history();
                    self.tree.as_mut().unwrap().advance_gen_phase();
                }
                GenPhase::CaptureOnly | GenPhase::End => return None,
            }
        }
    }

    fn next_move_quies(&mut self, qply: i32) -> Option<B::Move> {
        loop {
            if let Some(mv) = self.tree.as_mut().unwrap().select_next_move() {
                return Some(mv);
            }
            if self.tree().gen_phase() != GenPhase::CaptureOnly {
                return None;
            }
            if self.tree().is_checking() {
                let mut moves = Vec::new();
                self.generator.generate_evasions(self.tree().board(), &mut moves);
                self.tree.as_mut().unwrap().extend_moves(moves);
                self.sort_history();
                self.tree.as_mut().unwrap().finish_gen_phase();
            } else {
                let light = qply >= LIGHT_QSEARCH_QPLY;
                let mut moves = Vec::new();
                self.generator.generate_captures(self.tree().board(), &mut moves);
                self.tree.as_mut().unwrap().extend_moves(moves);
                self.sort_see(true, light);
                self.tree.as_mut().unwrap().finish_gen_phase();
            }
        }
    }

    /// Pushes a TT/killer move candidate into the Prior phase if it
    /// decodes to a currently pseudo-legal move.
    fn add_prior_move(&mut self, code: u16) {
        if code == 0 {
            return;
        }
        let mv = match self.tree().board().decode_move(code) {
            Some(mv) if self.tree().board().is_pseudo_legal_strict(&mv) => mv,
            _ => return,
        };
        self.tree.as_mut().unwrap().prior_moves_mut().push(mv);
        self.tree.as_mut().unwrap().extend_moves([mv]);
    }

    fn is_prior_move(&self, mv: &B::Move, hash1: u16, hash2: u16) -> bool {
        let code = mv.encode16();
        (hash1 != 0 && code == hash1) || (hash2 != 0 && code == hash2)
    }

    /// Drops freshly generated moves that duplicate a move already tried
    /// in the Prior phase, so it is never searched twice at one node.
    fn remove_prior_duplicates(&mut self) {
        let priors: Vec<B::Move> = self.tree().prior_moves().to_vec();
        self.tree.as_mut().unwrap().remove_remaining_if(|mv| priors.contains(mv));
    }

    fn sort_see(&mut self, plus_only: bool, except_small_capture: bool) {
        let cursor = self.tree().cursor();
        let board = self.tree().board().clone();
        let moves: Vec<B::Move> = self.tree().remaining_moves().to_vec();

        for (i, mv) in moves.iter().enumerate() {
            let small_capture = except_small_capture
                && !mv.is_promotion()
                && mv
                    .captured_piece_index()
                    .map(|pi| self.evaluator.piece_value(pi) <= Value::new(SMALL_CAPTURE_THRESHOLD))
                    .unwrap_or(true);

            let value = if small_capture {
                -Value::INFINITE
            } else {
                self.see_value(&board, mv)
            };
            self.tree.as_mut().unwrap().set_sort_value(cursor + i, value.raw());
        }

        self.tree.as_mut().unwrap().sort_remaining_by_value();
        if plus_only {
            self.tree.as_mut().unwrap().truncate_remaining_while(|_, v| v >= 0);
        }
    }

    /// SEE value of `mv` on `board`, through the bit-packed cache. The
    /// cache is queried with the widest possible window so every entry
    /// resolves unconditionally (`Bound::Exact`) — move ordering only ever
    /// wants the raw value, never a cut-off test, so there is no separate
    /// alpha/beta context to cache against here.
    fn see_value(&self, board: &B, mv: &B::Move) -> Value {
        let key = board.position_key() ^ (mv.encode16() as u64).wrapping_mul(SEE_KEY_MULTIPLIER);
        if let Some(value) = self.see_cache.get(key, -Value::INFINITE, Value::INFINITE) {
            return value;
        }
        let value = static_exchange_eval(board, &self.evaluator, mv);
        self.see_cache.set(key, value, -Value::INFINITE, Value::INFINITE);
        value
    }

    fn sort_history(&mut self) {
        let cursor = self.tree().cursor();
        let moves: Vec<B::Move> = self.tree().remaining_moves().to_vec();
        for (i, mv) in moves.iter().enumerate() {
            let ratio = self.history.sort_ratio(mv.piece_index(), mv.to());
            self.tree.as_mut().unwrap().set_sort_value(cursor + i, ratio);
        }
        self.tree.as_mut().unwrap().sort_remaining_by_value();
    }

    /// Credits every move tried before `best` at this node with an
    /// `appear`, and `best` itself with matching `good` credit (plus a
    /// killer-slot update if it is a quiet move) — `Searcher::updateHistory`.
    /// `gain` is the swing from this node's static eval to the value
    /// `best` produced; on a genuine beta-cut by a quiet move, that swing
    /// is fed into `Gains` so later futility estimates at the same
    /// (piece, to) account for it.
    fn update_history(&mut self, depth: i32, best: &B::Move, gain: Value, cut: bool) {
        let credit = ((depth / (ONE_PLY / 4)).max(1)) as u32;
        let ply = self.tree().ply();
        let tried: Vec<B::Move> = {
            let tree = self.tree();
            tree.moves()[..tree.cursor()].to_vec()
        };
        for mv in &tried {
            if mv == best {
                self.history.add(mv.piece_index(), mv.to(), credit, credit);
                if !mv.is_capture() {
                    self.killers.update(ply, mv);
                }
            } else {
                self.history.add(mv.piece_index(), mv.to(), credit, 0);
            }
        }
        if cut && !best.is_capture() {
            self.gains.update(best, gain);
        }
    }
}
