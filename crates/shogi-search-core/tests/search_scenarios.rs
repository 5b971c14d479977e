//! End-to-end coverage of the named search scenarios and the invariants
//! that are only checkable by driving `Searcher::search`/`idsearch`
//! through the public API, against the toy graph board in `tests/common`.
//!
//! Several of the eight testable invariants are already covered at the
//! unit level next to the code they constrain and are not repeated
//! here: TT move-preservation and mate-score round-tripping
//! (`tt::table`, `types::value`), SEE symmetry (`see::mod`), and
//! `getReductionDepth` monotonicity (`history::table`).

mod common;

use std::collections::HashMap;
use std::rc::Rc;

use common::{cyclic_graph, edge, init_logging, node, EdgeDef, GraphGenerator, ZeroEvaluator};
use shogi_search_core::board::{Evaluator, ShogiBoard, ShogiMove, ValuePair};
use shogi_search_core::record::Record;
use shogi_search_core::search::{Config, Searcher};
use shogi_search_core::types::{Color, Value};

fn zero_searcher(max_depth: i32) -> Searcher<common::GraphBoard, GraphGenerator, ZeroEvaluator> {
    let mut s = Searcher::new(GraphGenerator, ZeroEvaluator, 1);
    s.set_config(Config { max_depth, limit_enable: false, ..Config::default() });
    s
}

#[test]
fn startpos_depth_1_returns_a_legal_move_with_zero_eval_in_range() {
    init_logging();
    let (graph, start) = cyclic_graph(Color::Black);
    let board = common::GraphBoard::new(graph, start);
    let mut s = zero_searcher(1);
    let mut best = <common::GraphBoard as ShogiBoard>::Move::none();
    let ok = s.search(&board, &mut best);

    assert!(ok);
    assert!(!best.is_empty());
    assert!(s.info().base.node >= 2, "at least as many nodes as legal root moves (2)");
    assert!(s.info().eval >= Value::new(-200) && s.info().eval <= Value::new(200));
}

#[test]
fn mate_in_one_is_found_within_three_plies() {
    init_logging();
    let mut g = HashMap::new();
    g.insert(0u64, node(Color::Black, false, vec![edge(0, 1)]));
    g.insert(1u64, node(Color::White, true, vec![]));
    let board = common::GraphBoard::new(Rc::new(g), 0);

    let mut s = Searcher::new(GraphGenerator, ZeroEvaluator, 1);
    s.set_config(Config { max_depth: 3, limit_enable: false, ..Config::default() });
    let mut best = <common::GraphBoard as ShogiBoard>::Move::none();
    let ok = s.idsearch(&board, &mut best);

    assert!(ok);
    assert!(!best.is_empty());
    assert!(s.info().eval >= Value::MATE - Value::new(1));
}

/// Builds the shared repetition/superior-hand fixture: `ancestor` (node
/// 10) reached `mid` (node 20, the position handed to `search`) via the
/// move recorded in `Record`; `mid` has a single legal move, `close`,
/// back to node 10. `close_hand_delta` controls whether that move
/// re-creates the ancestor's exact hand (a repetition) or a strictly
/// different one (superior/inferior).
fn repetition_fixture(
    close_hand_delta: i32,
) -> (Searcher<common::GraphBoard, GraphGenerator, ZeroEvaluator>, common::GraphBoard, Record<<common::GraphBoard as ShogiBoard>::Move>)
{
    let mut g = HashMap::new();
    g.insert(10u64, node(Color::White, false, vec![EdgeDef { id: 5, to: 20, hand_delta: 0, capture: false, gives_check: false }]));
    g.insert(
        20u64,
        node(
            Color::Black,
            false,
            vec![EdgeDef { id: 0, to: 10, hand_delta: close_hand_delta, capture: false, gives_check: false }],
        ),
    );
    let graph = Rc::new(g);

    let ancestor = common::GraphBoard::with_hand(graph.clone(), 10, 0);
    let mid = common::GraphBoard::new(graph.clone(), 20);
    let arrival = mid.edge_move(10, 5);
    let record = Record::from_moves(vec![arrival]).expect("small record");

    let mut s = zero_searcher(2);
    s.set_record(record.clone());
    (s, mid, record)
}

#[test]
fn a_move_that_closes_a_repetition_scores_exactly_zero() {
    init_logging();
    let (mut s, mid, _record) = repetition_fixture(0);
    let mut best = <common::GraphBoard as ShogiBoard>::Move::none();
    s.search(&mid, &mut best);
    assert_eq!(s.info().eval, Value::ZERO);
    assert!(s.info().base.shek_equal > 0);
}

#[test]
fn hand_superiority_at_the_repeated_position_scores_as_a_win() {
    init_logging();
    // The move that closes the cycle leaves the side to move with
    // strictly less in hand than the matching ancestor did, i.e. that
    // side is strictly worse off than the search already knows it can
    // be from this board — a loss for whoever is to move there, and
    // therefore a win once negated back up to the searching side.
    let (mut s, mid, _record) = repetition_fixture(-5);
    let mut best = <common::GraphBoard as ShogiBoard>::Move::none();
    s.search(&mid, &mut best);
    assert!(s.info().eval >= Value::INFINITE - Value::new(2));
    assert!(s.info().base.shek_inferior > 0);
}

#[test]
fn repeated_top_level_searches_with_the_same_record_are_deterministic() {
    // Guards prime()/unprime() being called in matching pairs: if a
    // search ever left the SHEK table unbalanced, a second run primed
    // with the same record would see a different bucket and very
    // likely a different score.
    init_logging();
    let (mut s, mid, _record) = repetition_fixture(0);
    let mut best1 = <common::GraphBoard as ShogiBoard>::Move::none();
    s.search(&mid, &mut best1);
    let eval1 = s.info().eval;

    let mut best2 = <common::GraphBoard as ShogiBoard>::Move::none();
    s.search(&mid, &mut best2);
    let eval2 = s.info().eval;

    assert_eq!(eval1, eval2);
}

#[test]
fn null_move_pruning_is_tried_at_a_deep_non_pv_node_with_a_high_stand_pat() {
    init_logging();
    // Root move 1 forces mate (searched first, full window), so the
    // scout window for root move 2 has a beta far below any ordinary
    // evaluation: standPat >= beta holds trivially at the resulting
    // non-PV node, letting the null-move-pruning precondition exercise
    // deterministically rather than depend on emergent tree values.
    let mut g = HashMap::new();
    g.insert(0u64, node(Color::Black, false, vec![
        EdgeDef { id: 0, to: 1, hand_delta: 0, capture: false, gives_check: true },
        EdgeDef { id: 1, to: 2, hand_delta: 0, capture: false, gives_check: false },
    ]));
    g.insert(1u64, node(Color::White, true, vec![]));
    g.insert(2u64, node(Color::White, false, vec![]));
    let board = common::GraphBoard::new(Rc::new(g), 0);

    let mut s = zero_searcher(3);
    let mut best = <common::GraphBoard as ShogiBoard>::Move::none();
    s.search(&board, &mut best);

    assert!(s.info().base.null_move_pruning_tried > 0);
}

#[test]
fn an_interrupted_search_stops_running_and_still_returns_a_usable_result() {
    init_logging();
    let (graph, start) = cyclic_graph(Color::Black);
    let board = common::GraphBoard::new(graph, start);
    let mut s = Searcher::new(GraphGenerator, ZeroEvaluator, 1);
    s.set_config(Config {
        max_depth: 50,
        limit_enable: true,
        limit_seconds: 0.0,
        ..Config::default()
    });
    let mut best = <common::GraphBoard as ShogiBoard>::Move::none();
    s.idsearch(&board, &mut best);

    assert!(!s.is_running());
}

#[test]
fn make_then_unmake_restores_the_board_exactly() {
    init_logging();
    let (graph, start) = cyclic_graph(Color::Black);
    let mut board = common::GraphBoard::new(graph, start);
    let before_key = board.position_key();
    let before_board_key = board.board_only_key();

    let mv = board.edge_move(start, 0);
    board.make_move(&mv);
    board.unmake_move(&mv);

    assert_eq!(board.position_key(), before_key);
    assert_eq!(board.board_only_key(), before_board_key);

    board.make_null_move();
    board.unmake_null_move();
    assert_eq!(board.position_key(), before_key);
}

#[test]
fn search_value_negates_exactly_under_a_color_mirrored_board() {
    init_logging();
    // `NodeParityEvaluator` scores purely from which graph node is
    // live, independent of whose turn it is, so swapping every node's
    // color (graph A vs. graph B below) while keeping the same shape
    // and evaluator is exactly the "mirror the board, flip the side to
    // move" construction the side-relative-consistency invariant
    // describes.
    struct NodeParityEvaluator;
    impl Evaluator<common::GraphBoard> for NodeParityEvaluator {
        fn evaluate(&self, board: &common::GraphBoard) -> ValuePair {
            let v = if board.board_only_key() == 0 { 100 } else { -100 };
            ValuePair { material: Value::new(v), positional: Value::ZERO }
        }
        fn evaluate_diff(&self, board: &common::GraphBoard, _prev: ValuePair, _mv: &<common::GraphBoard as ShogiBoard>::Move) -> ValuePair {
            self.evaluate(board)
        }
        fn estimate(&self, _board: &common::GraphBoard, _mv: &<common::GraphBoard as ShogiBoard>::Move) -> Value {
            Value::ZERO
        }
        fn piece_value(&self, _piece_index: usize) -> Value {
            Value::ZERO
        }
    }

    let (graph_a, start_a) = cyclic_graph(Color::Black);
    let board_a = common::GraphBoard::new(graph_a, start_a);
    let mut searcher_a = Searcher::new(GraphGenerator, NodeParityEvaluator, 1);
    searcher_a.set_config(Config { max_depth: 2, limit_enable: false, ..Config::default() });
    let mut best_a = <common::GraphBoard as ShogiBoard>::Move::none();
    searcher_a.idsearch(&board_a, &mut best_a);

    let (graph_b, start_b) = cyclic_graph(Color::White);
    let board_b = common::GraphBoard::new(graph_b, start_b);
    let mut searcher_b = Searcher::new(GraphGenerator, NodeParityEvaluator, 1);
    searcher_b.set_config(Config { max_depth: 2, limit_enable: false, ..Config::default() });
    let mut best_b = <common::GraphBoard as ShogiBoard>::Move::none();
    searcher_b.idsearch(&board_b, &mut best_b);

    assert_eq!(searcher_a.info().eval, -searcher_b.info().eval);
}
