//! A tiny graph-based toy board used to drive `Searcher` end to end
//! without real shogi rules. Each position is a node in a fixed graph
//! (`NodeDef`); a move is an edge that names its own source and
//! destination node plus a hand delta, so `unmake_move` is a pure
//! function of the move alone and never needs an internal undo stack
//! (this matters for replaying a `Record` to prime SHEK from a freshly
//! constructed board, not one actually reached via `make_move`).

use std::collections::HashMap;
use std::rc::Rc;

use shogi_search_core::board::{AttackerInfo, Evaluator, HandCompare, MoveGenerator, ShogiBoard, ShogiMove, ValuePair};
use shogi_search_core::types::{Color, Square, Value};

pub fn init_logging() {
    let _ = env_logger::try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GMove {
    id: u16,
    none: bool,
    from_node: u64,
    to_node: u64,
    hand_delta: i32,
    capture: bool,
    gives_check: bool,
}

impl GMove {
    fn none_move() -> GMove {
        GMove { id: 0, none: true, from_node: 0, to_node: 0, hand_delta: 0, capture: false, gives_check: false }
    }
}

impl ShogiMove for GMove {
    fn none() -> Self {
        GMove::none_move()
    }
    fn is_empty(&self) -> bool {
        self.none
    }
    fn to(&self) -> Square {
        Square::from_index((self.id as usize) % Square::NUM)
    }
    fn piece_index(&self) -> usize {
        (self.id as usize) % 28
    }
    fn is_promotion(&self) -> bool {
        false
    }
    fn is_silver_promotion(&self) -> bool {
        false
    }
    fn is_capture(&self) -> bool {
        self.capture
    }
    fn captured_piece_index(&self) -> Option<usize> {
        self.capture.then_some(0)
    }
    fn encode16(&self) -> u16 {
        self.id
    }
}

#[derive(Clone)]
pub struct EdgeDef {
    pub id: u16,
    pub to: u64,
    pub hand_delta: i32,
    pub capture: bool,
    pub gives_check: bool,
}

pub fn edge(id: u16, to: u64) -> EdgeDef {
    EdgeDef { id, to, hand_delta: 0, capture: false, gives_check: false }
}

#[derive(Clone)]
pub struct NodeDef {
    pub side: Color,
    pub in_check: bool,
    pub edges: Vec<EdgeDef>,
}

pub fn node(side: Color, in_check: bool, edges: Vec<EdgeDef>) -> NodeDef {
    NodeDef { side, in_check, edges }
}

#[derive(Clone)]
pub struct GraphBoard {
    graph: Rc<HashMap<u64, NodeDef>>,
    node: u64,
    hand: i32,
    last_to: Option<Square>,
}

impl GraphBoard {
    pub fn new(graph: Rc<HashMap<u64, NodeDef>>, start: u64) -> GraphBoard {
        GraphBoard { graph, node: start, hand: 0, last_to: None }
    }

    pub fn with_hand(graph: Rc<HashMap<u64, NodeDef>>, start: u64, hand: i32) -> GraphBoard {
        GraphBoard { graph, node: start, hand, last_to: None }
    }

    fn def(&self) -> &NodeDef {
        self.graph.get(&self.node).expect("test graph references an undefined node")
    }

    /// The move that travels `from_node` -(id)-> `to_node`, usable both
    /// to drive a search from `from_node` and, via `unmake_move`, to
    /// replay a `Record` backwards from `to_node`.
    pub fn edge_move(&self, from_node: u64, id: u16) -> GMove {
        let def = self.graph.get(&from_node).expect("test graph references an undefined node");
        let e = def.edges.iter().find(|e| e.id == id).expect("no such edge id at that node");
        GMove {
            id: e.id,
            none: false,
            from_node,
            to_node: e.to,
            hand_delta: e.hand_delta,
            capture: e.capture,
            gives_check: e.gives_check,
        }
    }
}

impl ShogiBoard for GraphBoard {
    type Move = GMove;

    fn side_to_move(&self) -> Color {
        self.def().side
    }

    fn position_key(&self) -> u64 {
        self.node ^ ((self.hand as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    fn board_only_key(&self) -> u64 {
        self.node
    }

    fn hand_compare(&self, ancestor: &Self) -> HandCompare {
        if self.hand == ancestor.hand {
            HandCompare::Equal
        } else if self.hand > ancestor.hand {
            HandCompare::Superior
        } else {
            HandCompare::Inferior
        }
    }

    fn decode_move(&self, code: u16) -> Option<Self::Move> {
        let def = self.def();
        let e = def.edges.iter().find(|e| e.id == code)?;
        Some(GMove {
            id: e.id,
            none: false,
            from_node: self.node,
            to_node: e.to,
            hand_delta: e.hand_delta,
            capture: e.capture,
            gives_check: e.gives_check,
        })
    }

    fn in_check(&self) -> bool {
        self.def().in_check
    }

    fn gives_check(&self, mv: &Self::Move) -> bool {
        mv.gives_check
    }

    fn is_pseudo_legal_strict(&self, mv: &Self::Move) -> bool {
        !mv.none && mv.from_node == self.node && self.def().edges.iter().any(|e| e.id == mv.id)
    }

    fn make_move(&mut self, mv: &Self::Move) -> bool {
        self.node = mv.to_node;
        self.hand += mv.hand_delta;
        self.last_to = Some(mv.to());
        true
    }

    fn unmake_move(&mut self, mv: &Self::Move) {
        self.node = mv.from_node;
        self.hand -= mv.hand_delta;
    }

    fn make_null_move(&mut self) {}

    fn unmake_null_move(&mut self) {}

    fn last_move_to(&self) -> Option<Square> {
        self.last_to
    }

    fn attackers(&self, _square: Square, _side: Color) -> Vec<AttackerInfo> {
        Vec::new()
    }
}

pub struct GraphGenerator;

impl MoveGenerator<GraphBoard> for GraphGenerator {
    fn generate_evasions(&self, board: &GraphBoard, out: &mut Vec<GMove>) {
        for e in &board.def().edges {
            out.push(board.edge_move(board.node, e.id));
        }
    }
    fn generate_captures(&self, board: &GraphBoard, out: &mut Vec<GMove>) {
        for e in &board.def().edges {
            if e.capture {
                out.push(board.edge_move(board.node, e.id));
            }
        }
    }
    fn generate_quiet(&self, board: &GraphBoard, out: &mut Vec<GMove>) {
        for e in &board.def().edges {
            if !e.capture {
                out.push(board.edge_move(board.node, e.id));
            }
        }
    }
    fn generate_drops(&self, _board: &GraphBoard, _out: &mut Vec<GMove>) {}
    fn generate_all(&self, board: &GraphBoard, out: &mut Vec<GMove>) {
        if board.in_check() {
            self.generate_evasions(board, out);
        } else {
            self.generate_captures(board, out);
            self.generate_quiet(board, out);
        }
    }
}

/// Evaluates every position as exactly zero material and position —
/// useful whenever a scenario only cares about search control flow,
/// not about move choice driven by score.
pub struct ZeroEvaluator;

impl Evaluator<GraphBoard> for ZeroEvaluator {
    fn evaluate(&self, _board: &GraphBoard) -> ValuePair {
        ValuePair::default()
    }
    fn evaluate_diff(&self, _board: &GraphBoard, prev: ValuePair, _mv: &GMove) -> ValuePair {
        prev
    }
    fn estimate(&self, _board: &GraphBoard, _mv: &GMove) -> Value {
        Value::ZERO
    }
    fn piece_value(&self, _piece_index: usize) -> Value {
        Value::ZERO
    }
}

/// Two cyclic nodes (`A` <-> `B`), two quiet moves per position, no
/// checks, no captures: a board with unbounded depth so any
/// `max_depth`/time limit can be exercised without ever running out of
/// legal moves.
pub fn cyclic_graph(start_side: Color) -> (Rc<HashMap<u64, NodeDef>>, u64) {
    let other = start_side.opponent();
    let mut g = HashMap::new();
    g.insert(0u64, node(start_side, false, vec![edge(0, 1), edge(1, 1)]));
    g.insert(1u64, node(other, false, vec![edge(0, 0), edge(1, 0)]));
    (Rc::new(g), 0)
}
