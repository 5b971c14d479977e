//! Principal variation line, rebuilt bottom-up as the search unwinds:
//! each ply prepends its own move onto the line its child already
//! settled on.

use crate::board::ShogiMove;

#[derive(Debug, Clone)]
pub struct Pv<M> {
    moves: Vec<M>,
}

impl<M: ShogiMove> Pv<M> {
    pub fn new() -> Pv<M> {
        Pv { moves: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// Replaces this line with `mv` followed by `child`'s line. A null
    /// move (`ShogiMove::is_empty`) is never itself part of a principal
    /// variation — only the child's continuation is kept.
    pub fn set(&mut self, mv: M, child: &Pv<M>) {
        self.moves.clear();
        if !mv.is_empty() {
            self.moves.push(mv);
        }
        self.moves.extend_from_slice(&child.moves);
    }

    pub fn moves(&self) -> &[M] {
        &self.moves
    }

    pub fn get(&self, index: usize) -> Option<M> {
        self.moves.get(index).copied()
    }
}

impl<M: ShogiMove> Default for Pv<M> {
    fn default() -> Self {
        Pv::new()
    }
}
