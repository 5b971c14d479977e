//! Game move history, used only to prime SHEK before a top-level
//! search (§[MODULE] shek) — grounded on the original engine's
//! `Record`, trimmed to the slice this crate actually consumes
//! (`getCount`/`getMoveAt`, replayed backwards from the position being
//! searched).

use anyhow::{bail, Result};

/// Upper bound on a primed record's length. Not a rules limit — a
/// sanity check against a caller accidentally handing over an
/// unbounded or corrupt move list.
const MAX_RECORD_LEN: usize = 4096;

#[derive(Debug, Clone)]
pub struct Record<M> {
    moves: Vec<M>,
}

impl<M: Copy> Record<M> {
    pub fn new() -> Record<M> {
        Record { moves: Vec::new() }
    }

    pub fn from_moves(moves: Vec<M>) -> Result<Record<M>> {
        if moves.len() > MAX_RECORD_LEN {
            bail!("record has {} moves, exceeding the {} limit", moves.len(), MAX_RECORD_LEN);
        }
        Ok(Record { moves })
    }

    pub fn push(&mut self, mv: M) -> Result<()> {
        if self.moves.len() >= MAX_RECORD_LEN {
            bail!("record already at its {} move limit", MAX_RECORD_LEN);
        }
        self.moves.push(mv);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<M> {
        self.moves.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &M> {
        self.moves.iter()
    }
}

impl<M: Copy> Default for Record<M> {
    fn default() -> Self {
        Record::new()
    }
}
