//! Two killer-move slots per ply: quiet moves that recently caused a
//! beta-cut at that ply, tried early at sibling nodes before full move
//! ordering kicks in.

use crate::board::ShogiMove;
use std::sync::atomic::{AtomicU32, Ordering};

pub struct Killers {
    slot1: Vec<AtomicU32>,
    slot2: Vec<AtomicU32>,
}

impl Killers {
    pub fn new(stack_size: usize) -> Killers {
        Killers {
            slot1: (0..stack_size).map(|_| AtomicU32::new(0)).collect(),
            slot2: (0..stack_size).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    pub fn clear(&self) {
        for s in self.slot1.iter().chain(self.slot2.iter()) {
            s.store(0, Ordering::Relaxed);
        }
    }

    /// Records a beta-cutting quiet move at `ply`, pushing the previous
    /// first slot down to second.
    pub fn update<M: ShogiMove>(&self, ply: usize, mv: &M) {
        let code = mv.encode16() as u32;
        let prev = self.slot1[ply].swap(code, Ordering::Relaxed);
        if prev != code {
            self.slot2[ply].store(prev, Ordering::Relaxed);
        }
    }

    pub fn get(&self, ply: usize) -> (u16, u16) {
        (
            self.slot1[ply].load(Ordering::Relaxed) as u16,
            self.slot2[ply].load(Ordering::Relaxed) as u16,
        )
    }
}
