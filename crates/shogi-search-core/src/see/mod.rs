//! Static Exchange Evaluation: predicted material outcome of the full
//! capture/recapture sequence on one square, plus a small bit-packed
//! cache keyed by (position hash, move) so repeated move-ordering
//! queries in siblings don't re-run the swap simulation.

mod cache;

pub use cache::SeeCache;

use crate::board::{Evaluator, ShogiBoard, ShogiMove};
use crate::types::Value;

/// Runs the classic SEE "gain array" swap algorithm: each side's
/// attacker queue (ascending by piece value, as supplied by
/// [`crate::board::ShogiBoard::attackers`]) is consumed least-valuable
/// piece first, alternating sides, and the resulting sequence of
/// material swings is folded back into a single negamax value.
///
/// This does not recompute discovered (x-ray) attackers as pieces are
/// removed from the square — each side's attacker list is the one the
/// board reports before the exchange starts. That is the standard
/// simplification for an external, opaque board collaborator: doing
/// better would require the board to support incremental attacker
/// recomputation mid-exchange, which is outside what this crate asks of
/// its `ShogiBoard` implementors.
pub fn static_exchange_eval<B, E>(board: &B, evaluator: &E, mv: &B::Move) -> Value
where
    B: ShogiBoard,
    E: Evaluator<B>,
{
    let to = mv.to();
    let side = board.side_to_move();

    let mut queues = [
        board.attackers(to, side),
        board.attackers(to, side.opponent()),
    ];
    // The attacker actually making `mv` is assumed to be the
    // least-valuable one listed for `side` (move ordering always offers
    // captures least-valuable-attacker first); drop it from the queue so
    // it isn't double-counted as a recapturer later.
    if !queues[0].is_empty() {
        queues[0].remove(0);
    }

    let mut gain = vec![
        mv.captured_piece_index()
            .map(|pi| evaluator.piece_value(pi))
            .unwrap_or(Value::ZERO),
    ];
    let mut attacker_value = evaluator.piece_value(mv.piece_index());
    let mut turn = 1usize;
    let mut d = 0usize;

    loop {
        if queues[turn].is_empty() {
            break;
        }
        d += 1;
        gain.push(attacker_value - gain[d - 1]);
        if Value::max(-gain[d - 1], gain[d]).raw() < 0 {
            break;
        }
        attacker_value = queues[turn].remove(0).value;
        turn = 1 - turn;
    }

    while d > 0 {
        d -= 1;
        gain[d] = -Value::max(-gain[d], gain[d + 1]);
    }

    gain[0]
}
