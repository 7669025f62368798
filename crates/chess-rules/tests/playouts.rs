//! Randomized playout properties for the rules authority.

use chess_rules::{apply, in_check, legal_moves, Position};
use proptest::prelude::*;

proptest! {
    /// Applying any legal move never leaves the mover's own king in check,
    /// and every reachable position survives a FEN round-trip.
    #[test]
    fn playouts_preserve_invariants(
        picks in proptest::collection::vec(any::<usize>(), 0..60),
    ) {
        let mut position = Position::startpos();
        for pick in picks {
            let moves = legal_moves(&position);
            if moves.is_empty() {
                break;
            }
            let mover = position.side_to_move;
            let next = apply(&position, moves[pick % moves.len()]);
            prop_assert!(!in_check(&next, mover));

            let fen = next.to_fen();
            let reparsed = Position::from_fen(&fen).unwrap();
            prop_assert_eq!(&reparsed, &next);

            position = next;
        }
    }

    /// Move generation is a pure function of the position.
    #[test]
    fn generation_is_deterministic(
        picks in proptest::collection::vec(any::<usize>(), 0..20),
    ) {
        let mut position = Position::startpos();
        for pick in picks {
            let first = legal_moves(&position);
            let second = legal_moves(&position);
            prop_assert_eq!(&first, &second);
            if first.is_empty() {
                break;
            }
            position = apply(&position, first[pick % first.len()]);
        }
    }
}
