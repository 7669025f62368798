//! Legal move generation, attack detection and move application.
//!
//! Generation is the classical two-stage scheme: produce every pseudo-legal
//! move, then discard the ones whose successor position leaves the mover's
//! own king attacked. The filter also covers pins, en passant discoveries
//! and castling into check.

use crate::position::Position;
use chess_model::{Color, Move, MoveKind, Piece, Square};

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
const ORTHOGONALS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Forward direction of the given side's pawns.
#[inline]
fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// Returns true if `sq` is attacked by any piece of `by`.
pub fn square_attacked(position: &Position, sq: Square, by: Color) -> bool {
    // A pawn of `by` one step diagonally behind `sq` attacks it.
    let dir = pawn_direction(by);
    for file_delta in [-1i8, 1] {
        if let Some(origin) = sq.offset(file_delta, -dir) {
            if position.piece_at(origin) == Some((Piece::Pawn, by)) {
                return true;
            }
        }
    }

    for (df, dr) in KNIGHT_STEPS {
        if let Some(origin) = sq.offset(df, dr) {
            if position.piece_at(origin) == Some((Piece::Knight, by)) {
                return true;
            }
        }
    }

    for (df, dr) in KING_STEPS {
        if let Some(origin) = sq.offset(df, dr) {
            if position.piece_at(origin) == Some((Piece::King, by)) {
                return true;
            }
        }
    }

    ray_reaches(position, sq, &DIAGONALS, by, Piece::Bishop)
        || ray_reaches(position, sq, &ORTHOGONALS, by, Piece::Rook)
}

/// Scans outward along `directions` and reports whether the first piece met
/// is a `slider` or queen of color `by`.
fn ray_reaches(
    position: &Position,
    from: Square,
    directions: &[(i8, i8)],
    by: Color,
    slider: Piece,
) -> bool {
    for &(df, dr) in directions {
        let mut sq = from;
        while let Some(next) = sq.offset(df, dr) {
            match position.piece_at(next) {
                None => sq = next,
                Some((piece, color)) => {
                    if color == by && (piece == slider || piece == Piece::Queen) {
                        return true;
                    }
                    break;
                }
            }
        }
    }
    false
}

fn king_square(position: &Position, side: Color) -> Option<Square> {
    (0..64)
        .filter_map(Square::from_index)
        .find(|&sq| position.piece_at(sq) == Some((Piece::King, side)))
}

/// Returns true if `side`'s king is attacked.
pub fn in_check(position: &Position, side: Color) -> bool {
    match king_square(position, side) {
        Some(sq) => square_attacked(position, sq, side.opposite()),
        None => false,
    }
}

/// Generates every legal move for the side to move.
///
/// The order is stable (board scan from a1 to h8, castling last) but carries
/// no preference. An empty result means checkmate or stalemate, which
/// [`in_check`] disambiguates.
pub fn legal_moves(position: &Position) -> Vec<Move> {
    let us = position.side_to_move;
    let mut moves = pseudo_legal(position);
    moves.retain(|&m| !in_check(&apply(position, m), us));
    moves
}

fn pseudo_legal(position: &Position) -> Vec<Move> {
    let us = position.side_to_move;
    let mut moves = Vec::with_capacity(48);
    for sq in (0..64).filter_map(Square::from_index) {
        let Some((piece, color)) = position.piece_at(sq) else {
            continue;
        };
        if color != us {
            continue;
        }
        match piece {
            Piece::Pawn => pawn_moves(position, sq, us, &mut moves),
            Piece::Knight => step_moves(position, sq, us, &KNIGHT_STEPS, &mut moves),
            Piece::Bishop => slide_moves(position, sq, us, &DIAGONALS, &mut moves),
            Piece::Rook => slide_moves(position, sq, us, &ORTHOGONALS, &mut moves),
            Piece::Queen => {
                slide_moves(position, sq, us, &DIAGONALS, &mut moves);
                slide_moves(position, sq, us, &ORTHOGONALS, &mut moves);
            }
            Piece::King => step_moves(position, sq, us, &KING_STEPS, &mut moves),
        }
    }
    castling_moves(position, us, &mut moves);
    moves
}

fn pawn_moves(position: &Position, from: Square, us: Color, moves: &mut Vec<Move>) {
    let dir = pawn_direction(us);
    let start_rank = match us {
        Color::White => 1,
        Color::Black => 6,
    };
    let promotion_rank = match us {
        Color::White => 7,
        Color::Black => 0,
    };

    if let Some(one) = from.offset(0, dir) {
        if position.piece_at(one).is_none() {
            push_pawn_move(from, one, promotion_rank, moves);
            if from.rank() == start_rank {
                if let Some(two) = one.offset(0, dir) {
                    if position.piece_at(two).is_none() {
                        moves.push(Move::new(from, two, MoveKind::DoublePush));
                    }
                }
            }
        }
    }

    for file_delta in [-1i8, 1] {
        let Some(to) = from.offset(file_delta, dir) else {
            continue;
        };
        match position.piece_at(to) {
            Some((_, color)) if color != us => push_pawn_move(from, to, promotion_rank, moves),
            None if position.en_passant == Some(to) => {
                moves.push(Move::new(from, to, MoveKind::EnPassant));
            }
            _ => {}
        }
    }
}

fn push_pawn_move(from: Square, to: Square, promotion_rank: u8, moves: &mut Vec<Move>) {
    if to.rank() == promotion_rank {
        for piece in [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight] {
            moves.push(Move::new(from, to, MoveKind::Promotion(piece)));
        }
    } else {
        moves.push(Move::quiet(from, to));
    }
}

fn step_moves(
    position: &Position,
    from: Square,
    us: Color,
    steps: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in steps {
        if let Some(to) = from.offset(df, dr) {
            match position.piece_at(to) {
                Some((_, color)) if color == us => {}
                _ => moves.push(Move::quiet(from, to)),
            }
        }
    }
}

fn slide_moves(
    position: &Position,
    from: Square,
    us: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in directions {
        let mut sq = from;
        while let Some(to) = sq.offset(df, dr) {
            match position.piece_at(to) {
                None => {
                    moves.push(Move::quiet(from, to));
                    sq = to;
                }
                Some((_, color)) => {
                    if color != us {
                        moves.push(Move::quiet(from, to));
                    }
                    break;
                }
            }
        }
    }
}

fn castling_moves(position: &Position, us: Color, moves: &mut Vec<Move>) {
    // Castling out of check is never legal.
    if in_check(position, us) {
        return;
    }
    let them = us.opposite();
    let (king_from, f, g, b, c, d) = match us {
        Color::White => (
            Square::E1,
            Square::F1,
            Square::G1,
            Square::B1,
            Square::C1,
            Square::D1,
        ),
        Color::Black => (
            Square::E8,
            Square::F8,
            Square::G8,
            Square::B8,
            Square::C8,
            Square::D8,
        ),
    };

    // The king may not pass through an attacked square; the destination
    // square is covered by the king-safety filter.
    if position.castling.kingside(us)
        && position.piece_at(f).is_none()
        && position.piece_at(g).is_none()
        && !square_attacked(position, f, them)
    {
        moves.push(Move::new(king_from, g, MoveKind::CastleKingside));
    }
    if position.castling.queenside(us)
        && position.piece_at(b).is_none()
        && position.piece_at(c).is_none()
        && position.piece_at(d).is_none()
        && !square_attacked(position, d, them)
    {
        moves.push(Move::new(king_from, c, MoveKind::CastleQueenside));
    }
}

fn revoke_for_square(position: &mut Position, sq: Square) {
    if sq == Square::H1 {
        position.castling.revoke_kingside(Color::White);
    } else if sq == Square::A1 {
        position.castling.revoke_queenside(Color::White);
    } else if sq == Square::H8 {
        position.castling.revoke_kingside(Color::Black);
    } else if sq == Square::A8 {
        position.castling.revoke_queenside(Color::Black);
    }
}

/// Applies a move and returns the successor position.
///
/// The move must come from [`legal_moves`] (or be a pseudo-legal move during
/// generation); the input position is untouched.
pub fn apply(position: &Position, m: Move) -> Position {
    let mut next = position.clone();
    let us = position.side_to_move;
    let from = m.from();
    let to = m.to();

    let (moved, _) = position
        .piece_at(from)
        .expect("apply: no piece on the from-square");

    let mut captured = position.piece_at(to).is_some();
    next.clear(from);
    next.clear(to);

    if m.kind() == MoveKind::EnPassant {
        if let Some(taken) = to.offset(0, -pawn_direction(us)) {
            next.clear(taken);
        }
        captured = true;
    }

    let placed = match m.kind() {
        MoveKind::Promotion(piece) => piece,
        _ => moved,
    };
    next.set(to, placed, us);

    match m.kind() {
        MoveKind::CastleKingside => {
            let (rook_from, rook_to) = match us {
                Color::White => (Square::H1, Square::F1),
                Color::Black => (Square::H8, Square::F8),
            };
            next.clear(rook_from);
            next.set(rook_to, Piece::Rook, us);
        }
        MoveKind::CastleQueenside => {
            let (rook_from, rook_to) = match us {
                Color::White => (Square::A1, Square::D1),
                Color::Black => (Square::A8, Square::D8),
            };
            next.clear(rook_from);
            next.set(rook_to, Piece::Rook, us);
        }
        _ => {}
    }

    if moved == Piece::King {
        next.castling.revoke_all(us);
    }
    // A move from a rook home square loses that castling; so does a capture
    // landing on one.
    revoke_for_square(&mut next, from);
    revoke_for_square(&mut next, to);

    next.en_passant = match m.kind() {
        MoveKind::DoublePush => from.offset(0, pawn_direction(us)),
        _ => None,
    };

    next.halfmove_clock = if moved == Piece::Pawn || captured {
        0
    } else {
        position.halfmove_clock + 1
    };
    if us == Color::Black {
        next.fullmove_number += 1;
    }
    next.side_to_move = us.opposite();
    next
}

/// True when neither side can possibly deliver checkmate: bare kings, a
/// single minor piece, or bishops all confined to one square color.
pub fn insufficient_material(position: &Position) -> bool {
    let mut knights = 0u32;
    let mut light_bishop = false;
    let mut dark_bishop = false;
    for sq in (0..64).filter_map(Square::from_index) {
        match position.piece_at(sq) {
            None | Some((Piece::King, _)) => {}
            Some((Piece::Knight, _)) => knights += 1,
            Some((Piece::Bishop, _)) => {
                if (sq.file() + sq.rank()) % 2 == 0 {
                    dark_bishop = true;
                } else {
                    light_bishop = true;
                }
            }
            Some(_) => return false,
        }
    }
    if light_bishop && dark_bishop {
        return false;
    }
    if knights == 0 {
        return true;
    }
    knights == 1 && !light_bishop && !dark_bishop
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uci_set(moves: &[Move]) -> Vec<String> {
        moves.iter().map(|m| m.uci()).collect()
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let position = Position::startpos();
        let moves = legal_moves(&position);
        assert_eq!(moves.len(), 20);
        let tokens = uci_set(&moves);
        assert!(tokens.contains(&"e2e4".to_string()));
        assert!(tokens.contains(&"g1f3".to_string()));
    }

    #[test]
    fn startpos_not_in_check() {
        let position = Position::startpos();
        assert!(!in_check(&position, Color::White));
        assert!(!in_check(&position, Color::Black));
    }

    #[test]
    fn pawn_attacks_detected() {
        let position = Position::startpos();
        let e3 = Square::from_algebraic("e3").unwrap();
        let e4 = Square::from_algebraic("e4").unwrap();
        assert!(square_attacked(&position, e3, Color::White));
        assert!(!square_attacked(&position, e4, Color::White));
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let mut position = Position::startpos();
        for token in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            let m = legal_moves(&position)
                .into_iter()
                .find(|m| m.uci() == token)
                .unwrap();
            position = apply(&position, m);
        }
        assert!(in_check(&position, Color::White));
        assert!(legal_moves(&position).is_empty());
    }

    #[test]
    fn stalemate_has_no_moves_and_no_check() {
        let position = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!in_check(&position, Color::Black));
        assert!(legal_moves(&position).is_empty());
    }

    #[test]
    fn pinned_pawn_cannot_move() {
        // The h4 bishop pins the f2 pawn against the king on e1.
        let position = Position::from_fen("4k3/8/8/8/7b/8/5P2/4K3 w - - 0 1").unwrap();
        let moves = legal_moves(&position);
        let f2 = Square::from_algebraic("f2").unwrap();
        assert!(moves.iter().all(|m| m.from() != f2));
    }

    #[test]
    fn check_must_be_answered() {
        // White is in check from the e5 rook; every legal move must resolve it.
        let position = Position::from_fen("4k3/8/8/4r3/8/8/3P4/4K3 w - - 0 1").unwrap();
        assert!(in_check(&position, Color::White));
        for m in legal_moves(&position) {
            assert!(!in_check(&apply(&position, m), Color::White), "{}", m);
        }
    }

    #[test]
    fn castling_both_sides_available() {
        let position =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let tokens = uci_set(&legal_moves(&position));
        assert!(tokens.contains(&"e1g1".to_string()));
        assert!(tokens.contains(&"e1c1".to_string()));
    }

    #[test]
    fn castling_blocked_through_attacked_square() {
        // The f5 rook covers f1, so kingside castling is out; queenside stays.
        let position =
            Position::from_fen("r3k2r/ppppp1pp/8/5r2/8/8/PPPPP1PP/R3K2R w KQkq - 0 1").unwrap();
        let tokens = uci_set(&legal_moves(&position));
        assert!(!tokens.contains(&"e1g1".to_string()));
        assert!(tokens.contains(&"e1c1".to_string()));
    }

    #[test]
    fn castling_requires_rights() {
        let position =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w - - 0 1").unwrap();
        let tokens = uci_set(&legal_moves(&position));
        assert!(!tokens.contains(&"e1g1".to_string()));
        assert!(!tokens.contains(&"e1c1".to_string()));
    }

    #[test]
    fn castling_moves_the_rook() {
        let position =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let castle = legal_moves(&position)
            .into_iter()
            .find(|m| m.kind() == MoveKind::CastleKingside)
            .unwrap();
        let next = apply(&position, castle);
        assert_eq!(next.piece_at(Square::G1), Some((Piece::King, Color::White)));
        assert_eq!(next.piece_at(Square::F1), Some((Piece::Rook, Color::White)));
        assert_eq!(next.piece_at(Square::H1), None);
        assert!(!next.castling.kingside(Color::White));
        assert!(!next.castling.queenside(Color::White));
    }

    #[test]
    fn en_passant_capture_generated_and_applied() {
        let position =
            Position::from_fen("rnbqkbnr/pppp1ppp/8/4pP2/8/8/PPPPP1PP/RNBQKBNR w KQkq e6 0 1")
                .unwrap();
        let ep = legal_moves(&position)
            .into_iter()
            .find(|m| m.kind() == MoveKind::EnPassant)
            .unwrap();
        assert_eq!(ep.uci(), "f5e6");
        let next = apply(&position, ep);
        let e5 = Square::from_algebraic("e5").unwrap();
        let e6 = Square::from_algebraic("e6").unwrap();
        assert_eq!(next.piece_at(e5), None);
        assert_eq!(next.piece_at(e6), Some((Piece::Pawn, Color::White)));
        assert_eq!(next.halfmove_clock, 0);
    }

    #[test]
    fn promotion_offers_four_pieces() {
        let position = Position::from_fen("8/P7/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        let promotions: Vec<Move> = legal_moves(&position)
            .into_iter()
            .filter(|m| m.promotion().is_some())
            .collect();
        assert_eq!(promotions.len(), 4);
        let queen = promotions
            .iter()
            .find(|m| m.promotion() == Some(Piece::Queen))
            .unwrap();
        let next = apply(&position, *queen);
        let a8 = Square::from_algebraic("a8").unwrap();
        assert_eq!(next.piece_at(a8), Some((Piece::Queen, Color::White)));
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let position = Position::startpos();
        let push = legal_moves(&position)
            .into_iter()
            .find(|m| m.uci() == "e2e4")
            .unwrap();
        assert_eq!(push.kind(), MoveKind::DoublePush);
        let next = apply(&position, push);
        assert_eq!(next.en_passant, Square::from_algebraic("e3"));
        assert_eq!(next.side_to_move, Color::Black);
        assert_eq!(next.fullmove_number, 1);

        let reply = legal_moves(&next)
            .into_iter()
            .find(|m| m.uci() == "g8f6")
            .unwrap();
        let after = apply(&next, reply);
        assert_eq!(after.en_passant, None);
        assert_eq!(after.fullmove_number, 2);
        assert_eq!(after.halfmove_clock, 1);
    }

    #[test]
    fn rook_move_revokes_castling_right() {
        let position =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let rook_lift = legal_moves(&position)
            .into_iter()
            .find(|m| m.uci() == "h1g1")
            .unwrap();
        let next = apply(&position, rook_lift);
        assert!(!next.castling.kingside(Color::White));
        assert!(next.castling.queenside(Color::White));
        assert!(next.castling.kingside(Color::Black));
    }

    #[test]
    fn capture_on_rook_home_square_revokes_right() {
        let position =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let capture = legal_moves(&position)
            .into_iter()
            .find(|m| m.uci() == "a1a8")
            .unwrap();
        let next = apply(&position, capture);
        assert!(!next.castling.queenside(Color::Black));
        assert!(next.castling.kingside(Color::Black));
        assert!(!next.castling.queenside(Color::White));
        assert_eq!(next.halfmove_clock, 0);
    }

    #[test]
    fn insufficient_material_cases() {
        let draw = |fen: &str| insufficient_material(&Position::from_fen(fen).unwrap());
        assert!(draw("8/8/8/8/8/8/8/4K2k w - - 0 1"));
        assert!(draw("8/8/8/8/8/8/8/2B1K2k w - - 0 1"));
        assert!(draw("8/8/8/8/8/8/8/2N1K2k w - - 0 1"));
        // Bishops on one square color only (d8 and c1 share a color).
        assert!(draw("3b4/8/8/8/8/8/8/2B1K2k w - - 0 1"));
        // Opposite-colored bishops, rooks, queens and pawns can still mate.
        assert!(!draw("2b5/8/8/8/8/8/8/2B1K2k w - - 0 1"));
        assert!(!draw("8/8/8/8/8/8/8/R3K2k w - - 0 1"));
        assert!(!draw("8/8/8/8/8/8/4P3/4K2k w - - 0 1"));
        assert!(!draw("8/8/8/8/8/8/8/1NN1K2k w - - 0 1"));
    }
}
