//! Property-based tests using proptest.

use crate::board::attack_tables::{bishop_attacks, queen_attacks, rook_attacks};
use crate::board::{Bitboard, Board, Color, KillerTable, Move, Piece, Square};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Strategy to generate a random legal move sequence length
fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=40usize
}

/// Strategy to generate a random seed for move selection
fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

const START_POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
];

fn start_board(rng: &mut StdRng) -> Board {
    let fen = START_POSITIONS[rng.gen_range(0..START_POSITIONS.len())];
    Board::from_fen(fen).unwrap()
}

/// Play up to `num_moves` random legal moves, returning them in order.
fn random_playout(board: &mut Board, rng: &mut StdRng, num_moves: usize) -> Vec<Move> {
    let mut played = Vec::new();
    for _ in 0..num_moves {
        let moves = board.generate_moves();
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        board.make_move(mv);
        played.push(mv);
    }
    played
}

/// Occupancy for slider tests: random bits with `sq` itself cleared.
fn occupancy_around(sq: Square, bits: u64) -> Bitboard {
    Bitboard(bits & !(1u64 << sq.index()))
}

proptest! {
    /// Property: make_move followed by unmake_move restores board state exactly
    #[test]
    fn prop_make_unmake_restores_state(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = start_board(&mut rng);
        let initial = board.clone();

        let mut played = random_playout(&mut board, &mut rng, num_moves);
        while let Some(mv) = played.pop() {
            board.unmake_move(mv);
        }

        prop_assert_eq!(board, initial);
    }

    /// Property: incremental hash always equals the recomputed hash and the
    /// piece masks stay a partition of the occupancy
    #[test]
    fn prop_hash_and_masks_consistent(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = start_board(&mut rng);

        for _ in 0..num_moves {
            let moves = board.generate_moves();
            if moves.is_empty() {
                break;
            }
            board.make_move(moves[rng.gen_range(0..moves.len())]);

            prop_assert_eq!(board.hash(), board.compute_hash());
            prop_assert_eq!(board.validate(), Ok(()));

            let mut union = Bitboard::EMPTY;
            let mut total = 0;
            for color in Color::BOTH {
                for piece in Piece::ALL {
                    let mask = board.pieces(color, piece);
                    total += mask.popcount();
                    union = union | mask;
                }
            }
            prop_assert_eq!(union, board.occupancy());
            prop_assert_eq!(total, board.occupancy().popcount());
        }
    }

    /// Property: FEN round-trip preserves position
    #[test]
    fn prop_fen_roundtrip(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = start_board(&mut rng);
        random_playout(&mut board, &mut rng, num_moves);

        let fen = board.to_fen();
        let restored = Board::from_fen(&fen).unwrap();

        prop_assert_eq!(restored.to_fen(), fen);
        prop_assert_eq!(restored.pieces, board.pieces);
        prop_assert_eq!(restored.side_to_move(), board.side_to_move());
        prop_assert_eq!(restored.castling_rights(), board.castling_rights());
    }

    /// Property: legal moves never leave the mover's king attacked, and
    /// every rejected pseudo-legal move does
    #[test]
    fn prop_legal_moves_are_legal(seed in seed_strategy(), num_moves in 0..30usize) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = start_board(&mut rng);
        random_playout(&mut board, &mut rng, num_moves);

        let us = board.side_to_move();
        let legal = board.generate_moves();
        for mv in board.generate_pseudo_moves() {
            board.make_move(mv);
            let exposed = board.in_check(us);
            board.unmake_move(mv);
            prop_assert_eq!(legal.contains(mv), !exposed, "{} misclassified", mv);
        }
    }

    /// Property: every legal move survives the notation round trip
    #[test]
    fn prop_move_notation_roundtrip(seed in seed_strategy(), num_moves in 0..30usize) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = start_board(&mut rng);
        random_playout(&mut board, &mut rng, num_moves);

        for mv in board.generate_moves() {
            let parsed = board.parse_move(&mv.to_string());
            prop_assert_eq!(parsed, Ok(mv));
        }
    }

    /// Property: magic lookups agree with ray casting for any occupancy
    #[test]
    fn prop_slider_lookup_matches_rays(idx in 0..64usize, bits in any::<u64>()) {
        let sq = Square::from_index(idx);
        let occ = occupancy_around(sq, bits);

        let mut rook = Bitboard::EMPTY;
        let mut bishop = Bitboard::EMPTY;
        for (dr, df, diagonal) in [
            (1, 0, false), (-1, 0, false), (0, 1, false), (0, -1, false),
            (1, 1, true), (1, -1, true), (-1, 1, true), (-1, -1, true),
        ] {
            let mut cur = sq;
            while let Some(next) = cur.offset(dr, df) {
                let bit = Bitboard::from_square(next);
                if diagonal { bishop = bishop | bit; } else { rook = rook | bit; }
                if occ.contains(next) {
                    break;
                }
                cur = next;
            }
        }

        prop_assert_eq!(rook_attacks(sq, occ), rook);
        prop_assert_eq!(bishop_attacks(sq, occ), bishop);
        prop_assert_eq!(queen_attacks(sq, occ), rook | bishop);
    }

    /// Property: killer moves are preserved after update
    #[test]
    fn prop_killer_preserves_moves(
        ply in 0..200usize,
        mv1_from in 0..64usize,
        mv1_to in 0..64usize,
        mv2_from in 0..64usize,
        mv2_to in 0..64usize
    ) {
        let mut table = KillerTable::new();

        let mv1 = Move::quiet(Square::from_index(mv1_from), Square::from_index(mv1_to), Piece::Knight);
        let mv2 = Move::quiet(Square::from_index(mv2_from), Square::from_index(mv2_to), Piece::Knight);

        table.update(ply, mv1);

        if ply < crate::board::MAX_PLY {
            prop_assert_eq!(table.primary(ply), mv1);
        } else {
            prop_assert_eq!(table.primary(ply), Move::NULL);
        }

        if mv1 != mv2 {
            table.update(ply, mv2);
            if ply < crate::board::MAX_PLY {
                prop_assert_eq!(table.primary(ply), mv2);
                prop_assert_eq!(table.secondary(ply), mv1);
            }
        }
    }

    /// Property: TT stores and retrieves correct data
    #[test]
    fn prop_tt_store_retrieve(
        hash in any::<u64>(),
        depth in 0..100u32,
        score in -40000..40000i32
    ) {
        use crate::tt::{BoundType, TranspositionTable};

        let tt = TranspositionTable::new(1);
        tt.store(hash, depth, score, BoundType::LowerBound, None, 1);

        let entry = tt.probe(hash);
        prop_assert!(entry.is_some());
        let entry = entry.unwrap();
        prop_assert_eq!(entry.depth(), depth);
        prop_assert_eq!(entry.score(), score.clamp(i16::MIN as i32, i16::MAX as i32));
        prop_assert_eq!(entry.bound_type(), BoundType::LowerBound);
        prop_assert_eq!(entry.best_move(), None);
    }
}
