//! Move-count verification over a table of reference positions.

use serde::Deserialize;

use magic_chess::board::Board;

#[derive(Deserialize)]
struct PerftSuite {
    positions: Vec<PerftPosition>,
}

#[derive(Deserialize)]
struct PerftPosition {
    name: String,
    fen: String,
    /// Leaf counts for depth 1, 2, ...
    counts: Vec<u64>,
}

fn load_suite() -> PerftSuite {
    let data = include_str!("data/perft.json");
    serde_json::from_str(data).expect("perft.json is malformed")
}

#[test]
fn perft_suite_matches_reference_counts() {
    let suite = load_suite();
    assert!(!suite.positions.is_empty());

    for position in &suite.positions {
        let mut board = Board::from_fen(&position.fen)
            .unwrap_or_else(|e| panic!("{}: bad FEN: {e}", position.name));
        for (i, &expected) in position.counts.iter().enumerate() {
            let depth = i + 1;
            assert_eq!(
                board.perft(depth),
                expected,
                "{} at depth {depth}",
                position.name
            );
        }
        assert_eq!(board.to_fen(), position.fen, "{} not restored", position.name);
    }
}

#[test]
fn divide_sums_to_perft() {
    let suite = load_suite();
    for position in suite.positions.iter().filter(|p| p.counts.len() >= 2) {
        let mut board = Board::from_fen(&position.fen).unwrap();
        let divided = board.divide(2);
        assert_eq!(divided.len() as u64, position.counts[0], "{}", position.name);
        let total: u64 = divided.iter().map(|(_, n)| n).sum();
        assert_eq!(total, position.counts[1], "{}", position.name);
    }
}
