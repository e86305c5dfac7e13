//! Search scoring and session behaviour.

use std::sync::{Arc, Mutex};

use crate::board::{
    search, Board, MaterialEvaluator, SearchIterationInfo, SearchLimits, SearchSession,
    MATE_SCORE,
};

fn session() -> SearchSession {
    SearchSession::new(1, Arc::new(MaterialEvaluator))
}

fn run(fen: &str, depth: u32) -> (Board, crate::board::SearchResult) {
    let mut board = Board::from_fen(fen).unwrap();
    let mut session = session();
    let result = search(&mut board, &mut session, &SearchLimits::depth(depth));
    (board, result)
}

#[test]
fn test_finds_mate_in_one() {
    let (_, result) = run("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", 3);
    assert_eq!(result.best_move.map(|m| m.to_string()).as_deref(), Some("a1a8"));
    assert_eq!(result.score, MATE_SCORE - 1);
}

#[test]
fn test_checkmated_root_has_no_move() {
    let (_, result) = run("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1", 4);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, -MATE_SCORE);
}

#[test]
fn test_stalemated_root_scores_zero() {
    let (_, result) = run("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 4);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, 0);
}

#[test]
fn test_avoids_stalemating_when_winning() {
    // Qf7 stalemates; anything sensible keeps a queen-up score
    let (_, result) = run("7k/8/6K1/8/8/8/8/5Q2 w - - 0 1", 3);
    let best = result.best_move.unwrap().to_string();
    assert_ne!(best, "f1f7");
    assert!(result.score > 0);
}

#[test]
fn test_wins_hanging_queen() {
    let (_, result) = run("4k3/8/8/3q4/8/8/8/3QK3 w - - 0 1", 2);
    assert_eq!(result.best_move.map(|m| m.to_string()).as_deref(), Some("d1d5"));
    assert!(result.score >= 800);
}

#[test]
fn test_quiescence_sees_recapture() {
    let (_, result) = run("4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1", 1);
    assert_ne!(result.best_move.map(|m| m.to_string()).as_deref(), Some("d1d5"));
    assert!(result.score > 600);
}

#[test]
fn test_search_restores_board() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let (board, result) = run(fen, 3);
    assert!(result.best_move.is_some());
    assert_eq!(board.to_fen(), fen);
    assert_eq!(board.hash(), board.compute_hash());
    assert_eq!(board.ply_depth(), 0);
}

#[test]
fn test_node_limit_is_respected() {
    let mut board = Board::new();
    let mut session = session();
    let result = search(
        &mut board,
        &mut session,
        &SearchLimits::depth(64).with_nodes(2000),
    );
    assert!(result.best_move.is_some());
    assert!(result.nodes <= 2000);
    assert!(result.depth < 64);
    assert_eq!(board, Board::new());
}

#[test]
fn test_preset_stop_returns_fallback_move() {
    let mut board = Board::new();
    let mut session = session();
    session.request_stop();
    let result = search(&mut board, &mut session, &SearchLimits::depth(5));
    assert_eq!(result.depth, 0);
    let best = result.best_move.unwrap();
    assert!(board.generate_moves().contains(best));

    session.reset_stop();
    let result = search(&mut board, &mut session, &SearchLimits::depth(2));
    assert_eq!(result.depth, 2);
}

#[test]
fn test_info_callback_reports_each_iteration() {
    let seen: Arc<Mutex<Vec<SearchIterationInfo>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let limits =
        SearchLimits::depth(3).with_info_callback(Arc::new(move |info: &SearchIterationInfo| {
            sink.lock().unwrap().push(info.clone());
        }));

    let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let mut session = session();
    search(&mut board, &mut session, &limits);

    let seen = seen.lock().unwrap();
    let depths: Vec<u32> = seen.iter().map(|i| i.depth).collect();
    assert_eq!(depths, vec![1, 2, 3]);
    for info in seen.iter() {
        assert_eq!(info.mate_in, Some(1));
        assert_eq!(info.pv[0].to_string(), "a1a8");
        assert!(info.pv.len() <= info.depth as usize);
    }
}

#[test]
fn test_repeat_search_is_deterministic() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
    let mut board = Board::from_fen(fen).unwrap();
    let mut first = session();
    let mut second = session();
    let a = search(&mut board, &mut first, &SearchLimits::depth(3));
    let b = search(&mut board, &mut second, &SearchLimits::depth(3));
    assert_eq!(a, b);

    first.clear();
    let c = search(&mut board, &mut first, &SearchLimits::depth(3));
    assert_eq!(a, c);
}

#[test]
fn test_stats_are_tracked() {
    let mut board = Board::new();
    let mut session = session();
    let result = search(&mut board, &mut session, &SearchLimits::depth(4));
    assert_eq!(session.stats().nodes, result.nodes);
    assert!(session.stats().beta_cutoffs > 0);
    assert!(session.stats().seldepth >= 4);
    assert!(session.hashfull_per_mille() > 0);
}
