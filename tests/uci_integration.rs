use std::io::{BufRead, BufReader, Cursor, Write};
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};

use magic_chess::board::Board;
use magic_chess::config::EngineConfig;
use magic_chess::engine::EngineController;
use magic_chess::uci::command::{parse_uci_command, UciCommand};
use magic_chess::uci::{try_parse_position_command, UciEngine};

/// Output sink the test can read back after the engine is done with it.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn run_script(script: &str) -> String {
    let config = EngineConfig::default().with_hash_mb(1);
    let out = SharedBuf::default();
    let mut engine = UciEngine::new(EngineController::new(config.hash_mb), &config, out.clone());
    engine.run(Cursor::new(script.as_bytes())).unwrap();
    drop(engine);
    out.text()
}

fn bestmove(output: &str) -> &str {
    let line = output
        .lines()
        .find(|l| l.starts_with("bestmove"))
        .expect("no bestmove found");
    line.split_whitespace().nth(1).expect("bestmove missing move")
}

#[test]
fn handshake_and_ready() {
    let output = run_script("uci\nisready\nquit\n");
    assert!(output.starts_with("id name magic_chess\n"));
    assert!(output.contains("option name Hash"));
    assert!(output.contains("option name EvalFile"));
    assert!(output.contains("uciok\nreadyok\n"));
}

#[test]
fn go_returns_legal_move_with_info() {
    let output = run_script("position startpos moves e2e4\ngo depth 3\n");
    assert!(output.contains("info depth 1 "));
    assert!(output.contains("info depth 3 "));
    assert!(output.contains(" pv "));

    let mv = bestmove(&output);
    let mut board = Board::new();
    try_parse_position_command(&mut board, &["position", "startpos", "moves", "e2e4"]).unwrap();
    assert!(board.parse_move(mv).is_ok(), "bestmove not legal: {mv}");
}

#[test]
fn go_uses_depth_option() {
    let output = run_script("setoption name Depth value 2\ngo\n");
    assert!(output.contains("info depth 2 "));
    assert!(!output.contains("info depth 3 "));
    bestmove(&output);
}

#[test]
fn go_finds_mate_and_reports_mate_score() {
    let output = run_script("position fen 6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1\ngo depth 2\n");
    assert!(output.contains("score mate 1 "));
    assert_eq!(bestmove(&output), "a1a8");
}

#[test]
fn go_without_legal_moves_reports_none() {
    let output = run_script("position fen 7k/5Q2/6K1/8/8/8/8/8 b - - 0 1\ngo depth 3\n");
    assert_eq!(bestmove(&output), "(none)");
}

#[test]
fn bad_position_keeps_previous_one() {
    let output = run_script(
        "position fen 8/8/8/8/8/8/8/K1k5 w - - 0 1\nposition fen bad w - - 0 1\nposition startpos moves e2e5\nd\n",
    );
    assert!(output.contains("Fen: 8/8/8/8/8/8/8/K1k5 w - - 0 1\n"));
}

#[test]
fn display_after_moves() {
    let output = run_script("position startpos moves e2e4 c7c5\nd\nucinewgame\nd\n");
    assert!(output.contains(
        "Fen: rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2\n"
    ));
    assert!(output.contains(
        "Fen: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1\n"
    ));
}

#[test]
fn perft_and_divide_commands() {
    let output = run_script("perft 3\ndivide 2\n");
    assert!(output.contains("info string perft depth 3 nodes 8902 "));
    assert!(output.contains("e2e4: 20\n"));
    assert!(output.contains("Nodes searched: 400\n"));
}

#[test]
fn unknown_commands_are_ignored() {
    let output = run_script("xyzzy\nsetoption name Threads value 4\nisready\n");
    assert_eq!(output, "readyok\n");
}

#[test]
fn stop_without_search_is_harmless() {
    let output = run_script("stop\nisready\n");
    assert_eq!(output, "readyok\n");
}

#[test]
fn command_parser_recognises_protocol() {
    assert_eq!(parse_uci_command("isready"), Some(UciCommand::IsReady));
    assert!(matches!(
        parse_uci_command("go depth 4"),
        Some(UciCommand::Go(args)) if args.depth == Some(4)
    ));
}

#[test]
fn binary_smoke_test_returns_legal_move() {
    let exe = env!("CARGO_BIN_EXE_magic_chess");
    let mut child = Command::new(exe)
        .args(["--hash", "1"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn engine binary");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let mut reader = BufReader::new(stdout);

    stdin
        .write_all(b"uci\nisready\nposition startpos moves e2e4\ngo depth 3\n")
        .unwrap();

    let mut output = String::new();
    loop {
        let mut line = String::new();
        let bytes = reader.read_line(&mut line).expect("read failed");
        if bytes == 0 {
            break;
        }
        output.push_str(&line);
        if line.starts_with("bestmove") {
            break;
        }
    }

    stdin.write_all(b"quit\n").unwrap();
    drop(stdin);
    let status = child.wait().unwrap();
    assert!(status.success());

    assert!(output.contains("uciok"));
    assert!(output.contains("readyok"));
    assert!(output.contains("hashfull"));

    let mv = bestmove(&output);
    let mut board = Board::new();
    board.make_move_uci("e2e4").unwrap();
    assert!(board.parse_move(mv).is_ok(), "bestmove not legal in position: {mv}");
}

#[test]
fn binary_perft_subcommand() {
    let exe = env!("CARGO_BIN_EXE_magic_chess");
    let output = Command::new(exe)
        .args(["perft", "--depth", "3"])
        .stderr(Stdio::null())
        .output()
        .expect("failed to run perft");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Nodes searched: 8902"));
}
