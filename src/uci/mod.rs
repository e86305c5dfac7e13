//! Universal Chess Interface (UCI) protocol implementation.
//!
//! Line-oriented commands come in on one stream and replies go out on
//! another. Searches run on the controller's worker thread, which writes
//! `info` and `bestmove` lines to the shared output.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, warn};
use parking_lot::Mutex;
use thiserror::Error;

use crate::board::{
    Board, FenError, Move, MoveParseError, SearchInfoCallback, SearchIterationInfo, SearchResult,
};
use crate::config::EngineConfig;
use crate::engine::{EngineController, SearchParams};

pub mod command;
pub mod options;

use command::{parse_uci_command, GoArgs, UciCommand};
use options::{parse_setoption, UciOptionAction, UciOptions};

/// Error type for UCI position command parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UciError {
    /// Invalid FEN string
    #[error("invalid FEN: {0}")]
    InvalidFen(#[from] FenError),
    /// Invalid move in the move list
    #[error("invalid move '{move_str}': {source}")]
    InvalidMove {
        move_str: String,
        source: MoveParseError,
    },
    /// Missing required parts in the command
    #[error("missing required parts in position command")]
    MissingParts,
}

/// Parse a UCI position command, returning an error on failure.
///
/// Supports both "position startpos" and "position fen <6 fields>" formats,
/// optionally followed by "moves <move1> <move2> ...". On error `board` is
/// left untouched. The replayed moves cannot be unmade afterwards.
pub fn try_parse_position_command(board: &mut Board, parts: &[&str]) -> Result<(), UciError> {
    let mut i = 1;

    let mut new_board = match parts.get(i) {
        Some(&"startpos") => {
            i += 1;
            Board::new()
        }
        Some(&"fen") => {
            if i + 6 >= parts.len() {
                return Err(UciError::MissingParts);
            }
            let fen = parts[i + 1..i + 7].join(" ");
            i += 7;
            Board::from_fen(&fen)?
        }
        _ => return Err(UciError::MissingParts),
    };

    if parts.get(i) == Some(&"moves") {
        for move_str in &parts[i + 1..] {
            new_board
                .make_move_uci(move_str)
                .map_err(|source| UciError::InvalidMove {
                    move_str: (*move_str).to_string(),
                    source,
                })?;
            new_board.clear_history();
        }
    }

    *board = new_board;
    Ok(())
}

/// Format one search iteration as an `info` line.
#[must_use]
pub fn format_info(info: &SearchIterationInfo) -> String {
    let score = match info.mate_in {
        Some(moves) => format!("mate {moves}"),
        None => format!("cp {}", info.score),
    };
    let mut line = format!(
        "info depth {} seldepth {} score {score} nodes {} nps {} time {} hashfull {}",
        info.depth, info.seldepth, info.nodes, info.nps, info.time_ms, info.hashfull
    );
    if !info.pv.is_empty() {
        line.push_str(" pv");
        for mv in &info.pv {
            line.push(' ');
            line.push_str(&mv.to_string());
        }
    }
    line
}

/// Format the final `bestmove` line.
#[must_use]
pub fn format_bestmove(best_move: Option<Move>) -> String {
    match best_move {
        Some(mv) => format!("bestmove {mv}"),
        None => "bestmove (none)".to_string(),
    }
}

/// Protocol state: the engine, the option values and the output stream.
pub struct UciEngine<W: Write + Send + 'static> {
    controller: EngineController,
    options: UciOptions,
    out: Arc<Mutex<W>>,
}

impl<W: Write + Send + 'static> UciEngine<W> {
    pub fn new(mut controller: EngineController, config: &EngineConfig, out: W) -> Self {
        let out = Arc::new(Mutex::new(out));
        let info_out = Arc::clone(&out);
        let callback: SearchInfoCallback = Arc::new(move |info: &SearchIterationInfo| {
            let mut out = info_out.lock();
            let _ = writeln!(out, "{}", format_info(info));
            let _ = out.flush();
        });
        controller.set_info_callback(Some(callback));
        UciEngine {
            controller,
            options: UciOptions::new(config),
            out,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &EngineController {
        &self.controller
    }

    #[must_use]
    pub fn options(&self) -> &UciOptions {
        &self.options
    }

    /// Read commands until `quit` or end of input.
    ///
    /// At end of input a running search is allowed to finish.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        for line in input.lines() {
            if !self.handle_line(&line?)? {
                self.controller.stop_search();
                return Ok(());
            }
        }
        self.controller.wait_search();
        Ok(())
    }

    /// Handle one input line. Returns `false` once `quit` is received.
    pub fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        let Some(cmd) = parse_uci_command(line) else {
            return Ok(true);
        };
        debug!("command: {cmd:?}");

        match cmd {
            UciCommand::Uci => {
                let mut out = self.out.lock();
                self.options.print(&mut *out)?;
                out.flush()?;
            }
            UciCommand::IsReady => self.reply("readyok")?,
            UciCommand::UciNewGame => self.controller.new_game(),
            UciCommand::Position(parts) => {
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                let mut board = self.controller.board().clone();
                match try_parse_position_command(&mut board, &parts) {
                    Ok(()) => self.controller.set_board(board),
                    Err(e) => warn!("rejected position command: {e}"),
                }
            }
            UciCommand::Go(args) => self.go(args)?,
            UciCommand::Stop => self.controller.stop_search(),
            UciCommand::Perft(depth) => self.perft(depth)?,
            UciCommand::Divide(depth) => self.divide(depth)?,
            UciCommand::Display => {
                let board = self.controller.board();
                let text = format!("Fen: {}\nKey: {:016x}", board.to_fen(), board.hash());
                self.reply(&text)?;
            }
            UciCommand::SetOption(parts) => {
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                self.set_option(&parts);
            }
            UciCommand::Quit => return Ok(false),
            UciCommand::Unknown(text) => warn!("unknown command: {text}"),
        }
        Ok(true)
    }

    fn reply(&self, text: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        writeln!(out, "{text}")?;
        out.flush()
    }

    fn go(&mut self, args: GoArgs) -> io::Result<()> {
        let params = SearchParams {
            depth: args.depth.unwrap_or(self.options.depth),
            nodes: args.nodes,
        };
        let out = Arc::clone(&self.out);
        self.controller
            .start_search(params, move |result: SearchResult| {
                let mut out = out.lock();
                let _ = writeln!(out, "{}", format_bestmove(result.best_move));
                let _ = out.flush();
            })
    }

    fn perft(&mut self, depth: usize) -> io::Result<()> {
        self.controller.stop_search();
        let start = Instant::now();
        let nodes = self.controller.board_mut().perft(depth);
        let time_ms = start.elapsed().as_millis() as u64;
        let nps = if time_ms > 0 { nodes * 1000 / time_ms } else { 0 };
        self.reply(&format!(
            "info string perft depth {depth} nodes {nodes} time {time_ms} nps {nps}"
        ))
    }

    fn divide(&mut self, depth: usize) -> io::Result<()> {
        self.controller.stop_search();
        let counts = self.controller.board_mut().divide(depth);
        let total: u64 = counts.iter().map(|(_, n)| n).sum();
        let mut out = self.out.lock();
        for (mv, nodes) in &counts {
            writeln!(out, "{mv}: {nodes}")?;
        }
        writeln!(out)?;
        writeln!(out, "Nodes searched: {total}")?;
        out.flush()
    }

    fn set_option(&mut self, parts: &[&str]) {
        let Some((name, value)) = parse_setoption(parts) else {
            warn!("malformed setoption: {}", parts.join(" "));
            return;
        };
        match self.options.apply_setoption(&name, value.as_deref()) {
            Ok(Some(UciOptionAction::ReinitHash(mb))) => self.controller.resize_hash(mb),
            Ok(Some(UciOptionAction::LoadEvalFile(path))) => {
                if let Err(e) = self.controller.load_eval_file(&path) {
                    warn!("could not load {}: {e}", path.display());
                }
            }
            Ok(None) => {}
            Err(unknown) => warn!("unknown option: {unknown}"),
        }
    }
}

/// Run the protocol on stdin and stdout until `quit` or end of input.
pub fn run_uci_loop(controller: EngineController, config: &EngineConfig) -> io::Result<()> {
    let mut engine = UciEngine::new(controller, config, io::stdout());
    engine.run(io::stdin().lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, MAX_HISTORY, START_FEN};

    fn split(cmd: &str) -> Vec<&str> {
        cmd.split_whitespace().collect()
    }

    #[test]
    fn test_position_startpos_with_moves() {
        let mut board = Board::new();
        try_parse_position_command(&mut board, &split("position startpos moves e2e4 e7e5"))
            .unwrap();
        assert_eq!(
            board.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
        );
    }

    #[test]
    fn test_position_fen() {
        let mut board = Board::new();
        let fen = "8/8/8/8/8/8/8/K1k5 w - - 3 40";
        try_parse_position_command(&mut board, &split(&format!("position fen {fen}"))).unwrap();
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn test_position_errors_keep_previous_board() {
        let mut board = Board::from_fen("8/8/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
        let before = board.clone();

        assert_eq!(
            try_parse_position_command(&mut board, &split("position")),
            Err(UciError::MissingParts)
        );
        assert_eq!(
            try_parse_position_command(&mut board, &split("position fen 8/8/8 w - -")),
            Err(UciError::MissingParts)
        );
        assert!(matches!(
            try_parse_position_command(&mut board, &split("position fen 8/8/8/8/8/8/8/8 w - - 0 1")),
            Err(UciError::InvalidFen(_))
        ));
        assert!(matches!(
            try_parse_position_command(&mut board, &split("position startpos moves e2e4 e2e4")),
            Err(UciError::InvalidMove { move_str, .. }) if move_str == "e2e4"
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn test_position_rejects_unreachable_fen() {
        let mut board = Board::new();
        board.make_move_uci("d2d4").unwrap();
        let before = board.clone();

        assert_eq!(
            try_parse_position_command(
                &mut board,
                &split("position fen 4k3/p7/8/8/8/8/4R3/4K3 w - - 0 1")
            ),
            Err(UciError::InvalidFen(FenError::OpponentInCheck {
                color: Color::Black
            }))
        );
        assert!(matches!(
            try_parse_position_command(
                &mut board,
                &split("position fen 1QQQQ2K/Q4QQ1/Q6Q/1Q5Q/1Q2Q2Q/2Q4Q/Q6Q/kQQQQQQ1 w - - 0 1")
            ),
            Err(UciError::InvalidFen(FenError::TooManyPieces { .. }))
        ));
        assert_eq!(board, before);
        assert_eq!(board.perft(1), 20);
    }

    #[test]
    fn test_position_replay_leaves_empty_history() {
        let mut board = Board::new();
        try_parse_position_command(&mut board, &split("position startpos moves g1f3 g8f6"))
            .unwrap();
        assert_eq!(board.ply_depth(), 0);
        assert_eq!(board.hash(), board.compute_hash());
        assert_ne!(board.to_fen(), START_FEN);
    }

    #[test]
    fn test_position_replays_games_longer_than_history() {
        let mut cmd = String::from("position startpos moves");
        for _ in 0..(MAX_HISTORY / 4 + 1) {
            cmd.push_str(" g1f3 g8f6 f3g1 f6g8");
        }
        let mut board = Board::new();
        try_parse_position_command(&mut board, &split(&cmd)).unwrap();
        assert_eq!(board.ply_depth(), 0);
        assert_eq!(board.pieces, Board::new().pieces);
    }

    #[test]
    fn test_format_info() {
        let info = SearchIterationInfo {
            depth: 3,
            seldepth: 7,
            nodes: 1234,
            nps: 5000,
            time_ms: 246,
            score: 35,
            mate_in: None,
            pv: vec![],
            hashfull: 1,
        };
        assert_eq!(
            format_info(&info),
            "info depth 3 seldepth 7 score cp 35 nodes 1234 nps 5000 time 246 hashfull 1"
        );

        let mut board = Board::new();
        let mv = board.parse_move("e2e4").unwrap();
        let mate = SearchIterationInfo {
            mate_in: Some(-2),
            pv: vec![mv],
            ..info
        };
        assert!(format_info(&mate).contains("score mate -2 nodes"));
        assert!(format_info(&mate).ends_with(" pv e2e4"));
    }

    #[test]
    fn test_format_bestmove() {
        assert_eq!(format_bestmove(None), "bestmove (none)");
        let mut board = Board::new();
        let mv = board.parse_move("g1f3").unwrap();
        assert_eq!(format_bestmove(Some(mv)), "bestmove g1f3");
    }
}
