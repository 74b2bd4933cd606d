//! UCI engine session for deep analysis.
//!
//! The deep-search collaborator (Stockfish or any UCI engine) runs as a child
//! process driven over its text protocol. [`EngineSession`] owns that process
//! explicitly: it is created with [`spawn`](EngineSession::spawn), torn down
//! with [`quit`](EngineSession::quit) (or on drop), and never shared as
//! ambient global state.
//!
//! A session runs at most one search at a time: each analysis call drains the
//! engine's output until `bestmove` before returning, so a new request always
//! supersedes the previous one rather than racing with it.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Maximum number of lines to read before giving up on a UCI response.
pub const MAX_UCI_LINES: usize = 10_000;

/// Errors that can occur when talking to a UCI engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to spawn or talk to the engine process.
    #[error("engine I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Engine executable was not found at the specified path.
    #[error("engine not found at path: {0}")]
    NotFound(String),
    /// Engine failed the UCI handshake.
    #[error("engine initialization failed")]
    InitFailed,
    /// Engine returned an invalid or unexpected response.
    #[error("invalid engine response: {0}")]
    InvalidResponse(String),
}

/// An engine score for a position, from White's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Score {
    /// Centipawn evaluation.
    Cp(i32),
    /// Forced mate in N moves (negative when the engine is getting mated).
    Mate(i32),
}

impl Score {
    /// Converts the score to pawn units; forced mates become `±∞`.
    #[must_use]
    pub fn pawns(self) -> f64 {
        match self {
            Score::Cp(cp) => f64::from(cp) / 100.0,
            Score::Mate(n) if n > 0 => f64::INFINITY,
            Score::Mate(_) => f64::NEG_INFINITY,
        }
    }

    /// Builds a score from the `cp`/`mate` fields of a UCI info line.
    #[must_use]
    pub fn from_uci(cp: Option<i32>, mate: Option<i32>) -> Option<Self> {
        match (cp, mate) {
            (_, Some(m)) => Some(Score::Mate(m)),
            (Some(c), None) => Some(Score::Cp(c)),
            (None, None) => None,
        }
    }
}

/// One line of a multi-PV search.
#[derive(Debug, Clone, Serialize)]
pub struct EngineLine {
    /// The line's score.
    pub score: Score,
    /// The principal variation in UCI notation.
    pub pv: Vec<String>,
}

/// Result of analyzing one position.
#[derive(Debug, Clone, Serialize)]
pub struct EngineAnalysis {
    /// The best move in UCI notation.
    pub best_move: String,
    /// The engine's expected reply, when reported.
    pub ponder: Option<String>,
    /// Score of the best line.
    pub score: Score,
    /// The search depth reached.
    pub depth: u32,
    /// Top candidate lines, best first (multi-PV).
    pub lines: Vec<EngineLine>,
}

/// Configuration for an engine session.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Number of candidate lines to request (UCI `MultiPV`).
    pub multipv: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { multipv: 3 }
    }
}

struct InfoLine {
    depth: u32,
    multipv: usize,
    score: Score,
    pv: Vec<String>,
}

/// An owned session with a UCI analysis engine.
pub struct EngineSession {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    name: String,
    multipv: u32,
}

impl EngineSession {
    /// Spawns the engine and performs the UCI handshake.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the engine path does not exist
    /// - [`EngineError::Io`] if the process fails to start
    /// - [`EngineError::InitFailed`] if the UCI handshake fails
    pub fn spawn(engine_path: &str, options: EngineOptions) -> Result<Self, EngineError> {
        if !std::path::Path::new(engine_path).exists() {
            return Err(EngineError::NotFound(engine_path.to_string()));
        }

        let mut process = Command::new(engine_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdin = process.stdin.take().ok_or(EngineError::InitFailed)?;
        let stdout = process.stdout.take().ok_or(EngineError::InitFailed)?;
        let stdout = BufReader::new(stdout);

        let mut session = Self {
            process,
            stdin,
            stdout,
            name: String::new(),
            multipv: options.multipv.max(1),
        };
        session.init_uci()?;

        Ok(session)
    }

    fn init_uci(&mut self) -> Result<(), EngineError> {
        self.send_command("uci")?;

        let mut name = String::new();
        let mut lines_read = 0;
        loop {
            if lines_read > MAX_UCI_LINES {
                return Err(EngineError::InitFailed);
            }
            lines_read += 1;
            let line = self.read_line()?;
            if let Some(reported) = line.strip_prefix("id name ") {
                name = reported.to_string();
            } else if line == "uciok" {
                break;
            }
        }

        self.name = if name.is_empty() {
            "Unknown Engine".to_string()
        } else {
            name
        };

        self.send_command(&format!("setoption name MultiPV value {}", self.multipv))?;
        self.wait_ready()?;

        Ok(())
    }

    /// Returns the engine's name as reported during the handshake.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resets the engine's state for a fresh game.
    pub fn new_game(&mut self) -> Result<(), EngineError> {
        self.send_command("ucinewgame")?;
        self.wait_ready()
    }

    /// Analyzes a position given in FEN notation to the requested depth.
    pub fn analyze_fen(&mut self, fen: &str, depth: u32) -> Result<EngineAnalysis, EngineError> {
        self.send_command(&format!("position fen {fen}"))?;
        self.run_search(depth)
    }

    /// Analyzes the position after a sequence of moves from the start.
    pub fn analyze_moves(
        &mut self,
        moves: &[String],
        depth: u32,
    ) -> Result<EngineAnalysis, EngineError> {
        if moves.is_empty() {
            self.send_command("position startpos")?;
        } else {
            self.send_command(&format!("position startpos moves {}", moves.join(" ")))?;
        }
        self.run_search(depth)
    }

    /// Tells the engine to stop its current search.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        self.send_command("stop")
    }

    /// Shuts the session down explicitly.
    pub fn quit(mut self) -> Result<(), EngineError> {
        self.send_command("quit")?;
        self.process.wait()?;
        Ok(())
    }

    fn run_search(&mut self, depth: u32) -> Result<EngineAnalysis, EngineError> {
        self.send_command(&format!("go depth {depth}"))?;

        let mut lines: Vec<Option<EngineLine>> = vec![None; self.multipv as usize];
        let mut best_depth: u32 = 0;
        let mut best_move = String::new();
        let mut ponder = None;

        let mut lines_read = 0;
        loop {
            if lines_read > MAX_UCI_LINES {
                return Err(EngineError::InvalidResponse(
                    "too many lines without bestmove".to_string(),
                ));
            }
            lines_read += 1;
            let line = self.read_line()?;

            if line.starts_with("info ") {
                if let Some(info) = parse_info_line(&line) {
                    best_depth = best_depth.max(info.depth);
                    store_line(&mut lines, info);
                }
            } else if let Some(rest) = line.strip_prefix("bestmove ") {
                let mut parts = rest.split_whitespace();
                best_move = parts.next().unwrap_or("").to_string();
                if parts.next() == Some("ponder") {
                    ponder = parts.next().map(str::to_string);
                }
                break;
            }
        }

        if best_move.is_empty() {
            return Err(EngineError::InvalidResponse(
                "no best move received".to_string(),
            ));
        }

        let lines: Vec<EngineLine> = lines.into_iter().flatten().collect();
        let score = lines
            .first()
            .map(|l| l.score)
            .ok_or_else(|| EngineError::InvalidResponse("no score received".to_string()))?;

        Ok(EngineAnalysis {
            best_move,
            ponder,
            score,
            depth: best_depth,
            lines,
        })
    }

    fn send_command(&mut self, command: &str) -> Result<(), EngineError> {
        debug!(command, "uci send");
        writeln!(self.stdin, "{command}")?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        let bytes = self.stdout.read_line(&mut line)?;
        if bytes == 0 {
            return Err(EngineError::InvalidResponse(
                "engine closed unexpectedly".to_string(),
            ));
        }
        Ok(line.trim().to_string())
    }

    fn wait_ready(&mut self) -> Result<(), EngineError> {
        self.send_command("isready")?;
        let mut lines_read = 0;
        loop {
            if lines_read > MAX_UCI_LINES {
                return Err(EngineError::InitFailed);
            }
            lines_read += 1;
            if self.read_line()? == "readyok" {
                return Ok(());
            }
        }
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        let _ = self.send_command("quit");
        let _ = self.process.wait();
    }
}

/// Files a parsed info line into its multi-PV slot. UCI numbers slots from 1;
/// anything outside `1..=len` (including a malformed `multipv 0`) is dropped.
fn store_line(lines: &mut [Option<EngineLine>], info: InfoLine) {
    if (1..=lines.len()).contains(&info.multipv) {
        lines[info.multipv - 1] = Some(EngineLine {
            score: info.score,
            pv: info.pv,
        });
    }
}

/// Parses a UCI info line of the form
/// `info depth X [multipv K] score cp|mate Y ... pv move1 move2 ...`.
fn parse_info_line(line: &str) -> Option<InfoLine> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let mut depth: Option<u32> = None;
    let mut multipv: usize = 1;
    let mut cp: Option<i32> = None;
    let mut mate: Option<i32> = None;
    let mut pv: Vec<String> = Vec::new();
    let mut in_pv = false;

    let mut i = 0;
    while i < parts.len() {
        match parts[i] {
            "depth" => {
                if i + 1 < parts.len() {
                    depth = parts[i + 1].parse().ok();
                    i += 1;
                }
            }
            "multipv" => {
                if i + 1 < parts.len() {
                    multipv = parts[i + 1].parse().unwrap_or(1);
                    i += 1;
                }
            }
            "score" => {
                if i + 2 < parts.len() {
                    match parts[i + 1] {
                        "cp" => {
                            cp = parts[i + 2].parse().ok();
                            i += 2;
                        }
                        "mate" => {
                            mate = parts[i + 2].parse().ok();
                            i += 2;
                        }
                        _ => {}
                    }
                }
            }
            "pv" => {
                in_pv = true;
            }
            other => {
                if in_pv {
                    pv.push(other.to_string());
                }
            }
        }
        i += 1;
    }

    Some(InfoLine {
        depth: depth?,
        multipv,
        score: Score::from_uci(cp, mate)?,
        pv,
    })
}
