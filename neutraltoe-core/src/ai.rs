//! Minimax AI with alpha-beta pruning

use crate::board::{Board, Side, BOARD_SIZE};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::eval::{evaluate, positional_base, Heuristics, BLOCK_SCORE, WIN_SCORE};
use crate::game::{apply_move, detect_winner, is_legal_move};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Fixed search depth in plies
pub const SEARCH_DEPTH: u32 = 6;

/// Candidates scoring at least this share of the best one stay in the pool
pub const RETAIN_RATIO: f64 = 0.9;

/// Largest pool drawn from on non-decisive positions
pub const POOL_SIZE: usize = 3;

/// Seed used by [`MinimaxAI::new`]
const DEFAULT_SEED: u64 = 42;

// ============================================================================
// MOVE GENERATION
// ============================================================================

/// A legal move annotated with its ordering scores
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub position: usize,
    /// Center 3, corners 2, edges 1
    pub base: i32,
    /// Static evaluation for the moving side
    pub heuristic: i32,
}

impl Candidate {
    pub fn combined(&self) -> i32 {
        self.base + self.heuristic
    }
}

/// Every position `side` may play, in index order
pub fn legal_moves_for(
    board: &Board,
    side: Side,
    last_move: Option<usize>,
    heuristics: &Heuristics,
) -> Vec<Candidate> {
    (0..BOARD_SIZE)
        .filter(|&pos| is_legal_move(board, side, last_move, pos))
        .map(|pos| Candidate {
            position: pos,
            base: positional_base(pos),
            heuristic: evaluate(board, pos, side, heuristics),
        })
        .collect()
}

/// Sort candidates best-first by heuristic score (stable, so index order
/// breaks ties)
fn order_moves(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.heuristic.cmp(&a.heuristic));
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

/// Outcome of one search: a score from the maximizing side's view and the
/// move that reaches it. Terminal and cutoff nodes carry no move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    pub position: Option<usize>,
}

impl SearchResult {
    fn leaf(score: i32) -> Self {
        Self {
            score,
            position: None,
        }
    }
}

/// Fixed inputs shared by every node of one search
#[derive(Clone, Copy, Debug)]
pub struct SearchContext<'a> {
    /// Side the scores are reported for
    pub max_side: Side,
    pub heuristics: &'a Heuristics,
}

impl<'a> SearchContext<'a> {
    pub fn new(max_side: Side, heuristics: &'a Heuristics) -> Self {
        Self {
            max_side,
            heuristics,
        }
    }
}

/// Plain alpha-beta minimax.
///
/// At the depth limit only the move that produced the node is evaluated,
/// not the whole board.
pub fn minimax(
    board: &Board,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    last_move: Option<usize>,
    ctx: &SearchContext,
) -> Result<SearchResult, EngineError> {
    let SearchContext {
        max_side,
        heuristics,
    } = *ctx;
    let min_side = max_side.opponent();

    if board.has_line(max_side) {
        return Ok(SearchResult::leaf(WIN_SCORE));
    }
    if board.has_line(min_side) {
        return Ok(SearchResult::leaf(-WIN_SCORE));
    }

    if depth == 0 {
        let score = evaluate(board, last_move.unwrap_or(0), max_side, heuristics);
        return Ok(SearchResult::leaf(score));
    }

    let to_move = if maximizing { max_side } else { min_side };
    let mut moves = legal_moves_for(board, to_move, last_move, heuristics);
    if moves.is_empty() {
        return Ok(SearchResult::leaf(0));
    }
    order_moves(&mut moves);

    let mut best = SearchResult {
        score: if maximizing { i32::MIN } else { i32::MAX },
        position: None,
    };

    for candidate in &moves {
        let child = apply_move(board, to_move, candidate.position)?;
        let score = minimax(
            &child.board,
            depth - 1,
            alpha,
            beta,
            !maximizing,
            Some(candidate.position),
            ctx,
        )?
        .score;

        if maximizing {
            if score > best.score {
                best = SearchResult {
                    score,
                    position: Some(candidate.position),
                };
            }
            alpha = alpha.max(best.score);
        } else {
            if score < best.score {
                best = SearchResult {
                    score,
                    position: Some(candidate.position),
                };
            }
            beta = beta.min(best.score);
        }

        if beta <= alpha {
            break;
        }
    }

    Ok(best)
}

// ============================================================================
// MINIMAX AI
// ============================================================================

/// Move chosen by the AI
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MoveChoice {
    pub position: usize,
    pub score: i32,
    /// Win or block found; picked without randomness
    pub decisive: bool,
}

/// Computer player for one side
pub struct MinimaxAI<R = ChaCha8Rng> {
    pub side: Side,
    pub depth: u32,
    pub heuristics: Heuristics,
    pub retain_ratio: f64,
    pub pool_size: usize,
    rng: R,
}

impl MinimaxAI<ChaCha8Rng> {
    pub fn new(side: Side) -> Self {
        Self::with_seed(side, DEFAULT_SEED)
    }

    pub fn with_seed(side: Side, seed: u64) -> Self {
        Self::with_rng(side, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Build from a config; an absent seed draws one from the OS
    pub fn from_config(config: &EngineConfig, side: Side) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            side,
            depth: config.depth,
            heuristics: config.heuristics.clone(),
            retain_ratio: config.retain_ratio,
            pool_size: config.pool_size,
            rng,
        }
    }
}

impl<R: Rng> MinimaxAI<R> {
    /// Use a caller-supplied random source
    pub fn with_rng(side: Side, rng: R) -> Self {
        Self {
            side,
            depth: SEARCH_DEPTH,
            heuristics: Heuristics::default(),
            retain_ratio: RETAIN_RATIO,
            pool_size: POOL_SIZE,
            rng,
        }
    }

    /// Candidate moves for this side, in index order
    pub fn candidates(&self, board: &Board, last_move: Option<usize>) -> Vec<Candidate> {
        legal_moves_for(board, self.side, last_move, &self.heuristics)
    }

    /// Pool a non-decisive move is drawn from: best-first by combined
    /// score, within `retain_ratio` of the best, at most `pool_size` long
    pub fn top_candidates(&self, board: &Board, last_move: Option<usize>) -> Vec<Candidate> {
        let mut candidates = self.candidates(board, last_move);
        candidates.sort_by(|a, b| b.combined().cmp(&a.combined()));

        let top = match candidates.first() {
            Some(c) => c.combined() as f64,
            None => return candidates,
        };

        candidates.retain(|c| c.combined() as f64 >= top * self.retain_ratio);
        candidates.truncate(self.pool_size.max(1));
        candidates
    }

    /// Pick a move for `self.side` on `board`
    pub fn best_move(
        &mut self,
        board: &Board,
        last_move: Option<usize>,
    ) -> Result<MoveChoice, EngineError> {
        if detect_winner(board).is_some() {
            return Err(EngineError::GameAlreadyDecided);
        }

        let candidates = self.candidates(board, last_move);
        if candidates.is_empty() {
            return Err(EngineError::NoLegalMoveAvailable);
        }
        tracing::debug!(side = %self.side, ?candidates, "candidate moves");

        // Immediate wins, then forced blocks. The heuristic writes the mark
        // even on an opposing cell, where the move only clears it, so a win
        // must hold on the real transition.
        for sentinel in [WIN_SCORE, BLOCK_SCORE] {
            let found = candidates.iter().find(|c| {
                c.heuristic == sentinel
                    && (sentinel != WIN_SCORE || self.wins_with(board, c.position))
            });
            if let Some(c) = found {
                tracing::debug!(position = c.position, score = sentinel, "tactical move");
                return Ok(MoveChoice {
                    position: c.position,
                    score: sentinel,
                    decisive: true,
                });
            }
        }

        let result = minimax(
            board,
            self.depth,
            i32::MIN,
            i32::MAX,
            true,
            last_move,
            &SearchContext::new(self.side, &self.heuristics),
        )?;
        tracing::debug!(score = result.score, position = ?result.position, "search finished");

        if result.score.abs() >= BLOCK_SCORE {
            if let Some(position) = result.position {
                return Ok(MoveChoice {
                    position,
                    score: result.score,
                    decisive: true,
                });
            }
        }

        let pool = self.top_candidates(board, last_move);
        let pick = pool[self.rng.gen_range(0..pool.len())];
        tracing::debug!(position = pick.position, pool = pool.len(), "varied move");

        Ok(MoveChoice {
            position: pick.position,
            score: result.score,
            decisive: false,
        })
    }

    fn wins_with(&self, board: &Board, position: usize) -> bool {
        apply_move(board, self.side, position)
            .map(|t| t.board.has_line(self.side))
            .unwrap_or(false)
    }
}

// ============================================================================
// TESTS
// ============================================================================
