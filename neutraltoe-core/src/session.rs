//! Game session: current state, players and move history

use crate::ai::{MinimaxAI, MoveChoice};
use crate::board::Side;
use crate::error::EngineError;
use crate::game::{GameState, MoveRecord};
use rand::Rng;
use serde::Serialize;

/// Display name used for the computer player
pub const ROBOT_NAME: &str = "Robot";

/// Player names
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Players {
    pub x: String,
    pub o: String,
}

impl Players {
    pub fn new(x: impl Into<String>, o: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            o: o.into(),
        }
    }

    pub fn name(&self, side: Side) -> &str {
        match side {
            Side::X => &self.x,
            Side::O => &self.o,
        }
    }
}

/// One game in progress
#[derive(Clone, Debug)]
pub struct Game {
    players: Players,
    robot: Option<Side>,
    state: GameState,
    history: Vec<MoveRecord>,
    snapshots: Vec<GameState>,
}

impl Game {
    /// Two human players
    pub fn new(players: Players) -> Self {
        Self {
            players,
            robot: None,
            state: GameState::new(),
            history: Vec::new(),
            snapshots: vec![GameState::new()],
        }
    }

    /// One side is played by the computer; its name is replaced
    pub fn with_robot(mut players: Players, robot: Side) -> Self {
        match robot {
            Side::X => players.x = ROBOT_NAME.to_string(),
            Side::O => players.o = ROBOT_NAME.to_string(),
        }
        let mut game = Self::new(players);
        game.robot = Some(robot);
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn players(&self) -> &Players {
        &self.players
    }

    pub fn robot(&self) -> Option<Side> {
        self.robot
    }

    /// Accepted moves, oldest first
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Every state reached, starting with the fresh one
    pub fn snapshots(&self) -> &[GameState] {
        &self.snapshots
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.state.winner.map(|side| self.players.name(side))
    }

    /// No winner and nothing left to play for the active side
    pub fn is_stalemate(&self) -> bool {
        !self.state.is_over() && self.state.legal_moves().is_empty()
    }

    pub fn robot_to_move(&self) -> bool {
        self.robot == Some(self.state.active) && !self.state.is_over()
    }

    /// Play `position` for the active side
    pub fn play(&mut self, position: usize) -> Result<MoveRecord, EngineError> {
        let (next, record) = self.state.play(position)?;
        self.state = next;
        self.history.push(record);
        self.snapshots.push(next);

        if let Some(winner) = next.winner {
            tracing::info!(winner = %winner, moves = self.history.len(), "game decided");
        }
        Ok(record)
    }

    /// Ask `ai` for the active side's move and play it. `ai.side` must be
    /// the active side.
    pub fn play_robot<R: Rng>(
        &mut self,
        ai: &mut MinimaxAI<R>,
    ) -> Result<(MoveChoice, MoveRecord), EngineError> {
        if self.state.is_over() {
            return Err(EngineError::GameAlreadyDecided);
        }
        let choice = ai.best_move(&self.state.board, self.state.last_move)?;
        let record = self.play(choice.position)?;
        Ok((choice, record))
    }

    /// Fresh board, history cleared, players kept
    pub fn reset(&mut self) {
        self.state = GameState::new();
        self.history.clear();
        self.snapshots.clear();
        self.snapshots.push(self.state);
    }
}

/// Outcome of a computer-vs-computer game
#[derive(Clone, Debug, Serialize)]
pub struct GameOutcome {
    /// None when the ply limit was hit or nobody could move
    pub winner: Option<Side>,
    pub plies: usize,
    pub history: Vec<MoveRecord>,
}

impl GameOutcome {
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

/// Play a full game between two engines. Neutralization allows endless
/// games, so play stops after `max_plies` with no winner.
pub fn self_play<R: Rng>(
    x_ai: &mut MinimaxAI<R>,
    o_ai: &mut MinimaxAI<R>,
    max_plies: usize,
) -> Result<GameOutcome, EngineError> {
    let mut game = Game::new(Players::new("X", "O"));

    while !game.state().is_over() && game.history().len() < max_plies {
        let ai = match game.state().active {
            Side::X => &mut *x_ai,
            Side::O => &mut *o_ai,
        };
        match game.play_robot(ai) {
            Ok(_) => {}
            Err(EngineError::NoLegalMoveAvailable) => break,
            Err(e) => return Err(e),
        }
    }

    Ok(GameOutcome {
        winner: game.state().winner,
        plies: game.history().len(),
        history: game.history().to_vec(),
    })
}
