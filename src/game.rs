use crate::board::Board;
use crate::display_format::DisplayFormat;
use crate::location::{Location, Move};
use crate::piece::Side;
use crate::rules::MoveError;
use log::{debug, info};
use std::fmt::{Display, Formatter};

pub struct Game {
    board: Board,
    turn: Side,
    state: GameState,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Unfinished,
    RedWon,
    BlueWon,
}

impl Display for GameState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GameState::Unfinished => write!(f, "unfinished"),
            GameState::RedWon => write!(f, "red won"),
            GameState::BlueWon => write!(f, "blue won"),
        }
    }
}

impl Game {
    /// The first mover is a rule of the table, not of the engine; pick it
    /// here. `opening` applies the Blue-first convention.
    pub fn new(board: Board, first: Side) -> Self {
        Self {
            board,
            turn: first,
            state: GameState::Unfinished,
        }
    }

    pub fn opening() -> Self {
        Self::new(Board::opening(), Side::Blue)
    }

    pub fn from_fen(fen: &str, first: Side) -> Option<Self> {
        Some(Self::new(Board::from_fen(&mut fen.chars())?, first))
    }

    pub fn fen(&self) -> String {
        self.board.fen()
    }

    /// Label-based entry point for the boundary layer.
    pub fn make_move(&mut self, from: &str, to: &str) -> Result<(), MoveError> {
        let from: Location = from.parse()?;
        let to: Location = to.parse()?;
        self.play(Move { from, to })
    }

    /// Validates and commits one half-move. A rejected move leaves the game
    /// untouched; an accepted one removes the capture, relocates the mover,
    /// flips the turn, and refreshes the check and mate status of the new
    /// side to move.
    pub fn play(&mut self, mv: Move) -> Result<(), MoveError> {
        if self.state != GameState::Unfinished {
            return Err(MoveError::GameAlreadyOver);
        }

        self.board.validate_move(self.turn, mv)?;

        if mv.from == mv.to {
            debug!("{} passes", self.turn);
        } else if let Some(captured) = self.board.apply(mv) {
            debug!("{} plays {mv}, capturing {captured}", self.turn);
        } else {
            debug!("{} plays {mv}", self.turn);
        }

        let mover = self.turn;
        self.turn = !self.turn;

        if self.board.is_in_check(self.turn) {
            info!("{} is in check", self.turn);
            if self.board.is_checkmated(self.turn) {
                self.state = match mover {
                    Side::Red => GameState::RedWon,
                    Side::Blue => GameState::BlueWon,
                };
                info!("checkmate, {mover} wins");
            }
        }

        Ok(())
    }

    pub fn game_state(&self) -> GameState {
        self.state
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn is_in_check(&self, side: Side) -> bool {
        self.board.is_in_check(side)
    }

    /// Read-only snapshot for rendering; the engine owns no text layout.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.iter_legal_moves(self.turn).collect()
    }

    pub fn display(&self, format: DisplayFormat) -> impl Display {
        struct Impl<'a>(&'a Game, DisplayFormat);
        return Impl(self, format);

        impl Display for Impl<'_> {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                let &Self(game, format) = self;
                write!(f, "{}", game.board.fen())?;

                if format.concise {
                    return write!(f, " {}", game.turn);
                }

                writeln!(f)?;

                for y in (0..Board::HEIGHT).rev() {
                    write!(f, "{:>2}", y + 1)?;
                    for x in 0..Board::WIDTH {
                        match Location::from_xy(x, y).and_then(|location| game.board[location]) {
                            Some(piece) => {
                                write!(f, " {}", piece.display(format.with_concise(true)))?
                            }
                            None => write!(f, "   ")?,
                        }
                    }
                    writeln!(f)?;
                }

                write!(f, "  ")?;
                for char in 'a'..='i' {
                    write!(f, "  {char}")?;
                }
                writeln!(f)?;

                match game.state {
                    GameState::RedWon => writeln!(f, "red won by checkmate"),
                    GameState::BlueWon => writeln!(f, "blue won by checkmate"),
                    GameState::Unfinished => {
                        let check = if game.is_in_check(game.turn) { " (in check)" } else { "" };
                        writeln!(f, "{} to play{check}", game.turn)
                    }
                }
            }
        }
    }
}

impl Display for Game {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display(DisplayFormat::string()))
    }
}
