use crate::location::{Location, Move};
use crate::piece::{Piece, PieceKind, Side};
use std::fmt::Formatter;
use std::ops::{Index, IndexMut};
use std::str::Chars;

#[derive(Clone)]
pub struct Board {
    pieces: Vec<Option<Piece>>,
}

impl Board {
    pub const WIDTH: i8 = 9;
    pub const HEIGHT: i8 = 10;

    pub fn new() -> Self {
        Self { pieces: vec![None; (Self::WIDTH * Self::HEIGHT) as usize] }
    }

    pub fn from_fen(fen: &mut Chars<'_>) -> Option<Self> {
        let mut board = Self::new();
        let mut y = Location::new().shift_y(Self::HEIGHT - 1)?;
        let mut x = 0;

        for current in fen {
            match current {
                ' ' => break,
                '/' => {
                    if x != Self::WIDTH {
                        return None;
                    }
                    x = 0;
                    y = y.shift_y(-1)?;
                }
                '0'..='9' => x += current.to_digit(10)? as i8,
                _ => {
                    let piece = Piece::from_fen_char(current)?;
                    board[y.shift_x(x)?] = Some(piece);
                    x += 1;
                }
            }
        }

        Option::from(board)
    }

    pub fn fen(&self) -> String {
        let mut result = String::new();

        for y in (0..Self::HEIGHT).rev() {
            if y < Self::HEIGHT - 1 {
                result.push('/');
            }

            let mut empty = 0;
            for x in 0..Self::WIDTH {
                match Location::from_xy(x, y).and_then(|location| self[location]) {
                    Some(piece) => {
                        if empty > 0 {
                            result.push_str(&empty.to_string());
                            empty = 0;
                        }
                        result.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }

            if empty > 0 {
                result.push_str(&empty.to_string());
            }
        }

        result
    }

    pub fn opening() -> Self {
        Self::from_fen(&mut "rhea1aehr/4k4/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/4K4/RHEA1AEHR".chars()).unwrap()
    }

    /// Relocates the piece on `mv.from` and returns whatever stood on
    /// `mv.to`. Captured pieces simply leave the mapping.
    pub fn apply(&mut self, mv: Move) -> Option<Piece> {
        let captured = self[mv.to];
        self[mv.to] = self[mv.from].take();
        captured
    }

    pub fn find_general(&self, side: Side) -> Option<Location> {
        self.iter_side(side)
            .find(|(_, piece)| piece.kind() == PieceKind::General)
            .map(|(location, _)| location)
    }

    pub fn iter_side(&self, side: Side) -> impl Iterator<Item = (Location, Piece)> + '_ {
        self.pieces.iter().enumerate().filter_map(move |(index, &piece)| {
            let piece = piece?;
            if piece.side() != side {
                return None;
            }
            Some((Location::from_index(index)?, piece))
        })
    }

    pub fn iter_locations() -> impl Iterator<Item = Location> {
        (0..(Self::WIDTH * Self::HEIGHT) as usize).filter_map(Location::from_index)
    }
}

impl Index<Location> for Board {
    type Output = Option<Piece>;
    fn index(&self, index: Location) -> &Self::Output {
        &self.pieces[index.index()]
    }
}

impl IndexMut<Location> for Board {
    fn index_mut(&mut self, index: Location) -> &mut Self::Output {
        &mut self.pieces[index.index()]
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for y in (0..Self::HEIGHT).rev() {
            write!(f, "{:>2}", y + 1)?;
            for x in 0..Self::WIDTH {
                match Location::from_xy(x, y).and_then(|location| self[location]) {
                    Some(piece) => write!(f, " {}", piece)?,
                    None => write!(f, "   ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for char in 'a'..='i' {
            write!(f, "  {char}")?;
        }
        writeln!(f)
    }
}
