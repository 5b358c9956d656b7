use crate::board::Board;
use crate::piece::Side;
use crate::rules::MoveError;
use std::fmt::Formatter;
use std::iter::Peekable;
use std::str::{Chars, FromStr};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Location {
    x: i8,
    y: i8,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Move {
    pub from: Location,
    pub to: Location,
}

impl Location {
    pub fn new() -> Self {
        Self { x: 0, y: 0 }
    }

    pub fn from_xy(x: i8, y: i8) -> Option<Self> {
        Self::new().shift_xy(x, y)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index > i8::MAX as usize {
            return None;
        }
        let x = index as i8 % Board::WIDTH;
        let y = index as i8 / Board::WIDTH;
        Self::from_xy(x, y)
    }

    /// Reads a label such as `c7` or `b10`. The rank is one or two digits;
    /// a `1` followed by `0` always reads as rank ten, which is unambiguous
    /// because no label begins with a digit.
    pub fn from_chars(chars: &mut Peekable<Chars<'_>>) -> Option<Self> {
        let file = chars.next()?.to_ascii_lowercase() as u8;
        let rank = chars.next()?.to_digit(10)? as i8;
        let rank = if rank == 1 && chars.peek() == Some(&'0') {
            chars.next();
            10
        } else {
            rank
        };

        if rank < 1 {
            return None;
        }
        Self::from_xy(file.wrapping_sub(b'a') as i8, rank - 1)
    }

    pub fn shift_x(&self, dx: i8) -> Option<Self> {
        let new_x = self.x + dx;
        if 0 > new_x || new_x >= Board::WIDTH {
            return None;
        }
        Some(Self { x: new_x, y: self.y })
    }

    pub fn shift_y(&self, dy: i8) -> Option<Self> {
        let new_y = self.y + dy;
        if 0 > new_y || new_y >= Board::HEIGHT {
            return None;
        }
        Some(Self { x: self.x, y: new_y })
    }

    pub fn shift_xy(&self, dx: i8, dy: i8) -> Option<Self> {
        self.shift_x(dx)?.shift_y(dy)
    }

    pub fn index(&self) -> usize {
        (self.x + self.y * Board::WIDTH) as usize
    }

    pub fn x(&self) -> i8 {
        self.x
    }

    pub fn y(&self) -> i8 {
        self.y
    }

    /// Whether this square lies inside the 3x3 palace of `side`.
    pub fn in_palace(&self, side: Side) -> bool {
        let ranks = match side {
            Side::Red => 0..=2,
            Side::Blue => 7..=9,
        };
        (3..=5).contains(&self.x) && ranks.contains(&self.y)
    }

    pub fn palace_center(&self) -> bool {
        self.x == 4 && matches!(self.y, 1 | 8)
    }

    pub fn palace_corner(&self) -> bool {
        matches!(self.x, 3 | 5) && matches!(self.y, 0 | 2 | 7 | 9)
    }

    /// Whether this square sits on the diagonal lines of a palace. Only the
    /// four corners and the center are connected diagonally; the four edge
    /// midpoints are not.
    pub fn on_palace_diagonal(&self) -> bool {
        self.palace_center() || self.palace_corner()
    }

    /// Whether `to` is one diagonal step away along a palace line. The only
    /// diagonally adjacent pairs are corner and center of the same palace, so
    /// checking both endpoints against the diagonal lines suffices.
    pub fn diagonal_step_to(&self, to: Location) -> bool {
        (self.x - to.x).abs() == 1
            && (self.y - to.y).abs() == 1
            && self.on_palace_diagonal()
            && to.on_palace_diagonal()
    }
}

impl FromStr for Location {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars().peekable();
        let location = Self::from_chars(&mut chars).ok_or(MoveError::InvalidCoordinate)?;
        if chars.next().is_some() {
            return Err(MoveError::InvalidCoordinate);
        }
        Ok(location)
    }
}

impl FromStr for Move {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars().peekable();
        let from = Location::from_chars(&mut chars).ok_or(MoveError::InvalidCoordinate)?;
        let to = Location::from_chars(&mut chars).ok_or(MoveError::InvalidCoordinate)?;
        if chars.next().is_some() {
            return Err(MoveError::InvalidCoordinate);
        }
        Ok(Move { from, to })
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'a' + self.x as u8) as char, self.y + 1)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}
