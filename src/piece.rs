use crate::display_format::DisplayFormat;
use std::fmt::{Display, Formatter};
use std::num::NonZeroI8;
use std::ops::Not;
use std::str::FromStr;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Side {
    Red,
    Blue,
}

impl Side {
    /// Sign of the forward direction in ranks. Red marches up the board,
    /// Blue marches down.
    pub fn forward(self) -> i8 {
        match self {
            Side::Red => 1,
            Side::Blue => -1,
        }
    }
}

impl Not for Side {
    type Output = Side;

    fn not(self) -> Side {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }
}

impl FromStr for Side {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(Side::Red),
            "blue" => Ok(Side::Blue),
            _ => Err("expected 'red' or 'blue'"),
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Red => write!(f, "red"),
            Side::Blue => write!(f, "blue"),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(i8)]
pub enum PieceKind {
    General,
    Guard,
    Horse,
    Elephant,
    Chariot,
    Cannon,
    Soldier,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Piece {
    data: NonZeroI8,
}

impl Piece {
    pub fn from_fen_char(value: char) -> Option<Self> {
        let kind = match value.to_ascii_lowercase() {
            'k' => PieceKind::General,
            'a' => PieceKind::Guard,
            'h' => PieceKind::Horse,
            'e' => PieceKind::Elephant,
            'r' => PieceKind::Chariot,
            'c' => PieceKind::Cannon,
            'p' => PieceKind::Soldier,
            _ => return None,
        };

        let side = if value.is_ascii_uppercase() { Side::Red } else { Side::Blue };
        Some(Self::from_kind(kind, side))
    }

    pub fn from_kind(kind: PieceKind, side: Side) -> Self {
        let data = NonZeroI8::new(kind as i8 + 1).unwrap();
        let data = if side == Side::Red { data } else { -data };
        Self { data }
    }

    pub fn side(&self) -> Side {
        if self.data.is_positive() { Side::Red } else { Side::Blue }
    }

    pub fn kind(&self) -> PieceKind {
        let data = self.data.abs().get() - 1;
        unsafe { std::mem::transmute(data) }
    }

    pub fn fen_char(&self) -> char {
        let result = match self.kind() {
            PieceKind::General => 'k',
            PieceKind::Guard => 'a',
            PieceKind::Horse => 'h',
            PieceKind::Elephant => 'e',
            PieceKind::Chariot => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        };
        if self.side() == Side::Red {
            result.to_ascii_uppercase()
        } else {
            result
        }
    }

    pub fn hanja_char(&self) -> char {
        match (self.side(), self.kind()) {
            (Side::Red, PieceKind::General) => '漢',
            (Side::Blue, PieceKind::General) => '楚',
            (_, PieceKind::Guard) => '士',
            (_, PieceKind::Horse) => '馬',
            (_, PieceKind::Elephant) => '象',
            (_, PieceKind::Chariot) => '車',
            (_, PieceKind::Cannon) => '包',
            (Side::Red, PieceKind::Soldier) => '兵',
            (Side::Blue, PieceKind::Soldier) => '卒',
        }
    }

    pub fn display(&self, format: DisplayFormat) -> impl Display {
        let s = if format.hanja {
            self.hanja_char().to_string()
        } else {
            let c = self.fen_char();
            format!("{c}{c}")
        };
        if format.color {
            let code = if self.side() == Side::Red { 31 } else { 34 };
            format!("\x1B[{code}m{s}\x1B[0m")
        } else {
            s
        }
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display(DisplayFormat::default(true)))
    }
}
