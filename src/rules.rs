use crate::board::Board;
use crate::location::{Location, Move};
use crate::piece::{Piece, PieceKind, Side};
use thiserror::Error;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Error)]
pub enum MoveError {
    #[error("coordinate is outside the board")]
    InvalidCoordinate,
    #[error("no piece of the moving side on the source square")]
    NotOwnPiece,
    #[error("destination holds a friendly piece")]
    BlockedBySelf,
    #[error("the piece does not move that way")]
    IllegalGeometry,
    #[error("the path to the destination is blocked")]
    PathBlocked,
    #[error("a cannon cannot capture another cannon")]
    CannonCannotCaptureCannon,
    #[error("the move would leave the general in check")]
    SelfCheck,
    #[error("the game is already over")]
    GameAlreadyOver,
}

impl Board {
    /// Full legality verdict for one half-move of `side`. Checks run in a
    /// fixed order and short-circuit on the first failure; the live board is
    /// never mutated. The self-check filter runs on a cloned board that is
    /// discarded either way.
    pub fn validate_move(&self, side: Side, mv: Move) -> Result<(), MoveError> {
        let piece = match self[mv.from] {
            Some(piece) if piece.side() == side => piece,
            _ => return Err(MoveError::NotOwnPiece),
        };

        // The pass is the only zero-offset move and is open to any side not
        // currently in check. In check it falls through and fails below, as
        // the destination holds the mover's own piece.
        if mv.from == mv.to && !self.is_in_check(side) {
            return Ok(());
        }

        if self[mv.to].is_some_and(|other| other.side() == side) {
            return Err(MoveError::BlockedBySelf);
        }

        self.check_reach(piece, mv)?;

        let mut trial = self.clone();
        trial.apply(mv);
        if trial.is_in_check(side) {
            return Err(MoveError::SelfCheck);
        }

        Ok(())
    }

    /// Geometry and path blocking for one piece, ignoring ownership of the
    /// destination and the self-check filter. This is the shared half of
    /// validation and check detection: a piece threatens exactly the squares
    /// it can reach.
    fn check_reach(&self, piece: Piece, mv: Move) -> Result<(), MoveError> {
        let (from, to) = (mv.from, mv.to);
        let (dx, dy) = (to.x() - from.x(), to.y() - from.y());
        let side = piece.side();

        match piece.kind() {
            PieceKind::General | PieceKind::Guard => {
                if !to.in_palace(side) {
                    return Err(MoveError::IllegalGeometry);
                }
                if dx.abs() + dy.abs() == 1 || from.diagonal_step_to(to) {
                    Ok(())
                } else {
                    Err(MoveError::IllegalGeometry)
                }
            }
            PieceKind::Horse => {
                let leg = match (dx.abs(), dy.abs()) {
                    (2, 1) => from.shift_x(dx.signum()),
                    (1, 2) => from.shift_y(dy.signum()),
                    _ => return Err(MoveError::IllegalGeometry),
                };
                self.vacant(leg)
            }
            PieceKind::Elephant => {
                let legs = match (dx.abs(), dy.abs()) {
                    (3, 2) => [
                        from.shift_x(dx.signum()),
                        from.shift_xy(dx.signum() * 2, dy.signum()),
                    ],
                    (2, 3) => [
                        from.shift_y(dy.signum()),
                        from.shift_xy(dx.signum(), dy.signum() * 2),
                    ],
                    _ => return Err(MoveError::IllegalGeometry),
                };
                for leg in legs {
                    self.vacant(leg)?;
                }
                Ok(())
            }
            PieceKind::Chariot => {
                let path = line_path(from, to).ok_or(MoveError::IllegalGeometry)?;
                if path.iter().any(|&square| self[square].is_some()) {
                    Err(MoveError::PathBlocked)
                } else {
                    Ok(())
                }
            }
            PieceKind::Cannon => {
                let path = line_path(from, to).ok_or(MoveError::IllegalGeometry)?;
                if self[to].is_some_and(|target| target.kind() == PieceKind::Cannon) {
                    return Err(MoveError::CannonCannotCaptureCannon);
                }

                let screens: Vec<Piece> =
                    path.iter().filter_map(|&square| self[square]).collect();
                match screens.as_slice() {
                    [screen] if screen.kind() != PieceKind::Cannon => Ok(()),
                    _ => Err(MoveError::PathBlocked),
                }
            }
            PieceKind::Soldier => {
                let forward = side.forward();
                let straight = (dx.abs() == 1 && dy == 0) || (dx == 0 && dy == forward);
                let diagonal = dy == forward && from.diagonal_step_to(to);
                if straight || diagonal {
                    Ok(())
                } else {
                    Err(MoveError::IllegalGeometry)
                }
            }
        }
    }

    fn vacant(&self, leg: Option<Location>) -> Result<(), MoveError> {
        match leg {
            Some(square) if self[square].is_none() => Ok(()),
            _ => Err(MoveError::PathBlocked),
        }
    }

    /// Whether any enemy piece reaches the general of `side`. Ownership of
    /// the target square and the attacker's own exposure are deliberately
    /// ignored: a threat is a threat.
    pub fn is_in_check(&self, side: Side) -> bool {
        let Some(general) = self.find_general(side) else {
            return false;
        };
        self.iter_side(!side)
            .any(|(from, piece)| self.check_reach(piece, Move { from, to: general }).is_ok())
    }

    /// Exhaustive escape search for a side already in check: every piece of
    /// `side` against every board square, through full validation. The pass
    /// candidate is the `from == to` cell of that product.
    pub fn is_checkmated(&self, side: Side) -> bool {
        self.is_in_check(side) && self.iter_legal_moves(side).next().is_none()
    }

    pub fn iter_legal_moves(&self, side: Side) -> impl Iterator<Item = Move> + '_ {
        self.iter_side(side)
            .flat_map(|(from, _)| Self::iter_locations().map(move |to| Move { from, to }))
            .filter(move |&mv| self.validate_move(side, mv).is_ok())
    }
}

/// Enumerates the squares strictly between `from` and `to` along a straight
/// orthogonal run, or along a palace diagonal when the whole run lies on the
/// diagonal lines of a palace. Returns `None` when the two squares are not
/// connected by either line shape. Chariot and cannon share this; they differ
/// only in the occupancy rule applied to the result.
fn line_path(from: Location, to: Location) -> Option<Vec<Location>> {
    let (dx, dy) = (to.x() - from.x(), to.y() - from.y());
    if dx == 0 && dy == 0 {
        return None;
    }

    let diagonal = dx != 0 && dy != 0;
    if diagonal
        && (dx.abs() != dy.abs()
            || dx.abs() > 2
            || !from.on_palace_diagonal()
            || !to.on_palace_diagonal())
    {
        return None;
    }

    let length = dx.abs().max(dy.abs());
    let mut path = Vec::with_capacity((length - 1) as usize);

    for i in 1..length {
        let square = from.shift_xy(dx.signum() * i, dy.signum() * i)?;
        if diagonal && !square.on_palace_diagonal() {
            return None;
        }
        path.push(square);
    }

    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(fen: &str) -> Board {
        Board::from_fen(&mut fen.chars()).unwrap()
    }

    fn validate(board: &Board, side: Side, mv: &str) -> Result<(), MoveError> {
        board.validate_move(side, mv.parse().unwrap())
    }

    #[test]
    fn general_steps_inside_the_palace() {
        let board = board("9/4k4/9/9/9/9/9/9/4K4/9");
        assert_eq!(validate(&board, Side::Red, "e2e3"), Ok(()));
        assert_eq!(validate(&board, Side::Red, "e2d2"), Ok(()));
        assert_eq!(validate(&board, Side::Red, "e2d1"), Ok(()));
        assert_eq!(validate(&board, Side::Red, "e2e4"), Err(MoveError::IllegalGeometry));
        assert_eq!(validate(&board, Side::Red, "e2f4"), Err(MoveError::IllegalGeometry));
    }

    #[test]
    fn general_cannot_leave_the_palace() {
        let board = board("9/4k4/9/9/9/9/9/9/9/3K5");
        assert_eq!(validate(&board, Side::Red, "d1c1"), Err(MoveError::IllegalGeometry));
    }

    #[test]
    fn general_corner_cannot_jump_the_diagonal() {
        // Two squares along the palace diagonal is a run, not a step.
        let board = board("9/4k4/9/9/9/9/9/9/9/3K5");
        assert_eq!(validate(&board, Side::Red, "d1f3"), Err(MoveError::IllegalGeometry));
        assert_eq!(validate(&board, Side::Red, "d1e2"), Ok(()));
    }

    #[test]
    fn general_midpoint_has_no_diagonal() {
        let board = board("9/4k4/9/9/9/9/9/9/9/4K4");
        assert_eq!(validate(&board, Side::Red, "e1d2"), Err(MoveError::IllegalGeometry));
        assert_eq!(validate(&board, Side::Red, "e1e2"), Ok(()));
        assert_eq!(validate(&board, Side::Red, "e1d1"), Ok(()));
    }

    #[test]
    fn guard_moves_like_the_general() {
        let board = board("9/4k4/9/9/9/9/9/3A5/9/4K4");
        assert_eq!(validate(&board, Side::Red, "d3e2"), Ok(()));
        assert_eq!(validate(&board, Side::Red, "d3d2"), Ok(()));
        assert_eq!(validate(&board, Side::Red, "d3c2"), Err(MoveError::IllegalGeometry));
        assert_eq!(validate(&board, Side::Red, "d3c3"), Err(MoveError::IllegalGeometry));
    }

    #[test]
    fn horse_jumps_unless_the_leg_is_blocked() {
        let open = board("9/4k4/9/9/9/9/9/9/4K4/1H7");
        assert_eq!(validate(&open, Side::Red, "b1c3"), Ok(()));
        assert_eq!(validate(&open, Side::Red, "b1d2"), Ok(()));
        assert_eq!(validate(&open, Side::Red, "b1b3"), Err(MoveError::IllegalGeometry));

        let blocked = board("9/4k4/9/9/9/9/9/9/1p2K4/1H7");
        assert_eq!(validate(&blocked, Side::Red, "b1c3"), Err(MoveError::PathBlocked));
        assert_eq!(validate(&blocked, Side::Red, "b1a3"), Err(MoveError::PathBlocked));
        assert_eq!(validate(&blocked, Side::Red, "b1d2"), Ok(()));
    }

    #[test]
    fn elephant_walks_one_then_two_diagonal() {
        let open = board("9/4k4/9/9/9/9/9/9/4K4/2E6");
        assert_eq!(validate(&open, Side::Red, "c1e4"), Ok(()));
        assert_eq!(validate(&open, Side::Red, "c1e3"), Err(MoveError::IllegalGeometry));

        let second_leg = board("9/4k4/9/9/9/9/9/3p5/4K4/2E6");
        assert_eq!(validate(&second_leg, Side::Red, "c1e4"), Err(MoveError::PathBlocked));

        let first_leg = board("9/4k4/9/9/9/9/9/9/2p1K4/2E6");
        assert_eq!(validate(&first_leg, Side::Red, "c1e4"), Err(MoveError::PathBlocked));
    }

    #[test]
    fn chariot_runs_until_blocked() {
        let board = board("9/4k4/9/9/9/p8/9/9/4K4/R8");
        assert_eq!(validate(&board, Side::Red, "a1a4"), Ok(()));
        assert_eq!(validate(&board, Side::Red, "a1i1"), Ok(()));
        assert_eq!(validate(&board, Side::Red, "a1a5"), Ok(()));
        assert_eq!(validate(&board, Side::Red, "a1a7"), Err(MoveError::PathBlocked));
        assert_eq!(validate(&board, Side::Red, "a1b2"), Err(MoveError::IllegalGeometry));
    }

    #[test]
    fn chariot_takes_palace_diagonals() {
        let open = board("9/4k4/9/9/9/9/9/4K4/9/3R5");
        assert_eq!(validate(&open, Side::Red, "d1e2"), Ok(()));
        assert_eq!(validate(&open, Side::Red, "d1f3"), Ok(()));

        // The center square screens the corner-to-corner run.
        let blocked = board("9/4k4/9/9/9/9/9/9/4K4/3R5");
        assert_eq!(validate(&blocked, Side::Red, "d1f3"), Err(MoveError::PathBlocked));
    }

    #[test]
    fn cannon_needs_exactly_one_screen() {
        let none = board("9/4k4/9/9/9/9/9/1C7/4K4/9");
        assert_eq!(validate(&none, Side::Red, "b3b7"), Err(MoveError::PathBlocked));

        let one = board("9/4k4/9/9/9/1p7/9/1C7/4K4/9");
        assert_eq!(validate(&one, Side::Red, "b3b7"), Ok(()));

        let two = board("9/4k4/9/9/1p7/1p7/9/1C7/4K4/9");
        assert_eq!(validate(&two, Side::Red, "b3b7"), Err(MoveError::PathBlocked));

        let capture = board("9/4k4/9/1p7/9/1p7/9/1C7/4K4/9");
        assert_eq!(validate(&capture, Side::Red, "b3b7"), Ok(()));
    }

    #[test]
    fn cannon_screen_must_not_be_a_cannon() {
        let board = board("9/4k4/9/9/9/1c7/9/1C7/4K4/9");
        assert_eq!(validate(&board, Side::Red, "b3b7"), Err(MoveError::PathBlocked));
    }

    #[test]
    fn cannon_never_captures_a_cannon() {
        let screened = board("9/4k4/9/1c7/9/1p7/9/1C7/4K4/9");
        assert_eq!(
            validate(&screened, Side::Red, "b3b7"),
            Err(MoveError::CannonCannotCaptureCannon)
        );

        // Even without a screen the cannon target decides the error.
        let bare = board("9/4k4/9/1c7/9/9/9/1C7/4K4/9");
        assert_eq!(
            validate(&bare, Side::Red, "b3b7"),
            Err(MoveError::CannonCannotCaptureCannon)
        );
    }

    #[test]
    fn cannon_takes_palace_diagonals_over_a_screen() {
        let screened = board("9/4k4/9/9/9/9/9/9/4K4/3C5");
        assert_eq!(validate(&screened, Side::Red, "d1f3"), Ok(()));

        let empty = board("9/4k4/9/9/9/9/9/4K4/9/3C5");
        assert_eq!(validate(&empty, Side::Red, "d1f3"), Err(MoveError::PathBlocked));
        assert_eq!(validate(&empty, Side::Red, "d1e2"), Err(MoveError::PathBlocked));
    }

    #[test]
    fn soldier_never_retreats() {
        let board = board("9/4k4/9/9/9/4P4/9/9/4K4/9");
        assert_eq!(validate(&board, Side::Red, "e5e6"), Ok(()));
        assert_eq!(validate(&board, Side::Red, "e5d5"), Ok(()));
        assert_eq!(validate(&board, Side::Red, "e5f5"), Ok(()));
        assert_eq!(validate(&board, Side::Red, "e5e4"), Err(MoveError::IllegalGeometry));
        assert_eq!(validate(&board, Side::Red, "e5d6"), Err(MoveError::IllegalGeometry));
    }

    #[test]
    fn soldier_advances_on_palace_diagonals() {
        let corner = board("9/4k4/3P5/9/9/9/9/9/4K4/9");
        assert_eq!(validate(&corner, Side::Red, "d8e9"), Ok(()));
        assert_eq!(validate(&corner, Side::Red, "d8d9"), Ok(()));
        assert_eq!(validate(&corner, Side::Red, "d8c9"), Err(MoveError::IllegalGeometry));

        let midpoint = board("9/4k4/4P4/9/9/9/9/9/4K4/9");
        assert_eq!(validate(&midpoint, Side::Red, "e8d9"), Err(MoveError::IllegalGeometry));

        let center = board("3k5/4P4/9/9/9/9/9/9/4K4/9");
        assert_eq!(validate(&center, Side::Red, "e9f10"), Ok(()));
        assert_eq!(validate(&center, Side::Red, "e9d10"), Ok(()));
    }

    #[test]
    fn pass_is_legal_only_out_of_check() {
        let calm = Board::opening();
        assert_eq!(validate(&calm, Side::Blue, "e9e9"), Ok(()));
        assert_eq!(validate(&calm, Side::Blue, "a10a10"), Ok(()));

        let checked = board("9/4k4/9/9/9/4R4/9/9/4K4/9");
        assert!(checked.is_in_check(Side::Blue));
        assert_eq!(validate(&checked, Side::Blue, "e9e9"), Err(MoveError::BlockedBySelf));
        assert_eq!(validate(&checked, Side::Blue, "e9d9"), Ok(()));
    }

    #[test]
    fn moves_exposing_the_general_are_rejected() {
        // The blue horse is pinned to the e file by the red chariot.
        let board = board("9/4k4/9/9/4h4/9/4R4/9/4K4/9");
        assert!(!board.is_in_check(Side::Blue));
        assert_eq!(validate(&board, Side::Blue, "e6d8"), Err(MoveError::SelfCheck));
        assert_eq!(validate(&board, Side::Blue, "e6f8"), Err(MoveError::SelfCheck));
    }

    #[test]
    fn wrong_side_and_friendly_fire_are_rejected() {
        let board = Board::opening();
        assert_eq!(validate(&board, Side::Red, "c7c6"), Err(MoveError::NotOwnPiece));
        assert_eq!(validate(&board, Side::Red, "e5e6"), Err(MoveError::NotOwnPiece));
        assert_eq!(validate(&board, Side::Blue, "a10a7"), Err(MoveError::BlockedBySelf));
    }

    #[test]
    fn check_is_detected_through_screens() {
        let chariot = board("9/4k4/9/9/9/4R4/9/9/4K4/9");
        assert!(chariot.is_in_check(Side::Blue));
        assert!(!chariot.is_in_check(Side::Red));

        let cannon = board("9/4k4/9/4p4/9/4C4/9/9/4K4/9");
        assert!(cannon.is_in_check(Side::Blue));

        let unscreened = board("9/4k4/9/9/9/4C4/9/9/4K4/9");
        assert!(!unscreened.is_in_check(Side::Blue));
    }

    #[test]
    fn two_chariots_deliver_mate() {
        let mate = board("R3k4/1R7/9/9/9/8p/9/9/4K4/9");
        assert!(mate.is_in_check(Side::Blue));
        assert!(mate.is_checkmated(Side::Blue));

        // Without the second chariot the general slips to e9.
        let escape = board("R3k4/9/9/9/9/8p/9/9/4K4/9");
        assert!(escape.is_in_check(Side::Blue));
        assert!(!escape.is_checkmated(Side::Blue));
    }

    #[test]
    fn a_side_out_of_check_is_never_mated() {
        assert!(!Board::opening().is_checkmated(Side::Blue));
        assert!(!Board::opening().is_checkmated(Side::Red));
    }

    #[test]
    fn legal_moves_include_the_pass() {
        let board = Board::opening();
        let pass: Move = "e9e9".parse().unwrap();
        assert!(board.iter_legal_moves(Side::Blue).any(|mv| mv == pass));

        for mv in board.iter_legal_moves(Side::Blue).take(16) {
            assert_eq!(board.validate_move(Side::Blue, mv), Ok(()));
        }
    }
}
