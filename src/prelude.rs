pub use crate::game::{Controller, Game, GameStatus};
pub use crate::legality::{Legality, Rule};
pub use crate::player::{Player, PlayerKind};
pub use crate::pretty::Pretty;
pub use crate::variant::Variant;
pub use crate::{Board, Cell, Move, MoveCmd, Piece, PieceKind, Side, Sq};
