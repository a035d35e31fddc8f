//!===================================================================
//! ゲームの種類
//!===================================================================

use once_cell::sync::Lazy;

use crate::prelude::*;
use crate::sfen;

static BOARD_SHOGI: Lazy<Board> = Lazy::new(|| sfen::sfen_to_board(sfen::SFEN_SHOGI).unwrap());
static BOARD_MINI: Lazy<Board> = Lazy::new(|| sfen::sfen_to_board(sfen::SFEN_MINI).unwrap());

#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, strum_macros::Display, strum_macros::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum Variant {
    /// 9*9 の将棋風ゲーム
    Shogi,
    /// 5*5 の歩のみのゲーム。相手の駒を全て取れば勝ち。
    Mini,
}

impl Variant {
    pub fn initial_board(&self) -> Board {
        match self {
            Self::Shogi => BOARD_SHOGI.clone(),
            Self::Mini => BOARD_MINI.clone(),
        }
    }

    /// 特に指定がない場合に使う合法手判定。
    pub fn default_rule(&self) -> Rule {
        match self {
            Self::Shogi => Rule::Stub,
            Self::Mini => Rule::Forward,
        }
    }

    /// 特に指定がない場合の CPU の指し方。ミニ版は決定的に最初の手を指す。
    pub fn default_player(&self) -> PlayerKind {
        match self {
            Self::Shogi => PlayerKind::Random,
            Self::Mini => PlayerKind::First,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_board() {
        let board = Variant::Shogi.initial_board();
        assert_eq!((board.width(), board.height()), (9, 9));
        assert_eq!(
            board.get(Sq::new(4, 8)),
            Some(Piece::new(Side::Black, PieceKind::King))
        );
        assert_eq!(
            board.get(Sq::new(7, 1)),
            Some(Piece::new(Side::White, PieceKind::Bishop))
        );

        let board = Variant::Mini.initial_board();
        assert_eq!((board.width(), board.height()), (5, 5));
        assert_eq!(board.count_side(Side::Black), 5);
        assert_eq!(board.count_side(Side::White), 5);
    }

    #[test]
    fn test_parse() {
        assert_eq!("shogi".parse::<Variant>().unwrap(), Variant::Shogi);
        assert_eq!(Variant::Mini.to_string(), "mini");
        assert_eq!(Variant::Mini.default_rule(), Rule::Forward);
        assert_eq!(Variant::Mini.default_player(), PlayerKind::First);
        assert_eq!(Variant::Shogi.default_player(), PlayerKind::Random);
    }
}
