//!===================================================================
//! CPU 側プレイヤー
//!===================================================================

use rand::rngs::{StdRng, ThreadRng};
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};

use crate::legality;
use crate::prelude::*;

pub trait Player {
    /// side の指し手を 1 つ選ぶ。指せる手がなければ None を返す。
    /// board は変更しない。
    fn think(&mut self, board: &Board, side: Side, legality: &dyn Legality) -> Option<Move>;
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn think(&mut self, board: &Board, side: Side, legality: &dyn Legality) -> Option<Move> {
        (**self).think(board, side, legality)
    }
}

/// legality が認める手から一様ランダムに選ぶ。
#[derive(Debug)]
pub struct PlayerRandom<R> {
    rng: R,
}

impl PlayerRandom<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl<R: Rng> PlayerRandom<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Player for PlayerRandom<R> {
    fn think(&mut self, board: &Board, side: Side, legality: &dyn Legality) -> Option<Move> {
        legality::moves_legal(board, side, legality).choose(&mut self.rng)
    }
}

/// 最初に見つかった手を指す。列挙順が固定なので挙動は決定的。
#[derive(Debug, Default)]
pub struct PlayerFirst;

impl PlayerFirst {
    pub fn new() -> Self {
        Self
    }
}

impl Player for PlayerFirst {
    fn think(&mut self, board: &Board, side: Side, legality: &dyn Legality) -> Option<Move> {
        legality::moves_legal(board, side, legality).next()
    }
}

//--------------------------------------------------------------------
// プレイヤーの選択 (設定用)
//--------------------------------------------------------------------

#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, strum_macros::Display, strum_macros::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum PlayerKind {
    Random,
    First,
}

impl PlayerKind {
    /// seed は Random のみが使う。None ならエントロピーから初期化する。
    pub fn player(&self, seed: Option<u64>) -> Box<dyn Player + Send> {
        match self {
            Self::Random => {
                let rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                Box::new(PlayerRandom::with_rng(rng))
            }
            Self::First => Box::new(PlayerFirst::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::legality::{LegalityForward, LegalityStub};
    use crate::sfen;

    #[test]
    fn test_first() {
        let board = Variant::Mini.initial_board();
        let mv = PlayerFirst::new()
            .think(&board, Side::White, &LegalityForward)
            .unwrap();
        assert_eq!(mv.src(), Sq::new(0, 0));
        assert_eq!(mv.dst(), Sq::new(0, 1));
        assert_eq!(mv.capture(), None);
    }

    #[test]
    fn test_random_is_legal() {
        let board = Variant::Shogi.initial_board();
        let mut player = PlayerRandom::with_rng(StdRng::seed_from_u64(1));

        for _ in 0..100 {
            let mv = player.think(&board, Side::Black, &LegalityStub).unwrap();
            assert!(mv.piece().is_side(Side::Black));
            assert_eq!(board.get(mv.src()), Some(mv.piece()));
            assert_eq!(board.get(mv.dst()), mv.capture());
            assert!(LegalityStub.is_legal(&board, Side::Black, mv.piece(), mv.src(), mv.dst()));
        }
    }

    #[test]
    fn test_player_kind() {
        assert_eq!("first".parse::<PlayerKind>().unwrap(), PlayerKind::First);
        assert_eq!(PlayerKind::Random.to_string(), "random");
        assert!("best".parse::<PlayerKind>().is_err());

        let board = Variant::Mini.initial_board();
        let mut player = PlayerKind::First.player(None);
        let mv = player.think(&board, Side::Black, &LegalityForward).unwrap();
        assert_eq!(mv.src(), Sq::new(0, 4));

        // 同じシードなら同じ手順
        let mut a = PlayerKind::Random.player(Some(7));
        let mut b = PlayerKind::Random.player(Some(7));
        for _ in 0..20 {
            assert_eq!(
                a.think(&board, Side::Black, &LegalityStub),
                b.think(&board, Side::Black, &LegalityStub)
            );
        }
    }

    #[test]
    fn test_no_move() {
        // 先手の歩は全て敵陣の端に詰まっていて前進できない
        let board = sfen::sfen_to_board("PPPPP/5/5/5/ppppp").unwrap();
        let before = board.clone();

        let mut player = PlayerRandom::with_rng(StdRng::seed_from_u64(0));
        assert_eq!(player.think(&board, Side::Black, &LegalityForward), None);
        assert_eq!(PlayerFirst::new().think(&board, Side::White, &LegalityForward), None);
        assert_eq!(board, before);

        // 駒がない側も None
        let board = Board::empty(3, 3);
        assert_eq!(PlayerFirst::new().think(&board, Side::Black, &LegalityStub), None);
    }
}
