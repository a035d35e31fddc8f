//!===================================================================
//! 棋譜
//!
//! テキスト形式は 2 行:
//!
//! ```text
//! mini
//! sfen ppppp/5/5/5/PPPPP moves 5e5d 1a1b
//! ```
//!
//! 1 行目がゲームの種類、2 行目が開始局面と指し手。
//!===================================================================

use std::path::Path;

use crate::game::Game;
use crate::log::{LoggerTrait, NullLogger};
use crate::prelude::*;
use crate::sfen;
use crate::{Error, Result};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    variant: Variant,
    initial: Board,
    cmds: Vec<MoveCmd>,
}

impl Record {
    /// 対局の棋譜を取り出す。やり直し用スタックは含まない。
    ///
    /// 編集モードで強制移動した対局は棋譜から再現できないのでエラーとなる。
    pub fn from_game<L: Legality, G: LoggerTrait>(game: &Game<L, G>) -> Result<Self> {
        chk!(!game.is_diverged(), Error::Diverged);

        Ok(Self {
            variant: game.variant(),
            initial: game.initial_board().clone(),
            cmds: game.history().moves().iter().map(Move::cmd).collect(),
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        s.parse::<Self>()
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn initial_board(&self) -> &Board {
        &self.initial
    }

    pub fn cmds(&self) -> &[MoveCmd] {
        &self.cmds
    }

    /// 開始局面から全ての指し手を legality の判定付きで再生する。
    /// 途中で違法手があればエラー。
    pub fn replay<L: Legality>(&self, legality: L) -> Result<Game<L>> {
        let mut game =
            Game::with_initial(self.variant, self.initial.clone(), legality, NullLogger::new());

        for cmd in &self.cmds {
            if game.try_move(cmd).is_none() {
                return Err(Error::illegal_move(
                    cmd,
                    format!("rejected at ply {}", game.history().len() + 1),
                ));
            }
        }

        Ok(game)
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.variant)?;
        writeln!(f, "{}", sfen::kifu_to_sfen(&self.initial, &self.cmds))?;

        Ok(())
    }
}

impl std::str::FromStr for Record {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut lines = s.lines().filter(|line| !line.trim().is_empty());
        let mut next = || {
            lines
                .next()
                .ok_or_else(|| Error::record_parse_error("incomplete"))
        };

        let variant = next()?
            .trim()
            .parse::<Variant>()
            .map_err(|e| Error::record_parse_error(e.to_string()))?;
        let (initial, cmds) =
            sfen::sfen_to_kifu(next()?).map_err(|e| Error::record_parse_error(e.to_string()))?;

        Ok(Self {
            variant,
            initial,
            cmds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legality::{LegalityForward, LegalityMovement, LegalityStub};

    #[test]
    fn test_display() {
        let mut game = Game::new(Variant::Mini, LegalityForward);
        game.try_move(&MoveCmd::new(Sq::new(0, 4), Sq::new(0, 3), false))
            .unwrap();
        game.try_move(&MoveCmd::new(Sq::new(4, 0), Sq::new(4, 1), false))
            .unwrap();

        let record = Record::from_game(&game).unwrap();
        assert_eq!(
            record.to_string(),
            "mini\nsfen ppppp/5/5/5/PPPPP moves 5e5d 1a1b\n"
        );
    }

    #[test]
    fn test_parse_and_replay() {
        let record: Record = format!("shogi\nsfen {} moves 7g7f 3c3d 8h2b+\n", sfen::SFEN_SHOGI)
            .parse()
            .unwrap();
        assert_eq!(record.variant(), Variant::Shogi);
        assert_eq!(record.initial_board(), &Variant::Shogi.initial_board());
        assert_eq!(record.cmds().len(), 3);
        assert!(record.cmds()[2].is_promotion());

        let game = record.replay(LegalityMovement).unwrap();
        assert_eq!(game.history().len(), 3);
        assert_eq!(
            game.board().get(Sq::new(7, 1)),
            Some(Piece::new(Side::Black, PieceKind::Bishop).promoted())
        );
        assert_eq!(game.side(), Side::White);

        assert_eq!(Record::from_game(&game).unwrap(), record);
    }

    #[test]
    fn test_replay_illegal() {
        // 歩は 2 マス進めない
        let record: Record = "mini\nsfen ppppp/5/5/5/PPPPP moves 5e5c\n".parse().unwrap();
        assert!(matches!(
            record.replay(LegalityForward),
            Err(Error::IllegalMove(..))
        ));
        // スタブ判定なら通る
        assert!(record.replay(LegalityStub).is_ok());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            "".parse::<Record>(),
            Err(Error::RecordParseError(_))
        ));
        assert!(matches!(
            "chess\nsfen ppppp/5/5/5/PPPPP\n".parse::<Record>(),
            Err(Error::RecordParseError(_))
        ));
        assert!(matches!(
            "mini\nsfen ppppp/5/5/5/PPPPP moves 9a9b\n".parse::<Record>(),
            Err(Error::RecordParseError(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!(
            "shogi_sandbox_record_{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, "mini\nsfen ppppp/5/5/5/PPPPP moves 5e5d\n").unwrap();
        let record = Record::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(record.variant(), Variant::Mini);
        assert_eq!(record.cmds().len(), 1);

        assert!(matches!(Record::from_file(&path), Err(Error::Io(_))));
    }

    #[test]
    fn test_diverged() {
        let mut game = Game::new(Variant::Mini, LegalityForward);
        game.set_edit(true);
        game.force_move(Sq::new(0, 4), Sq::new(0, 2));

        assert!(matches!(Record::from_game(&game), Err(Error::Diverged)));
    }
}
