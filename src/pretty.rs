use std::borrow::Cow;

use crate::game::Snapshot;
use crate::prelude::*;

pub trait Pretty {
    fn pretty(&self) -> Cow<'static, str>;
}

impl Pretty for Side {
    fn pretty(&self) -> Cow<'static, str> {
        match self {
            Side::Black => "先手".into(),
            Side::White => "後手".into(),
        }
    }
}

impl Pretty for Sq {
    /// 1 始まりの "x,y"。
    ///
    /// ```
    /// # use shogi_sandbox::prelude::*;
    /// assert_eq!(Sq::new(2, 6).pretty(), "3,7");
    /// ```
    fn pretty(&self) -> Cow<'static, str> {
        format!("{},{}", self.x() + 1, self.y() + 1).into()
    }
}

impl Pretty for PieceKind {
    fn pretty(&self) -> Cow<'static, str> {
        match self {
            PieceKind::Pawn => "歩".into(),
            PieceKind::Lance => "香".into(),
            PieceKind::Knight => "桂".into(),
            PieceKind::Silver => "銀".into(),
            PieceKind::Gold => "金".into(),
            PieceKind::Bishop => "角".into(),
            PieceKind::Rook => "飛".into(),
            PieceKind::King => "王".into(),
        }
    }
}

impl Pretty for Piece {
    /// ```
    /// # use shogi_sandbox::prelude::*;
    /// let pawn = Piece::new(Side::White, PieceKind::Pawn);
    /// assert_eq!(pawn.pretty(), "歩");
    /// assert_eq!(pawn.promoted().pretty(), "と");
    /// assert_eq!(Piece::new(Side::Black, PieceKind::Rook).promoted().pretty(), "龍");
    /// ```
    fn pretty(&self) -> Cow<'static, str> {
        if !self.is_promoted() {
            return self.kind().pretty();
        }
        match self.kind() {
            PieceKind::Pawn => "と".into(),
            PieceKind::Lance => "杏".into(),
            PieceKind::Knight => "圭".into(),
            PieceKind::Silver => "全".into(),
            PieceKind::Bishop => "馬".into(),
            PieceKind::Rook => "龍".into(),
            kind => kind.pretty(),
        }
    }
}

impl Pretty for Cell {
    fn pretty(&self) -> Cow<'static, str> {
        match self {
            None => " ・".into(),
            Some(piece) => match piece.side() {
                Side::Black => format!(" {}", piece.pretty()).into(),
                Side::White => format!("v{}", piece.pretty()).into(),
            },
        }
    }
}

impl Pretty for Board {
    fn pretty(&self) -> Cow<'static, str> {
        let mut res = String::new();

        for y in 0..self.height() {
            for cell in self.row(y) {
                res.push_str(&cell.pretty());
            }
            res.push('\n');
        }

        res.into()
    }
}

impl Pretty for Move {
    /// ```
    /// # use shogi_sandbox::prelude::*;
    /// let pawn = Piece::new(Side::Black, PieceKind::Pawn);
    /// let silver = Piece::new(Side::White, PieceKind::Silver);
    /// let mv = Move::new(Sq::new(2, 3), Sq::new(2, 2), pawn, Some(silver), true);
    /// assert_eq!(mv.pretty(), "3,4→3,3 歩 取 成");
    /// ```
    fn pretty(&self) -> Cow<'static, str> {
        format!(
            "{}→{} {}{}{}",
            self.src().pretty(),
            self.dst().pretty(),
            self.piece().pretty(),
            if self.is_capture() { " 取" } else { "" },
            if self.is_promotion() { " 成" } else { "" }
        )
        .into()
    }
}

/// 棋譜表示の 1 行。i は 0 始まりの手数。
///
/// ```
/// # use shogi_sandbox::prelude::*;
/// # use shogi_sandbox::pretty::kifu_line;
/// let pawn = Piece::new(Side::Black, PieceKind::Pawn);
/// let mv = Move::new(Sq::new(2, 6), Sq::new(2, 5), pawn, None, false);
/// assert_eq!(kifu_line(0, &mv), "1. 3,7→3,6 歩");
/// ```
pub fn kifu_line(i: usize, mv: &Move) -> Cow<'static, str> {
    format!("{}. {}", i + 1, mv.pretty()).into()
}

impl Pretty for GameStatus {
    /// ```
    /// # use shogi_sandbox::prelude::*;
    /// assert_eq!(GameStatus::AllCaptured(Side::White).pretty(), "後手の駒が全て取られました");
    /// ```
    fn pretty(&self) -> Cow<'static, str> {
        match self {
            GameStatus::Playing => "対局中".into(),
            GameStatus::AllCaptured(side) => {
                format!("{}の駒が全て取られました", side.pretty()).into()
            }
            GameStatus::NoMove(side) => format!("{}は指せる手がありません", side.pretty()).into(),
        }
    }
}

impl Pretty for Snapshot {
    fn pretty(&self) -> Cow<'static, str> {
        let mut res = String::new();

        res.push_str(&format!(
            "手番:{}{}\n",
            self.side.pretty(),
            if self.busy { " (思考中)" } else { "" }
        ));
        res.push_str(&self.board.pretty());
        if let Some(last) = self.last_move {
            res.push_str(&format!("最終手:{}→{}\n", last.src.pretty(), last.dst.pretty()));
        }
        if let Some(sel) = self.selection {
            res.push_str(&format!("選択:{} {}\n", sel.sq.pretty(), sel.piece.pretty()));
        }
        if !self.status.is_playing() {
            res.push_str(&format!("{}\n", self.status.pretty()));
        }

        res.into()
    }
}
