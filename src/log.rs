//!===================================================================
//! 対局ログ
//!
//! 動作検証用。Game は状態が変わるたびに LoggerTrait のメソッドを呼ぶ。
//!===================================================================

use crate::prelude::*;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LogEntry {
    Move(Move),
    Undo(Move),
    Redo(Move),
    Reset,
    ForceMove { src: Sq, dst: Sq, piece: Piece },
    Ignored(Sq),
    NoMove(Side),
}

impl Pretty for LogEntry {
    fn pretty(&self) -> std::borrow::Cow<'static, str> {
        match self {
            Self::Move(mv) => format!("着手: {}", mv.pretty()).into(),
            Self::Undo(mv) => format!("待った: {}", mv.pretty()).into(),
            Self::Redo(mv) => format!("やり直し: {}", mv.pretty()).into(),
            Self::Reset => "リセット".into(),
            Self::ForceMove { src, dst, piece } => format!(
                "強制移動: {}→{} {}",
                src.pretty(),
                dst.pretty(),
                piece.pretty()
            )
            .into(),
            Self::Ignored(sq) => format!("無視: {}", sq.pretty()).into(),
            Self::NoMove(side) => format!("指し手なし: {}", side.pretty()).into(),
        }
    }
}

pub trait LoggerTrait {
    fn log_move(&mut self, _mv: &Move);
    fn log_undo(&mut self, _mv: &Move);
    fn log_redo(&mut self, _mv: &Move);
    fn log_reset(&mut self);
    fn log_force_move(&mut self, _src: Sq, _dst: Sq, _piece: Piece);
    fn log_ignored(&mut self, _sq: Sq);
    fn log_no_move(&mut self, _side: Side);
}

impl<G: LoggerTrait + ?Sized> LoggerTrait for Box<G> {
    fn log_move(&mut self, mv: &Move) {
        (**self).log_move(mv)
    }
    fn log_undo(&mut self, mv: &Move) {
        (**self).log_undo(mv)
    }
    fn log_redo(&mut self, mv: &Move) {
        (**self).log_redo(mv)
    }
    fn log_reset(&mut self) {
        (**self).log_reset()
    }
    fn log_force_move(&mut self, src: Sq, dst: Sq, piece: Piece) {
        (**self).log_force_move(src, dst, piece)
    }
    fn log_ignored(&mut self, sq: Sq) {
        (**self).log_ignored(sq)
    }
    fn log_no_move(&mut self, side: Side) {
        (**self).log_no_move(side)
    }
}

/// ログを溜め込むロガー。
#[derive(Debug, Default)]
pub struct Logger {
    entrys: Vec<LogEntry>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entrys(&self) -> &[LogEntry] {
        &self.entrys
    }

    pub fn into_entrys(self) -> Vec<LogEntry> {
        self.entrys
    }

    fn push(&mut self, entry: LogEntry) {
        self.entrys.push(entry);
    }
}

impl LoggerTrait for Logger {
    fn log_move(&mut self, mv: &Move) {
        self.push(LogEntry::Move(*mv));
    }

    fn log_undo(&mut self, mv: &Move) {
        self.push(LogEntry::Undo(*mv));
    }

    fn log_redo(&mut self, mv: &Move) {
        self.push(LogEntry::Redo(*mv));
    }

    fn log_reset(&mut self) {
        self.push(LogEntry::Reset);
    }

    fn log_force_move(&mut self, src: Sq, dst: Sq, piece: Piece) {
        self.push(LogEntry::ForceMove { src, dst, piece });
    }

    fn log_ignored(&mut self, sq: Sq) {
        self.push(LogEntry::Ignored(sq));
    }

    fn log_no_move(&mut self, side: Side) {
        self.push(LogEntry::NoMove(side));
    }
}

/// 標準エラー出力に 1 行ずつ書き出すロガー。
#[derive(Debug, Default)]
pub struct StderrLogger;

impl StderrLogger {
    pub fn new() -> Self {
        Self
    }
}

impl LoggerTrait for StderrLogger {
    fn log_move(&mut self, mv: &Move) {
        eprintln!("{}", LogEntry::Move(*mv).pretty());
    }

    fn log_undo(&mut self, mv: &Move) {
        eprintln!("{}", LogEntry::Undo(*mv).pretty());
    }

    fn log_redo(&mut self, mv: &Move) {
        eprintln!("{}", LogEntry::Redo(*mv).pretty());
    }

    fn log_reset(&mut self) {
        eprintln!("{}", LogEntry::Reset.pretty());
    }

    fn log_force_move(&mut self, src: Sq, dst: Sq, piece: Piece) {
        eprintln!("{}", LogEntry::ForceMove { src, dst, piece }.pretty());
    }

    fn log_ignored(&mut self, sq: Sq) {
        eprintln!("{}", LogEntry::Ignored(sq).pretty());
    }

    fn log_no_move(&mut self, side: Side) {
        eprintln!("{}", LogEntry::NoMove(side).pretty());
    }
}

#[derive(Debug, Default)]
pub struct NullLogger;

impl NullLogger {
    pub fn new() -> Self {
        Self
    }
}

impl LoggerTrait for NullLogger {
    fn log_move(&mut self, _mv: &Move) {}
    fn log_undo(&mut self, _mv: &Move) {}
    fn log_redo(&mut self, _mv: &Move) {}
    fn log_reset(&mut self) {}
    fn log_force_move(&mut self, _src: Sq, _dst: Sq, _piece: Piece) {}
    fn log_ignored(&mut self, _sq: Sq) {}
    fn log_no_move(&mut self, _side: Side) {}
}
