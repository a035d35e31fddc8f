//!===================================================================
//! 棋譜履歴とやり直し用スタック
//!
//! 線形履歴。新たに手を指すとやり直し用スタックは全て捨てられる (木構造にはしない)。
//! 盤面の更新もここで行う。手番の管理は Game 側。
//!===================================================================

use crate::prelude::*;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct History {
    done: Vec<Move>,
    undone: Vec<Move>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// 適用済みの指し手 (古い順)。
    pub fn moves(&self) -> &[Move] {
        &self.done
    }

    /// やり直し用スタック。末尾が次に redo される手。
    pub fn redo_moves(&self) -> &[Move] {
        &self.undone
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    pub fn last(&self) -> Option<&Move> {
        self.done.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// mv を board に適用して履歴に積む。やり直し用スタックは空になる。
    pub fn apply(&mut self, board: &mut Board, mv: Move) {
        board.apply_move(&mv);
        self.done.push(mv);
        self.undone.clear();
    }

    /// 最後の手を巻き戻す。履歴が空なら何もせず None を返す。
    pub fn undo(&mut self, board: &mut Board) -> Option<Move> {
        let mv = self.done.pop()?;
        board.reverse_move(&mv);
        self.undone.push(mv);
        Some(mv)
    }

    /// 最後に巻き戻した手を再適用する。やり直し用スタックが空なら何もせず None を返す。
    pub fn redo(&mut self, board: &mut Board) -> Option<Move> {
        let mv = self.undone.pop()?;
        board.apply_move(&mv);
        self.done.push(mv);
        Some(mv)
    }

    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pawn_step(board: &Board, x: i32, y: i32, dy: i32) -> Move {
        let cmd = MoveCmd::new(Sq::new(x, y), Sq::new(x, y + dy), false);
        Move::from_board(board, &cmd).unwrap()
    }

    #[test]
    fn test_undo_redo() {
        let mut board = Variant::Mini.initial_board();
        let initial = board.clone();
        let mut history = History::new();

        let mv = pawn_step(&board, 0, 4, -1);
        history.apply(&mut board, mv);
        let mv = pawn_step(&board, 0, 0, 1);
        history.apply(&mut board, mv);
        let after = board.clone();
        assert_eq!(history.len(), 2);

        assert!(history.undo(&mut board).is_some());
        assert!(history.undo(&mut board).is_some());
        assert_eq!(board, initial);
        assert!(history.is_empty());
        assert_eq!(history.redo_moves().len(), 2);

        // 空の履歴に対する undo は何もしない
        assert_eq!(history.undo(&mut board), None);
        assert_eq!(board, initial);

        assert!(history.redo(&mut board).is_some());
        assert!(history.redo(&mut board).is_some());
        assert_eq!(board, after);
        assert_eq!(history.redo(&mut board), None);
        assert_eq!(board, after);
    }

    #[test]
    fn test_apply_clears_redo() {
        let mut board = Variant::Mini.initial_board();
        let mut history = History::new();

        let mv = pawn_step(&board, 0, 4, -1);
        history.apply(&mut board, mv);
        history.undo(&mut board);
        assert!(history.can_redo());

        let mv = pawn_step(&board, 1, 4, -1);
        history.apply(&mut board, mv);
        assert!(!history.can_redo());
        assert_eq!(history.moves(), &[mv]);
    }
}
