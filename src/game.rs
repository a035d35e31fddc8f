//!===================================================================
//! 対局セッション
//!
//! 盤面・手番・棋譜履歴・選択状態を 1 つにまとめたもの。複数の対局を独立に持てる。
//!
//! 状態の変更はすべてシングルスレッドで行う前提。
//! CPU の着手待ち (や描画側のアニメーション待ち) の間は busy フラグを立て、クリックを無視する。
//!
//! 編集モードでの強制移動は履歴に積まれず、手番も変わらない。
//! そのため強制移動後は履歴を初期局面から再生しても現局面にならない。この状態を diverged と呼ぶ。
//!===================================================================

use crate::history::History;
use crate::log::{LoggerTrait, NullLogger};
use crate::pretty;
use crate::prelude::*;

/// 手番ごとの操作主。
#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, strum_macros::Display, strum_macros::EnumString,
)]
pub enum Controller {
    #[strum(serialize = "human")]
    Human,
    #[strum(serialize = "cpu")]
    Cpu,
}

/// 選択中の駒
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Selection {
    pub sq: Sq,
    pub piece: Piece,
}

/// 最終手の表示用
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct LastMove {
    pub src: Sq,
    pub dst: Sq,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GameStatus {
    Playing,
    /// この側の駒が全て取られた
    AllCaptured(Side),
    /// この側に指せる手がない (この側の負けとして対局を止める)
    NoMove(Side),
}

impl GameStatus {
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// 描画側に渡す局面のスナップショット。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Snapshot {
    pub board: Board,
    pub side: Side,
    pub selection: Option<Selection>,
    pub last_move: Option<LastMove>,
    pub status: GameStatus,
    pub busy: bool,
}

pub struct Game<L, G = NullLogger> {
    variant: Variant,
    legality: L,
    logger: G,

    initial: Board,
    board: Board,
    side: Side,
    history: History,

    controllers: [Controller; 2],
    manual: bool,
    edit: bool,
    busy: bool,

    selection: Option<Selection>,
    last_move: Option<LastMove>,
    stuck: Option<Side>,
    diverged: bool,
}

impl<L: Legality> Game<L, NullLogger> {
    pub fn new(variant: Variant, legality: L) -> Self {
        Self::with_logger(variant, legality, NullLogger::new())
    }
}

impl<L: Legality, G: LoggerTrait> Game<L, G> {
    pub fn with_logger(variant: Variant, legality: L, logger: G) -> Self {
        Self::with_initial(variant, variant.initial_board(), legality, logger)
    }

    /// 初期局面を指定して対局を作る。手番は先手から。
    pub fn with_initial(variant: Variant, initial: Board, legality: L, logger: G) -> Self {
        Self {
            variant,
            legality,
            logger,

            board: initial.clone(),
            initial,
            side: Side::Black,
            history: History::new(),

            controllers: [Controller::Human, Controller::Human],
            manual: false,
            edit: false,
            busy: false,

            selection: None,
            last_move: None,
            stuck: None,
            diverged: false,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn legality(&self) -> &L {
        &self.legality
    }

    pub fn into_logger(self) -> G {
        self.logger
    }

    pub fn initial_board(&self) -> &Board {
        &self.initial
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    pub fn controller(&self, side: Side) -> Controller {
        self.controllers[side]
    }

    pub fn set_controller(&mut self, side: Side, controller: Controller) {
        self.controllers[side] = controller;
    }

    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// 手動モードでは CPU は指さない。
    pub fn set_manual(&mut self, manual: bool) {
        self.manual = manual;
    }

    pub fn is_edit(&self) -> bool {
        self.edit
    }

    pub fn set_edit(&mut self, edit: bool) {
        self.edit = edit;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// 編集モードの強制移動により、盤面が履歴から再現できなくなっているか。
    pub fn is_diverged(&self) -> bool {
        self.diverged
    }

    pub fn status(&self) -> GameStatus {
        if let Some(side) = Side::iter().find(|&side| self.board.count_side(side) == 0) {
            return GameStatus::AllCaptured(side);
        }
        match self.stuck {
            Some(side) => GameStatus::NoMove(side),
            None => GameStatus::Playing,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            side: self.side,
            selection: self.selection,
            last_move: self.last_move,
            status: self.status(),
            busy: self.busy,
        }
    }

    /// 棋譜表示用の文字列 (1 手 1 行)。
    pub fn kifu(&self) -> Vec<String> {
        self.history
            .moves()
            .iter()
            .enumerate()
            .map(|(i, mv)| pretty::kifu_line(i, mv).into_owned())
            .collect()
    }

    //----------------------------------------------------------------
    // 履歴操作
    //----------------------------------------------------------------

    /// mv を適用して履歴に積み、手番を交代する。
    /// mv の中身は信用している (合法性は呼び出し側でチェックすること)。
    pub fn apply_move(&mut self, mv: Move) {
        self.history.apply(&mut self.board, mv);
        self.last_move = Some(LastMove {
            src: mv.src(),
            dst: mv.dst(),
        });
        self.side.toggle();
        self.selection = None;
        self.stuck = None;

        self.logger.log_move(&mv);
    }

    /// 1 手戻す。履歴が空なら何もしない。
    pub fn undo(&mut self) {
        let mv = unwrap_or_return!(self.history.undo(&mut self.board));
        self.last_move = self.history.last().map(|mv| LastMove {
            src: mv.src(),
            dst: mv.dst(),
        });
        self.side.toggle();
        self.selection = None;
        self.stuck = None;

        self.logger.log_undo(&mv);
    }

    /// 戻した手を 1 手進める。やり直し用スタックが空なら何もしない。
    pub fn redo(&mut self) {
        let mv = unwrap_or_return!(self.history.redo(&mut self.board));
        self.last_move = Some(LastMove {
            src: mv.src(),
            dst: mv.dst(),
        });
        self.side.toggle();
        self.selection = None;
        self.stuck = None;

        self.logger.log_redo(&mv);
    }

    /// 初期局面に戻す。操作主の設定やモードは維持する。
    pub fn reset(&mut self) {
        self.board = self.initial.clone();
        self.history.clear();
        self.side = Side::Black;
        self.selection = None;
        self.last_move = None;
        self.stuck = None;
        self.diverged = false;
        self.busy = false;

        self.logger.log_reset();
    }

    //----------------------------------------------------------------
    // 人間側の着手
    //----------------------------------------------------------------

    /// cmd を合法手判定にかけ、通れば適用する。適用した手を返す。
    ///
    /// 編集モードでは判定せずに強制移動し、None を返す (履歴には積まれないため)。
    pub fn try_move(&mut self, cmd: &MoveCmd) -> Option<Move> {
        if self.edit {
            self.force_move(cmd.src(), cmd.dst());
            return None;
        }

        let piece = self.board.get(cmd.src())?;
        if !piece.is_side(self.side) {
            return None;
        }
        if cmd.is_promotion() && !piece.can_promote() {
            return None;
        }
        if !self
            .legality
            .is_legal(&self.board, self.side, piece, cmd.src(), cmd.dst())
        {
            return None;
        }

        // 上書きされる前に dst の駒を控える
        let mv = Move::from_board(&self.board, cmd)?;
        self.apply_move(mv);

        Some(mv)
    }

    /// マスのクリック。
    ///
    /// * 手番側の駒 (編集モードでは任意の駒) をクリックするとその駒を選択する。
    /// * 駒を選択した状態で他のマスをクリックすると、そこへの着手を試みる。
    /// * 無効なクリックは無視し、選択も解除する。
    ///
    /// CPU の着手待ちの間や CPU の手番ではクリックを受け付けない。
    pub fn click(&mut self, sq: Sq) {
        if self.busy || self.is_scripted_turn() {
            self.logger.log_ignored(sq);
            return;
        }
        if !self.board.is_in_bounds(sq) {
            self.selection = None;
            self.logger.log_ignored(sq);
            return;
        }

        if self.edit {
            self.click_edit(sq);
            return;
        }

        if let Some(piece) = self.board.get(sq) {
            if piece.is_side(self.side) {
                self.selection = Some(Selection { sq, piece });
                return;
            }
        }

        let sel = match self.selection.take() {
            Some(sel) => sel,
            None => {
                self.logger.log_ignored(sq);
                return;
            }
        };

        let is_promotion = self
            .legality
            .promotion(&self.board, sel.piece, sel.sq, sq);
        if self
            .try_move(&MoveCmd::new(sel.sq, sq, is_promotion))
            .is_none()
        {
            self.logger.log_ignored(sq);
        }
    }

    fn click_edit(&mut self, sq: Sq) {
        match self.selection.take() {
            Some(sel) => self.force_move(sel.sq, sq),
            None => match self.board.get(sq) {
                Some(piece) => self.selection = Some(Selection { sq, piece }),
                None => self.logger.log_ignored(sq),
            },
        }
    }

    /// 編集モードの強制移動。合法手判定を通さず、棋譜にも積まず、手番も変えない。
    /// src に駒がなければ何もしない。
    pub fn force_move(&mut self, src: Sq, dst: Sq) {
        if src == dst || !self.board.is_in_bounds(dst) {
            return;
        }
        let piece = unwrap_or_return!(self.board.get(src));

        self.board.set(src, None);
        self.board.set(dst, Some(piece));
        self.last_move = Some(LastMove { src, dst });
        self.selection = None;
        self.stuck = None;
        self.diverged = true;

        self.logger.log_force_move(src, dst, piece);
    }

    //----------------------------------------------------------------
    // CPU 側の着手
    //----------------------------------------------------------------

    /// 現在の手番を CPU が指すべきかどうか。
    pub fn is_scripted_turn(&self) -> bool {
        !self.manual && self.controllers[self.side] == Controller::Cpu && self.status().is_playing()
    }

    /// CPU の着手を予約する。予約できたら busy にして true を返す。
    /// 予約後は step_scripted() を呼ぶまでクリックを受け付けない。
    pub fn begin_scripted(&mut self) -> bool {
        if self.busy || !self.is_scripted_turn() {
            return false;
        }
        self.busy = true;
        true
    }

    /// 予約された CPU の着手を実行する。途中でキャンセルする手段はない。
    ///
    /// 指せる手がなければその側を NoMove として対局を止め、None を返す。
    pub fn step_scripted(&mut self, player: &mut dyn Player) -> Option<Move> {
        self.busy = false;

        match player.think(&self.board, self.side, &self.legality) {
            Some(mv) => {
                self.apply_move(mv);
                Some(mv)
            }
            None => {
                self.stuck = Some(self.side);
                self.logger.log_no_move(self.side);
                None
            }
        }
    }
}
