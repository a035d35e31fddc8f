//!===================================================================
//! 盤ゲーム試作品のコア
//!
//! 盤面は幅 w, 高さ h の長方形 (本将棋なら 9*9, ミニ版なら 5*5)。
//! マスを2次元座標 (x,y) で表す場合、x=0 が左端、y=0 が上端 (後手の一段目) となる。
//!
//! 座標は符号付き数で表現する。相対移動などの扱いが面倒なため。
//! マスが盤面内にあるとき、in bounds であるという。
//!
//! 合法手判定は差し替え可能な戦略 (Legality) として外から与える。
//! 盤面の変更は Board::apply_move / Board::reverse_move と編集モードの強制移動のみで行う。
//!===================================================================

use itertools::iproduct;

#[macro_use]
mod util;

pub mod game;
pub mod history;
pub mod legality;
pub mod log;
pub mod player;
pub mod prelude;
pub mod pretty;
pub mod record;
pub mod sfen;
pub mod variant;

//--------------------------------------------------------------------
// エラー
//--------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("illegal move: {1}: {0:?}")]
    IllegalMove(MoveCmd, String),

    #[error("invalid sfen: {0}")]
    InvalidSfen(String),

    #[error("record parse error: {0}")]
    RecordParseError(String),

    #[error("board diverged from history (forced move in edit mode)")]
    Diverged,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn illegal_move(cmd: &MoveCmd, msg: impl Into<String>) -> Self {
        Self::IllegalMove(cmd.clone(), msg.into())
    }

    pub fn invalid_sfen(msg: impl Into<String>) -> Self {
        Self::InvalidSfen(msg.into())
    }

    pub fn record_parse_error(msg: impl Into<String>) -> Self {
        Self::RecordParseError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//--------------------------------------------------------------------
// 手番
//--------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Side {
    Black,
    White,
}

impl Side {
    /// [Black, White] のイテレータを返す。
    pub fn iter() -> impl Iterator<Item = Self> {
        [Self::Black, Self::White].iter().copied()
    }

    pub fn inv(&self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    /// 前方の y 方向を返す。先手は上 (-1)、後手は下 (+1) に進む。
    pub fn forward(&self) -> i32 {
        match self {
            Self::Black => -1,
            Self::White => 1,
        }
    }

    pub fn toggle(&mut self) {
        *self = self.inv();
    }
}

/// 長さ 2 の配列の添字として使えると便利なので
impl<T> std::ops::Index<Side> for [T] {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        debug_assert_eq!(self.len(), 2);
        &self[side as usize]
    }
}

impl<T> std::ops::IndexMut<Side> for [T] {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        debug_assert_eq!(self.len(), 2);
        &mut self[side as usize]
    }
}

//--------------------------------------------------------------------
// マス
//--------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Sq {
    x: i32,
    y: i32,
}

impl Sq {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn xy(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// (dx, dy) だけずらしたマスを返す。盤面内かどうかは気にしない。
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

//--------------------------------------------------------------------
// 駒
//--------------------------------------------------------------------

/// 駒種。成りは Piece 側のフラグで表す。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PieceKind {
    Pawn,
    Lance,
    Knight,
    Silver,
    Gold,
    Bishop,
    Rook,
    King,
}

impl PieceKind {
    pub fn can_promote(&self) -> bool {
        !matches!(self, Self::Gold | Self::King)
    }
}

/// 盤上の駒の値。
/// Copy なので盤面のマス同士や棋譜と盤面の間で実体が共有されることはない。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Piece {
    kind: PieceKind,
    side: Side,
    promoted: bool,
}

impl Piece {
    pub const fn new(side: Side, kind: PieceKind) -> Self {
        Self {
            kind,
            side,
            promoted: false,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_promoted(&self) -> bool {
        self.promoted
    }

    pub fn is_side(&self, side: Side) -> bool {
        self.side == side
    }

    /// まだ成っておらず、成れる駒種かどうかを返す。
    pub fn can_promote(&self) -> bool {
        !self.promoted && self.kind.can_promote()
    }

    /// 成った駒を返す。self は変更しない。
    pub fn promoted(&self) -> Self {
        Self {
            promoted: true,
            ..*self
        }
    }

    /// 成りを解除した駒を返す。
    pub fn unpromoted(&self) -> Self {
        Self {
            promoted: false,
            ..*self
        }
    }
}

/// 盤面の 1 マス。空なら None。
pub type Cell = Option<Piece>;

//--------------------------------------------------------------------
// 指し手
//--------------------------------------------------------------------

/// 「src の駒を dst へ動かす」という指示。
/// 棋譜ファイルやクリック操作から作られ、盤面と突き合わせて Move になる。
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MoveCmd {
    src: Sq,
    dst: Sq,
    is_promotion: bool,
}

impl MoveCmd {
    pub fn new(src: Sq, dst: Sq, is_promotion: bool) -> Self {
        Self {
            src,
            dst,
            is_promotion,
        }
    }

    pub fn src(&self) -> Sq {
        self.src
    }

    pub fn dst(&self) -> Sq {
        self.dst
    }

    pub fn is_promotion(&self) -> bool {
        self.is_promotion
    }
}

/// 適用済みの指し手の記録 (undo 用)。
///
/// piece は着手前の駒、capture は着手前に dst にあった駒。
/// 作成後は変更されない。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Move {
    src: Sq,
    dst: Sq,
    piece: Piece,
    capture: Option<Piece>,
    is_promotion: bool,
}

impl Move {
    pub fn new(src: Sq, dst: Sq, piece: Piece, capture: Option<Piece>, is_promotion: bool) -> Self {
        Self {
            src,
            dst,
            piece,
            capture,
            is_promotion,
        }
    }

    /// board の現状から指し手レコードを作る。
    /// dst の駒はこの時点で capture に控えておく。
    /// src に駒がなければ None を返す。合法性は見ない。
    pub fn from_board(board: &Board, cmd: &MoveCmd) -> Option<Self> {
        let piece = board.get(cmd.src)?;
        Some(Self::new(
            cmd.src,
            cmd.dst,
            piece,
            board.get(cmd.dst),
            cmd.is_promotion,
        ))
    }

    pub fn src(&self) -> Sq {
        self.src
    }

    pub fn dst(&self) -> Sq {
        self.dst
    }

    pub fn piece(&self) -> Piece {
        self.piece
    }

    pub fn capture(&self) -> Option<Piece> {
        self.capture
    }

    pub fn is_capture(&self) -> bool {
        self.capture.is_some()
    }

    pub fn is_promotion(&self) -> bool {
        self.is_promotion
    }

    /// 着手後に dst に置かれる駒を返す。
    pub fn piece_after(&self) -> Piece {
        if self.is_promotion {
            self.piece.promoted()
        } else {
            self.piece
        }
    }

    pub fn cmd(&self) -> MoveCmd {
        MoveCmd::new(self.src, self.dst, self.is_promotion)
    }
}

//--------------------------------------------------------------------
// 盤面
//--------------------------------------------------------------------

/// 固定サイズの盤面。作成後にサイズが変わることはない。
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Board {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Board {
    pub fn empty(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0);

        Self {
            width,
            height,
            cells: vec![None; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_in_bounds(&self, sq: Sq) -> bool {
        (0..self.width).contains(&sq.x) && (0..self.height).contains(&sq.y)
    }

    /// sq にある駒を返す。盤外は空マス扱い。
    pub fn get(&self, sq: Sq) -> Cell {
        if self.is_in_bounds(sq) {
            self[sq]
        } else {
            None
        }
    }

    /// sq を cell で上書きする。元の駒は黙って消える。
    pub fn set(&mut self, sq: Sq, cell: Cell) {
        self[sq] = cell;
    }

    pub fn row(&self, y: i32) -> &[Cell] {
        assert!((0..self.height).contains(&y));
        let w = self.width as usize;
        let y = y as usize;
        &self.cells[w * y..w * (y + 1)]
    }

    /// 全マスを y, x の順 (上の段から、各段は左から) に列挙する。
    pub fn iter_sq(&self) -> impl Iterator<Item = Sq> {
        iproduct!(0..self.height, 0..self.width).map(|(y, x)| Sq::new(x, y))
    }

    /// side 側の駒を iter_sq() の順に列挙する。
    pub fn iter_pieces(&self, side: Side) -> impl Iterator<Item = (Sq, Piece)> + '_ {
        self.iter_sq().filter_map(move |sq| {
            self[sq]
                .filter(|piece| piece.is_side(side))
                .map(|piece| (sq, piece))
        })
    }

    pub fn count_side(&self, side: Side) -> usize {
        self.iter_pieces(side).count()
    }

    /// mv を盤面に適用する。
    /// mv の中身は信用している。検証はしないので、不正な mv を与えると盤面が壊れる。
    pub fn apply_move(&mut self, mv: &Move) {
        self[mv.src] = None;
        self[mv.dst] = Some(mv.piece_after());
    }

    /// apply_move(mv) の直後の盤面に対して呼ぶと、適用前の盤面に完全に戻る。
    pub fn reverse_move(&mut self, mv: &Move) {
        self[mv.dst] = mv.capture;

        // 成った手なら成りを解除して戻す。元から成っていた駒はそのまま。
        let back = if mv.is_promotion {
            mv.piece.unpromoted()
        } else {
            mv.piece
        };
        self[mv.src] = Some(back);
    }

    fn index_of(&self, sq: Sq) -> usize {
        assert!(self.is_in_bounds(sq), "out of bounds: {:?}", sq);
        (self.width * sq.y + sq.x) as usize
    }
}

impl std::ops::Index<Sq> for Board {
    type Output = Cell;

    fn index(&self, sq: Sq) -> &Self::Output {
        &self.cells[self.index_of(sq)]
    }
}

impl std::ops::IndexMut<Sq> for Board {
    fn index_mut(&mut self, sq: Sq) -> &mut Self::Output {
        let idx = self.index_of(sq);
        &mut self.cells[idx]
    }
}
