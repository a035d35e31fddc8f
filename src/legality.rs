//!===================================================================
//! 合法手判定
//!
//! 判定方法は Legality トレイトとして Game に注入する。実装は以下の 3 つ:
//!
//!   * LegalityStub: 同一マスへの移動と自駒の上への移動のみ禁止。駒の動きは見ない。
//!   * LegalityForward: ミニ版用。真っすぐ 1 マス前進する手のみ許す。
//!   * LegalityMovement: 駒種ごとの動きをチェックする。王手・打ち駒・成りは扱わない。
//!
//! いずれも盤外への移動は認めない。
//!===================================================================

use crate::prelude::*;

pub trait Legality {
    /// side の手番で、piece を src から dst へ動かす手が指せるかどうかを返す。
    fn is_legal(&self, board: &Board, side: Side, piece: Piece, src: Sq, dst: Sq) -> bool;

    /// この手で自動的に成るかどうかを返す。
    /// 成りの判定は未実装なので、既定では常に成らない。
    fn promotion(&self, _board: &Board, _piece: Piece, _src: Sq, _dst: Sq) -> bool {
        false
    }
}

impl<L: Legality + ?Sized> Legality for Box<L> {
    fn is_legal(&self, board: &Board, side: Side, piece: Piece, src: Sq, dst: Sq) -> bool {
        (**self).is_legal(board, side, piece, src, dst)
    }

    fn promotion(&self, board: &Board, piece: Piece, src: Sq, dst: Sq) -> bool {
        (**self).promotion(board, piece, src, dst)
    }
}

/// 全ての判定に共通する最低限のチェック。
fn is_pseudo_legal_basic(board: &Board, piece: Piece, src: Sq, dst: Sq) -> bool {
    if src == dst {
        return false;
    }
    if !board.is_in_bounds(dst) {
        return false;
    }

    // 自駒の上には行けない
    !board.get(dst).map_or(false, |dst_piece| dst_piece.side() == piece.side())
}

/// 暫定の判定。駒種の動きは未チェック。
#[derive(Clone, Copy, Debug, Default)]
pub struct LegalityStub;

impl Legality for LegalityStub {
    fn is_legal(&self, board: &Board, _side: Side, piece: Piece, src: Sq, dst: Sq) -> bool {
        is_pseudo_legal_basic(board, piece, src, dst)
    }
}

/// 真っすぐ 1 マス前進する手のみ許す。前方に敵駒があれば取れる。
#[derive(Clone, Copy, Debug, Default)]
pub struct LegalityForward;

impl Legality for LegalityForward {
    fn is_legal(&self, board: &Board, _side: Side, piece: Piece, src: Sq, dst: Sq) -> bool {
        dst == src.offset(0, piece.side().forward())
            && is_pseudo_legal_basic(board, piece, src, dst)
    }
}

/// 駒種ごとの動きをチェックする判定。
#[derive(Clone, Copy, Debug, Default)]
pub struct LegalityMovement;

impl Legality for LegalityMovement {
    fn is_legal(&self, board: &Board, _side: Side, piece: Piece, src: Sq, dst: Sq) -> bool {
        if !is_pseudo_legal_basic(board, piece, src, dst) {
            return false;
        }

        // 先手から見た相対移動量に直す
        let sgn = -piece.side().forward();
        let dx = (dst.x() - src.x()) * sgn;
        let dy = (dst.y() - src.y()) * sgn;

        if steps_melee(piece).iter().any(|&d| d == (dx, dy)) {
            return true;
        }

        steps_ranged(piece).iter().any(|&(ux, uy)| {
            let dir = (ux * sgn, uy * sgn);
            is_reachable_ranged(board, src, dst, dir)
        })
    }
}

/// src から dir 方向に進んで dst に届くかどうか。途中に駒があれば止まる。
fn is_reachable_ranged(board: &Board, src: Sq, dst: Sq, (dx, dy): (i32, i32)) -> bool {
    let mut sq = src.offset(dx, dy);
    while board.is_in_bounds(sq) {
        if sq == dst {
            return true;
        }
        if board.get(sq).is_some() {
            return false;
        }
        sq = sq.offset(dx, dy);
    }
    false
}

const STEPS_GOLD: &[(i32, i32)] = &[(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (0, 1)];
const STEPS_KING: &[(i32, i32)] = &[
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];
const DIRS_DIAGONAL: &[(i32, i32)] = &[(-1, -1), (1, -1), (-1, 1), (1, 1)];
const DIRS_ORTHOGONAL: &[(i32, i32)] = &[(0, -1), (-1, 0), (1, 0), (0, 1)];

/// 近接の動き (先手から見た相対移動量)。
fn steps_melee(piece: Piece) -> &'static [(i32, i32)] {
    match (piece.kind(), piece.is_promoted()) {
        (PieceKind::Pawn, false) => &[(0, -1)],
        (PieceKind::Knight, false) => &[(-1, -2), (1, -2)],
        (PieceKind::Silver, false) => &[(-1, -1), (0, -1), (1, -1), (-1, 1), (1, 1)],
        (PieceKind::Gold, _) => STEPS_GOLD,
        (PieceKind::Pawn, true)
        | (PieceKind::Lance, true)
        | (PieceKind::Knight, true)
        | (PieceKind::Silver, true) => STEPS_GOLD,
        (PieceKind::King, _) => STEPS_KING,
        (PieceKind::Bishop, true) => DIRS_ORTHOGONAL,
        (PieceKind::Rook, true) => DIRS_DIAGONAL,
        _ => &[], // 香、角、飛
    }
}

/// 遠隔の動き (先手から見た方向)。
fn steps_ranged(piece: Piece) -> &'static [(i32, i32)] {
    match (piece.kind(), piece.is_promoted()) {
        (PieceKind::Lance, false) => &[(0, -1)],
        (PieceKind::Bishop, _) => DIRS_DIAGONAL,
        (PieceKind::Rook, _) => DIRS_ORTHOGONAL,
        _ => &[], // 近接駒
    }
}

/// board 上の side 側の指し手のうち、legality が認めるものを列挙する。
///
/// 列挙順は src について iter_sq() 順、各 src について dst を iter_sq() 順。
/// capture はこの時点の盤面から記録される。
pub fn moves_legal<'a>(
    board: &'a Board,
    side: Side,
    legality: &'a dyn Legality,
) -> impl Iterator<Item = Move> + 'a {
    board.iter_pieces(side).flat_map(move |(src, piece)| {
        board
            .iter_sq()
            .filter(move |&dst| legality.is_legal(board, side, piece, src, dst))
            .map(move |dst| {
                let is_promotion = legality.promotion(board, piece, src, dst);
                Move::new(src, dst, piece, board.get(dst), is_promotion)
            })
    })
}

//--------------------------------------------------------------------
// 判定方法の選択 (設定用)
//--------------------------------------------------------------------

#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, strum_macros::Display, strum_macros::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum Rule {
    Stub,
    Forward,
    Movement,
}

impl Rule {
    pub fn legality(&self) -> Box<dyn Legality + Send + Sync> {
        match self {
            Self::Stub => Box::new(LegalityStub),
            Self::Forward => Box::new(LegalityForward),
            Self::Movement => Box::new(LegalityMovement),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sfen;

    fn parse_board(sfen: &str) -> Board {
        sfen::sfen_to_board(sfen).unwrap()
    }

    fn legal(legality: &dyn Legality, board: &Board, src: (i32, i32), dst: (i32, i32)) -> bool {
        let src = Sq::new(src.0, src.1);
        let dst = Sq::new(dst.0, dst.1);
        let piece = board.get(src).unwrap();
        legality.is_legal(board, piece.side(), piece, src, dst)
    }

    #[test]
    fn test_stub() {
        let board = parse_board(sfen::SFEN_SHOGI);

        // 駒の動きは見ない
        assert!(legal(&LegalityStub, &board, (0, 6), (0, 5)));
        assert!(legal(&LegalityStub, &board, (0, 6), (8, 3)));
        // 敵駒の上は OK
        assert!(legal(&LegalityStub, &board, (0, 6), (0, 2)));
        // 自駒の上、同一マス、盤外は NG
        assert!(!legal(&LegalityStub, &board, (0, 6), (1, 6)));
        assert!(!legal(&LegalityStub, &board, (0, 6), (0, 6)));
        assert!(!legal(&LegalityStub, &board, (0, 6), (0, 9)));

        let pawn = board.get(Sq::new(0, 6)).unwrap();
        assert!(!LegalityStub.promotion(&board, pawn, Sq::new(0, 6), Sq::new(0, 2)));
    }

    #[test]
    fn test_forward() {
        let board = parse_board("ppppp/5/1p3/1P3/P4");

        assert!(legal(&LegalityForward, &board, (0, 4), (0, 3)));
        assert!(!legal(&LegalityForward, &board, (0, 4), (0, 2)));
        assert!(!legal(&LegalityForward, &board, (0, 4), (1, 3)));
        // 後手は下に進む
        assert!(legal(&LegalityForward, &board, (0, 0), (0, 1)));
        assert!(!legal(&LegalityForward, &board, (0, 0), (0, -1)));
        // 前方の敵駒は取れる
        assert!(legal(&LegalityForward, &board, (1, 3), (1, 2)));
        assert!(legal(&LegalityForward, &board, (1, 2), (1, 3)));

        // 前方の自駒は取れない
        let board = parse_board("p4/p4/5/5/5");
        assert!(!legal(&LegalityForward, &board, (0, 0), (0, 1)));
    }

    #[test]
    fn test_movement_pawn() {
        let board = parse_board(sfen::SFEN_SHOGI);
        let m = &LegalityMovement;

        assert!(legal(m, &board, (2, 6), (2, 5)));
        assert!(!legal(m, &board, (2, 6), (2, 4)));
        assert!(legal(m, &board, (2, 2), (2, 3)));
        assert!(!legal(m, &board, (2, 2), (2, 1)));
    }

    #[test]
    fn test_movement_melee() {
        let board = parse_board("4k4/9/9/9/4G4/9/3p5/9/2N1K4");
        let m = &LegalityMovement;

        // 桂
        assert!(legal(m, &board, (2, 8), (1, 6)));
        assert!(legal(m, &board, (2, 8), (3, 6)));
        assert!(!legal(m, &board, (2, 8), (2, 7)));
        // 玉
        assert!(legal(m, &board, (4, 8), (3, 7)));
        assert!(!legal(m, &board, (4, 8), (4, 6)));
        // 金
        assert!(legal(m, &board, (4, 4), (3, 3)));
        assert!(legal(m, &board, (4, 4), (4, 5)));
        assert!(!legal(m, &board, (4, 4), (3, 5)));
        assert!(!legal(m, &board, (4, 4), (4, 2)));
    }

    #[test]
    fn test_movement_ranged() {
        let board = parse_board("4k4/9/9/9/1p7/9/9/1R5B1/4K4");
        let m = &LegalityMovement;

        // 飛: 敵駒で止まる
        assert!(legal(m, &board, (1, 7), (1, 5)));
        assert!(legal(m, &board, (1, 7), (1, 4)));
        assert!(!legal(m, &board, (1, 7), (1, 3)));
        assert!(legal(m, &board, (1, 7), (6, 7)));
        assert!(!legal(m, &board, (1, 7), (8, 7)));
        assert!(!legal(m, &board, (1, 7), (2, 6)));
        // 角
        assert!(legal(m, &board, (7, 7), (3, 3)));
        assert!(legal(m, &board, (7, 7), (8, 8)));
        assert!(!legal(m, &board, (7, 7), (7, 6)));
    }

    #[test]
    fn test_movement_promoted() {
        let board = parse_board("9/9/9/9/4+B4/9/2+P6/9/6+R2");
        let m = &LegalityMovement;

        // と金は金の動き
        assert!(legal(m, &board, (2, 6), (1, 5)));
        assert!(legal(m, &board, (2, 6), (2, 7)));
        assert!(!legal(m, &board, (2, 6), (1, 7)));
        // 馬は角 + 縦横 1 マス
        assert!(legal(m, &board, (4, 4), (0, 0)));
        assert!(legal(m, &board, (4, 4), (4, 5)));
        assert!(!legal(m, &board, (4, 4), (4, 6)));
        // 龍は飛 + 斜め 1 マス
        assert!(legal(m, &board, (6, 8), (6, 0)));
        assert!(legal(m, &board, (6, 8), (5, 7)));
        assert!(!legal(m, &board, (6, 8), (4, 6)));
    }

    #[test]
    fn test_moves_legal() {
        let board = parse_board(sfen::SFEN_MINI);
        let mvs: Vec<_> = moves_legal(&board, Side::Black, &LegalityForward).collect();
        assert_eq!(mvs.len(), 5);
        assert_eq!(mvs[0].src(), Sq::new(0, 4));
        assert_eq!(mvs[0].dst(), Sq::new(0, 3));
        assert!(mvs.iter().all(|mv| mv.capture().is_none()));

        let board = parse_board("p4/P4/5/5/5");
        let mvs: Vec<_> = moves_legal(&board, Side::White, &LegalityForward).collect();
        assert_eq!(mvs.len(), 1);
        assert_eq!(
            mvs[0].capture(),
            Some(Piece::new(Side::Black, PieceKind::Pawn))
        );
    }

    #[test]
    fn test_rule() {
        assert_eq!("stub".parse::<Rule>().unwrap(), Rule::Stub);
        assert_eq!("movement".parse::<Rule>().unwrap(), Rule::Movement);
        assert_eq!(Rule::Forward.to_string(), "forward");
        assert!("real".parse::<Rule>().is_err());
    }
}
