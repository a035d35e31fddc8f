//!===================================================================
//! SFEN
//!
//! 盤面部分と指し手部分のみ扱う。持駒・手番・手数は扱わない (持駒の概念がないため)。
//! 幅・高さとも 9 以下の任意サイズの盤面に対応している。
//!
//! 指し手は "7g7f" 形式。筋は右端を 1 とし (筋 = 幅 - x)、段は上端を 'a' とする (段 = 'a' + y)。
//! 成る手は末尾に '+' を付ける。
//!===================================================================

use std::borrow::Cow;

use itertools::Itertools;

use crate::prelude::*;
use crate::{Error, Result};

/// 本将棋の初期配置。
pub const SFEN_SHOGI: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL";

/// ミニ版 (5*5、歩のみ) の初期配置。
pub const SFEN_MINI: &str = "ppppp/5/5/5/PPPPP";

/// "sfen <board> [moves <move>...]" をパースし、(開始局面, 指し手リスト) を返す。
pub fn sfen_to_kifu(sfen: impl AsRef<str>) -> Result<(Board, Vec<MoveCmd>)> {
    let sfen = sfen.as_ref();

    let mut it = sfen.split_ascii_whitespace();
    let mut next = || it.next().ok_or_else(|| Error::invalid_sfen("incomplete"));

    let magic = next()?;
    chk!(
        magic == "sfen",
        Error::invalid_sfen(format!("invalid sfen magic: {}", magic))
    );
    let board = sfen_to_board(next()?)?;

    let cmds = if let Some(magic_moves) = it.next() {
        chk!(
            magic_moves == "moves",
            Error::invalid_sfen("\"moves\" expected")
        );
        it.map(|s| sfen_to_move(s, &board))
            .collect::<Result<Vec<_>>>()?
    } else {
        Vec::new()
    };

    Ok((board, cmds))
}

pub fn sfen_to_board(sfen: impl AsRef<str>) -> Result<Board> {
    let sfen = sfen.as_ref();

    let rows = sfen
        .split('/')
        .map(sfen_to_board_row)
        .collect::<Result<Vec<_>>>()?;

    chk!(
        rows.len() <= 9,
        Error::invalid_sfen(format!("board: too many rows: {}", rows.len()))
    );

    let width = rows[0].len();
    chk!(width > 0, Error::invalid_sfen("board: empty row"));
    chk!(
        rows.iter().all(|row| row.len() == width),
        Error::invalid_sfen("board: row length mismatch")
    );

    let mut board = Board::empty(width as i32, rows.len() as i32);
    for (y, row) in rows.iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            board.set(Sq::new(x as i32, y as i32), *cell);
        }
    }

    Ok(board)
}

fn sfen_to_board_row(sfen: &str) -> Result<Vec<Cell>> {
    struct State {
        row: Vec<Cell>,
        is_promote: bool,
    }
    impl State {
        fn new() -> Self {
            Self {
                row: Vec::with_capacity(9),
                is_promote: false,
            }
        }
        fn eat(&mut self, c: char) -> Result<()> {
            match c {
                '+' => {
                    self.ensure_size_ok(1)?;
                    self.ensure_not_promote()?;
                    self.is_promote = true;
                }
                '1'..='9' => {
                    self.ensure_not_promote()?;
                    let n = c as usize - '0' as usize;
                    self.ensure_size_ok(n)?;
                    self.row.extend(itertools::repeat_n(None, n));
                }
                c if is_piece_char(c) => {
                    self.ensure_size_ok(1)?;
                    let side = if c.is_ascii_uppercase() {
                        Side::Black
                    } else {
                        Side::White
                    };
                    let mut piece = Piece::new(side, char_to_kind(c));
                    if self.is_promote {
                        chk!(
                            piece.can_promote(),
                            Error::invalid_sfen("board_row: cannot promote")
                        );
                        piece = piece.promoted();
                        self.is_promote = false;
                    }
                    self.row.push(Some(piece));
                }
                _ => return Err(Error::invalid_sfen("board_row: invalid char")),
            }
            Ok(())
        }
        fn ensure_size_ok(&self, n_add: usize) -> Result<()> {
            chk!(
                self.row.len() + n_add <= 9,
                Error::invalid_sfen("board_row: too long row")
            );
            Ok(())
        }
        fn ensure_not_promote(&self) -> Result<()> {
            chk!(
                !self.is_promote,
                Error::invalid_sfen("board_row: invalid '+'")
            );
            Ok(())
        }
    }

    let mut state = State::new();
    for c in sfen.chars() {
        state.eat(c)?;
    }
    chk!(
        !state.is_promote,
        Error::invalid_sfen("board_row: trailing '+'")
    );

    Ok(state.row)
}

/// 指し手文字列をパースする。board はサイズの判定にのみ使う。
pub fn sfen_to_move(sfen: impl AsRef<str>, board: &Board) -> Result<MoveCmd> {
    let sfen = sfen.as_ref();
    let cs: Vec<_> = sfen.chars().collect();
    chk!(
        (4..=5).contains(&cs.len()),
        Error::invalid_sfen(format!("invalid move: {:?}", sfen))
    );
    if cs.len() == 5 {
        chk!(cs[4] == '+', Error::invalid_sfen("expected '+'"));
    }

    let src = chars_to_sq(cs[0], cs[1], board)?;
    let dst = chars_to_sq(cs[2], cs[3], board)?;
    chk!(
        src != dst,
        Error::invalid_sfen(format!("src == dst: {:?}", sfen))
    );
    let is_promotion = cs.len() == 5;

    Ok(MoveCmd::new(src, dst, is_promotion))
}

fn is_piece_char(c: char) -> bool {
    matches!(
        c.to_ascii_uppercase(),
        'P' | 'L' | 'N' | 'S' | 'B' | 'R' | 'G' | 'K'
    )
}

fn char_to_kind(c: char) -> PieceKind {
    match c.to_ascii_uppercase() {
        'P' => PieceKind::Pawn,
        'L' => PieceKind::Lance,
        'N' => PieceKind::Knight,
        'S' => PieceKind::Silver,
        'B' => PieceKind::Bishop,
        'R' => PieceKind::Rook,
        'G' => PieceKind::Gold,
        'K' => PieceKind::King,
        _ => unreachable!(),
    }
}

fn chars_to_sq(cx: char, cy: char, board: &Board) -> Result<Sq> {
    let file = cx
        .to_digit(10)
        .map(|d| d as i32)
        .filter(|d| (1..=board.width()).contains(d))
        .ok_or_else(|| Error::invalid_sfen(format!("invalid file: {:?}", cx)))?;
    chk!(
        cy.is_ascii_lowercase(),
        Error::invalid_sfen(format!("invalid rank: {:?}", cy))
    );
    let rank = cy as i32 - 'a' as i32;
    chk!(
        rank < board.height(),
        Error::invalid_sfen(format!("invalid rank: {:?}", cy))
    );

    Ok(Sq::new(board.width() - file, rank))
}

pub fn kifu_to_sfen(board: &Board, cmds: &[MoveCmd]) -> Cow<'static, str> {
    let sfen_board = format!("sfen {}", board_to_sfen(board));

    if cmds.is_empty() {
        sfen_board.into()
    } else {
        [sfen_board, moves_to_sfen(cmds, board).into_owned()]
            .join(" ")
            .into()
    }
}

pub fn board_to_sfen(board: &Board) -> Cow<'static, str> {
    (0..board.height())
        .map(|y| board_row_to_sfen(board.row(y)))
        .join("/")
        .into()
}

fn board_row_to_sfen(row: &[Cell]) -> Cow<'static, str> {
    let mut sfen = String::new();
    let mut n_empty = 0;

    for cell in row {
        match cell {
            None => n_empty += 1,
            Some(piece) => {
                if n_empty > 0 {
                    sfen.push_str(&n_empty.to_string());
                    n_empty = 0;
                }
                sfen.push_str(&piece_to_sfen(*piece));
            }
        }
    }
    if n_empty > 0 {
        sfen.push_str(&n_empty.to_string());
    }

    sfen.into()
}

pub fn moves_to_sfen(cmds: &[MoveCmd], board: &Board) -> Cow<'static, str> {
    [
        "moves".into(),
        cmds.iter().map(|cmd| move_to_sfen(cmd, board)).join(" "),
    ]
    .join(" ")
    .into()
}

pub fn move_to_sfen(cmd: &MoveCmd, board: &Board) -> Cow<'static, str> {
    format!(
        "{}{}{}",
        sq_to_sfen(cmd.src(), board),
        sq_to_sfen(cmd.dst(), board),
        if cmd.is_promotion() { "+" } else { "" }
    )
    .into()
}

fn piece_to_sfen(piece: Piece) -> Cow<'static, str> {
    let c = match piece.kind() {
        PieceKind::Pawn => 'P',
        PieceKind::Lance => 'L',
        PieceKind::Knight => 'N',
        PieceKind::Silver => 'S',
        PieceKind::Bishop => 'B',
        PieceKind::Rook => 'R',
        PieceKind::Gold => 'G',
        PieceKind::King => 'K',
    };
    let c = match piece.side() {
        Side::Black => c,
        Side::White => c.to_ascii_lowercase(),
    };

    if piece.is_promoted() {
        format!("+{}", c).into()
    } else {
        c.to_string().into()
    }
}

fn sq_to_sfen(sq: Sq, board: &Board) -> Cow<'static, str> {
    let file = board.width() - sq.x();
    let cy = char::from(b'a' + sq.y() as u8);
    format!("{}{}", file, cy).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chk(sfen: impl AsRef<str>) {
        let sfen = sfen.as_ref();
        let (board, cmds) = sfen_to_kifu(sfen).unwrap();
        assert_eq!(sfen, kifu_to_sfen(&board, &cmds));
    }

    #[test]
    fn test() {
        chk(format!("sfen {}", SFEN_SHOGI));
        chk(format!("sfen {}", SFEN_MINI));
        chk("sfen 8l/1l+R2P3/p2pBG1pp/kps1p4/Nn1P2G2/P1P1P2PP/1PS6/1KSG3+r1/LN2+p3L");
        chk(format!("sfen {} moves 7g7f 3c3d 8h2b+ 3a2b", SFEN_SHOGI));
        chk(format!("sfen {} moves 5e5d 1a1b", SFEN_MINI));
    }

    #[test]
    fn test_board_layout() {
        let board = sfen_to_board(SFEN_SHOGI).unwrap();
        assert_eq!((board.width(), board.height()), (9, 9));

        let black_rook = Piece::new(Side::Black, PieceKind::Rook);
        let white_rook = Piece::new(Side::White, PieceKind::Rook);
        assert_eq!(board.get(Sq::new(7, 7)), Some(black_rook));
        assert_eq!(board.get(Sq::new(1, 1)), Some(white_rook));
        assert_eq!(board.count_side(Side::Black), 20);
        assert_eq!(board.count_side(Side::White), 20);

        let board = sfen_to_board("+P4/5/5/5/5").unwrap();
        assert!(board.get(Sq::new(0, 0)).unwrap().is_promoted());
    }

    #[test]
    fn test_move_notation() {
        let board = sfen_to_board(SFEN_SHOGI).unwrap();

        let cmd = sfen_to_move("7g7f", &board).unwrap();
        assert_eq!(cmd, MoveCmd::new(Sq::new(2, 6), Sq::new(2, 5), false));

        let cmd = sfen_to_move("8h2b+", &board).unwrap();
        assert_eq!(cmd, MoveCmd::new(Sq::new(1, 7), Sq::new(7, 1), true));

        let mini = sfen_to_board(SFEN_MINI).unwrap();
        let cmd = sfen_to_move("5e5d", &mini).unwrap();
        assert_eq!(cmd, MoveCmd::new(Sq::new(0, 4), Sq::new(0, 3), false));
        assert!(sfen_to_move("6e6d", &mini).is_err());
        assert!(sfen_to_move("1f1e", &mini).is_err());
    }

    #[test]
    fn test_invalid() {
        assert!(sfen_to_board("ppp/pp").is_err());
        assert!(sfen_to_board("+k8").is_err());
        assert!(sfen_to_board("pppppppppp").is_err());
        assert!(sfen_to_board("x4").is_err());
        assert!(sfen_to_kifu("startpos").is_err());
        assert!(sfen_to_kifu(format!("sfen {} 7g7f", SFEN_SHOGI)).is_err());

        let board = sfen_to_board(SFEN_SHOGI).unwrap();
        assert!(sfen_to_move("7g7g", &board).is_err());
        assert!(sfen_to_move("7g7f=", &board).is_err());
    }

    #[test]
    fn test_height_limit() {
        // 段は 'a'..='i' で書くので 10 段以上は受け付けない
        let tall = vec!["1"; 10].join("/");
        assert!(matches!(sfen_to_board(&tall), Err(Error::InvalidSfen(_))));
        assert!(matches!(
            sfen_to_kifu(format!("sfen {}/P", vec!["1"; 26].join("/"))),
            Err(Error::InvalidSfen(_))
        ));

        let board = sfen_to_board(vec!["1"; 9].join("/")).unwrap();
        assert_eq!((board.width(), board.height()), (1, 9));
        let cmd = MoveCmd::new(Sq::new(0, 8), Sq::new(0, 7), false);
        assert_eq!(move_to_sfen(&cmd, &board), "1i1h");
        assert_eq!(sfen_to_move("1i1h", &board).unwrap(), cmd);
    }
}
