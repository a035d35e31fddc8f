//! 端末上で対局する
//!
//! 標準入力から 1 行 1 コマンドを読む:
//!
//! * `click <x> <y>`: マスをクリック (1 始まり)
//! * `move <sfen>`: 指し手を直接入力 (例: `move 7g7f`)
//! * `undo` / `redo` / `reset`
//! * `edit` / `manual`: 編集モード / 手動モードの切り替え
//! * `black <human|cpu>` / `white <human|cpu>`: 操作主の変更
//! * `kifu`: 棋譜表示
//! * `record [path]`: 棋譜を出力 (path 指定時はファイルへ)
//! * `quit`

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Duration;

use eyre::{bail, eyre, WrapErr};
use structopt::StructOpt;

use shogi_sandbox::game::{Controller, Game};
use shogi_sandbox::log::{LoggerTrait, NullLogger, StderrLogger};
use shogi_sandbox::prelude::*;
use shogi_sandbox::record::Record;
use shogi_sandbox::sfen;

type GameBox = Game<Box<dyn Legality + Send + Sync>, Box<dyn LoggerTrait>>;

#[derive(Debug, StructOpt)]
struct Opt {
    /// ゲームの種類 (shogi, mini)
    #[structopt(long, default_value = "shogi")]
    variant: Variant,

    /// 合法手判定 (stub, forward, movement)。省略時はゲームの種類ごとの既定値
    #[structopt(long)]
    rule: Option<Rule>,

    #[structopt(long, default_value = "human")]
    black: Controller,

    #[structopt(long, default_value = "cpu")]
    white: Controller,

    /// CPU の指し方 (random, first)。省略時はゲームの種類ごとの既定値
    #[structopt(long)]
    player: Option<PlayerKind>,

    /// CPU の乱数シード
    #[structopt(long)]
    seed: Option<u64>,

    /// CPU が指すまでの待ち時間 (ミリ秒)
    #[structopt(long, default_value = "500")]
    delay_ms: u64,

    /// 開始局面を棋譜ファイルから読む (指し手は再生する)
    #[structopt(long, parse(from_os_str))]
    record: Option<PathBuf>,

    /// 状態変化を標準エラー出力に書く
    #[structopt(short, long)]
    verbose: bool,
}

fn new_game(opt: &Opt) -> eyre::Result<GameBox> {
    let logger: Box<dyn LoggerTrait> = if opt.verbose {
        Box::new(StderrLogger::new())
    } else {
        Box::new(NullLogger::new())
    };

    let (variant, initial, cmds) = match &opt.record {
        Some(path) => {
            let record = Record::from_file(path)
                .wrap_err_with(|| format!("cannot load record: {}", path.display()))?;
            (
                record.variant(),
                record.initial_board().clone(),
                record.cmds().to_vec(),
            )
        }
        None => (opt.variant, opt.variant.initial_board(), Vec::new()),
    };
    let rule = opt.rule.unwrap_or_else(|| variant.default_rule());

    let mut game = Game::with_initial(variant, initial, rule.legality(), logger);
    for cmd in &cmds {
        if game.try_move(cmd).is_none() {
            bail!("illegal move in record: {}", sfen::move_to_sfen(cmd, game.board()));
        }
    }
    game.set_controller(Side::Black, opt.black);
    game.set_controller(Side::White, opt.white);

    Ok(game)
}

fn parse_sq(game: &GameBox, args: &[&str]) -> eyre::Result<Sq> {
    if args.len() != 2 {
        bail!("usage: click <x> <y>");
    }
    let x: i32 = args[0].parse().wrap_err("invalid x")?;
    let y: i32 = args[1].parse().wrap_err("invalid y")?;
    let sq = Sq::new(x - 1, y - 1);
    if !game.board().is_in_bounds(sq) {
        bail!("out of board: {} {}", x, y);
    }

    Ok(sq)
}

fn toggle_text(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

/// コマンドを 1 つ処理する。quit なら false を返す。
fn on_cmd(game: &mut GameBox, name: &str, args: &[&str]) -> eyre::Result<bool> {
    match name {
        "quit" => return Ok(false),
        "click" => {
            let sq = parse_sq(game, args)?;
            game.click(sq);
        }
        "move" => {
            let s = args.first().ok_or_else(|| eyre!("usage: move <sfen>"))?;
            let cmd = sfen::sfen_to_move(s, game.board())?;
            if game.try_move(&cmd).is_none() && !game.is_edit() {
                println!("illegal move: {}", s);
            }
        }
        "undo" => game.undo(),
        "redo" => game.redo(),
        "reset" => game.reset(),
        "edit" => {
            game.set_edit(!game.is_edit());
            println!("edit: {}", toggle_text(game.is_edit()));
        }
        "manual" => {
            game.set_manual(!game.is_manual());
            println!("manual: {}", toggle_text(game.is_manual()));
        }
        "black" | "white" => {
            let side = if name == "black" {
                Side::Black
            } else {
                Side::White
            };
            let s = args
                .first()
                .ok_or_else(|| eyre!("usage: {} <human|cpu>", name))?;
            let controller: Controller = s.parse().wrap_err("invalid controller")?;
            game.set_controller(side, controller);
        }
        "kifu" => {
            for line in game.kifu() {
                println!("{}", line);
            }
            return Ok(true);
        }
        "record" => {
            let record = Record::from_game(game)?;
            match args.first() {
                Some(path) => std::fs::write(path, record.to_string())
                    .wrap_err_with(|| format!("cannot write record: {}", path))?,
                None => print!("{}", record),
            }
            return Ok(true);
        }
        "show" => {}
        _ => bail!("unknown command: {}", name),
    }

    print!("{}", game.snapshot().pretty());

    Ok(true)
}

/// CPU の手番が続く限り指させる。
fn run_scripted(game: &mut GameBox, player: &mut dyn Player, delay: Duration) {
    while game.begin_scripted() {
        std::thread::sleep(delay);
        if let Some(mv) = game.step_scripted(player) {
            println!("{}", mv.pretty());
        }
        print!("{}", game.snapshot().pretty());
    }
}

fn main() -> eyre::Result<()> {
    if cfg!(debug_assertions) {
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    let opt = Opt::from_args();

    let delay = Duration::from_millis(opt.delay_ms);

    let mut game = new_game(&opt)?;
    let mut player = opt
        .player
        .unwrap_or_else(|| game.variant().default_player())
        .player(opt.seed);
    print!("{}", game.snapshot().pretty());
    run_scripted(&mut game, player.as_mut(), delay);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut it = line.split_ascii_whitespace();

        // 空行は無視する
        let name = match it.next() {
            Some(name) => name,
            None => continue,
        };
        let args: Vec<_> = it.collect();

        match on_cmd(&mut game, name, &args) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                eprintln!("error: {:#}", e);
                continue;
            }
        }

        run_scripted(&mut game, player.as_mut(), delay);
    }

    Ok(())
}
