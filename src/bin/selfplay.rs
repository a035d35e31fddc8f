//! CPU 同士の対局を大量に行い、履歴操作と棋譜の整合性を検証する
//!
//! 各対局について以下を確かめる:
//!
//! * 棋譜を出力・パースして再生すると同じ局面になる
//! * 全て undo すると初期局面に、全て redo すると終局面に戻る

use std::collections::BTreeMap;

use eyre::{ensure, eyre};
use rayon::prelude::*;
use structopt::StructOpt;

use shogi_sandbox::game::{Controller, Game, GameStatus};
use shogi_sandbox::prelude::*;
use shogi_sandbox::record::Record;

#[derive(Debug, StructOpt)]
struct Opt {
    #[structopt(long, default_value = "mini")]
    variant: Variant,

    #[structopt(long)]
    rule: Option<Rule>,

    /// CPU の指し方 (random, first)
    #[structopt(long)]
    player: Option<PlayerKind>,

    /// 対局数
    #[structopt(long, default_value = "1000")]
    games: u64,

    /// 1 局あたりの最大手数
    #[structopt(long, default_value = "200")]
    max_plies: usize,

    /// 対局 i のシードは seed + i
    #[structopt(long, default_value = "0")]
    seed: u64,

    /// 各対局の棋譜を標準出力に書く
    #[structopt(long)]
    print_records: bool,
}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
enum Outcome {
    AllCaptured(Side),
    NoMove(Side),
    MaxPlies,
}

impl Outcome {
    fn from_status(status: GameStatus) -> Self {
        match status {
            GameStatus::AllCaptured(side) => Self::AllCaptured(side),
            GameStatus::NoMove(side) => Self::NoMove(side),
            GameStatus::Playing => Self::MaxPlies,
        }
    }

    fn text(&self) -> String {
        match self {
            Self::AllCaptured(side) => GameStatus::AllCaptured(*side).pretty().into_owned(),
            Self::NoMove(side) => GameStatus::NoMove(*side).pretty().into_owned(),
            Self::MaxPlies => "最大手数".to_owned(),
        }
    }
}

fn selfplay(
    opt: &Opt,
    rule: Rule,
    player: PlayerKind,
    seed: u64,
) -> eyre::Result<(Outcome, Record)> {
    let mut game = Game::new(opt.variant, rule.legality());
    game.set_controller(Side::Black, Controller::Cpu);
    game.set_controller(Side::White, Controller::Cpu);
    let mut player = player.player(Some(seed));

    while game.history().len() < opt.max_plies && game.begin_scripted() {
        game.step_scripted(player.as_mut());
    }
    let outcome = Outcome::from_status(game.status());

    let record = Record::from_game(&game)?;
    let replayed = record.to_string().parse::<Record>()?.replay(rule.legality())?;
    ensure!(
        replayed.board() == game.board(),
        "seed {}: replayed board mismatch",
        seed
    );

    let last = game.board().clone();
    let n = game.history().len();
    for _ in 0..n {
        game.undo();
    }
    ensure!(
        game.board() == game.initial_board(),
        "seed {}: undo-all mismatch",
        seed
    );
    for _ in 0..n {
        game.redo();
    }
    ensure!(game.board() == &last, "seed {}: redo-all mismatch", seed);

    Ok((outcome, record))
}

fn main() -> eyre::Result<()> {
    let opt = Opt::from_args();
    let rule = opt.rule.unwrap_or_else(|| opt.variant.default_rule());
    let player = opt.player.unwrap_or_else(|| opt.variant.default_player());

    let results: Vec<_> = (0..opt.games)
        .into_par_iter()
        .map(|i| selfplay(&opt, rule, player, opt.seed + i))
        .collect::<eyre::Result<_>>()?;

    let mut counts = BTreeMap::<Outcome, usize>::new();
    for (outcome, record) in &results {
        *counts.entry(*outcome).or_default() += 1;
        if opt.print_records {
            print!("{}", record);
        }
    }

    let total = results.len();
    if total == 0 {
        return Err(eyre!("no games played"));
    }
    for (outcome, count) in counts {
        println!(
            "{}: {} ({:.1}%)",
            outcome.text(),
            count,
            100.0 * count as f64 / total as f64
        );
    }

    Ok(())
}
