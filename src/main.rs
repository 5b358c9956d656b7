use chrono::Local;
use clap::Parser;
use janggi::board::Board;
use janggi::display_format::DisplayFormat;
use janggi::game::{Game, GameState};
use janggi::location::Move;
use janggi::piece::Side;
use log::{info, warn, LevelFilter};
use rand::seq::IndexedRandom;
use std::io;
use std::io::Write;

#[derive(Parser)]
struct Arguments {
    /// Side that moves first.
    #[clap(short, long, default_value = "blue")]
    first: Side,

    /// Draw pieces as ASCII letters instead of Hanja.
    #[clap(short, long)]
    ascii: bool,

    /// Disable ANSI colors in the board output.
    #[clap(short, long)]
    plain: bool,

    /// Answer every accepted move with a random legal reply.
    #[clap(short, long)]
    robot: bool,
}

fn main() {
    let arguments = Arguments::parse();

    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .format(|buf, record| {
            writeln!(
                buf,
                "{style}[{}] [{:5}]{style:#} {}",
                Local::now().format("%T%.3f"),
                record.level(),
                record.args(),
                style = buf.default_level_style(record.level()),
            )
        })
        .init();

    DisplayFormat::set_default_hanja(!arguments.ascii);
    DisplayFormat::set_default_color(!arguments.plain);

    let mut game = Game::new(Board::opening(), arguments.first);
    info!("new game, {} moves first", arguments.first);

    while game.game_state() == GameState::Unfinished {
        println!("{}", game.display(DisplayFormat::pretty()));

        let mut input = String::new();
        let Ok(read) = io::stdin().read_line(&mut input) else { break };
        if read == 0 {
            break;
        }
        let input = input.trim().to_ascii_lowercase();

        let mv = match input.parse::<Move>() {
            Ok(mv) => mv,
            Err(error) => {
                println!("cannot read '{input}': {error}");
                continue;
            }
        };

        if let Err(error) = game.play(mv) {
            println!("illegal move {mv}: {error}");
            continue;
        }

        if arguments.robot && game.game_state() == GameState::Unfinished {
            respond(&mut game);
        }
    }

    println!("{}", game.display(DisplayFormat::pretty()));
}

/// Plays a uniformly random legal reply, passing only when nothing else is.
fn respond(game: &mut Game) {
    let moves = game.legal_moves();
    let real: Vec<Move> = moves.iter().copied().filter(|mv| mv.from != mv.to).collect();
    let pool = if real.is_empty() { &moves } else { &real };

    if let Some(&reply) = pool.choose(&mut rand::rng()) {
        info!("robot plays {reply}");
        if let Err(error) = game.play(reply) {
            warn!("robot reply {reply} rejected: {error}");
        }
    }
}
