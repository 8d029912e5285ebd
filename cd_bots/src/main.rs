//! Player bots for the card dealer.
//!
//! Connects to a dealer, plays one session with a Blackjack or
//! Acey-Deucey bot, and logs how it went.

use std::net::SocketAddr;

use anyhow::{Error, bail};
use card_dealer::{
    GameKind, PlayerClient,
    bot::{AceyBot, BlackjackBot, Bot},
    constants::DEFAULT_DECKS,
};
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;

const HELP: &str = "\
Play a card dealer session with a bot

USAGE:
  cd_bots [OPTIONS]

OPTIONS:
  --connect    IP:PORT     Dealer socket connection address  [default: 127.0.0.1:8080]
  --game       GAME        blackjack or acey                 [default: blackjack]
  --name       NAME        Name sent at login                [default: bot]
  --decks      N           Decks the dealer shuffles, for card counting  [default: 7]
  --sessions   N           Sessions to play back to back     [default: 1]

FLAGS:
  -h, --help               Print help information
";

struct Args {
    connect: SocketAddr,
    game: GameKind,
    name: String,
    decks: usize,
    sessions: usize,
}

fn main() -> Result<(), Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        connect: pargs
            .opt_value_from_str("--connect")?
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080))),
        game: pargs.opt_value_from_str("--game")?.unwrap_or_default(),
        name: pargs
            .opt_value_from_str("--name")?
            .unwrap_or_else(|| "bot".to_string()),
        decks: pargs.opt_value_from_str("--decks")?.unwrap_or(DEFAULT_DECKS),
        sessions: pargs.opt_value_from_str("--sessions")?.unwrap_or(1),
    };
    if args.name.is_empty() || args.name.contains(':') {
        bail!("name `{}` can't be empty or contain `:`", args.name);
    }

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    env_logger::builder().format_target(false).init();

    for session in 1..=args.sessions {
        let mut bot: Box<dyn Bot> = match args.game {
            GameKind::Blackjack => Box::new(BlackjackBot::new(&args.name)),
            GameKind::AceyDeucey => Box::new(AceyBot::with_decks(&args.name, args.decks)),
        };
        info!("{} joining {} at {}", args.name, args.game, args.connect);
        let mut client = PlayerClient::connect(&args.connect)?;
        let summary = client.play(bot.as_mut())?;
        info!(
            "session {session}: {} hands, {} won, {} lost, {} pushed ({})",
            summary.rounds, summary.wins, summary.losses, summary.pushes, summary.reason
        );
    }

    Ok(())
}
