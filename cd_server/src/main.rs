//! Card dealer server.
//!
//! Deals Blackjack or Acey-Deucey to every player that connects, one
//! session per connection.

mod config;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Error;
use card_dealer::{GameKind, SessionError, SessionSummary, server};
use ctrlc::set_handler;
use log::{error, info, warn};
use pico_args::Arguments;

use config::ServerConfig;

const HELP: &str = "\
Run a Blackjack or Acey-Deucey dealer

USAGE:
  cd_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env DEALER_BIND or 127.0.0.1:8080]
  --game       GAME        blackjack or acey           [default: env DEALER_GAME or blackjack]

FLAGS:
  --once                   Serve a single session, then exit
  -h, --help               Print help information

ENVIRONMENT:
  DEALER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DEALER_GAME              Game to deal
  DEALER_STARTING_STACK    Chips each player starts with  [default: 500]
  DEALER_DECKS             Decks in the shoe, 1 to 8       [default: 7]
  DEALER_SHARE_DEALT       Send dealt cards with every bet [default: false]
  DEALER_MAX_ROUNDS        End sessions after this many rounds
  DEALER_SEED              Seed every shoe for repeatable games
  DEALER_READ_TIMEOUT_SECS Drop players silent for this long
  DEALER_ONCE              Same as --once
";

struct Args {
    bind: Option<SocketAddr>,
    game: Option<GameKind>,
    once: bool,
}

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        game: pargs.opt_value_from_str("--game")?,
        once: pargs.contains("--once"),
    };
    let remaining = pargs.finish();

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    env_logger::builder().format_target(false).init();
    if !remaining.is_empty() {
        warn!("ignoring unknown arguments: {remaining:?}");
    }

    let config = ServerConfig::from_env(args.bind, args.game, args.once)?;
    config.validate()?;
    info!(
        "starting {} dealer at {} ({} decks, {} chip stacks)",
        config.game, config.bind, config.settings.decks, config.settings.starting_stack
    );

    server::run(config.bind, config.serve_config(), Arc::new(report_session))
}

fn report_session(peer: SocketAddr, result: &Result<SessionSummary, SessionError>) {
    match result {
        Ok(summary) => match serde_json::to_string(summary) {
            Ok(json) => info!("{peer} finished: {json}"),
            Err(err) => error!("{peer} finished, but the summary didn't serialize: {err}"),
        },
        Err(err) => error!("{peer} dropped: {err}"),
    }
}
