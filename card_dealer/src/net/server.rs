//! Dealer TCP server.
//!
//! Every accepted connection gets its own thread and its own [`Session`],
//! so no two players ever share a shoe or a stack.

use anyhow::{Context, Error};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::{
    io, iter,
    net::{SocketAddr, TcpListener, TcpStream},
    sync::Arc,
    thread,
    time::Duration,
};

use super::channel::Connection;
use crate::game::{
    errors::SessionError,
    session::{DealerSettings, GameKind, Session, SessionSummary},
};

/// Pause after a failed accept so a persistent failure (e.g. out of file
/// descriptors) doesn't spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// How the server sets up each session.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ServeConfig {
    pub game: GameKind,
    pub settings: DealerSettings,
    /// `None` waits on a silent player forever.
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
    /// Serve one session on the calling thread, then return.
    pub once: bool,
}

/// Called with the outcome of every session.
pub type SessionReport = dyn Fn(SocketAddr, &Result<SessionSummary, SessionError>) + Send + Sync;

/// Runs one session on `stream`.
///
/// # Errors
///
/// Returns an error if the socket can't be configured or the session's
/// channel fails.
pub fn handle_connection(
    stream: TcpStream,
    config: &ServeConfig,
) -> Result<SessionSummary, SessionError> {
    let connection = Connection::new(stream);
    connection.set_read_timeout(config.read_timeout)?;
    connection.set_write_timeout(config.write_timeout)?;
    let game = config.game.new_game(&config.settings);
    Session::new(connection, game, &config.settings).run()
}

/// Binds `addr` and serves sessions on it.
///
/// # Errors
///
/// Returns an error if the address can't be bound or accepting fails.
pub fn run(
    addr: SocketAddr,
    config: ServeConfig,
    report: Arc<SessionReport>,
) -> Result<(), Error> {
    let listener = TcpListener::bind(addr).with_context(|| format!("couldn't bind {addr}"))?;
    serve(listener, config, report)
}

/// Accepts players on `listener` forever, or until one session is done
/// if the config says so. A failed accept is logged and skipped.
///
/// # Errors
///
/// Returns an error if the listener has no local address.
pub fn serve(
    listener: TcpListener,
    config: ServeConfig,
    report: Arc<SessionReport>,
) -> Result<(), Error> {
    info!(
        "dealing {} on {}",
        config.game,
        listener.local_addr().context("listener has no address")?
    );
    let incoming = iter::from_fn(|| Some(listener.accept()));
    serve_incoming(incoming, config, report);
    Ok(())
}

/// The accept loop behind [`serve`]. Returns once `incoming` runs dry or
/// a `once` session is over.
fn serve_incoming<I>(incoming: I, config: ServeConfig, report: Arc<SessionReport>)
where
    I: Iterator<Item = io::Result<(TcpStream, SocketAddr)>>,
{
    let config = Arc::new(config);
    for accepted in incoming {
        let (stream, peer) = match accepted {
            Ok(accepted) => accepted,
            Err(accept_error) => {
                warn!("couldn't accept a player: {accept_error}");
                thread::sleep(ACCEPT_BACKOFF);
                continue;
            }
        };
        info!("{peer} connected");
        if config.once {
            let result = handle_connection(stream, &config);
            report(peer, &result);
            return;
        }

        let config = Arc::clone(&config);
        let report = Arc::clone(&report);
        let spawned = thread::Builder::new()
            .name(format!("session-{peer}"))
            .spawn(move || {
                let result = handle_connection(stream, &config);
                report(peer, &result);
            });
        if let Err(spawn_error) = spawned {
            error!("couldn't start a session for {peer}: {spawn_error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::{
        bot::BlackjackBot,
        game::session::Ending,
        net::{channel::Channel, client::PlayerClient},
    };

    #[test]
    fn test_serve_once() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let config = ServeConfig {
            settings: DealerSettings {
                max_rounds: Some(3),
                seed: Some(11),
                ..Default::default()
            },
            once: true,
            ..Default::default()
        };
        let (report, rx) = reporter();
        let server = thread::spawn(move || serve(listener, config, report));

        let mut client = PlayerClient::connect(&addr).unwrap();
        let summary = client.play(&mut BlackjackBot::new("alice")).unwrap();
        assert_eq!(summary.reason, "Round limit reached");

        assert!(server.join().unwrap().is_ok());
        let dealer_summary = rx.recv().unwrap().unwrap();
        assert_eq!(dealer_summary.ending, Ending::RoundLimit);
        assert_eq!(dealer_summary.rounds, 3);
    }

    fn reporter() -> (Arc<SessionReport>, mpsc::Receiver<Result<SessionSummary, String>>) {
        let (tx, rx) = mpsc::channel();
        let report: Arc<SessionReport> =
            Arc::new(move |_: SocketAddr, result: &Result<SessionSummary, SessionError>| {
                let outcome = result.as_ref().map(SessionSummary::clone);
                tx.send(outcome.map_err(|error| error.to_string())).unwrap();
            });
        (report, rx)
    }

    #[test]
    fn test_failed_accept_keeps_serving() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let config = ServeConfig {
            settings: DealerSettings {
                max_rounds: Some(1),
                seed: Some(5),
                ..Default::default()
            },
            once: true,
            ..Default::default()
        };
        let (report, rx) = reporter();
        let server = thread::spawn(move || {
            let aborted = io::Error::from(io::ErrorKind::ConnectionAborted);
            let incoming = iter::once(Err(aborted)).chain(iter::from_fn(|| Some(listener.accept())));
            serve_incoming(incoming, config, report);
        });

        let mut client = PlayerClient::connect(&addr).unwrap();
        let summary = client.play(&mut BlackjackBot::new("alice")).unwrap();
        assert_eq!(summary.reason, "Round limit reached");

        server.join().unwrap();
        assert_eq!(rx.recv().unwrap().unwrap().ending, Ending::RoundLimit);
    }

    #[test]
    fn test_read_timeout_abandons_session() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let config = ServeConfig {
            read_timeout: Some(Duration::from_millis(50)),
            ..Default::default()
        };
        let accept = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            handle_connection(stream, &config)
        });

        let mut player = Connection::connect(&addr).unwrap();
        assert_eq!(player.receive().unwrap(), "login");
        // Never answer.
        let result = accept.join().unwrap();
        assert!(matches!(result, Err(SessionError::Channel(_))));
    }
}
