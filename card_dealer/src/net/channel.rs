//! Message-oriented duplex channel between the dealer and a player.

use anyhow::{Error, bail};
use log::debug;
use std::{
    net::{Shutdown, SocketAddr, TcpStream},
    thread,
    time::Duration,
};

use super::{errors::ChannelError, utils};

/// Whole text messages in, whole text messages out, in order.
///
/// The session engine only talks through this trait, so the transport can
/// be a socket or anything else that preserves message boundaries.
pub trait Channel {
    /// Sends one message to the peer.
    fn send(&mut self, message: &str) -> Result<(), ChannelError>;

    /// Blocks until one full message from the peer is available.
    fn receive(&mut self) -> Result<String, ChannelError>;

    /// Releases the transport. Closing twice is a no-op.
    fn close(&mut self) -> Result<(), ChannelError>;
}

/// A [`Channel`] over a TCP stream using length-prefixed framing.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    closed: bool,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            closed: false,
        }
    }

    /// Connects to a dealer.
    ///
    /// This method attempts to connect three times with decreasing
    /// timeouts (1s, 500ms, 100ms), sleeping for the attempt's timeout
    /// after each failure.
    ///
    /// # Errors
    ///
    /// Returns an error if every attempt fails.
    pub fn connect(addr: &SocketAddr) -> Result<Self, Error> {
        let mut connect_timeouts = vec![
            Duration::from_millis(100),
            Duration::from_millis(500),
            Duration::from_secs(1),
        ];
        while let Some(connect_timeout) = connect_timeouts.pop() {
            match TcpStream::connect_timeout(addr, connect_timeout) {
                Ok(stream) => return Ok(Self::new(stream)),
                Err(error) => {
                    debug!("couldn't connect to {addr}: {error}");
                    thread::sleep(connect_timeout);
                }
            }
        }
        bail!("couldn't connect to {addr}")
    }

    /// `None` waits forever, which is the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket rejects the timeout (e.g. zero).
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<(), ChannelError> {
        self.stream.set_read_timeout(timeout)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the socket rejects the timeout (e.g. zero).
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<(), ChannelError> {
        self.stream.set_write_timeout(timeout)?;
        Ok(())
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.stream.peer_addr().ok()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Channel for Connection {
    fn send(&mut self, message: &str) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::AlreadyClosed);
        }
        debug!("-> {message}");
        utils::write_prefixed(&mut self.stream, message).map_err(ChannelError::from_io)
    }

    fn receive(&mut self) -> Result<String, ChannelError> {
        if self.closed {
            return Err(ChannelError::AlreadyClosed);
        }
        let message = utils::read_prefixed(&mut self.stream).map_err(ChannelError::from_io)?;
        debug!("<- {message}");
        Ok(message)
    }

    fn close(&mut self) -> Result<(), ChannelError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        match self.stream.shutdown(Shutdown::Both) {
            // The peer hanging up first still leaves us closed.
            Err(error) if error.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            result => Ok(result?),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{net::TcpListener, time::Duration};

    use super::*;

    fn setup() -> (Connection, Connection) {
        let server = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();
        let client = Connection::connect(&addr).unwrap();
        let (stream, _) = server.accept().unwrap();
        (client, Connection::new(stream))
    }

    #[test]
    fn test_send_and_receive() {
        let (mut player, mut dealer) = setup();
        dealer.send("login").unwrap();
        assert_eq!(player.receive().unwrap(), "login");
        player.send("alice:secret").unwrap();
        assert_eq!(dealer.receive().unwrap(), "alice:secret");
    }

    #[test]
    fn test_close_is_idempotent() {
        let (_player, mut dealer) = setup();
        assert!(dealer.close().is_ok());
        assert!(dealer.close().is_ok());
        assert!(dealer.is_closed());
        assert!(matches!(dealer.send("done"), Err(ChannelError::AlreadyClosed)));
    }

    #[test]
    fn test_receive_after_peer_closes() {
        let (mut player, mut dealer) = setup();
        dealer.send("done:Out of chips").unwrap();
        dealer.close().unwrap();
        assert_eq!(player.receive().unwrap(), "done:Out of chips");
        assert!(matches!(player.receive(), Err(ChannelError::Closed)));
    }

    #[test]
    fn test_read_timeout() {
        let (_player, mut dealer) = setup();
        dealer
            .set_read_timeout(Some(Duration::from_millis(50)))
            .unwrap();
        assert!(matches!(dealer.receive(), Err(ChannelError::TimedOut)));
    }

    #[test]
    fn test_connect_fails_without_listener() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        assert!(Connection::connect(&addr).is_err());
    }
}
