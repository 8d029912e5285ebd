//! Networking layer between the dealer and its players.
//!
//! Messages are `:`-separated text, framed on the wire by a two-byte
//! big-endian length prefix. The server runs blocking `std::net` sockets
//! with one thread per player.

/// Message-oriented channel trait and its TCP implementation.
pub mod channel;

/// Blocking player client driven by a bot.
pub mod client;

/// Transport and protocol errors.
pub mod errors;

/// Dealer commands and player replies.
pub mod messages;

/// Thread-per-connection dealer server.
pub mod server;

/// Length-prefixed message framing.
pub mod utils;
