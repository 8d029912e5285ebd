//! Network error types for the channel and the text protocol.

use std::io;
use thiserror::Error;

/// Transport failures. Any of these ends a session.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("connection closed by peer")]
    Closed,

    #[error("timed out waiting for the peer")]
    TimedOut,

    #[error("channel already closed")]
    AlreadyClosed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ChannelError {
    /// Maps an I/O error from a read or write onto the failure it means
    /// for the session.
    pub fn from_io(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => Self::Closed,
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::TimedOut,
            _ => Self::Io(error),
        }
    }
}

/// Longest piece of peer text quoted back in a [`ProtocolError`].
pub const MAX_EXCERPT_CHARS: usize = 64;

/// Cuts peer text down to [`MAX_EXCERPT_CHARS`] characters so that an
/// error quoting it still fits in a `done` frame.
pub fn excerpt(text: &str) -> String {
    match text.char_indices().nth(MAX_EXCERPT_CHARS) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

/// A peer message that couldn't be understood.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ProtocolError {
    #[error("empty message")]
    Empty,

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("malformed {kind} message `{message}`")]
    Malformed { kind: &'static str, message: String },

    #[error("`{0}` is not a number")]
    NotANumber(String),

    #[error(transparent)]
    Card(#[from] crate::game::entities::CardParseError),

    #[error("unknown decision `{0}`")]
    UnknownDecision(String),

    #[error("unknown call `{0}`")]
    UnknownCall(String),

    #[error("unknown result `{0}`")]
    UnknownResult(String),
}
