use thiserror::Error;

use super::{entities::Chips, hand::HandError};
use crate::net::errors::{ChannelError, ProtocolError};

/// Why a session stopped before the player ran out of chips.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The transport failed. Nothing more can be sent to the player.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("wager {wager} outside 0..={limit}")]
    Cheating { wager: i64, limit: Chips },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Hand(#[from] HandError),
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("unknown game `{0}`, expected `blackjack` or `acey`")]
pub struct UnknownGameError(pub String);

/// Checks a wager read off the wire against the most the player may stake.
///
/// # Errors
///
/// Returns [`SessionError::Cheating`] if the wager is negative or above
/// `limit`.
pub fn checked_wager(wager: i64, limit: Chips) -> Result<Chips, SessionError> {
    match Chips::try_from(wager) {
        Ok(chips) if chips <= limit => Ok(chips),
        _ => Err(SessionError::Cheating { wager, limit }),
    }
}
