//! A blocking player client.
//!
//! The client reads dealer commands one at a time and lets a [`Bot`]
//! answer them. It's used by the bots binary and as a testing utility.

use anyhow::{Context, Error, bail};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};

use super::{
    channel::{Channel, Connection},
    messages::{DealerCommand, PlayerReply, RoundResult},
};
use crate::bot::Bot;

/// Default timeout for reading from the dealer.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for writing to the dealer.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// What a player saw over one session.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerSummary {
    /// Status messages received. A split round settles more than one hand.
    pub rounds: u64,
    pub wins: u64,
    pub losses: u64,
    pub pushes: u64,
    /// The reason given in the dealer's `done` message.
    pub reason: String,
}

#[derive(Debug)]
pub struct PlayerClient<C: Channel> {
    channel: C,
}

impl PlayerClient<Connection> {
    /// Connects to a dealer with the default read and write timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the dealer can't be reached.
    pub fn connect(addr: &SocketAddr) -> Result<Self, Error> {
        let connection = Connection::connect(addr)?;
        connection.set_read_timeout(Some(READ_TIMEOUT))?;
        connection.set_write_timeout(Some(WRITE_TIMEOUT))?;
        Ok(Self::new(connection))
    }
}

impl<C: Channel> PlayerClient<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    fn reply(&mut self, reply: &PlayerReply) -> Result<(), Error> {
        self.channel.send(&reply.to_string())?;
        Ok(())
    }

    /// Plays until the dealer says `done`.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel fails, a command can't be parsed,
    /// or the bot has no answer for a command.
    pub fn play<B: Bot + ?Sized>(&mut self, bot: &mut B) -> Result<PlayerSummary, Error> {
        let mut summary = PlayerSummary::default();
        loop {
            let message = self.channel.receive()?;
            let command: DealerCommand = message
                .parse()
                .with_context(|| format!("couldn't parse dealer command `{message}`"))?;
            match command {
                DealerCommand::Login => {
                    self.reply(&PlayerReply::Credentials(bot.credentials().to_string()))?;
                }
                DealerCommand::Status(report) => {
                    summary.rounds += 1;
                    match report.result() {
                        RoundResult::Win => summary.wins += 1,
                        RoundResult::Lose => summary.losses += 1,
                        RoundResult::Push => summary.pushes += 1,
                    }
                    debug!("hand {}: {message}", summary.rounds);
                }
                DealerCommand::Done(reason) => {
                    info!(
                        "game over after {} hands ({} won, {} lost, {} pushed): {reason}",
                        summary.rounds, summary.wins, summary.losses, summary.pushes
                    );
                    self.channel.close()?;
                    summary.reason = reason;
                    return Ok(summary);
                }
                command => match bot.respond(&command) {
                    Some(reply) => self.reply(&reply)?,
                    None => {
                        self.channel.close()?;
                        bail!("bot has no answer for `{message}`");
                    }
                },
            }
        }
    }
}
