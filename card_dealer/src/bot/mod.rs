//! Automatic players.
//!
//! This module implements:
//! - `BlackjackBot`: flat-percentage wagers and a basic hit/stand chart
//! - `AceyBot`: wagers scaled by the spread and by the cards still in the shoe
//!
//! ## Example
//!
//! ```
//! use card_dealer::bot::{BlackjackBot, Bot};
//! use card_dealer::net::messages::{DealerCommand, PlayerReply};
//!
//! let mut bot = BlackjackBot::new("alice");
//! let reply = bot.respond(&DealerCommand::Bet { bankroll: 500, dealt: vec![] });
//! assert_eq!(reply, Some(PlayerReply::Bet(25)));
//! ```

pub mod acey;
pub mod blackjack;

pub use acey::AceyBot;
pub use blackjack::BlackjackBot;

use crate::net::messages::{DealerCommand, PlayerReply};

/// A player strategy that answers dealer commands.
pub trait Bot {
    /// Sent in reply to `login`.
    fn credentials(&self) -> &str;

    /// Picks a reply for a command that expects one. Returns `None` for
    /// commands this bot doesn't play, which ends its session.
    fn respond(&mut self, command: &DealerCommand) -> Option<PlayerReply>;
}
