//! # Card Dealer
//!
//! A dealer for one-on-one card games played over a length-prefixed TCP
//! text protocol. The dealer greets a player, then plays rounds of
//! Blackjack or Acey-Deucey until the player runs out of chips.
//!
//! ## Architecture
//!
//! A session moves through a small set of phases:
//!
//! - **AwaitingGreeting**: `login` sent, waiting for credentials
//! - **RoundStart**: checking the stack and the round limit
//! - **Betting / Dealing**: taking the wager and dealing from the shoe
//! - **PlayerTurn / DealerTurn**: decisions, then the dealer's draw
//! - **Resolution / StatusSent**: paying out and reporting the hand
//! - **SessionDone**: `done` sent and the channel closed
//!
//! The engine owns the channel and the round loop. Each game implements
//! [`game::RoundStrategy`], dispatched statically over [`game::Game`] with
//! `enum_dispatch`.
//!
//! ## Core Modules
//!
//! - [`game`]: cards, shoe, hands, the session engine and round rules
//! - [`net`]: framing, channel, wire messages, server and client
//! - [`bot`]: automatic players
//!
//! ## Example
//!
//! ```
//! use card_dealer::{DealerSettings, Shoe};
//!
//! let settings = DealerSettings::default();
//! let mut shoe = Shoe::seeded(settings.decks, 42);
//! let card = shoe.deal();
//! assert_eq!(shoe.dealt_cards(), [card]);
//! ```

/// Automatic players.
pub mod bot;

/// Networking components for dealer-player communication.
pub mod net;
pub use net::{
    channel::{Channel, Connection},
    client::{PlayerClient, PlayerSummary},
    messages, server, utils,
};

/// Core game logic, entities, and the session state machine.
pub mod game;
pub use game::{
    DealerSettings, Ending, Game, GameKind, Session, SessionError, SessionSummary, Shoe,
    constants,
    entities::{self, Card, Chips, Rank, Suit},
};

#[cfg(test)]
pub(crate) mod testing;

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct ReadmeDoctests;
