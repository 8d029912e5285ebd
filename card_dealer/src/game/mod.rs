//! Card game engine.
//!
//! This module provides the dealer side of a session:
//! - Cards, the shoe, and game-specific hand valuation
//! - The session state machine and its round strategies
//! - Blackjack and Acey-Deucey round rules

pub mod acey;
pub mod blackjack;
pub mod constants;
pub mod entities;
pub mod errors;
pub mod hand;
pub mod session;
pub mod shoe;

pub use acey::AceyDeucey;
pub use blackjack::Blackjack;
pub use errors::SessionError;
pub use session::{
    DealerSettings, Ending, Game, GameKind, Phase, RoundStrategy, Session, SessionState,
    SessionSummary,
};
pub use shoe::Shoe;
