use super::entities::Chips;

/// Number of cards in one standard deck.
pub const DECK_SIZE: usize = 52;

/// Decks combined into a shoe unless configured otherwise.
pub const DEFAULT_DECKS: usize = 7;

/// Upper bound on configurable decks.
pub const MAX_DECKS: usize = 8;

/// The shoe is reshuffled before a deal that would start with fewer
/// than this many cards left.
pub const RESHUFFLE_THRESHOLD: usize = 3;

pub const DEFAULT_STARTING_STACK: Chips = 500;

/// Most cards a Blackjack hand can hold.
pub const BLACKJACK_HAND_CAPACITY: usize = 11;

pub const ACEY_HAND_CAPACITY: usize = 3;

pub const BLACKJACK: u8 = 21;

/// The dealer stands once its hand reaches this value.
pub const DEALER_STANDS_ON: u8 = 17;

pub const ACEY_ANTE: Chips = 1;

/// Every this many rounds the house takes a chip from a non-empty pot.
pub const ACEY_HOUSE_TAX_INTERVAL: u64 = 20;
