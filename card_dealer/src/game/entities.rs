use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::net::errors::excerpt;

/// Type alias for whole chips. Bankrolls, pots, and wagers are all
/// whole chips; nobody is splitting a chip at this table.
pub type Chips = u32;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Clubs, Suit::Diamonds];

    /// One-letter token used on the wire.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Spades => "S",
            Self::Hearts => "H",
            Self::Clubs => "C",
            Self::Diamonds => "D",
        }
    }

    fn from_symbol(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|suit| suit.symbol().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
        }
    }

    /// Blackjack points before any soft/hard adjustment: faces are
    /// worth 10 and an ace starts out as 11.
    pub const fn blackjack_points(self) -> u8 {
        match self {
            Self::Jack | Self::Queen | Self::King => 10,
            Self::Ace => 11,
            _ => self.acey_value(),
        }
    }

    /// Linear ranking used by Acey-Deucey, deuce low (2) through ace
    /// high (14).
    pub const fn acey_value(self) -> u8 {
        self as u8 + 2
    }

    fn from_symbol(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|rank| rank.symbol().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("invalid card `{0}`")]
pub struct CardParseError(pub String);

/// One playing card. Cards are plain values; the shoe hands out copies.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    /// Parses a wire token: the rank symbol immediately followed by a
    /// single suit letter, e.g. `10H`, `AS`, `7d`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if !token.is_ascii() || !(2..=3).contains(&token.len()) {
            return Err(CardParseError(excerpt(s)));
        }
        let (rank, suit) = token.split_at(token.len() - 1);
        match (Rank::from_symbol(rank), Suit::from_symbol(suit)) {
            (Some(rank), Some(suit)) => Ok(Self { rank, suit }),
            _ => Err(CardParseError(s.to_string())),
        }
    }
}

/// Joins cards with `:` the way they're laid out in wire messages.
pub fn join_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(":")
}
