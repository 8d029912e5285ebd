use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::{
    constants::{ACEY_HAND_CAPACITY, BLACKJACK, BLACKJACK_HAND_CAPACITY},
    entities::{Card, Rank, join_cards},
};

#[derive(Debug, Error, Eq, PartialEq)]
pub enum HandError {
    #[error("hand is full ({capacity} cards)")]
    Full { capacity: usize },
}

/// Append-only, bounded run of cards with a running point total. The
/// game-specific hands decide how many points each card is worth.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Hand {
    cards: Vec<Card>,
    capacity: usize,
    total: u32,
}

impl Hand {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cards: Vec::with_capacity(capacity),
            capacity,
            total: 0,
        }
    }

    fn push(&mut self, card: Card, points: u8) -> Result<(), HandError> {
        if self.is_full() {
            return Err(HandError::Full {
                capacity: self.capacity,
            });
        }
        self.cards.push(card);
        self.total += u32::from(points);
        Ok(())
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cards.len() >= self.capacity
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_cards(&self.cards))
    }
}

/// Blackjack hand. Aces enter at 11 and are folded down to 1, one at a
/// time, as soon as the hand would otherwise go over 21. `soft_aces`
/// counts the aces still worth 11, so valuation never rescans the hand.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BlackjackHand {
    hand: Hand,
    value: u8,
    soft_aces: u8,
}

impl Default for BlackjackHand {
    fn default() -> Self {
        Self::new()
    }
}

impl BlackjackHand {
    #[must_use]
    pub fn new() -> Self {
        Self {
            hand: Hand::with_capacity(BLACKJACK_HAND_CAPACITY),
            value: 0,
            soft_aces: 0,
        }
    }

    /// Builds a hand from the given cards in order.
    ///
    /// # Errors
    ///
    /// Returns an error if there are more cards than a hand can hold.
    pub fn from_cards(cards: &[Card]) -> Result<Self, HandError> {
        let mut hand = Self::new();
        for card in cards {
            hand.add_card(*card)?;
        }
        Ok(hand)
    }

    /// # Errors
    ///
    /// Returns an error if the hand is already full.
    pub fn add_card(&mut self, card: Card) -> Result<(), HandError> {
        let points = card.rank.blackjack_points();
        self.hand.push(card, points)?;
        self.value += points;
        if card.rank == Rank::Ace {
            self.soft_aces += 1;
        }
        while self.value > BLACKJACK && self.soft_aces > 0 {
            self.value -= 10;
            self.soft_aces -= 1;
        }
        Ok(())
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// True while an ace is still counted as 11.
    pub fn is_soft(&self) -> bool {
        self.soft_aces > 0
    }

    pub fn is_bust(&self) -> bool {
        self.value > BLACKJACK
    }

    /// Natural form: exactly two cards totalling 21.
    pub fn is_blackjack(&self) -> bool {
        self.hand.len() == 2 && self.value == BLACKJACK
    }

    /// Exactly two cards of the same rank.
    pub fn is_pair(&self) -> bool {
        matches!(self.hand.cards(), [a, b] if a.rank == b.rank)
    }

    pub fn is_splittable(&self) -> bool {
        self.is_pair()
    }

    /// The first card, which is the one a dealer shows.
    pub fn up_card(&self) -> Option<Card> {
        self.hand.cards().first().copied()
    }

    pub fn cards(&self) -> &[Card] {
        self.hand.cards()
    }

    pub fn len(&self) -> usize {
        self.hand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hand.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.hand.is_full()
    }
}

impl fmt::Display for BlackjackHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.hand.fmt(f)
    }
}

/// Acey-Deucey hand: two cards that bound an interval and a third card
/// that lands inside it, outside it, or on one of its ends.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AceyHand {
    hand: Hand,
}

impl Default for AceyHand {
    fn default() -> Self {
        Self::new()
    }
}

impl AceyHand {
    #[must_use]
    pub fn new() -> Self {
        Self {
            hand: Hand::with_capacity(ACEY_HAND_CAPACITY),
        }
    }

    /// # Errors
    ///
    /// Returns an error if there are more than three cards.
    pub fn from_cards(cards: &[Card]) -> Result<Self, HandError> {
        let mut hand = Self::new();
        for card in cards {
            hand.add_card(*card)?;
        }
        Ok(hand)
    }

    /// # Errors
    ///
    /// Returns an error if the hand already holds three cards.
    pub fn add_card(&mut self, card: Card) -> Result<(), HandError> {
        self.hand.push(card, card.rank.acey_value())
    }

    /// Straight sum of the Acey values.
    pub fn value(&self) -> u32 {
        self.hand.total()
    }

    fn values(&self) -> Option<(u8, u8, u8)> {
        match self.hand.cards() {
            [a, b, c] => Some((a.rank.acey_value(), b.rank.acey_value(), c.rank.acey_value())),
            _ => None,
        }
    }

    /// Distance between the first two cards, or zero until both are dealt.
    pub fn spread(&self) -> u8 {
        match self.hand.cards() {
            [a, b, ..] => a.rank.acey_value().abs_diff(b.rank.acey_value()),
            _ => 0,
        }
    }

    /// The first two cards share a rank.
    pub fn is_pair(&self) -> bool {
        matches!(self.hand.cards(), [a, b, ..] if a.rank == b.rank)
    }

    /// On a pair, the third card ranks above it.
    pub fn is_high(&self) -> bool {
        self.values().is_some_and(|(a, b, c)| a == b && c > a)
    }

    /// On a pair, the third card ranks below it.
    pub fn is_low(&self) -> bool {
        self.values().is_some_and(|(a, b, c)| a == b && c < a)
    }

    /// The third card falls strictly between the first two. Never true on
    /// a pair, since the interval is empty.
    pub fn is_mid(&self) -> bool {
        self.values()
            .is_some_and(|(a, b, c)| a.min(b) < c && c < a.max(b))
    }

    pub fn third_matches_one(&self) -> bool {
        self.values().is_some_and(|(a, b, c)| c == a || c == b)
    }

    pub fn third_matches_both(&self) -> bool {
        self.values().is_some_and(|(a, b, c)| c == a && c == b)
    }

    pub fn cards(&self) -> &[Card] {
        self.hand.cards()
    }

    pub fn len(&self) -> usize {
        self.hand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hand.is_empty()
    }
}

impl fmt::Display for AceyHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.hand.fmt(f)
    }
}
