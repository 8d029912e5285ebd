use log::debug;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use thiserror::Error;

use super::{
    constants::{DECK_SIZE, RESHUFFLE_THRESHOLD},
    entities::{Card, Rank, Suit},
};

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ShoeError {
    #[error("{0} is not left in a {1}-deck shoe")]
    NotInShoe(Card, usize),
}

/// One or more standard decks combined and dealt from the top.
///
/// Cards are stored so that the top of the shoe is the end of `cards`.
/// Everything at or after `remaining` has been dealt since the last
/// shuffle, with the most recently dealt card first, so the dealt
/// history is a slice of the shoe itself rather than a separate copy.
#[derive(Debug)]
pub struct Shoe {
    cards: Vec<Card>,
    remaining: usize,
    decks: usize,
    reshuffles: usize,
    rng: StdRng,
}

impl Shoe {
    /// Builds a shoe of `decks` standard decks (at least one) and
    /// shuffles it with `rng`.
    pub fn new(decks: usize, rng: StdRng) -> Self {
        let decks = decks.max(1);
        let mut shoe = Self {
            cards: ordered_cards(decks),
            remaining: 0,
            decks,
            reshuffles: 0,
            rng,
        };
        shoe.cards.shuffle(&mut shoe.rng);
        shoe.remaining = shoe.cards.len();
        shoe
    }

    /// A reproducible shoe; the same seed always deals the same cards.
    pub fn seeded(decks: usize, seed: u64) -> Self {
        Self::new(decks, StdRng::seed_from_u64(seed))
    }

    pub fn with_entropy(decks: usize) -> Self {
        Self::new(decks, StdRng::from_os_rng())
    }

    /// Builds a full shoe whose first deals are exactly `top`, in order,
    /// followed by the rest of the shoe. Once the shoe runs low it
    /// reshuffles like any other.
    ///
    /// # Errors
    ///
    /// Returns an error if `top` asks for more copies of a card than
    /// `decks` decks contain.
    pub fn stacked(top: &[Card], decks: usize) -> Result<Self, ShoeError> {
        let decks = decks.max(1);
        let mut rest = ordered_cards(decks);
        for card in top {
            let idx = rest
                .iter()
                .position(|c| c == card)
                .ok_or(ShoeError::NotInShoe(*card, decks))?;
            rest.remove(idx);
        }
        rest.extend(top.iter().rev());
        let remaining = rest.len();
        Ok(Self {
            cards: rest,
            remaining,
            decks,
            reshuffles: 0,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Deals the top card, reshuffling the whole shoe first if fewer than
    /// three cards are left.
    pub fn deal(&mut self) -> Card {
        if self.remaining < RESHUFFLE_THRESHOLD {
            debug!(
                "{} card(s) left in the shoe, reshuffling {} decks",
                self.remaining, self.decks
            );
            self.shuffle();
        }
        self.remaining -= 1;
        self.cards[self.remaining]
    }

    /// Fisher-Yates over every card in the shoe, dealt or not. Afterwards
    /// nothing counts as dealt.
    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
        self.remaining = self.cards.len();
        self.reshuffles += 1;
    }

    /// Cards dealt since the last shuffle, most recently dealt first.
    pub fn dealt_cards(&self) -> &[Card] {
        &self.cards[self.remaining..]
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn decks(&self) -> usize {
        self.decks
    }

    /// How many times the shoe has been shuffled since it was built.
    pub fn reshuffles(&self) -> usize {
        self.reshuffles
    }
}

fn ordered_cards(decks: usize) -> Vec<Card> {
    let mut cards = Vec::with_capacity(decks * DECK_SIZE);
    for _ in 0..decks {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
    }
    cards
}
