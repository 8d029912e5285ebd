/// Property-based tests for the shoe and hand valuation using proptest
///
/// These tests check the counting invariants the dealer relies on across
/// randomly generated shoes and hands.
use card_dealer::{
    Card, Rank, Shoe, Suit,
    constants::{BLACKJACK, BLACKJACK_HAND_CAPACITY, DECK_SIZE, MAX_DECKS, RESHUFFLE_THRESHOLD},
    game::hand::{AceyHand, BlackjackHand},
};
use proptest::prelude::*;
use std::collections::HashMap;

// Strategy to generate any card
fn card_strategy() -> impl Strategy<Value = Card> {
    (0usize..13, 0usize..4).prop_map(|(rank, suit)| Card::new(Rank::ALL[rank], Suit::ALL[suit]))
}

// Strategy to generate a blackjack hand's worth of cards
fn blackjack_cards_strategy() -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec(card_strategy(), 1..=BLACKJACK_HAND_CAPACITY)
}

// Points with every ace counted as one
fn hard_total(cards: &[Card]) -> u32 {
    cards
        .iter()
        .map(|card| match card.rank {
            Rank::Ace => 1,
            rank => u32::from(rank.blackjack_points()),
        })
        .sum()
}

proptest! {
    #[test]
    fn test_shoe_deals_every_card_once_per_deck(decks in 1usize..=MAX_DECKS, seed: u64) {
        let mut shoe = Shoe::seeded(decks, seed);
        // Dealing stops short of the reshuffle point, so this is one pass.
        let deals = decks * DECK_SIZE - RESHUFFLE_THRESHOLD + 1;
        let mut counts: HashMap<Card, usize> = HashMap::new();
        for _ in 0..deals {
            *counts.entry(shoe.deal()).or_default() += 1;
        }
        prop_assert_eq!(shoe.reshuffles(), 0);
        prop_assert!(counts.values().all(|&count| count <= decks));
        prop_assert_eq!(shoe.dealt_cards().len(), deals);
        prop_assert_eq!(shoe.remaining() + deals, decks * DECK_SIZE);
    }

    #[test]
    fn test_shoe_reshuffles_when_low(decks in 1usize..=3, seed: u64, extra in 1usize..60) {
        let mut shoe = Shoe::seeded(decks, seed);
        for _ in 0..decks * DECK_SIZE + extra {
            shoe.deal();
        }
        prop_assert!(shoe.reshuffles() >= 1);
        prop_assert_eq!(shoe.len(), decks * DECK_SIZE);
        prop_assert!(shoe.remaining() < decks * DECK_SIZE);
    }

    #[test]
    fn test_same_seed_deals_same_cards(seed: u64) {
        let mut a = Shoe::seeded(2, seed);
        let mut b = Shoe::seeded(2, seed);
        for _ in 0..30 {
            prop_assert_eq!(a.deal(), b.deal());
        }
    }

    #[test]
    fn test_dealt_cards_are_most_recent_first(seed: u64, n in 1usize..40) {
        let mut shoe = Shoe::seeded(1, seed);
        let dealt: Vec<Card> = (0..n).map(|_| shoe.deal()).collect();
        let reversed: Vec<Card> = dealt.into_iter().rev().collect();
        prop_assert_eq!(shoe.dealt_cards(), reversed.as_slice());
    }

    #[test]
    fn test_stacked_shoe_deals_top_first(top in prop::collection::vec(card_strategy(), 0..20)) {
        let mut shoe = Shoe::stacked(&top, MAX_DECKS).unwrap();
        for card in &top {
            prop_assert_eq!(shoe.deal(), *card);
        }
    }

    #[test]
    fn test_blackjack_value_adjusts_aces(cards in blackjack_cards_strategy()) {
        let hand = BlackjackHand::from_cards(&cards).unwrap();
        let hard = hard_total(&cards);
        let value = u32::from(hand.value());
        // The value is the hard total, plus ten if an ace can stay high.
        if hand.is_soft() {
            prop_assert_eq!(value, hard + 10);
            prop_assert!(value <= u32::from(BLACKJACK));
        } else {
            prop_assert_eq!(value, hard);
        }
        prop_assert_eq!(hand.is_bust(), hard > u32::from(BLACKJACK));
    }

    #[test]
    fn test_blackjack_value_is_order_independent(mut cards in blackjack_cards_strategy()) {
        let forward = BlackjackHand::from_cards(&cards).unwrap();
        cards.reverse();
        let backward = BlackjackHand::from_cards(&cards).unwrap();
        prop_assert_eq!(forward.value(), backward.value());
        prop_assert_eq!(forward.is_soft(), backward.is_soft());
    }

    #[test]
    fn test_blackjack_natural_needs_two_cards(cards in blackjack_cards_strategy()) {
        let hand = BlackjackHand::from_cards(&cards).unwrap();
        if hand.is_blackjack() {
            prop_assert_eq!(cards.len(), 2);
            prop_assert!(cards.iter().any(|card| card.rank == Rank::Ace));
        }
    }

    #[test]
    fn test_acey_outcomes_are_exclusive(a in card_strategy(), b in card_strategy(), c in card_strategy()) {
        let hand = AceyHand::from_cards(&[a, b, c]).unwrap();
        let outcomes = [hand.is_mid(), hand.is_high(), hand.is_low(), hand.third_matches_one()];
        prop_assert!(outcomes.iter().filter(|&&hit| hit).count() <= 1);
        if hand.is_pair() {
            prop_assert!(!hand.is_mid());
            prop_assert_eq!(hand.spread(), 0);
        }
    }
}
