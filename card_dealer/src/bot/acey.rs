//! Acey-Deucey bot that counts the shoe.
//!
//! The call follows from the first two cards: `mid` on a spread, `high` or
//! `low` on a pair. The wager is a fraction of the stack that grows with
//! the spread and with the share of winning ranks still undealt.

use super::Bot;
use crate::{
    game::{
        constants::{DECK_SIZE, DEFAULT_DECKS},
        entities::{Card, Chips, Rank},
    },
    net::messages::{AceyCall, DealerCommand, PlayerReply},
};

/// Pairs summing above this are called `low`, the rest `high`.
const PAIR_LOW_THRESHOLD: u8 = 16;

/// Base confidence on a pair.
const PAIR_CONFIDENCE: f64 = 0.3;

const PAIR_RISK: f64 = 3.0;

const SPREAD_RISK: f64 = 2.0;

/// Spreads up to this wide aren't worth more than a zero wager.
const NARROW_SPREAD: u8 = 4;

#[derive(Debug)]
pub struct AceyBot {
    name: String,
    decks: usize,
}

impl AceyBot {
    pub fn new(name: &str) -> Self {
        Self::with_decks(name, DEFAULT_DECKS)
    }

    /// A bot that assumes the dealer shuffles `decks` decks together.
    pub fn with_decks(name: &str, decks: usize) -> Self {
        Self {
            name: name.to_string(),
            decks: decks.max(1),
        }
    }

    /// Undealt cards whose rank wins `call` against the first two cards.
    fn favorable_cards(&self, call: AceyCall, hand: [Card; 2], dealt: &[Card]) -> usize {
        let (first, second) = (hand[0].rank.acey_value(), hand[1].rank.acey_value());
        let (lower, higher) = (first.min(second), first.max(second));
        let per_rank = 4 * self.decks;
        Rank::ALL
            .iter()
            .map(|rank| rank.acey_value())
            .filter(|&value| value != first && value != second)
            .filter(|&value| match call {
                AceyCall::Mid => lower < value && value < higher,
                AceyCall::High => value > higher,
                AceyCall::Low => value < lower,
            })
            .map(|value| {
                let seen = dealt
                    .iter()
                    .filter(|card| card.rank.acey_value() == value)
                    .count();
                per_rank.saturating_sub(seen)
            })
            .sum()
    }

    /// Picks the call and wager for one Acey-Deucey hand.
    pub fn decide(
        &self,
        pot: Chips,
        stack: Chips,
        hand: [Card; 2],
        dealt: &[Card],
    ) -> (AceyCall, Chips) {
        let (first, second) = (hand[0].rank.acey_value(), hand[1].rank.acey_value());
        let spread = first.abs_diff(second);
        let (call, confidence, risk) = if spread == 0 {
            let call = if first + second > PAIR_LOW_THRESHOLD {
                AceyCall::Low
            } else {
                AceyCall::High
            };
            (call, PAIR_CONFIDENCE, PAIR_RISK)
        } else if spread <= NARROW_SPREAD {
            (AceyCall::Mid, 0.0, SPREAD_RISK)
        } else {
            (AceyCall::Mid, 1.0 - 1.0 / f64::from(spread), SPREAD_RISK)
        };

        let remaining = (DECK_SIZE * self.decks).saturating_sub(dealt.len());
        let win_chance = if remaining == 0 {
            0.0
        } else {
            self.favorable_cards(call, hand, dealt) as f64 / remaining as f64
        };
        let fraction = (confidence * win_chance / risk).clamp(0.0, 1.0);
        // Truncation toward zero is the intended rounding.
        let wager = (f64::from(stack) * fraction) as Chips;
        (call, wager.min(pot).min(stack))
    }
}

impl Bot for AceyBot {
    fn credentials(&self) -> &str {
        &self.name
    }

    fn respond(&mut self, command: &DealerCommand) -> Option<PlayerReply> {
        match command {
            DealerCommand::Login => Some(PlayerReply::Credentials(self.name.clone())),
            DealerCommand::AceyPlay {
                pot,
                stack,
                hand,
                dealt,
            } => {
                let (call, wager) = self.decide(*pot, *stack, *hand, dealt);
                Some(PlayerReply::Call { call, wager })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::cards;

    fn hand(tokens: [&str; 2]) -> [Card; 2] {
        [tokens[0].parse().unwrap(), tokens[1].parse().unwrap()]
    }

    #[test]
    fn test_favorable_cards_fresh_shoe() {
        let bot = AceyBot::new("bot");
        // 3 and J leave 4 through 10: seven ranks of 28 cards.
        assert_eq!(bot.favorable_cards(AceyCall::Mid, hand(["3H", "JS"]), &[]), 196);
        // Above a pair of 8s: 9 through A, six ranks.
        assert_eq!(bot.favorable_cards(AceyCall::High, hand(["8H", "8S"]), &[]), 168);
        // Below a pair of 8s: 2 through 7.
        assert_eq!(bot.favorable_cards(AceyCall::Low, hand(["8H", "8S"]), &[]), 168);
    }

    #[test]
    fn test_favorable_cards_counts_dealt() {
        let bot = AceyBot::new("bot");
        let dealt = cards(&["5C", "5D", "KS", "3H", "JS"]);
        assert_eq!(
            bot.favorable_cards(AceyCall::Mid, hand(["3H", "JS"]), &dealt),
            194
        );
    }

    #[test]
    fn test_narrow_spread_bets_nothing() {
        let bot = AceyBot::new("bot");
        assert_eq!(
            bot.decide(10, 500, hand(["5H", "8S"]), &[]),
            (AceyCall::Mid, 0)
        );
    }

    #[test]
    fn test_wide_spread_bets() {
        let bot = AceyBot::new("bot");
        // Spread 12: confidence 11/12, 11 ranks of 28 out of 364, risk 2.
        let (call, wager) = bot.decide(1000, 500, hand(["2H", "AS"]), &[]);
        assert_eq!(call, AceyCall::Mid);
        assert_eq!(wager, 193);
    }

    #[test]
    fn test_wager_capped_at_pot() {
        let bot = AceyBot::new("bot");
        let (_, wager) = bot.decide(3, 500, hand(["2H", "AS"]), &[]);
        assert_eq!(wager, 3);
    }

    #[test]
    fn test_pair_calls() {
        let bot = AceyBot::new("bot");
        assert_eq!(bot.decide(10, 500, hand(["9H", "9S"]), &[]).0, AceyCall::Low);
        assert_eq!(bot.decide(10, 500, hand(["8H", "8S"]), &[]).0, AceyCall::High);
    }

    #[test]
    fn test_respond() {
        let mut bot = AceyBot::new("bob");
        let play = DealerCommand::AceyPlay {
            pot: 1,
            stack: 499,
            hand: hand(["2H", "AS"]),
            dealt: cards(&["AS", "2H"]),
        };
        assert_eq!(
            bot.respond(&play),
            Some(PlayerReply::Call {
                call: AceyCall::Mid,
                wager: 1
            })
        );
        assert_eq!(
            bot.respond(&DealerCommand::Login),
            Some(PlayerReply::Credentials("bob".to_string()))
        );
    }
}
