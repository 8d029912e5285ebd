//! Blackjack bot with a fixed wager fraction and a simple decision chart.

use super::Bot;
use crate::{
    game::{
        constants::DEALER_STANDS_ON,
        entities::{Card, Chips, Rank},
        hand::BlackjackHand,
    },
    net::messages::{DealerCommand, Decision, PlayerReply},
};

/// Share of the bankroll wagered each round, in percent.
const WAGER_PERCENT: Chips = 5;

/// Hard totals the bot doubles on with two cards.
const DOUBLE_RANGE: std::ops::RangeInclusive<u8> = 9..=11;

/// Dealer up cards at or above this value make the bot keep hitting.
const STRONG_UP_CARD: u8 = 7;

#[derive(Debug)]
pub struct BlackjackBot {
    name: String,
    bankroll: Chips,
    wager: Chips,
    /// Chips the bot has put at risk this round, counting doubles and
    /// splits.
    committed: Chips,
}

impl BlackjackBot {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bankroll: 0,
            wager: 0,
            committed: 0,
        }
    }

    /// Five percent of the bankroll, at least one chip.
    pub fn wager_for(bankroll: Chips) -> Chips {
        (bankroll / 100 * WAGER_PERCENT + bankroll % 100 * WAGER_PERCENT / 100)
            .max(1)
            .min(bankroll)
    }

    fn can_cover_another_wager(&self) -> bool {
        self.bankroll.saturating_sub(self.committed) >= self.wager
    }

    /// Chooses a move for `hand` against the dealer's `up_card`.
    pub fn decide(&mut self, up_card: Card, hand: &[Card]) -> Decision {
        let Ok(hand) = BlackjackHand::from_cards(hand) else {
            return Decision::Stand;
        };
        if hand.is_splittable() && self.can_cover_another_wager() {
            self.committed += self.wager;
            return Decision::Split;
        }
        if hand.len() == 2
            && DOUBLE_RANGE.contains(&hand.value())
            && self.can_cover_another_wager()
        {
            self.committed += self.wager;
            return Decision::Double;
        }
        let up_value = up_card.rank.blackjack_points();
        let dealer_strong = up_value >= STRONG_UP_CARD || up_card.rank == Rank::Ace;
        if hand.value() < DEALER_STANDS_ON && dealer_strong && !hand.is_full() {
            Decision::Hit
        } else {
            Decision::Stand
        }
    }
}

impl Bot for BlackjackBot {
    fn credentials(&self) -> &str {
        &self.name
    }

    fn respond(&mut self, command: &DealerCommand) -> Option<PlayerReply> {
        match command {
            DealerCommand::Login => Some(PlayerReply::Credentials(self.name.clone())),
            DealerCommand::Bet { bankroll, .. } => {
                self.bankroll = *bankroll;
                self.wager = Self::wager_for(*bankroll);
                self.committed = self.wager;
                Some(PlayerReply::Bet(self.wager))
            }
            DealerCommand::Play { up_card, hand } => {
                Some(PlayerReply::Decision(self.decide(*up_card, hand)))
            }
            _ => None,
        }
    }
}
