//! Acey-Deucey round rules.
//!
//! Each round the player sees two cards and bets, out of a shared pot,
//! on where a third card will land. The pot carries over between rounds.

use log::{debug, info, warn};

use super::{
    constants::{ACEY_ANTE, ACEY_HOUSE_TAX_INTERVAL},
    entities::Chips,
    errors::{SessionError, checked_wager},
    hand::AceyHand,
    session::{Phase, RoundStrategy, SessionState, send_command},
    shoe::Shoe,
};
use crate::net::{
    channel::Channel,
    messages::{AceyCall, DealerCommand, RoundResult, StatusReport, parse_call_reply},
};

#[derive(Debug, Default)]
pub struct AceyDeucey {
    pot: Chips,
}

impl AceyDeucey {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pot(&self) -> Chips {
        self.pot
    }
}

/// Whether `call` wins once the third card is in `hand`. Without a call
/// the wager can't win.
fn is_winning_call(call: Option<AceyCall>, hand: &AceyHand) -> bool {
    match call {
        Some(AceyCall::High) => hand.is_high(),
        Some(AceyCall::Low) => hand.is_low(),
        Some(AceyCall::Mid) => hand.is_mid(),
        None => false,
    }
}

impl RoundStrategy for AceyDeucey {
    fn play_round(
        &mut self,
        state: &mut SessionState,
        shoe: &mut Shoe,
        channel: &mut dyn Channel,
    ) -> Result<(), SessionError> {
        state.transition(Phase::Betting);
        if self.pot == 0 {
            let ante = ACEY_ANTE.min(state.stack);
            state.stack -= ante;
            self.pot += ante;
            debug!("round {}: ante {ante}", state.round);
            if state.stack == 0 {
                info!("round {}: the ante took the last chip", state.round);
                return Ok(());
            }
        }

        state.transition(Phase::Dealing);
        let first = shoe.deal();
        let second = shoe.deal();
        let mut hand = AceyHand::from_cards(&[first, second])?;

        state.transition(Phase::PlayerTurn);
        let play = DealerCommand::AceyPlay {
            pot: self.pot,
            stack: state.stack,
            hand: [first, second],
            dealt: shoe.dealt_cards().to_vec(),
        };
        send_command(channel, &play)?;
        let reply = channel.receive()?;
        let (call, wager) = parse_call_reply(&reply)?;
        let wager = checked_wager(wager, state.stack.min(self.pot))?;
        let call = match call.parse::<AceyCall>() {
            Ok(call) => Some(call),
            Err(error) => {
                warn!("round {}: {error}, the wager can't win", state.round);
                None
            }
        };
        state.bet = wager;
        state.stack -= wager;
        self.pot += wager;

        state.transition(Phase::Dealing);
        let third = shoe.deal();
        hand.add_card(third)?;

        state.transition(Phase::Resolution);
        let result = if is_winning_call(call, &hand) {
            let payout = wager.saturating_mul(2);
            state.stack = state.stack.saturating_add(payout);
            self.pot = self.pot.saturating_sub(payout);
            RoundResult::Win
        } else {
            let penalty = if hand.third_matches_both() {
                wager.saturating_mul(2)
            } else if hand.third_matches_one() {
                wager
            } else {
                0
            }
            .min(state.stack);
            state.stack -= penalty;
            self.pot += penalty;
            RoundResult::Lose
        };

        let report = StatusReport::Acey {
            result,
            cards: [first, second, third],
        };
        send_command(channel, &DealerCommand::Status(report))?;
        state.transition(Phase::StatusSent);
        info!(
            "round {}: {result} with {hand}, bet {wager}, pot {}, stack {}",
            state.round, self.pot, state.stack
        );

        if state.round % ACEY_HOUSE_TAX_INTERVAL == 0 && self.pot > 0 {
            self.pot -= 1;
            debug!("round {}: house takes 1 chip from the pot", state.round);
        }
        Ok(())
    }
}
