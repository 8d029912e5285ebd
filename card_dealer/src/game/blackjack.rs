//! Blackjack round rules.

use log::{debug, info, warn};
use std::collections::VecDeque;

use super::{
    constants::DEALER_STANDS_ON,
    entities::{Card, Chips},
    errors::{SessionError, checked_wager},
    hand::BlackjackHand,
    session::{Phase, RoundStrategy, SessionState, send_command},
    shoe::Shoe,
};
use crate::net::{
    channel::Channel,
    messages::{DealerCommand, Decision, RoundResult, StatusReport, parse_bet_reply},
};

/// A player hand still waiting for its turn.
#[derive(Debug)]
struct PendingHand {
    hand: BlackjackHand,
    wager: Chips,
    /// Split hands never count as a natural.
    from_split: bool,
}

/// How the player's turn on one hand finished.
#[derive(Debug, Eq, PartialEq)]
enum TurnEnd {
    Stood,
    Bust,
    Split,
    Forfeit(String),
}

/// Everything dealt in one round that outlives a single player hand.
struct Table<'a> {
    shoe: &'a mut Shoe,
    channel: &'a mut dyn Channel,
    up_card: Card,
    dealer: BlackjackHand,
    pending: VecDeque<PendingHand>,
    /// Sum of wagers on hands that haven't been settled yet.
    exposure: Chips,
}

#[derive(Debug, Default)]
pub struct Blackjack {
    share_dealt_cards: bool,
}

impl Blackjack {
    #[must_use]
    pub fn new(share_dealt_cards: bool) -> Self {
        Self { share_dealt_cards }
    }

    fn take_bet(
        &self,
        state: &mut SessionState,
        shoe: &Shoe,
        channel: &mut dyn Channel,
    ) -> Result<Chips, SessionError> {
        state.transition(Phase::Betting);
        let dealt = if self.share_dealt_cards {
            shoe.dealt_cards().to_vec()
        } else {
            Vec::new()
        };
        let bet = DealerCommand::Bet {
            bankroll: state.stack,
            dealt,
        };
        send_command(channel, &bet)?;
        let wager = checked_wager(parse_bet_reply(&channel.receive()?)?, state.stack)?;
        debug!("round {}: bet {wager}", state.round);
        state.bet = wager;
        Ok(wager)
    }
}

impl RoundStrategy for Blackjack {
    fn play_round(
        &mut self,
        state: &mut SessionState,
        shoe: &mut Shoe,
        channel: &mut dyn Channel,
    ) -> Result<(), SessionError> {
        let wager = self.take_bet(state, shoe, channel)?;

        state.transition(Phase::Dealing);
        let player = BlackjackHand::from_cards(&[shoe.deal(), shoe.deal()])?;
        let up_card = shoe.deal();
        let dealer = BlackjackHand::from_cards(&[up_card, shoe.deal()])?;
        debug!(
            "round {}: player {player} ({}), dealer shows {up_card}",
            state.round,
            player.value()
        );

        let mut table = Table {
            shoe,
            channel,
            up_card,
            dealer,
            pending: VecDeque::from([PendingHand {
                hand: player,
                wager,
                from_split: false,
            }]),
            exposure: wager,
        };
        while let Some(mut current) = table.pending.pop_front() {
            state.transition(Phase::PlayerTurn);
            let end = table.player_turn(&mut current, state)?;
            table.settle(current, end, state)?;
        }
        Ok(())
    }
}

impl Table<'_> {
    /// Asks for decisions on one hand until it stands, busts, splits or
    /// is forfeited.
    fn player_turn(
        &mut self,
        current: &mut PendingHand,
        state: &SessionState,
    ) -> Result<TurnEnd, SessionError> {
        loop {
            if current.hand.is_bust() {
                return Ok(TurnEnd::Bust);
            }
            let play = DealerCommand::Play {
                up_card: self.up_card,
                hand: current.hand.cards().to_vec(),
            };
            send_command(self.channel, &play)?;
            let reply = self.channel.receive()?;
            let decision = match reply.parse::<Decision>() {
                Ok(decision) => decision,
                Err(error) => return Ok(TurnEnd::Forfeit(error.to_string())),
            };
            // What the bankroll can still cover beyond the wagers in play.
            let free = state.stack.saturating_sub(self.exposure);
            match decision {
                Decision::Hit if current.hand.is_full() => {
                    return Ok(TurnEnd::Forfeit("can't hit a full hand".to_string()));
                }
                Decision::Hit => current.hand.add_card(self.shoe.deal())?,
                Decision::Stand => return Ok(TurnEnd::Stood),
                Decision::Double if current.hand.len() == 2 && free >= current.wager => {
                    self.exposure += current.wager;
                    current.wager *= 2;
                    current.hand.add_card(self.shoe.deal())?;
                    return Ok(if current.hand.is_bust() {
                        TurnEnd::Bust
                    } else {
                        TurnEnd::Stood
                    });
                }
                Decision::Split if current.hand.is_splittable() && free >= current.wager => {
                    self.exposure += current.wager;
                    let mut split_hands = Vec::with_capacity(2);
                    for &card in current.hand.cards() {
                        split_hands.push(PendingHand {
                            hand: BlackjackHand::from_cards(&[card, self.shoe.deal()])?,
                            wager: current.wager,
                            from_split: true,
                        });
                    }
                    // Both halves play before anything already pending.
                    for split_hand in split_hands.into_iter().rev() {
                        self.pending.push_front(split_hand);
                    }
                    return Ok(TurnEnd::Split);
                }
                Decision::Double | Decision::Split => {
                    return Ok(TurnEnd::Forfeit(format!("can't {decision} now")));
                }
            }
        }
    }

    /// Runs the dealer turn if needed, pays out and sends the status.
    fn settle(
        &mut self,
        current: PendingHand,
        end: TurnEnd,
        state: &mut SessionState,
    ) -> Result<(), SessionError> {
        let PendingHand {
            hand,
            wager,
            from_split,
        } = current;
        if end == TurnEnd::Split {
            // The wager now rides on the first split hand.
            return Ok(());
        }
        state.bet = wager;

        let showdown = match end {
            TurnEnd::Forfeit(reason) => {
                warn!(
                    "round {}: player forfeits {hand} on `{reason}`",
                    state.round
                );
                false
            }
            TurnEnd::Bust => false,
            TurnEnd::Stood | TurnEnd::Split => true,
        };
        if showdown {
            state.transition(Phase::DealerTurn);
            while self.dealer.value() < DEALER_STANDS_ON && !self.dealer.is_full() {
                self.dealer.add_card(self.shoe.deal())?;
            }
        }

        state.transition(Phase::Resolution);
        let result = if showdown {
            resolve(&hand, from_split, &self.dealer)
        } else {
            RoundResult::Lose
        };
        match result {
            RoundResult::Win if !from_split && hand.is_blackjack() => {
                state.stack = state.stack.saturating_add(wager + wager / 2);
            }
            RoundResult::Win => state.stack = state.stack.saturating_add(wager),
            RoundResult::Lose => state.stack = state.stack.saturating_sub(wager),
            RoundResult::Push => {}
        }
        self.exposure -= wager;

        let report = StatusReport::Blackjack {
            result,
            dealer: showdown.then(|| self.dealer.value()),
            player: hand.value(),
        };
        send_command(self.channel, &DealerCommand::Status(report))?;
        state.transition(Phase::StatusSent);
        info!(
            "round {}: {result} with {hand} ({}) against {} ({}), bet {wager}, stack {}",
            state.round,
            hand.value(),
            self.dealer,
            self.dealer.value(),
            state.stack
        );
        Ok(())
    }
}

/// Compares a standing player hand with the dealer's finished hand.
fn resolve(player: &BlackjackHand, from_split: bool, dealer: &BlackjackHand) -> RoundResult {
    if player.is_bust() {
        RoundResult::Lose
    } else if !from_split && player.is_blackjack() && !dealer.is_blackjack() {
        RoundResult::Win
    } else if dealer.is_bust() || player.value() > dealer.value() {
        RoundResult::Win
    } else if player.value() < dealer.value() {
        RoundResult::Lose
    } else {
        RoundResult::Push
    }
}
