//! Text protocol spoken between the dealer and a player.
//!
//! Every message is one frame of `:`-separated fields. The dealer drives
//! the exchange with a [`DealerCommand`] and, except for `status` and
//! `done`, waits for exactly one [`PlayerReply`].

use serde::{Deserialize, Serialize};
use std::{fmt, num::IntErrorKind, str::FromStr};

use super::errors::{ProtocolError, excerpt};
use crate::game::entities::{Card, Chips, join_cards};

pub const LOGIN: &str = "login";
pub const BET: &str = "bet";
pub const PLAY: &str = "play";
pub const STATUS: &str = "status";
pub const DONE: &str = "done";

const DEALER: &str = "dealer";
const YOU: &str = "you";
const DEALT: &str = "dealt";

/// Reason sent when the player's bankroll runs out.
pub const OUT_OF_CHIPS: &str = "Out of chips";

/// Reason sent when the player bets outside what the table allows.
pub const CHEATING: &str = "Cheating";

pub const ROUND_LIMIT: &str = "Round limit reached";

/// A player's move during a Blackjack turn.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Decision {
    Hit,
    Stand,
    Double,
    Split,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Hit => "hit",
            Self::Stand => "stand",
            Self::Double => "double",
            Self::Split => "split",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for Decision {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hit" => Ok(Self::Hit),
            "stand" => Ok(Self::Stand),
            "double" => Ok(Self::Double),
            "split" => Ok(Self::Split),
            _ => Err(ProtocolError::UnknownDecision(excerpt(s))),
        }
    }
}

/// Where a player says the third Acey-Deucey card will land.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum AceyCall {
    High,
    Low,
    Mid,
}

impl fmt::Display for AceyCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::High => "high",
            Self::Low => "low",
            Self::Mid => "mid",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for AceyCall {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            "mid" => Ok(Self::Mid),
            _ => Err(ProtocolError::UnknownCall(excerpt(s))),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum RoundResult {
    Win,
    Lose,
    Push,
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Win => "win",
            Self::Lose => "lose",
            Self::Push => "push",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for RoundResult {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win" => Ok(Self::Win),
            "lose" => Ok(Self::Lose),
            "push" => Ok(Self::Push),
            _ => Err(ProtocolError::UnknownResult(excerpt(s))),
        }
    }
}

/// The end-of-hand report.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum StatusReport {
    /// `dealer` is `None` when the player's hand never reached a
    /// showdown (it busted or was forfeited).
    Blackjack {
        result: RoundResult,
        dealer: Option<u8>,
        player: u8,
    },
    Acey {
        result: RoundResult,
        cards: [Card; 3],
    },
}

impl StatusReport {
    pub fn result(&self) -> RoundResult {
        match self {
            Self::Blackjack { result, .. } | Self::Acey { result, .. } => *result,
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blackjack {
                result,
                dealer: Some(dealer),
                player,
            } => write!(f, "{STATUS}:{result}:{DEALER}:{dealer}:{YOU}:{player}"),
            Self::Blackjack {
                result,
                dealer: None,
                player,
            } => write!(f, "{STATUS}:{result}:{YOU}:{player}"),
            Self::Acey { result, cards } => {
                write!(f, "{STATUS}:{result}:{}", join_cards(cards))
            }
        }
    }
}

/// A message from the dealer to the player.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum DealerCommand {
    /// Greeting; the player answers with any non-empty credential.
    Login,
    /// Asks for a Blackjack wager. `dealt` is the public history of the
    /// shoe since its last shuffle, sent only when the table shares it.
    Bet { bankroll: Chips, dealt: Vec<Card> },
    /// Asks for a Blackjack decision on `hand` against `up_card`.
    Play { up_card: Card, hand: Vec<Card> },
    /// Asks for an Acey-Deucey call and wager.
    AceyPlay {
        pot: Chips,
        stack: Chips,
        hand: [Card; 2],
        dealt: Vec<Card>,
    },
    Status(StatusReport),
    /// Ends the session; the dealer closes the connection afterwards.
    Done(String),
}

impl fmt::Display for DealerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "{LOGIN}"),
            Self::Bet { bankroll, dealt } if dealt.is_empty() => write!(f, "{BET}:{bankroll}"),
            Self::Bet { bankroll, dealt } => {
                write!(f, "{BET}:{bankroll}:{}", join_cards(dealt))
            }
            Self::Play { up_card, hand } => {
                write!(f, "{PLAY}:{DEALER}:{up_card}:{YOU}:{}", join_cards(hand))
            }
            Self::AceyPlay {
                pot,
                stack,
                hand,
                dealt,
            } => {
                write!(f, "{PLAY}:{pot}:{stack}:{}:{DEALT}", join_cards(hand))?;
                for card in dealt {
                    write!(f, ":{card}")?;
                }
                Ok(())
            }
            Self::Status(report) => report.fmt(f),
            Self::Done(reason) => write!(f, "{DONE}:{reason}"),
        }
    }
}

fn parse_number<T: FromStr>(field: &str) -> Result<T, ProtocolError> {
    field
        .trim()
        .parse()
        .map_err(|_| ProtocolError::NotANumber(excerpt(field)))
}

/// Parses a wager, clamping integers that don't fit an `i64` to its
/// bounds so they are still caught by the wager limit check.
fn parse_wager(field: &str) -> Result<i64, ProtocolError> {
    let trimmed = field.trim();
    match trimmed.parse::<i64>() {
        Ok(wager) => Ok(wager),
        Err(error) => {
            let digits = trimmed
                .strip_prefix(|c| c == '+' || c == '-')
                .unwrap_or(trimmed);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ProtocolError::NotANumber(excerpt(field)));
            }
            match error.kind() {
                IntErrorKind::PosOverflow => Ok(i64::MAX),
                IntErrorKind::NegOverflow => Ok(i64::MIN),
                _ => Err(ProtocolError::NotANumber(excerpt(field))),
            }
        }
    }
}

fn parse_cards(fields: &[&str]) -> Result<Vec<Card>, ProtocolError> {
    let cards = fields
        .iter()
        .map(|field| field.parse::<Card>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cards)
}

impl FromStr for DealerCommand {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let malformed = |kind| ProtocolError::Malformed {
            kind,
            message: excerpt(s),
        };
        match parts.as_slice() {
            [""] => Err(ProtocolError::Empty),
            [LOGIN, ..] => Ok(Self::Login),
            [BET, bankroll, dealt @ ..] => Ok(Self::Bet {
                bankroll: parse_number(bankroll)?,
                dealt: parse_cards(dealt)?,
            }),
            [PLAY, DEALER, up_card, YOU, hand @ ..] if !hand.is_empty() => Ok(Self::Play {
                up_card: up_card.parse()?,
                hand: parse_cards(hand)?,
            }),
            [PLAY, DEALER, ..] => Err(malformed(PLAY)),
            [PLAY, pot, stack, first, second, DEALT, dealt @ ..] => Ok(Self::AceyPlay {
                pot: parse_number(pot)?,
                stack: parse_number(stack)?,
                hand: [first.parse()?, second.parse()?],
                dealt: parse_cards(dealt)?,
            }),
            [PLAY, ..] => Err(malformed(PLAY)),
            [STATUS, result, DEALER, dealer, YOU, player] => {
                Ok(Self::Status(StatusReport::Blackjack {
                    result: result.parse()?,
                    dealer: Some(parse_number(dealer)?),
                    player: parse_number(player)?,
                }))
            }
            [STATUS, result, YOU, player] => Ok(Self::Status(StatusReport::Blackjack {
                result: result.parse()?,
                dealer: None,
                player: parse_number(player)?,
            })),
            [STATUS, result, first, second, third] => Ok(Self::Status(StatusReport::Acey {
                result: result.parse()?,
                cards: [first.parse()?, second.parse()?, third.parse()?],
            })),
            [STATUS, ..] => Err(malformed(STATUS)),
            [DONE, ..] => Ok(Self::Done(
                s.split_once(':').map(|(_, r)| r).unwrap_or_default().to_string(),
            )),
            [command, ..] => Err(ProtocolError::UnknownCommand(excerpt(command))),
            [] => Err(ProtocolError::Empty),
        }
    }
}

/// A message from the player to the dealer.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PlayerReply {
    Credentials(String),
    Bet(Chips),
    Decision(Decision),
    Call { call: AceyCall, wager: Chips },
}

impl fmt::Display for PlayerReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credentials(credentials) => write!(f, "{credentials}"),
            Self::Bet(wager) => write!(f, "{BET}:{wager}"),
            Self::Decision(decision) => write!(f, "{decision}"),
            Self::Call { call, wager } => write!(f, "{call}:{wager}"),
        }
    }
}

/// Reads the wager out of a `bet:<wager>` reply. The wager is signed so
/// that the dealer can tell a negative bet (cheating) from a garbled one.
///
/// # Errors
///
/// Returns an error if the reply isn't exactly `bet:<integer>`.
pub fn parse_bet_reply(reply: &str) -> Result<i64, ProtocolError> {
    match reply.split(':').collect::<Vec<_>>().as_slice() {
        [BET, wager] => parse_wager(wager),
        _ => Err(ProtocolError::Malformed {
            kind: BET,
            message: excerpt(reply),
        }),
    }
}

/// Splits a `<call>:<wager>` reply. The call is returned as sent so the
/// dealer decides what an unknown call means.
///
/// # Errors
///
/// Returns an error if the reply doesn't have exactly two fields or the
/// wager isn't an integer.
pub fn parse_call_reply(reply: &str) -> Result<(&str, i64), ProtocolError> {
    match reply.split(':').collect::<Vec<_>>().as_slice() {
        [call, wager] => Ok((*call, parse_wager(wager)?)),
        _ => Err(ProtocolError::Malformed {
            kind: PLAY,
            message: excerpt(reply),
        }),
    }
}
