//! Dealer session engine.
//!
//! A session greets one player, then plays rounds of a single game until
//! the player is out of chips (or a configured round limit is hit), and
//! finally says `done` and closes the channel. How a round is played is
//! left to a [`RoundStrategy`]; the engine owns the channel lifecycle and
//! the round loop.

use enum_dispatch::enum_dispatch;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{
    acey::AceyDeucey,
    blackjack::Blackjack,
    constants::{DEFAULT_DECKS, DEFAULT_STARTING_STACK},
    entities::Chips,
    errors::{SessionError, UnknownGameError},
    shoe::Shoe,
};
use crate::net::{
    channel::Channel,
    errors::{ChannelError, ProtocolError, excerpt},
    messages::{CHEATING, DealerCommand, LOGIN, OUT_OF_CHIPS, ROUND_LIMIT},
};

/// Where the session currently is.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Phase {
    AwaitingGreeting,
    RoundStart,
    Betting,
    Dealing,
    PlayerTurn,
    DealerTurn,
    Resolution,
    StatusSent,
    SessionDone,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::AwaitingGreeting => "awaiting greeting",
            Self::RoundStart => "round start",
            Self::Betting => "betting",
            Self::Dealing => "dealing",
            Self::PlayerTurn => "player turn",
            Self::DealerTurn => "dealer turn",
            Self::Resolution => "resolution",
            Self::StatusSent => "status sent",
            Self::SessionDone => "session done",
        };
        write!(f, "{repr}")
    }
}

/// Mutable state of one session, handed to every round step.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SessionState {
    pub stack: Chips,
    /// Rounds started so far; the first round is round 1.
    pub round: u64,
    /// The wager most recently in play.
    pub bet: Chips,
    phase: Phase,
}

impl SessionState {
    #[must_use]
    pub fn new(stack: Chips) -> Self {
        Self {
            stack,
            round: 0,
            bet: 0,
            phase: Phase::AwaitingGreeting,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn transition(&mut self, phase: Phase) {
        debug!("round {}: {} -> {}", self.round, self.phase, phase);
        self.phase = phase;
    }
}

/// Table settings shared by every session a dealer runs.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DealerSettings {
    pub starting_stack: Chips,
    pub decks: usize,
    /// Send the shoe's dealt-card history with every Blackjack `bet`.
    pub share_dealt_cards: bool,
    pub max_rounds: Option<u64>,
    /// Fixed shoe seed for reproducible sessions.
    pub seed: Option<u64>,
}

impl Default for DealerSettings {
    fn default() -> Self {
        Self {
            starting_stack: DEFAULT_STARTING_STACK,
            decks: DEFAULT_DECKS,
            share_dealt_cards: false,
            max_rounds: None,
            seed: None,
        }
    }
}

impl DealerSettings {
    /// A freshly shuffled shoe for one session.
    #[must_use]
    pub fn new_shoe(&self) -> Shoe {
        match self.seed {
            Some(seed) => Shoe::seeded(self.decks, seed),
            None => Shoe::with_entropy(self.decks),
        }
    }
}

/// Plays one round of a game.
#[enum_dispatch]
pub trait RoundStrategy {
    /// Runs one round from the bet through the status message.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel fails or the player's reply can't
    /// be accepted. Either ends the session.
    fn play_round(
        &mut self,
        state: &mut SessionState,
        shoe: &mut Shoe,
        channel: &mut dyn Channel,
    ) -> Result<(), SessionError>;
}

/// The games a dealer can run.
#[enum_dispatch(RoundStrategy)]
#[derive(Debug)]
pub enum Game {
    Blackjack(Blackjack),
    AceyDeucey(AceyDeucey),
}

impl Game {
    pub fn kind(&self) -> GameKind {
        match self {
            Self::Blackjack(_) => GameKind::Blackjack,
            Self::AceyDeucey(_) => GameKind::AceyDeucey,
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}

/// Names a [`Game`] without carrying any round state, so one kind can
/// start a fresh game for every session.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum GameKind {
    #[default]
    Blackjack,
    AceyDeucey,
}

impl GameKind {
    #[must_use]
    pub fn new_game(self, settings: &DealerSettings) -> Game {
        match self {
            Self::Blackjack => Blackjack::new(settings.share_dealt_cards).into(),
            Self::AceyDeucey => AceyDeucey::new().into(),
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Blackjack => "blackjack",
            Self::AceyDeucey => "acey",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for GameKind {
    type Err = UnknownGameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blackjack" | "bj" => Ok(Self::Blackjack),
            "acey" | "acey-deucey" | "aceydeucey" => Ok(Self::AceyDeucey),
            _ => Err(UnknownGameError(s.to_string())),
        }
    }
}

/// How a session that didn't lose its channel came to an end.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Ending {
    OutOfChips,
    RoundLimit,
    Cheating,
    InvalidInput(String),
}

impl Ending {
    /// The text sent to the player in the `done` message.
    pub fn reason(&self) -> &str {
        match self {
            Self::OutOfChips => OUT_OF_CHIPS,
            Self::RoundLimit => ROUND_LIMIT,
            Self::Cheating => CHEATING,
            Self::InvalidInput(reason) => reason,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SessionSummary {
    pub game: GameKind,
    pub rounds: u64,
    pub final_stack: Chips,
    pub ending: Ending,
}

pub(crate) fn send_command(
    channel: &mut dyn Channel,
    command: &DealerCommand,
) -> Result<(), ChannelError> {
    channel.send(&command.to_string())
}

/// One dealer talking to one player.
#[derive(Debug)]
pub struct Session<C: Channel> {
    channel: C,
    game: Game,
    shoe: Shoe,
    state: SessionState,
    max_rounds: Option<u64>,
}

impl<C: Channel> Session<C> {
    pub fn new(channel: C, game: Game, settings: &DealerSettings) -> Self {
        Self {
            channel,
            game,
            shoe: settings.new_shoe(),
            state: SessionState::new(settings.starting_stack),
            max_rounds: settings.max_rounds,
        }
    }

    /// Replaces the shoe, e.g. with a [`Shoe::stacked`] one.
    #[must_use]
    pub fn with_shoe(mut self, shoe: Shoe) -> Self {
        self.shoe = shoe;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Plays the session to the end.
    ///
    /// Running out of chips, hitting the round limit, cheating and invalid
    /// replies all end the session normally with a `done` message. The
    /// only error is a broken channel, after which nothing more is sent.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Channel`] if the transport fails.
    pub fn run(&mut self) -> Result<SessionSummary, SessionError> {
        info!(
            "starting {} session with {} chips",
            self.game, self.state.stack
        );
        let ending = match self.play() {
            Ok(ending) => ending,
            Err(SessionError::Channel(error)) => return Err(self.abandon(error)),
            Err(error @ SessionError::Cheating { .. }) => {
                warn!("round {}: cheating detected: {error}", self.state.round);
                Ending::Cheating
            }
            Err(error) => {
                warn!("round {}: invalid input: {error}", self.state.round);
                Ending::InvalidInput(error.to_string())
            }
        };

        self.state.transition(Phase::SessionDone);
        let done = DealerCommand::Done(ending.reason().to_string());
        if let Err(error) = send_command(&mut self.channel, &done) {
            return Err(self.abandon(error));
        }
        if let Err(error) = self.channel.close() {
            return Err(self.abandon(error));
        }

        let summary = SessionSummary {
            game: self.game.kind(),
            rounds: self.state.round,
            final_stack: self.state.stack,
            ending,
        };
        info!(
            "session over after {} rounds with {} chips: {}",
            summary.rounds,
            summary.final_stack,
            summary.ending.reason()
        );
        Ok(summary)
    }

    fn play(&mut self) -> Result<Ending, SessionError> {
        self.greet()?;
        loop {
            self.state.transition(Phase::RoundStart);
            if self.state.stack == 0 {
                return Ok(Ending::OutOfChips);
            }
            if self.max_rounds.is_some_and(|max| self.state.round >= max) {
                return Ok(Ending::RoundLimit);
            }
            self.state.round += 1;
            debug!("round {}: stack {}", self.state.round, self.state.stack);
            self.game
                .play_round(&mut self.state, &mut self.shoe, &mut self.channel)?;
        }
    }

    fn greet(&mut self) -> Result<(), SessionError> {
        send_command(&mut self.channel, &DealerCommand::Login)?;
        let credentials = self.channel.receive()?;
        if credentials.trim().is_empty() {
            return Err(ProtocolError::Malformed {
                kind: LOGIN,
                message: excerpt(&credentials),
            }
            .into());
        }
        // Credentials may carry a password after the first field.
        let name = credentials.split(':').next().unwrap_or_default();
        info!("player `{name}` logged in");
        Ok(())
    }

    fn abandon(&mut self, error: ChannelError) -> SessionError {
        error!("round {}: session abandoned: {error}", self.state.round);
        if let Err(close_error) = self.channel.close() {
            debug!("close after failure: {close_error}");
        }
        self.state.transition(Phase::SessionDone);
        error.into()
    }
}
