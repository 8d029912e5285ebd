//! Dealer configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use card_dealer::{
    DealerSettings, GameKind,
    constants::{DEFAULT_DECKS, DEFAULT_STARTING_STACK, MAX_DECKS},
    server::ServeConfig,
};
use std::{net::SocketAddr, str::FromStr, time::Duration};

/// Complete dealer configuration loaded from flags and environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Game dealt to every player
    pub game: GameKind,
    /// Per-session table settings
    pub settings: DealerSettings,
    /// How long to wait on a silent player, if at all
    pub read_timeout: Option<Duration>,
    /// Serve a single session and exit
    pub once: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `game_override` - Optional game override (from CLI args)
    /// * `once` - Serve a single session (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to something that can't be used
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        game_override: Option<GameKind>,
        once: bool,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), bind_override, game_override, once)
    }

    /// Same as [`ServerConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to something that can't be used
    pub fn from_lookup<F>(
        lookup: F,
        bind_override: Option<SocketAddr>,
        game_override: Option<GameKind>,
        once: bool,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_var(&lookup, "DEALER_BIND")?.unwrap_or_else(default_bind),
        };

        let game = match game_override {
            Some(game) => game,
            None => parse_var(&lookup, "DEALER_GAME")?.unwrap_or_default(),
        };

        let settings = DealerSettings {
            starting_stack: parse_var(&lookup, "DEALER_STARTING_STACK")?
                .unwrap_or(DEFAULT_STARTING_STACK),
            decks: parse_var(&lookup, "DEALER_DECKS")?.unwrap_or(DEFAULT_DECKS),
            share_dealt_cards: parse_var(&lookup, "DEALER_SHARE_DEALT")?.unwrap_or(false),
            max_rounds: parse_var(&lookup, "DEALER_MAX_ROUNDS")?,
            seed: parse_var(&lookup, "DEALER_SEED")?,
        };

        let read_timeout =
            parse_var::<u64, _>(&lookup, "DEALER_READ_TIMEOUT_SECS")?.map(Duration::from_secs);
        let once_var = parse_var(&lookup, "DEALER_ONCE")?.unwrap_or(false);

        Ok(ServerConfig {
            bind,
            game,
            settings,
            read_timeout,
            once: once || once_var,
        })
    }

    /// Validate configuration after loading
    ///
    /// # Errors
    ///
    /// Returns error naming the first setting out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.settings.starting_stack == 0 {
            return Err(ConfigError::Invalid {
                var: "DEALER_STARTING_STACK".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if !(1..=MAX_DECKS).contains(&self.settings.decks) {
            return Err(ConfigError::Invalid {
                var: "DEALER_DECKS".to_string(),
                reason: format!("Must be between 1 and {MAX_DECKS}"),
            });
        }

        if self.settings.max_rounds == Some(0) {
            return Err(ConfigError::Invalid {
                var: "DEALER_MAX_ROUNDS".to_string(),
                reason: "Must be greater than 0 (unset it for no limit)".to_string(),
            });
        }

        if self.read_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::Invalid {
                var: "DEALER_READ_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0 (unset it to wait forever)".to_string(),
            });
        }

        Ok(())
    }

    pub fn serve_config(&self) -> ServeConfig {
        ServeConfig {
            game: self.game,
            settings: self.settings.clone(),
            read_timeout: self.read_timeout,
            write_timeout: None,
            once: self.once,
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

/// Helper to parse an optional variable that must be valid when set
fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| {
            v.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                var: key.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}
