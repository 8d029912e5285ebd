//! In-memory doubles shared by the unit tests.

use std::collections::VecDeque;

use crate::net::{channel::Channel, errors::ChannelError};

/// Answers every `receive` with the next scripted reply and records every
/// message sent. Running out of replies looks like the peer hanging up.
#[derive(Debug, Default)]
pub struct ScriptedChannel {
    replies: VecDeque<String>,
    sent: Vec<String>,
    closed: bool,
}

impl ScriptedChannel {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(ToString::to_string).collect(),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn unread(&self) -> usize {
        self.replies.len()
    }
}

impl Channel for ScriptedChannel {
    fn send(&mut self, message: &str) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::AlreadyClosed);
        }
        self.sent.push(message.to_string());
        Ok(())
    }

    fn receive(&mut self) -> Result<String, ChannelError> {
        if self.closed {
            return Err(ChannelError::AlreadyClosed);
        }
        self.replies.pop_front().ok_or(ChannelError::Closed)
    }

    fn close(&mut self) -> Result<(), ChannelError> {
        self.closed = true;
        Ok(())
    }
}

/// Parses card tokens, panicking on a typo in the test.
pub fn cards(tokens: &[&str]) -> Vec<crate::game::entities::Card> {
    tokens.iter().map(|token| token.parse().unwrap()).collect()
}
