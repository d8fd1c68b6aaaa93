//! Console adapter for development/testing
//!
//! Stands in for the wire protocol stack: reads message events from stdin
//! and prints outgoing messages. A line of the form `@nick text` arrives as
//! a groupchat message from that room occupant; `type: text` arrives as a
//! direct message of that stanza type (unrecognized types are dropped, as
//! on the wire); any other line arrives as a direct chat from a fixed
//! local user.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::info;

use crate::application::errors::BotError;
use crate::domain::entities::{Address, ChannelType, MessageEvent};
use crate::domain::traits::Transport;

const CONSOLE_USER: &str = "user@localhost/console";

pub struct ConsoleAdapter {
    room: String,
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleAdapter {
    pub fn new(room: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    fn parse_line(&self, line: &str) -> Option<MessageEvent> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if let Some(rest) = line.strip_prefix('@') {
            let (nick, body) = rest.split_once(char::is_whitespace)?;
            return Some(MessageEvent::new(
                ChannelType::Groupchat,
                Address::new(format!("{}/{}", self.room, nick)),
                body.trim(),
            ));
        }
        if let Some((stanza, body)) = line.split_once(':') {
            if !stanza.is_empty() && stanza.chars().all(|c| c.is_ascii_lowercase()) {
                let channel = ChannelType::from_stanza_type(stanza)?;
                return Some(MessageEvent::new(
                    channel,
                    Address::new(CONSOLE_USER),
                    body.trim_start(),
                ));
            }
        }
        Some(MessageEvent::new(
            ChannelType::Chat,
            Address::new(CONSOLE_USER),
            line,
        ))
    }
}

#[async_trait]
impl Transport for ConsoleAdapter {
    async fn connect(&self, jid: &str, _secret: &str) -> Result<(), BotError> {
        info!("console transport ready, authentication skipped for {}", jid);
        Ok(())
    }

    async fn join_room(&self, room: &str, nick: &str) -> Result<(), BotError> {
        info!("pretending to join {} as {}", room, nick);
        Ok(())
    }

    async fn recv(&self) -> Result<Option<MessageEvent>, BotError> {
        let mut lines = self.lines.lock().await;
        loop {
            match lines
                .next_line()
                .await
                .map_err(|e| BotError::Transport(e.to_string()))?
            {
                Some(line) => {
                    if let Some(event) = self.parse_line(&line) {
                        return Ok(Some(event));
                    }
                }
                None => return Ok(None),
            }
        }
    }

    async fn send(&self, to: &str, body: &str, channel: ChannelType) -> Result<(), BotError> {
        println!("[bot -> {} ({})] {}", to, channel.as_str(), body);
        Ok(())
    }
}
