use chrono::{DateTime, Utc};
use std::fmt;

/// Logical channel a message arrived on, derived from the transport's
/// stanza type. `Normal` and `Chat` are both one-to-one conversations;
/// `Groupchat` is the shared room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    Normal,
    Chat,
    Groupchat,
}

impl ChannelType {
    /// Map a stanza type string to a channel. Anything else (error,
    /// headline, ...) yields `None` and the message is dropped silently.
    pub fn from_stanza_type(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(ChannelType::Normal),
            "chat" => Some(ChannelType::Chat),
            "groupchat" => Some(ChannelType::Groupchat),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChannelType::Normal => "normal",
            ChannelType::Chat => "chat",
            ChannelType::Groupchat => "groupchat",
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, ChannelType::Normal | ChannelType::Chat)
    }
}

/// A full protocol address of the form `local@host/resource`.
///
/// For room occupants the resource part is the display nickname, which is
/// the identity key the voting subsystem uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    full: String,
}

impl Address {
    pub fn new(full: impl Into<String>) -> Self {
        Self { full: full.into() }
    }

    pub fn full(&self) -> &str {
        &self.full
    }

    /// Address without the resource part.
    pub fn bare(&self) -> &str {
        match self.full.split_once('/') {
            Some((bare, _)) => bare,
            None => &self.full,
        }
    }

    pub fn resource(&self) -> Option<&str> {
        self.full.split_once('/').map(|(_, r)| r)
    }

    /// Display identity: the resource when present, the bare address
    /// otherwise.
    pub fn nickname(&self) -> &str {
        self.resource().unwrap_or_else(|| self.bare())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full)
    }
}

/// An incoming message as delivered by the transport. Consumed once per
/// dispatch, never stored.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub channel: ChannelType,
    pub from: Address,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

impl MessageEvent {
    pub fn new(channel: ChannelType, from: Address, body: impl Into<String>) -> Self {
        Self {
            channel,
            from,
            body: body.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A parsed command invocation: first token with the prefix stripped plus
/// the remaining whitespace-split tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_parts() {
        let addr = Address::new("room@conference.example.org/alice");
        assert_eq!(addr.bare(), "room@conference.example.org");
        assert_eq!(addr.resource(), Some("alice"));
        assert_eq!(addr.nickname(), "alice");
    }

    #[test]
    fn address_without_resource() {
        let addr = Address::new("bob@example.org");
        assert_eq!(addr.bare(), "bob@example.org");
        assert_eq!(addr.resource(), None);
        assert_eq!(addr.nickname(), "bob@example.org");
    }

    #[test]
    fn channel_from_stanza_type() {
        assert_eq!(
            ChannelType::from_stanza_type("chat"),
            Some(ChannelType::Chat)
        );
        assert_eq!(
            ChannelType::from_stanza_type("groupchat"),
            Some(ChannelType::Groupchat)
        );
        assert_eq!(ChannelType::from_stanza_type("headline"), None);
        assert_eq!(ChannelType::from_stanza_type("error"), None);
    }

    #[test]
    fn events_carry_their_arrival_time() {
        let before = Utc::now();
        let event = MessageEvent::new(ChannelType::Chat, Address::new("a@b/c"), "!help");
        assert!(event.timestamp >= before);
        assert!(event.timestamp <= Utc::now());
    }

    #[test]
    fn direct_channels() {
        assert!(ChannelType::Normal.is_direct());
        assert!(ChannelType::Chat.is_direct());
        assert!(!ChannelType::Groupchat.is_direct());
    }
}
