use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::{ChannelType, MessageEvent};

/// Transport trait - abstraction over the chat protocol stack.
///
/// The core only needs four primitives from the wire: connect, join the
/// room, receive the next message event, send a message. Everything else
/// (presence, roster, reconnects) stays inside the adapter.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Authenticate and open the session.
    async fn connect(&self, jid: &str, secret: &str) -> Result<(), BotError>;

    /// Join the multi-user room under the given nickname.
    async fn join_room(&self, room: &str, nick: &str) -> Result<(), BotError>;

    /// Next message event, or `None` once the stream is closed. Messages
    /// of unrecognized stanza types are dropped by the adapter and never
    /// surface here.
    async fn recv(&self) -> Result<Option<MessageEvent>, BotError>;

    /// Deliver a message body to a full or bare address under the given
    /// channel type.
    async fn send(&self, to: &str, body: &str, channel: ChannelType) -> Result<(), BotError>;
}
