//! Message dispatcher - resolves commands and routes replies

use tracing::debug;

use super::parser::MessageParser;
use crate::domain::entities::{ChannelType, CommandRegistry, Invocation, MessageEvent};

/// The command prefix marking a message body as an invocation.
pub const CMD_PREFIX: char = '!';

/// An outgoing reply with its addressing already decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub to: String,
    pub body: String,
    pub channel: ChannelType,
}

/// Stateless per-event pipeline: classify, parse, resolve, execute, route.
/// The only state shared between events lives behind the handlers (the vote
/// session), never in the dispatcher itself.
pub struct Dispatcher {
    parser: MessageParser,
    direct: CommandRegistry,
    group: CommandRegistry,
}

impl Dispatcher {
    pub fn new(direct: CommandRegistry, group: CommandRegistry) -> Self {
        Self {
            parser: MessageParser::new(CMD_PREFIX),
            direct,
            group,
        }
    }

    /// Process one incoming event. `None` means no reply is sent: the body
    /// was not a command, or the command is unknown (unknown commands are
    /// silence, not errors), or the handler chose not to answer.
    pub fn dispatch(&self, event: &MessageEvent) -> Option<Reply> {
        let invocation = self.parser.parse(&event.body)?;
        let registry = self.registry_for(event.channel);
        if !registry.contains(&invocation.name) {
            debug!(command = %invocation.name, "unknown command, ignoring");
            return None;
        }
        debug!(command = %invocation.name, channel = event.channel.as_str(), "dispatching");
        let body = self.execute(registry, event, &invocation)?;
        Some(self.route(event, &invocation.name, body))
    }

    fn registry_for(&self, channel: ChannelType) -> &CommandRegistry {
        if channel.is_direct() {
            &self.direct
        } else {
            &self.group
        }
    }

    /// `help` is common infrastructure rendered from registry metadata;
    /// every other command runs its own handler.
    fn execute(
        &self,
        registry: &CommandRegistry,
        event: &MessageEvent,
        invocation: &Invocation,
    ) -> Option<String> {
        if invocation.name == "help" {
            return match invocation.args.as_slice() {
                [] => Some(registry.help_overview(self.parser.prefix())),
                [name] => registry.help_for(name),
                _ => None,
            };
        }
        registry
            .get(&invocation.name)?
            .execute(event, &invocation.args)
    }

    /// Direct replies mirror the originating sub-type back to the sender's
    /// full address. Group replies broadcast to the room's bare address,
    /// except `help`, which always goes back as a direct chat so the room
    /// is not flooded with help text.
    fn route(&self, event: &MessageEvent, command: &str, body: String) -> Reply {
        match event.channel {
            ChannelType::Normal | ChannelType::Chat => Reply {
                to: event.from.full().to_string(),
                body,
                channel: event.channel,
            },
            ChannelType::Groupchat if command == "help" => Reply {
                to: event.from.full().to_string(),
                body,
                channel: ChannelType::Chat,
            },
            ChannelType::Groupchat => Reply {
                to: event.from.bare().to_string(),
                body,
                channel: ChannelType::Groupchat,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Address, Command};

    fn dispatcher() -> Dispatcher {
        let mut direct = CommandRegistry::new();
        direct.register(Command::new("help").with_summary("Lists commands"));
        direct.register(
            Command::new("echo")
                .with_summary("Echoes its arguments")
                .with_handler(|_, args| Some(args.join(" "))),
        );

        let mut group = CommandRegistry::new();
        group.register(Command::new("help").with_summary("Lists commands"));
        group.register(
            Command::new("echo")
                .with_summary("Echoes its arguments")
                .with_handler(|_, args| Some(args.join(" "))),
        );
        group.register(
            Command::new("mute")
                .with_summary("Never answers")
                .with_handler(|_, _| None),
        );

        Dispatcher::new(direct, group)
    }

    fn direct_event(body: &str) -> MessageEvent {
        MessageEvent::new(
            ChannelType::Normal,
            Address::new("alice@example.org/desktop"),
            body,
        )
    }

    fn group_event(body: &str) -> MessageEvent {
        MessageEvent::new(
            ChannelType::Groupchat,
            Address::new("room@conference.example.org/alice"),
            body,
        )
    }

    #[test]
    fn non_command_bodies_are_ignored() {
        let d = dispatcher();
        assert!(d.dispatch(&direct_event("just chatting")).is_none());
        assert!(d.dispatch(&group_event("echo no prefix")).is_none());
        // A leading space disqualifies the body as a command.
        assert!(d.dispatch(&direct_event(" !echo hi")).is_none());
    }

    #[test]
    fn unknown_command_is_silent_in_both_channels() {
        let d = dispatcher();
        assert!(d.dispatch(&direct_event("!bogus")).is_none());
        assert!(d.dispatch(&group_event("!bogus")).is_none());
    }

    #[test]
    fn direct_reply_mirrors_sub_type_to_full_address() {
        let d = dispatcher();
        let reply = d.dispatch(&direct_event("!echo hi")).unwrap();
        assert_eq!(reply.to, "alice@example.org/desktop");
        assert_eq!(reply.body, "hi");
        assert_eq!(reply.channel, ChannelType::Normal);

        let chat = MessageEvent::new(
            ChannelType::Chat,
            Address::new("alice@example.org/desktop"),
            "!echo hi",
        );
        assert_eq!(d.dispatch(&chat).unwrap().channel, ChannelType::Chat);
    }

    #[test]
    fn group_reply_broadcasts_to_bare_room_address() {
        let d = dispatcher();
        let reply = d.dispatch(&group_event("!echo hi all")).unwrap();
        assert_eq!(reply.to, "room@conference.example.org");
        assert_eq!(reply.channel, ChannelType::Groupchat);
    }

    #[test]
    fn help_from_group_routes_as_direct_chat() {
        let d = dispatcher();
        let reply = d.dispatch(&group_event("!help")).unwrap();
        assert_eq!(reply.to, "room@conference.example.org/alice");
        assert_eq!(reply.channel, ChannelType::Chat);
        assert!(reply.body.contains("Available commands:"));
    }

    #[test]
    fn help_with_one_known_argument_returns_extended_help() {
        let d = dispatcher();
        let reply = d.dispatch(&group_event("!help echo")).unwrap();
        assert!(reply.body.contains("Echoes its arguments"));
    }

    #[test]
    fn help_with_unknown_or_extra_arguments_is_silent() {
        let d = dispatcher();
        assert!(d.dispatch(&group_event("!help bogus")).is_none());
        assert!(d.dispatch(&group_event("!help echo mute")).is_none());
    }

    #[test]
    fn handler_returning_none_sends_nothing() {
        let d = dispatcher();
        assert!(d.dispatch(&group_event("!mute")).is_none());
    }

    #[test]
    fn group_only_commands_are_invisible_in_direct_chat() {
        let d = dispatcher();
        assert!(d.dispatch(&direct_event("!mute")).is_none());
    }

    #[test]
    fn bare_prefix_fails_resolution_silently() {
        let d = dispatcher();
        assert!(d.dispatch(&group_event("!")).is_none());
    }
}
