//! Command registration - builds the direct and group command registries.
//!
//! Membership is nothing more than which commands were registered into
//! which registry: the group set is a superset of the direct set by
//! convention of this deployment, not by structure.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::application::voting::VoteSession;
use crate::domain::entities::{Command, CommandRegistry};
use crate::infrastructure::fetchers::Fetchers;
use crate::infrastructure::templates::TemplateStore;

/// Shared collaborators the handlers close over.
#[derive(Clone)]
pub struct HandlerContext {
    pub fetchers: Arc<Fetchers>,
    pub templates: Arc<TemplateStore>,
    pub votes: Arc<Mutex<VoteSession>>,
}

/// Commands usable in one-to-one conversation.
pub fn direct_registry(ctx: &HandlerContext) -> CommandRegistry {
    let mut reg = CommandRegistry::new();
    register_common(&mut reg, ctx);
    reg
}

/// Commands usable inside the room: the common set plus voting and the
/// social commands.
pub fn group_registry(ctx: &HandlerContext) -> CommandRegistry {
    let mut reg = CommandRegistry::new();
    register_common(&mut reg, ctx);
    reg.register(vote_start_command(&ctx.votes));
    reg.register(vote_up_command(&ctx.votes));
    reg.register(vote_down_command(&ctx.votes));
    reg.register(vote_stat_command(&ctx.votes));
    reg.register(vote_end_command(&ctx.votes));
    reg.register(slap_command(&ctx.templates));
    reg.register(meal_command());
    reg.register(hug_command());
    reg.register(kiss_command());
    reg
}

fn register_common(reg: &mut CommandRegistry, ctx: &HandlerContext) {
    reg.register(help_command());
    reg.register(chuck_command(&ctx.fetchers));
    reg.register(surl_command(&ctx.fetchers));
    reg.register(wiki_command(&ctx.fetchers));
    reg.register(taunt_command(&ctx.templates));
}

// Vote operations cannot panic while holding the lock, so a poisoned
// mutex still carries consistent state and is safe to recover.
fn lock(votes: &Mutex<VoteSession>) -> MutexGuard<'_, VoteSession> {
    votes.lock().unwrap_or_else(PoisonError::into_inner)
}

fn help_command() -> Command {
    // Rendered by the dispatcher from registry metadata; no handler here.
    Command::new("help").with_summary("Returns a help string containing all commands")
}

fn chuck_command(fetchers: &Arc<Fetchers>) -> Command {
    let fetchers = Arc::clone(fetchers);
    Command::new("chuck")
        .with_summary("Displays a random Chuck Norris joke from http://icndb.com")
        .with_help(
            "You can optionally change the name of the main character by appending \
             him as arguments: chuck <firstname> <lastname>",
        )
        .with_handler(move |_, args| Some(fetchers.joke(args)))
}

fn surl_command(fetchers: &Arc<Fetchers>) -> Command {
    let fetchers = Arc::clone(fetchers);
    Command::new("surl")
        .with_summary("Shorten a URL with the configured URL shortener")
        .with_help("surl http://myurl.com")
        .with_handler(move |_, args| {
            if args.is_empty() {
                return Some("You must provide a URL to shorten".to_string());
            }
            Some(fetchers.shorten(&args.join(" ")))
        })
}

fn wiki_command(fetchers: &Arc<Fetchers>) -> Command {
    let fetchers = Arc::clone(fetchers);
    Command::new("wiki")
        .with_summary("Displays a random page from the german Wikipedia")
        .with_help("You can display today's featured article: wiki today")
        .with_handler(move |_, args| Some(fetchers.wiki(args)))
}

fn taunt_command(templates: &Arc<TemplateStore>) -> Command {
    let templates = Arc::clone(templates);
    Command::new("taunt")
        .with_summary("Taunts the given user")
        .with_handler(move |_, args| {
            let possessive = if args.is_empty() {
                "Your".to_string()
            } else {
                format!("{}'s", args.join(" "))
            };
            templates.taunt(&possessive)
        })
}

fn vote_start_command(votes: &Arc<Mutex<VoteSession>>) -> Command {
    let votes = Arc::clone(votes);
    Command::new("vstart")
        .with_summary("Starts a voting")
        .with_help("You have to provide a subject: vstart <subject>")
        .with_handler(move |_, args| {
            let result = lock(&votes).start(&args.join(" "));
            Some(result.unwrap_or_else(|e| e.to_string()))
        })
}

fn vote_up_command(votes: &Arc<Mutex<VoteSession>>) -> Command {
    let votes = Arc::clone(votes);
    Command::new("vup")
        .with_summary("Vote up for the current voting")
        .with_handler(move |event, _| {
            let result = lock(&votes).vote_up(event.from.nickname());
            Some(result.unwrap_or_else(|e| e.to_string()))
        })
}

fn vote_down_command(votes: &Arc<Mutex<VoteSession>>) -> Command {
    let votes = Arc::clone(votes);
    Command::new("vdown")
        .with_summary("Vote down for the current voting")
        .with_handler(move |event, _| {
            let result = lock(&votes).vote_down(event.from.nickname());
            Some(result.unwrap_or_else(|e| e.to_string()))
        })
}

fn vote_stat_command(votes: &Arc<Mutex<VoteSession>>) -> Command {
    let votes = Arc::clone(votes);
    Command::new("vstat")
        .with_summary("Displays statistics for the current voting")
        .with_handler(move |_, _| Some(lock(&votes).stat().unwrap_or_else(|e| e.to_string())))
}

fn vote_end_command(votes: &Arc<Mutex<VoteSession>>) -> Command {
    let votes = Arc::clone(votes);
    Command::new("vend")
        .with_summary("Ends the current voting and shows the result")
        .with_handler(move |_, _| Some(lock(&votes).end().unwrap_or_else(|e| e.to_string())))
}

fn slap_command(templates: &Arc<TemplateStore>) -> Command {
    let templates = Arc::clone(templates);
    Command::new("slap")
        .with_summary("Slaps the given user")
        .with_help("Simply type: !slap <nick> and it will slap the person")
        .with_handler(move |_, args| {
            let nick = args.join(" ");
            if nick.is_empty() {
                return Some("You have to provide a nick name".to_string());
            }
            templates.slap(&nick).map(|slap| format!("/me {}", slap))
        })
}

fn meal_command() -> Command {
    Command::new("meal")
        .with_summary("Displays a 'enjoy your meal' message")
        .with_handler(|_, _| Some("Guten Appetit".to_string()))
}

fn hug_command() -> Command {
    Command::new("hug")
        .with_summary("Hugs the given user")
        .with_handler(|_, args| {
            if args.is_empty() {
                Some("Who should I hug?".to_string())
            } else {
                Some(format!("/me hugs {}", args.join(" ")))
            }
        })
}

fn kiss_command() -> Command {
    Command::new("kiss")
        .with_summary("Kisses the given user")
        .with_help("You can optionally specify the part of the body: kiss <nick> <part of body>")
        .with_handler(|_, args| {
            let reply = match args {
                [] => "Who should I kiss?".to_string(),
                [nick] => format!("/me kisses {} :-*", nick),
                [nick, part] => format!("/me kisses {} on the {} :-*", nick, part),
                _ => "Too many arguments".to_string(),
            };
            Some(reply)
        })
}
