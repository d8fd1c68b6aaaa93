use std::collections::HashMap;

use super::MessageEvent;

/// Command handler function type. Returning `None` means no reply is sent.
/// Handlers normalize their own failures into user-facing text; a panic
/// inside a handler is a defect, not something the dispatcher translates.
pub type Handler = Box<dyn Fn(&MessageEvent, &[String]) -> Option<String> + Send + Sync>;

/// A named bot command with its help texts and handler.
pub struct Command {
    pub name: String,
    pub short_help: Option<String>,
    pub long_help: Option<String>,
    handler: Option<Handler>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_help: None,
            long_help: None,
            handler: None,
        }
    }

    /// One-line summary shown in the help overview.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.short_help = Some(summary.into());
        self
    }

    /// Extended help shown by `help <command>`.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.long_help = Some(help.into());
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&MessageEvent, &[String]) -> Option<String> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn execute(&self, event: &MessageEvent, args: &[String]) -> Option<String> {
        self.handler.as_ref().and_then(|h| h(event, args))
    }
}

const SOURCE_HINT: &str = "Source code available at http://kurzma.ch/botsrc";

/// Mapping from command name to command. Lookup is an exact, case-sensitive
/// key match; unknown names are simply absent.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        self.commands.insert(command.name.clone(), command);
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Overview of every registered command, alphabetical, one line each.
    /// `help` itself and commands without a summary are skipped.
    pub fn help_overview(&self, prefix: char) -> String {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();

        let mut lines = vec!["Available commands:\n".to_string()];
        for name in names {
            if name == "help" {
                continue;
            }
            let Some(summary) = self.commands[name].short_help.as_deref() else {
                continue;
            };
            lines.push(format!("{}{}: {}", prefix, name, summary));
        }
        lines.push(format!(
            "\nType {prefix}help <command name> to get more info about that specific command."
        ));
        lines.push(SOURCE_HINT.to_string());
        lines.join("\n")
    }

    /// Extended help for a single command, or `None` when the command is
    /// unknown or has no help text at all.
    pub fn help_for(&self, name: &str) -> Option<String> {
        let cmd = self.commands.get(name)?;
        let doc = match (&cmd.short_help, &cmd.long_help) {
            (Some(short), Some(long)) => format!("{}\n\n{}", short, long),
            (Some(short), None) => short.clone(),
            (None, Some(long)) => long.clone(),
            (None, None) => return None,
        };
        Some(format!("{}\n{}", doc, SOURCE_HINT))
    }
}
