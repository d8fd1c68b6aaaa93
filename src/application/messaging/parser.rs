//! Message parser - turns raw message bodies into command invocations

use crate::domain::entities::Invocation;

/// Splits prefixed message bodies into command name and arguments.
pub struct MessageParser {
    prefix: char,
}

impl MessageParser {
    pub fn new(prefix: char) -> Self {
        Self { prefix }
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    /// Parse a message body. Bodies that do not start with the command
    /// prefix are not commands and yield `None`; the check runs on the
    /// untrimmed body, so a leading space means the message is ignored.
    /// An empty name (bare prefix) is returned as-is and simply fails
    /// registry lookup later.
    pub fn parse(&self, body: &str) -> Option<Invocation> {
        if !body.starts_with(self.prefix) {
            return None;
        }
        let mut tokens = body.split_whitespace();
        let first = tokens.next()?;
        let name = first
            .strip_prefix(self.prefix)
            .unwrap_or_default()
            .to_string();
        let args = tokens.map(str::to_string).collect();
        Some(Invocation { name, args })
    }
}
