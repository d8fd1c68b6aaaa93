//! Application layer errors

use thiserror::Error;

/// Process-level bot errors. Transport failures are fatal; everything the
/// user can cause is answered with plain text instead of an error.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Voting state conflicts and input problems. The `Display` strings double
/// as the reply texts sent back to the room, so handlers can surface these
/// with a plain `to_string()`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VoteError {
    #[error("A vote is already running")]
    AlreadyRunning,

    #[error("No subject given. Use !vstart <subject>")]
    EmptySubject,

    #[error("No votings at the moment")]
    NoActiveVote,
}
