pub mod command;
pub mod message;

pub use command::{Command, CommandRegistry, Handler};
pub use message::{Address, ChannelType, Invocation, MessageEvent};
