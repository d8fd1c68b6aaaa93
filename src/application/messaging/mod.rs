pub mod dispatcher;
pub mod parser;

pub use dispatcher::{Dispatcher, Reply, CMD_PREFIX};
pub use parser::MessageParser;
