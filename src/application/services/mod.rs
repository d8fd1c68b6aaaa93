pub mod command_service;

pub use command_service::{direct_registry, group_registry, HandlerContext};
