pub mod adapters;
pub mod config;
pub mod fetchers;
pub mod session;
pub mod templates;
