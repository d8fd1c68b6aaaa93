pub mod errors;
pub mod messaging;
pub mod services;
pub mod voting;
