mod credits;
mod helpers;

pub mod op;
mod secret;

pub use credits::Credits;
pub use helpers::{parse_boolean_flag, parse_env_flag};
pub use secret::Secret;
