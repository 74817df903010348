//! Subcommand implementations.

pub mod canonicalize;
pub mod resolve_key;
pub mod verify;
