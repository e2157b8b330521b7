//! Subcommand implementations.

pub mod init;
pub mod push;
pub mod verify;
