//! HTTP handlers.

pub mod health;
pub mod keys;
pub mod settings;
