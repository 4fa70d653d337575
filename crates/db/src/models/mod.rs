//! Row types for the `players` and `settings` tables.

pub mod player;
pub mod settings;
