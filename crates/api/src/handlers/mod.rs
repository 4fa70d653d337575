pub mod hooks;
pub mod players;
pub mod regeneration;
pub mod settings;
