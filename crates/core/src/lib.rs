pub mod ansi;
pub mod commands;
pub mod history;
pub mod neofetch;
pub mod types;

pub use commands::{execute, resolve_aliases};
pub use history::History;
pub use types::*;
