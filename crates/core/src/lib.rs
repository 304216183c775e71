// Advising Queue Core - Domain Logic & Ports
// NO infrastructure dependencies (terminal and config live in the desk crate)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
