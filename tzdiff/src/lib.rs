pub mod config;
pub mod server;
mod timezone;

pub use timezone::*;
