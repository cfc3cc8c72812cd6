pub mod callback;
pub mod catalog;
pub mod client;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod ipc;
pub mod registry;
pub mod value;

#[cfg(test)]
mod tests;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_URL: &str = const_format::concatcp!("ws://", DEFAULT_HOST, ":", DEFAULT_PORT);
