mod client;
mod helpers;
mod server;
