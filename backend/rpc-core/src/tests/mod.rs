mod callback;
mod codec;
mod config;
mod registry;
mod value;
