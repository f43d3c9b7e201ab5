//! gtc is a read-only terminal viewer for live Twitch chat.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the configuration store, the badge style table and the
//!   transport-independent [`core::event::ChatEvent`].
//! - [`ui`] turns events into styled terminal lines and prints them.
//! - [`twitch`] wraps the anonymous IRC connection and forwards messages.
//! - [`cli`] parses arguments, resolves the channel and wires everything up.
//! - [`auth`] exchanges app credentials for a bearer token.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod auth;
pub mod cli;
pub mod core;
pub mod twitch;
pub mod ui;
pub mod utils;
