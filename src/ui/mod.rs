//! Terminal output for chat events.
//!
//! - [`renderer`]: builds the styled line for one event (badges, name, body).
//! - [`ansi`]: encodes styled lines as escape sequences for stdout.
//! - [`wrap`]: word wrapping for long message bodies.
//! - [`printer`]: the [`crate::twitch::ChatHandler`] that renders, prints and logs.

pub mod ansi;
pub mod printer;
pub mod renderer;
pub mod wrap;
