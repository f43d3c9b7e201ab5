//! Pick the channel to join.
//!
//! A channel on the command line always wins. Otherwise the configured
//! channel is offered for change, or a new one is asked for and saved.

use crate::core::config::{Config, ConfigError, ConfigStore};
use std::error::Error as StdError;
use std::fmt;
use std::io::{self, BufRead, Write};

#[derive(Debug)]
pub enum ChannelError {
    Io(io::Error),
    EmptyName,
    Config(ConfigError),
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelError::Io(err) => write!(f, "error reading input: {err}"),
            ChannelError::EmptyName => write!(f, "empty channel name"),
            ChannelError::Config(err) => write!(f, "failed to update channel: {err}"),
        }
    }
}

impl StdError for ChannelError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ChannelError::Io(err) => Some(err),
            ChannelError::Config(err) => Some(err),
            ChannelError::EmptyName => None,
        }
    }
}

impl From<io::Error> for ChannelError {
    fn from(err: io::Error) -> Self {
        ChannelError::Io(err)
    }
}

impl From<ConfigError> for ChannelError {
    fn from(err: ConfigError) -> Self {
        ChannelError::Config(err)
    }
}

pub struct ChannelResolver<'a> {
    store: &'a ConfigStore,
    config: &'a mut Config,
}

impl<'a> ChannelResolver<'a> {
    pub fn new(store: &'a ConfigStore, config: &'a mut Config) -> Self {
        Self { store, config }
    }

    pub fn resolve<R: BufRead, W: Write>(
        &mut self,
        cli_channel: Option<&str>,
        input: &mut R,
        output: &mut W,
    ) -> Result<String, ChannelError> {
        if let Some(channel) = channel_from_args(cli_channel) {
            return Ok(channel);
        }
        self.prompt_for_channel(input, output)
    }

    fn prompt_for_channel<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<String, ChannelError> {
        let Some(current) = self.config.channel().map(str::to_string) else {
            writeln!(output, "No Twitch channel is currently configured.")?;
            return self.ask_and_update(input, output);
        };

        writeln!(output, "Current Twitch channel is set to: {current}")?;
        writeln!(output, "Would you like to change the channel? (yes/no)")?;
        output.flush()?;

        if parse_confirmation(&read_answer(input)?) {
            self.ask_and_update(input, output)
        } else {
            Ok(current)
        }
    }

    fn ask_and_update<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<String, ChannelError> {
        writeln!(output, "Please enter the Twitch channel name:")?;
        output.flush()?;

        let channel = read_answer(input)?.trim().to_string();
        if channel.is_empty() {
            writeln!(output, "Invalid channel name. No channel was set.")?;
            return Err(ChannelError::EmptyName);
        }

        self.store
            .update(self.config, "twitch.channel", channel.as_str())?;
        writeln!(output, "Twitch channel set to: {channel}")?;
        Ok(channel)
    }
}

/// The positional argument, if it holds anything besides whitespace.
pub fn channel_from_args(arg: Option<&str>) -> Option<String> {
    arg.map(str::trim)
        .filter(|channel| !channel.is_empty())
        .map(str::to_string)
}

/// Only an explicit `y`/`yes` counts as agreement.
pub fn parse_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn read_answer<R: BufRead>(input: &mut R) -> Result<String, ChannelError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(ChannelError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed",
        )));
    }
    Ok(line)
}
