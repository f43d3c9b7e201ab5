//! Command-line interface parsing and startup
//!
//! Startup is strictly sequential: configuration, channel, screen, renderer,
//! then the transport takes over until the process is interrupted.

pub mod channel;

use std::error::Error;
use std::io::{self, Write};

use clap::Parser;
use ratatui::crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use tracing::debug;

use crate::cli::channel::ChannelResolver;
use crate::core::badges::BadgeTable;
use crate::core::config::{path_display, ConfigStore};
use crate::twitch;
use crate::ui::printer::ChatPrinter;
use crate::ui::renderer::{MessageRenderer, RenderConfig};
use crate::ui::wrap::WrapConfig;
use crate::utils::color::detect_color_depth;
use crate::utils::logging::{init_tracing, MessageLog};

#[derive(Parser)]
#[command(name = "gtc", version)]
#[command(about = "Watch a Twitch chat from your terminal")]
#[command(
    long_about = "gtc joins a Twitch channel anonymously and prints every chat message with \
the sender's color, badge icons and, optionally, a timestamp. It never sends messages.\n\n\
Configuration:\n\
  ~/.config/gtc/config.yaml is created on first run.\n\
  runner.timestamps     Prefix messages with [HH:MM:SS]\n\
  runner.log_messages   Append every message to ./chat.log.jsonl\n\
  twitch.channel        Channel used when none is given on the command line\n\n\
Badge icons use Nerd Font glyphs.\n\n\
Controls:\n\
  Ctrl+C            Quit"
)]
pub struct Args {
    /// Channel to join, overriding the configured one
    pub channel: Option<String>,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();

    let store = ConfigStore::default_location()
        .map_err(|e| format!("Failed to load configuration: {e}"))?;
    let created = store
        .ensure_exists()
        .map_err(|e| format!("Failed to load configuration: {e}"))?;
    if created {
        println!(
            "Created default configuration file at {}",
            path_display(store.path())
        );
    }
    let mut config = store
        .load()
        .map_err(|e| format!("Failed to load configuration: {e}"))?;
    debug!(path = %path_display(store.path()), "configuration loaded");

    let channel = {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        ChannelResolver::new(&store, &mut config)
            .resolve(args.channel.as_deref(), &mut input, &mut output)
            .map_err(|e| format!("Failed to get channel: {e}"))?
    };

    let mut stdout = io::stdout();
    clear_screen(&mut stdout)?;
    writeln!(stdout, "Welcome to {channel}'s chat!")?;
    writeln!(stdout, "Press Ctrl+C to exit.\n")?;
    stdout.flush()?;

    let badges = BadgeTable::builtin();
    let renderer = MessageRenderer::new(&badges, RenderConfig::from(&config.runner))
        .with_wrap(WrapConfig::for_terminal())
        .with_color_depth(detect_color_depth());
    let log = renderer
        .config()
        .log_to_file
        .then(MessageLog::in_working_dir);
    let mut printer = ChatPrinter::new(renderer, log, stdout);

    twitch::run(&channel, &mut printer)
        .await
        .map_err(|e| format!("Error connecting to Twitch chat: {e}"))?;
    Ok(())
}

fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))
}
