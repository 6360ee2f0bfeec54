//! Bot module for townsquare.
//!
//! This module provides:
//! - Command parsing (`!botc <command> [args]`)
//! - The dispatcher that runs commands against the game session
//! - The platform trait the dispatcher talks to
//! - The serenity/songbird implementation of that trait

mod command;
mod discord;
mod dispatcher;
mod platform;

pub use command::{
    format_help, format_players, get_command_help, parse_message, BotCommand, CommandInfo,
    CMOVE_USAGE, PMOVE_USAGE,
};
pub use discord::{run, DiscordPlatform, Handler};
pub use dispatcher::{Dispatcher, MAPPED_REPLY, PONG_REPLY, UNKNOWN_COMMAND_REPLY};
pub use platform::{IncomingMessage, Platform};
