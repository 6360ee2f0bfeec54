//! townsquare - Blood on the Clocktower game control bot for Discord.
//!
//! Listens for `!botc` commands, keeps track of where the game is
//! registered, maps village rooms to voice channels and moves players
//! between them.

pub mod bot;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;

pub use bot::{Dispatcher, IncomingMessage, Platform};
pub use config::Config;
pub use error::{BotError, Result, NOT_REGISTERED_REPLY};
pub use game::{RoomCode, Session};
