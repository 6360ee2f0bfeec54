//! Error types for townsquare.

use thiserror::Error;

use serenity::model::id::UserId;

use crate::game::RoomCode;

/// Reply sent when a game command runs before `register`.
pub const NOT_REGISTERED_REPLY: &str = "No game registered, this command will not execute";

/// Common error type for townsquare.
#[derive(Error, Debug)]
pub enum BotError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Discord request failed.
    #[error("platform error: {0}")]
    Platform(String),

    /// Discord request did not complete in time.
    #[error("platform request timed out: {0}")]
    Timeout(&'static str),

    /// Game command issued before `register`.
    #[error("no game registered")]
    NotRegistered,

    /// Command needs a guild but came from a DM.
    #[error("command must be sent from a server channel")]
    NotInGuild,

    /// Room code is not in the static table.
    #[error("unknown room code: {0}")]
    UnknownRoomCode(String),

    /// Room code is valid but no live channel was mapped to it.
    #[error("room {0} has not been mapped")]
    RoomNotMapped(RoomCode),

    /// Player name is not on the roster.
    #[error("unknown player: {0}")]
    UnknownPlayer(String),

    /// Someone else already holds the storyteller role.
    #[error("storyteller is already {0}")]
    StorytellerTaken(UserId),

    /// Command was missing arguments.
    #[error("usage: {0}")]
    Usage(&'static str),
}

impl BotError {
    /// Returns true if this error should stop the process.
    ///
    /// Only startup errors are fatal; everything else is answered in chat.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BotError::Config(_) | BotError::Io(_))
    }

    /// Render the error as a chat reply.
    pub fn user_message(&self) -> String {
        match self {
            BotError::NotRegistered => NOT_REGISTERED_REPLY.to_string(),
            BotError::NotInGuild => "This command only works in a server channel".to_string(),
            BotError::UnknownRoomCode(code) => format!(
                "Unknown room code '{code}'. Known codes: {}",
                RoomCode::ALL
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            BotError::RoomNotMapped(code) => {
                format!("{} ({code}) is not mapped yet, run !botc map", code.display_name())
            }
            BotError::UnknownPlayer(name) => format!("No player called '{name}' on the roster"),
            BotError::StorytellerTaken(id) => format!("<@{id}> is already the storyteller"),
            BotError::Usage(usage) => format!("Usage: {usage}"),
            BotError::Platform(_) | BotError::Timeout(_) => {
                format!("Discord request failed: {self}")
            }
            BotError::Config(_) | BotError::Io(_) => format!("Internal error: {self}"),
        }
    }
}

impl From<serenity::Error> for BotError {
    fn from(e: serenity::Error) -> Self {
        BotError::Platform(e.to_string())
    }
}

impl From<songbird::error::JoinError> for BotError {
    fn from(e: songbird::error::JoinError) -> Self {
        BotError::Platform(format!("voice join failed: {e}"))
    }
}

/// Result type alias for townsquare operations.
pub type Result<T> = std::result::Result<T, BotError>;
