//! Command parser for townsquare.
//!
//! Commands are chat messages whose first word contains the command prefix
//! (`!botc` by default) followed by a command name and its arguments, e.g.
//! `!botc pmove Alice TS`.

use chrono::{DateTime, Utc};

/// Usage line for `pmove`.
pub const PMOVE_USAGE: &str = "!botc pmove <player> <room code>";

/// Usage line for `cmove`.
pub const CMOVE_USAGE: &str = "!botc cmove <source code> <destination code>";

/// A parsed bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// Liveness check.
    Ping,
    /// Bind the game to the current guild and channel.
    Register,
    /// Report registration status.
    Sitrep,
    /// Map rooms to channels and build the roster.
    Map,
    /// Move one player to a room.
    PlayerMove {
        /// Player display name.
        player: String,
        /// Destination room code.
        destination: String,
    },
    /// Move everyone in one room to another.
    ChannelMove {
        /// Source room code.
        source: String,
        /// Destination room code.
        destination: String,
    },
    /// Claim the storyteller role.
    Storyteller,
    /// List the roster.
    Players,
    /// Show command help.
    Help,
    /// Known command with missing arguments.
    MissingArgs(&'static str),
    /// Unknown command.
    Unknown(String),
}

impl BotCommand {
    /// Get the command name.
    pub fn name(&self) -> &str {
        match self {
            BotCommand::Ping => "ping",
            BotCommand::Register => "register",
            BotCommand::Sitrep => "sitrep",
            BotCommand::Map => "map",
            BotCommand::PlayerMove { .. } => "pmove",
            BotCommand::ChannelMove { .. } => "cmove",
            BotCommand::Storyteller => "storyteller",
            BotCommand::Players => "players",
            BotCommand::Help => "help",
            BotCommand::MissingArgs(_) => "usage",
            BotCommand::Unknown(cmd) => cmd,
        }
    }

    /// Parse the command name and arguments (everything after the prefix).
    fn from_tokens(name: &str, args: &[&str]) -> Self {
        match name {
            "ping" => BotCommand::Ping,
            "register" => BotCommand::Register,
            "sitrep" => BotCommand::Sitrep,
            "map" => BotCommand::Map,
            "pmove" => match args.split_last() {
                // Display names may contain spaces; the room code is always last.
                Some((destination, player)) if !player.is_empty() => BotCommand::PlayerMove {
                    player: player.join(" "),
                    destination: destination.to_string(),
                },
                _ => BotCommand::MissingArgs(PMOVE_USAGE),
            },
            "cmove" => match args {
                [source, destination, ..] => BotCommand::ChannelMove {
                    source: source.to_string(),
                    destination: destination.to_string(),
                },
                _ => BotCommand::MissingArgs(CMOVE_USAGE),
            },
            "storyteller" => BotCommand::Storyteller,
            "players" => BotCommand::Players,
            "help" => BotCommand::Help,
            _ => BotCommand::Unknown(name.to_string()),
        }
    }
}

impl std::fmt::Display for BotCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotCommand::PlayerMove {
                player,
                destination,
            } => write!(f, "pmove {player} {destination}"),
            BotCommand::ChannelMove {
                source,
                destination,
            } => write!(f, "cmove {source} {destination}"),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Parse a chat message into a command.
///
/// Returns `None` when the message is not addressed to the bot: empty, the
/// first word does not contain `prefix`, or there is no command word after
/// the prefix.
pub fn parse_message(content: &str, prefix: &str) -> Option<BotCommand> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let (first, rest) = tokens.split_first()?;

    if !first.contains(prefix) {
        return None;
    }

    let (name, args) = rest.split_first()?;
    Some(BotCommand::from_tokens(name, args))
}

/// Command information for help display.
pub struct CommandInfo {
    /// Command name.
    pub name: &'static str,
    /// Command syntax, without the prefix.
    pub syntax: &'static str,
    /// Command description.
    pub description: &'static str,
}

/// Get all available command information.
pub fn get_command_help() -> Vec<CommandInfo> {
    vec![
        CommandInfo {
            name: "ping",
            syntax: "ping",
            description: "Check the bot is alive",
        },
        CommandInfo {
            name: "register",
            syntax: "register",
            description: "Run the game from this server and channel",
        },
        CommandInfo {
            name: "sitrep",
            syntax: "sitrep",
            description: "Show where the game is registered",
        },
        CommandInfo {
            name: "map",
            syntax: "map",
            description: "Bind village rooms to channels and collect players from the Town Square",
        },
        CommandInfo {
            name: "pmove",
            syntax: "pmove <player> <room code>",
            description: "Move a player to a room",
        },
        CommandInfo {
            name: "cmove",
            syntax: "cmove <source code> <destination code>",
            description: "Move everyone in one room to another",
        },
        CommandInfo {
            name: "storyteller",
            syntax: "storyteller",
            description: "Become the storyteller",
        },
        CommandInfo {
            name: "players",
            syntax: "players",
            description: "List the mapped players",
        },
        CommandInfo {
            name: "help",
            syntax: "help",
            description: "Show this help",
        },
    ]
}

/// Format the help message for display.
pub fn format_help(prefix: &str) -> String {
    let mut lines = Vec::new();
    lines.push("=== Commands ===".to_string());

    for info in get_command_help() {
        lines.push(format!("{prefix} {} - {}", info.syntax, info.description));
    }

    lines.push(String::new());
    lines.push(format!(
        "Room codes: {}",
        crate::game::RoomCode::ALL
            .iter()
            .map(|code| format!("{code} ({})", code.display_name()))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    lines.join("\n")
}

/// Format the roster for display.
pub fn format_players(players: &[String], last_mapped: Option<DateTime<Utc>>) -> String {
    let mut lines = Vec::new();
    if players.is_empty() {
        lines.push("No players mapped".to_string());
    } else {
        lines.push(format!("=== Players ({}) ===", players.len()));
        for name in players {
            lines.push(format!("  {name}"));
        }
    }
    if let Some(at) = last_mapped {
        lines.push(format!("Last mapped: {}", at.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    lines.join("\n")
}
