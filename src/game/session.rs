//! Game session state.
//!
//! One session exists per process. It records where the game was
//! registered, who the storyteller is, which players were found in the
//! Town Square, and which live channel each room code resolved to.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serenity::model::id::{ChannelId, GuildId, UserId};

use super::rooms::RoomCode;

/// Where a game is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Guild the game runs in.
    pub guild_id: GuildId,
    /// Control channel for bot messages.
    pub channel_id: ChannelId,
}

/// Mutable game state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    registration: Option<Registration>,
    storyteller_id: Option<UserId>,
    players: BTreeMap<UserId, String>,
    rooms: BTreeMap<RoomCode, ChannelId>,
    last_mapped_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create an unregistered session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unregistered session with a storyteller already set.
    pub fn with_storyteller(storyteller_id: Option<UserId>) -> Self {
        Self {
            storyteller_id,
            ..Self::default()
        }
    }

    /// Bind the game to a guild and control channel.
    ///
    /// Registering again moves the binding; rooms and players are kept
    /// until the next `map`.
    pub fn register(&mut self, guild_id: GuildId, channel_id: ChannelId) {
        self.registration = Some(Registration {
            guild_id,
            channel_id,
        });
    }

    /// Current registration, if any.
    pub fn registration(&self) -> Option<&Registration> {
        self.registration.as_ref()
    }

    /// Whether `register` has run.
    pub fn is_registered(&self) -> bool {
        self.registration.is_some()
    }

    /// The storyteller, if one is set.
    pub fn storyteller_id(&self) -> Option<UserId> {
        self.storyteller_id
    }

    /// Set the storyteller and drop them from the roster.
    pub fn set_storyteller(&mut self, user_id: UserId) {
        self.storyteller_id = Some(user_id);
        self.players.remove(&user_id);
    }

    /// Mapped rooms.
    pub fn rooms(&self) -> &BTreeMap<RoomCode, ChannelId> {
        &self.rooms
    }

    /// Player roster, id to display name.
    pub fn players(&self) -> &BTreeMap<UserId, String> {
        &self.players
    }

    /// When `map` last completed.
    pub fn last_mapped_at(&self) -> Option<DateTime<Utc>> {
        self.last_mapped_at
    }

    /// Replace the room table and roster in one step.
    ///
    /// The storyteller is filtered out again here so the roster can never
    /// contain them regardless of how it was built.
    pub fn apply_mapping(
        &mut self,
        rooms: BTreeMap<RoomCode, ChannelId>,
        mut players: BTreeMap<UserId, String>,
    ) {
        if let Some(storyteller) = self.storyteller_id {
            players.remove(&storyteller);
        }
        self.rooms = rooms;
        self.players = players;
        self.last_mapped_at = Some(Utc::now());
    }

    /// Channel a room code resolved to.
    pub fn room_channel(&self, code: RoomCode) -> Option<ChannelId> {
        self.rooms.get(&code).copied()
    }

    /// Find a player by exact display name.
    pub fn player_id_by_name(&self, name: &str) -> Option<UserId> {
        self.players
            .iter()
            .find(|(_, player_name)| player_name.as_str() == name)
            .map(|(id, _)| *id)
    }

    /// Status line for `sitrep`.
    pub fn sitrep(&self) -> String {
        let state = match &self.registration {
            Some(reg) => format!(
                "Game is initialised at guildid# {} channel id# {}",
                reg.guild_id, reg.channel_id
            ),
            None => "Game is not initialised".to_string(),
        };
        format!("SITREP-{state}")
    }
}
