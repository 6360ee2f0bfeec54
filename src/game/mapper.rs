//! Room and player mapping.
//!
//! Reconciles live guild data with the static room table: channel names are
//! matched to room codes, then the Town Square's voice occupants become the
//! player roster.

use std::collections::BTreeMap;

use serenity::model::id::{ChannelId, UserId};
use tracing::{debug, warn};

use super::rooms::RoomCode;

/// A guild channel as seen during mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Channel id.
    pub id: ChannelId,
    /// Channel name.
    pub name: String,
    /// Whether members can be moved into it (voice or stage).
    pub is_voice: bool,
}

impl ChannelInfo {
    /// A voice channel members can be moved into.
    pub fn voice(id: ChannelId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_voice: true,
        }
    }

    /// A text channel, category or anything else that cannot hold members.
    pub fn other(id: ChannelId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_voice: false,
        }
    }
}

/// A user currently connected to a voice channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoicePresence {
    /// User id.
    pub user_id: UserId,
    /// Voice channel the user is in.
    pub channel_id: ChannelId,
    /// Name shown in the guild.
    pub display_name: String,
}

impl VoicePresence {
    /// Create a presence entry.
    pub fn new(user_id: UserId, channel_id: ChannelId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            channel_id,
            display_name: display_name.into(),
        }
    }
}

/// Resolve room codes against live channels.
///
/// A code maps to a voice channel whose name equals the code's display name
/// exactly. Categories and text channels never match, even when named after
/// a room. When several voice channels share a name, the one with the lowest
/// id (the oldest) wins.
pub fn resolve_rooms(channels: &[ChannelInfo]) -> BTreeMap<RoomCode, ChannelId> {
    let mut ordered: Vec<&ChannelInfo> = channels.iter().filter(|ch| ch.is_voice).collect();
    ordered.sort_by_key(|ch| ch.id);

    let mut rooms = BTreeMap::new();
    for channel in ordered {
        for code in RoomCode::ALL {
            if code.display_name() != channel.name {
                continue;
            }
            match rooms.get(&code) {
                None => {
                    rooms.insert(code, channel.id);
                }
                Some(existing) => {
                    warn!(
                        room = %code,
                        kept = %existing,
                        ignored = %channel.id,
                        "Duplicate channel name for room"
                    );
                }
            }
        }
    }

    debug!(mapped = rooms.len(), "Resolved rooms");
    rooms
}

/// Build the roster from the users in the Town Square.
///
/// The storyteller is never included. Without a mapped Town Square the
/// roster is empty.
pub fn resolve_players(
    town_square: Option<ChannelId>,
    presence: &[VoicePresence],
    storyteller: Option<UserId>,
) -> BTreeMap<UserId, String> {
    let Some(town_square) = town_square else {
        warn!("Town Square is not mapped, roster will be empty");
        return BTreeMap::new();
    };

    presence
        .iter()
        .filter(|p| p.channel_id == town_square)
        .filter(|p| Some(p.user_id) != storyteller)
        .map(|p| (p.user_id, p.display_name.clone()))
        .collect()
}

/// Users currently in a given voice channel.
pub fn occupants(channel_id: ChannelId, presence: &[VoicePresence]) -> Vec<&VoicePresence> {
    presence
        .iter()
        .filter(|p| p.channel_id == channel_id)
        .collect()
}
