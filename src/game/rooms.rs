//! Village room codes.
//!
//! Each location in the village has a two letter code that players type in
//! commands, and a display name that must match a voice channel in the guild.

use std::str::FromStr;

use crate::BotError;

/// A village location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoomCode {
    /// Where the whole village gathers. Players are counted here.
    TownSquare,
    Cathedral,
    Campfire,
    PotionShop,
    Tower,
    Riverside,
    /// Private room for the storyteller.
    StorytellersCorner,
}

impl RoomCode {
    /// Every room code, in table order.
    pub const ALL: [RoomCode; 7] = [
        RoomCode::TownSquare,
        RoomCode::Cathedral,
        RoomCode::Campfire,
        RoomCode::PotionShop,
        RoomCode::Tower,
        RoomCode::Riverside,
        RoomCode::StorytellersCorner,
    ];

    /// Get the two letter code.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomCode::TownSquare => "TS",
            RoomCode::Cathedral => "CA",
            RoomCode::Campfire => "CF",
            RoomCode::PotionShop => "PS",
            RoomCode::Tower => "TW",
            RoomCode::Riverside => "RS",
            RoomCode::StorytellersCorner => "SC",
        }
    }

    /// Get the channel name this code binds to.
    pub fn display_name(&self) -> &'static str {
        match self {
            RoomCode::TownSquare => "Town Square",
            RoomCode::Cathedral => "Cathedral",
            RoomCode::Campfire => "Campfire",
            RoomCode::PotionShop => "Potion Shop",
            RoomCode::Tower => "Tower",
            RoomCode::Riverside => "Riverside",
            RoomCode::StorytellersCorner => "Storyteller's Corner",
        }
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoomCode {
    type Err = BotError;

    /// Codes are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| BotError::UnknownRoomCode(s.to_string()))
    }
}
