//! Game state module for townsquare.
//!
//! This module provides:
//! - Session state (registration, storyteller, roster, rooms)
//! - The static village room table
//! - Room and player mapping from live guild data

mod mapper;
mod rooms;
mod session;

pub use mapper::{occupants, resolve_players, resolve_rooms, ChannelInfo, VoicePresence};
pub use rooms::RoomCode;
pub use session::{Registration, Session};
