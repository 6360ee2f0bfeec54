//! Command dispatcher.
//!
//! Owns the game session and runs one command at a time against it. Errors
//! from a command are answered as a reply to the message that caused them; the
//! session is only changed once every platform read a command needs has
//! succeeded.

use serenity::model::id::{ChannelId, UserId};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::command::{format_help, format_players, parse_message, BotCommand};
use super::platform::{IncomingMessage, Platform};
use crate::config::DiscordConfig;
use crate::game::{occupants, resolve_players, resolve_rooms, Registration, RoomCode, Session};
use crate::{BotError, Result};

/// Reply to `ping`.
pub const PONG_REPLY: &str = "pong";

/// Reply to an unrecognised command.
pub const UNKNOWN_COMMAND_REPLY: &str = "Huh? WTF is that command?!";

/// Message sent to the control channel after `map`.
pub const MAPPED_REPLY: &str = "Town Locations Mapped";

/// Routes chat commands to their handlers.
pub struct Dispatcher {
    session: Mutex<Session>,
    prefix: String,
    join_voice_on_register: bool,
}

impl Dispatcher {
    /// Create a dispatcher from the Discord configuration.
    pub fn new(config: &DiscordConfig) -> Self {
        let storyteller = config.storyteller_id.map(UserId::new);
        Self {
            session: Mutex::new(Session::with_storyteller(storyteller)),
            prefix: config.command_prefix.clone(),
            join_voice_on_register: config.join_voice_on_register,
        }
    }

    /// Create a dispatcher around an existing session.
    pub fn with_session(session: Session, prefix: impl Into<String>) -> Self {
        Self {
            session: Mutex::new(session),
            prefix: prefix.into(),
            join_voice_on_register: true,
        }
    }

    /// Snapshot of the current session.
    pub async fn session(&self) -> Session {
        self.session.lock().await.clone()
    }

    /// Handle one inbound message.
    ///
    /// Returns the command that ran, or `None` if the message was not for
    /// the bot.
    pub async fn handle_message<P>(&self, platform: &P, msg: &IncomingMessage) -> Option<BotCommand>
    where
        P: Platform + ?Sized,
    {
        if msg.content.trim().is_empty() {
            return None;
        }

        if msg.author_id == platform.current_user_id() {
            debug!("Ignoring own message");
            return None;
        }

        let command = parse_message(&msg.content, &self.prefix)?;
        info!(
            command = %command,
            author = %msg.author_id,
            channel = %msg.channel_id,
            "Command received"
        );

        // Held for the whole command so commands never interleave.
        let mut session = self.session.lock().await;

        if let Err(e) = self.execute(platform, &mut session, msg, &command).await {
            if e.is_fatal() {
                error!(command = %command, error = %e, "Command failed");
            } else {
                warn!(command = %command, error = %e, "Command failed");
            }
            if let Err(send_err) = platform
                .reply(msg.channel_id, msg.message_id, &e.user_message())
                .await
            {
                error!(error = %send_err, "Failed to send error reply");
            }
        }

        Some(command)
    }

    async fn execute<P>(
        &self,
        platform: &P,
        session: &mut Session,
        msg: &IncomingMessage,
        command: &BotCommand,
    ) -> Result<()>
    where
        P: Platform + ?Sized,
    {
        match command {
            BotCommand::Ping => platform.send_message(msg.channel_id, PONG_REPLY).await,
            BotCommand::Register => self.register(platform, session, msg).await,
            BotCommand::Sitrep => platform.send_message(msg.channel_id, &session.sitrep()).await,
            BotCommand::Map => {
                let registration = require_registration(session)?;
                self.map(platform, session, &registration).await
            }
            BotCommand::PlayerMove {
                player,
                destination,
            } => {
                let registration = require_registration(session)?;
                self.player_move(platform, session, &registration, msg, player, destination)
                    .await
            }
            BotCommand::ChannelMove {
                source,
                destination,
            } => {
                let registration = require_registration(session)?;
                self.channel_move(platform, session, &registration, msg, source, destination)
                    .await
            }
            BotCommand::Storyteller => {
                if let Some(current) = session.storyteller_id() {
                    if current != msg.author_id {
                        return Err(BotError::StorytellerTaken(current));
                    }
                }
                session.set_storyteller(msg.author_id);
                info!(user = %msg.author_id, "Storyteller set");
                platform
                    .send_message(
                        msg.channel_id,
                        &format!("<@{}> is now the storyteller", msg.author_id),
                    )
                    .await
            }
            BotCommand::Players => {
                let names: Vec<String> = session.players().values().cloned().collect();
                platform
                    .send_message(
                        msg.channel_id,
                        &format_players(&names, session.last_mapped_at()),
                    )
                    .await
            }
            BotCommand::Help => {
                platform
                    .send_message(msg.channel_id, &format_help(&self.prefix))
                    .await
            }
            BotCommand::MissingArgs(usage) => Err(BotError::Usage(*usage)),
            BotCommand::Unknown(_) => {
                platform
                    .send_message(msg.channel_id, UNKNOWN_COMMAND_REPLY)
                    .await
            }
        }
    }

    async fn register<P>(
        &self,
        platform: &P,
        session: &mut Session,
        msg: &IncomingMessage,
    ) -> Result<()>
    where
        P: Platform + ?Sized,
    {
        let guild_id = msg.guild_id.ok_or(BotError::NotInGuild)?;
        session.register(guild_id, msg.channel_id);
        info!(
            guild = %guild_id,
            channel = %msg.channel_id,
            "The game has been registered"
        );

        let mut reply = format!(
            "Game registered at guildid# {} channel id# {}",
            guild_id, msg.channel_id
        );

        if self.join_voice_on_register {
            // Registration stands even if the voice join fails.
            if let Err(e) = platform.join_voice(guild_id, msg.channel_id).await {
                warn!(error = %e, "Could not join voice channel");
                reply.push_str(&format!(" (could not join voice: {e})"));
            }
        }

        platform.send_message(msg.channel_id, &reply).await
    }

    async fn map<P>(
        &self,
        platform: &P,
        session: &mut Session,
        registration: &Registration,
    ) -> Result<()>
    where
        P: Platform + ?Sized,
    {
        let channels = platform.guild_channels(registration.guild_id).await?;
        let presence = platform.voice_presence(registration.guild_id).await?;

        let rooms = resolve_rooms(&channels);
        let players = resolve_players(
            rooms.get(&RoomCode::TownSquare).copied(),
            &presence,
            session.storyteller_id(),
        );

        info!(
            rooms = rooms.len(),
            players = players.len(),
            channels = channels.len(),
            "Town mapped"
        );
        session.apply_mapping(rooms, players);

        platform.send_tts(registration.channel_id, MAPPED_REPLY).await
    }

    async fn player_move<P>(
        &self,
        platform: &P,
        session: &Session,
        registration: &Registration,
        msg: &IncomingMessage,
        player: &str,
        destination: &str,
    ) -> Result<()>
    where
        P: Platform + ?Sized,
    {
        let (code, channel_id) = resolve_room(session, destination)?;
        let user_id = session
            .player_id_by_name(player)
            .ok_or_else(|| BotError::UnknownPlayer(player.to_string()))?;

        platform
            .move_member(registration.guild_id, user_id, channel_id)
            .await?;
        info!(player = %user_id, room = %code, "Player moved");

        platform
            .send_message(
                msg.channel_id,
                &format!("Moved {player} to {}", code.display_name()),
            )
            .await
    }

    async fn channel_move<P>(
        &self,
        platform: &P,
        session: &Session,
        registration: &Registration,
        msg: &IncomingMessage,
        source: &str,
        destination: &str,
    ) -> Result<()>
    where
        P: Platform + ?Sized,
    {
        let (source_code, source_channel) = resolve_room(session, source)?;
        let (dest_code, dest_channel) = resolve_room(session, destination)?;

        if source_channel == dest_channel {
            return platform
                .send_message(
                    msg.channel_id,
                    "Source and destination are the same room, nobody moved",
                )
                .await;
        }

        let presence = platform.voice_presence(registration.guild_id).await?;
        let movers = occupants(source_channel, &presence);

        for occupant in &movers {
            platform
                .move_member(registration.guild_id, occupant.user_id, dest_channel)
                .await?;
        }
        info!(
            moved = movers.len(),
            from = %source_code,
            to = %dest_code,
            "Room moved"
        );

        let noun = if movers.len() == 1 { "player" } else { "players" };
        platform
            .send_message(
                msg.channel_id,
                &format!(
                    "Moved {} {noun} from {} to {}",
                    movers.len(),
                    source_code.display_name(),
                    dest_code.display_name()
                ),
            )
            .await
    }
}

fn require_registration(session: &Session) -> Result<Registration> {
    session.registration().cloned().ok_or(BotError::NotRegistered)
}

fn resolve_room(session: &Session, code: &str) -> Result<(RoomCode, ChannelId)> {
    let code: RoomCode = code.parse()?;
    let channel_id = session
        .room_channel(code)
        .ok_or(BotError::RoomNotMapped(code))?;
    Ok((code, channel_id))
}
