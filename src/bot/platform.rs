//! Chat platform seam.
//!
//! The dispatcher only needs a handful of operations from Discord. They are
//! collected in [`Platform`] so the command logic can run against the live
//! client or a test double.

use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};

use crate::game::{ChannelInfo, VoicePresence};
use crate::Result;

/// A message delivered to the bot.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Message author.
    pub author_id: UserId,
    /// Guild the message was sent in (None for DMs).
    pub guild_id: Option<GuildId>,
    /// Channel the message was sent in.
    pub channel_id: ChannelId,
    /// Id of the message itself, for threaded replies.
    pub message_id: MessageId,
    /// Raw message text.
    pub content: String,
}

/// Operations the bot performs on the chat platform.
#[async_trait]
pub trait Platform: Send + Sync {
    /// The bot's own user id.
    fn current_user_id(&self) -> UserId;

    /// Send a text message to a channel.
    async fn send_message(&self, channel_id: ChannelId, content: &str) -> Result<()>;

    /// Send a message read aloud to members with text-to-speech enabled.
    async fn send_tts(&self, channel_id: ChannelId, content: &str) -> Result<()>;

    /// Send a message as a reply to an earlier one.
    async fn reply(&self, channel_id: ChannelId, message_id: MessageId, content: &str)
        -> Result<()>;

    /// List the channels of a guild.
    async fn guild_channels(&self, guild_id: GuildId) -> Result<Vec<ChannelInfo>>;

    /// List who is in which voice channel of a guild.
    async fn voice_presence(&self, guild_id: GuildId) -> Result<Vec<VoicePresence>>;

    /// Move a member to another voice channel.
    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<()>;

    /// Join the bot to a voice channel.
    async fn join_voice(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<()>;
}
