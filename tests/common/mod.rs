//! Test helpers for dispatcher tests.
//!
//! Provides a recording `MockPlatform` and message builders.

#![allow(dead_code)]

use std::sync::Mutex;

use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};

use townsquare::bot::{IncomingMessage, Platform};
use townsquare::game::{ChannelInfo, VoicePresence};
use townsquare::{BotError, Result};

/// The bot's own user id in tests.
pub const BOT_ID: u64 = 999;

/// Message id given to every built message.
pub const MESSAGE_ID: u64 = 500;

/// A platform call made by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send(ChannelId, String),
    Tts(ChannelId, String),
    Reply(ChannelId, MessageId, String),
    GuildChannels(GuildId),
    VoicePresence(GuildId),
    Move(GuildId, UserId, ChannelId),
    JoinVoice(GuildId, ChannelId),
}

/// Platform double with canned guild data.
#[derive(Default)]
pub struct MockPlatform {
    calls: Mutex<Vec<Call>>,
    channels: Mutex<Vec<ChannelInfo>>,
    presence: Mutex<Vec<VoicePresence>>,
    fail_channels: Mutex<bool>,
    fail_presence: Mutex<bool>,
    fail_join: Mutex<bool>,
    fail_move: Mutex<bool>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channels(self, channels: &[(u64, &str)]) -> Self {
        *self.channels.lock().unwrap() = channels
            .iter()
            .map(|(id, name)| ChannelInfo::voice(ChannelId::new(*id), *name))
            .collect();
        self
    }

    /// Add categories or text channels, which can never hold members.
    pub fn with_non_voice(self, channels: &[(u64, &str)]) -> Self {
        self.channels.lock().unwrap().extend(
            channels
                .iter()
                .map(|(id, name)| ChannelInfo::other(ChannelId::new(*id), *name)),
        );
        self
    }

    pub fn with_presence(self, presence: &[(u64, u64, &str)]) -> Self {
        self.set_presence(presence);
        self
    }

    pub fn set_presence(&self, presence: &[(u64, u64, &str)]) {
        *self.presence.lock().unwrap() = presence
            .iter()
            .map(|(user, channel, name)| {
                VoicePresence::new(UserId::new(*user), ChannelId::new(*channel), *name)
            })
            .collect();
    }

    pub fn fail_channels(&self, fail: bool) {
        *self.fail_channels.lock().unwrap() = fail;
    }

    pub fn fail_presence(&self, fail: bool) {
        *self.fail_presence.lock().unwrap() = fail;
    }

    pub fn fail_join(&self, fail: bool) {
        *self.fail_join.lock().unwrap() = fail;
    }

    pub fn fail_move(&self, fail: bool) {
        *self.fail_move.lock().unwrap() = fail;
    }

    /// All recorded calls.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Texts of all sent messages, plain, spoken or replies.
    pub fn sent(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send(_, text) | Call::Tts(_, text) | Call::Reply(_, _, text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Texts of messages sent as replies.
    pub fn replies(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Reply(_, _, text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Recorded moves as (user, channel) pairs.
    pub fn moves(&self) -> Vec<(u64, u64)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Move(_, user, channel) => Some((user.get(), channel.get())),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Platform for MockPlatform {
    fn current_user_id(&self) -> UserId {
        UserId::new(BOT_ID)
    }

    async fn send_message(&self, channel_id: ChannelId, content: &str) -> Result<()> {
        self.record(Call::Send(channel_id, content.to_string()));
        Ok(())
    }

    async fn send_tts(&self, channel_id: ChannelId, content: &str) -> Result<()> {
        self.record(Call::Tts(channel_id, content.to_string()));
        Ok(())
    }

    async fn reply(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        content: &str,
    ) -> Result<()> {
        self.record(Call::Reply(channel_id, message_id, content.to_string()));
        Ok(())
    }

    async fn guild_channels(&self, guild_id: GuildId) -> Result<Vec<ChannelInfo>> {
        self.record(Call::GuildChannels(guild_id));
        if *self.fail_channels.lock().unwrap() {
            return Err(BotError::Platform("channels unavailable".to_string()));
        }
        Ok(self.channels.lock().unwrap().clone())
    }

    async fn voice_presence(&self, guild_id: GuildId) -> Result<Vec<VoicePresence>> {
        self.record(Call::VoicePresence(guild_id));
        if *self.fail_presence.lock().unwrap() {
            return Err(BotError::Timeout("voice presence"));
        }
        Ok(self.presence.lock().unwrap().clone())
    }

    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<()> {
        self.record(Call::Move(guild_id, user_id, channel_id));
        if *self.fail_move.lock().unwrap() {
            return Err(BotError::Platform("missing permissions".to_string()));
        }
        Ok(())
    }

    async fn join_voice(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<()> {
        self.record(Call::JoinVoice(guild_id, channel_id));
        if *self.fail_join.lock().unwrap() {
            return Err(BotError::Platform("not a voice channel".to_string()));
        }
        Ok(())
    }
}

/// A guild message from `author` in `guild`/`channel`.
pub fn message(author: u64, guild: u64, channel: u64, content: &str) -> IncomingMessage {
    IncomingMessage {
        author_id: UserId::new(author),
        guild_id: Some(GuildId::new(guild)),
        channel_id: ChannelId::new(channel),
        message_id: MessageId::new(MESSAGE_ID),
        content: content.to_string(),
    }
}

/// A direct message from `author`.
pub fn direct_message(author: u64, channel: u64, content: &str) -> IncomingMessage {
    IncomingMessage {
        author_id: UserId::new(author),
        guild_id: None,
        channel_id: ChannelId::new(channel),
        message_id: MessageId::new(MESSAGE_ID),
        content: content.to_string(),
    }
}

/// Channels named after every village room, ids 100..=106 in table order.
pub fn village_channels() -> Vec<(u64, &'static str)> {
    vec![
        (100, "Town Square"),
        (101, "Cathedral"),
        (102, "Campfire"),
        (103, "Potion Shop"),
        (104, "Tower"),
        (105, "Riverside"),
        (106, "Storyteller's Corner"),
        (150, "general"),
    ]
}
