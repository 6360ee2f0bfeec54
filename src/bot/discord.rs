//! Discord client built on serenity and songbird.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serenity::async_trait;
use serenity::builder::CreateMessage;
use serenity::model::channel::{ChannelType, Message};
use serenity::model::gateway::Ready;
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};
use serenity::prelude::{Client, Context, EventHandler, GatewayIntents};
use songbird::SerenityInit;
use tracing::{error, info, warn};

use super::dispatcher::Dispatcher;
use super::platform::{IncomingMessage, Platform};
use crate::config::Config;
use crate::game::{ChannelInfo, VoicePresence};
use crate::{BotError, Result};

/// Gateway intents the bot needs: guild metadata, message text and voice
/// states for the cache.
fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_VOICE_STATES
}

/// [`Platform`] over a serenity context.
pub struct DiscordPlatform {
    ctx: Context,
    timeout: Duration,
}

impl DiscordPlatform {
    /// Wrap a serenity context.
    pub fn new(ctx: Context, timeout: Duration) -> Self {
        Self { ctx, timeout }
    }

    async fn with_timeout<T, E, F>(&self, what: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>> + Send,
        E: Into<BotError>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => Err(BotError::Timeout(what)),
        }
    }

    /// Voice states only live in the gateway cache.
    fn cached_presence(&self, guild_id: GuildId) -> Result<Vec<VoicePresence>> {
        let guild = self
            .ctx
            .cache
            .guild(guild_id)
            .ok_or_else(|| BotError::Platform(format!("guild {guild_id} is not in the cache")))?;

        let presence = guild
            .voice_states
            .values()
            .filter_map(|state| {
                let channel_id = state.channel_id?;
                let display_name = state
                    .member
                    .as_ref()
                    .or_else(|| guild.members.get(&state.user_id))
                    .map(|member| member.display_name().to_string())
                    .unwrap_or_else(|| state.user_id.to_string());
                Some(VoicePresence::new(state.user_id, channel_id, display_name))
            })
            .collect();

        Ok(presence)
    }
}

#[async_trait]
impl Platform for DiscordPlatform {
    fn current_user_id(&self) -> UserId {
        self.ctx.cache.current_user().id
    }

    async fn send_message(&self, channel_id: ChannelId, content: &str) -> Result<()> {
        self.with_timeout("send message", channel_id.say(&self.ctx, content))
            .await?;
        Ok(())
    }

    async fn send_tts(&self, channel_id: ChannelId, content: &str) -> Result<()> {
        let builder = CreateMessage::new().content(content).tts(true);
        self.with_timeout("send message", channel_id.send_message(&self.ctx, builder))
            .await?;
        Ok(())
    }

    async fn reply(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        content: &str,
    ) -> Result<()> {
        let builder = CreateMessage::new()
            .content(content)
            .reference_message((channel_id, message_id));
        self.with_timeout("send reply", channel_id.send_message(&self.ctx, builder))
            .await?;
        Ok(())
    }

    async fn guild_channels(&self, guild_id: GuildId) -> Result<Vec<ChannelInfo>> {
        let channels = self
            .with_timeout("guild channels", guild_id.channels(&self.ctx))
            .await?;
        Ok(channels
            .into_values()
            .map(|channel| match channel.kind {
                ChannelType::Voice | ChannelType::Stage => {
                    ChannelInfo::voice(channel.id, channel.name)
                }
                _ => ChannelInfo::other(channel.id, channel.name),
            })
            .collect())
    }

    async fn voice_presence(&self, guild_id: GuildId) -> Result<Vec<VoicePresence>> {
        self.cached_presence(guild_id)
    }

    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<()> {
        self.with_timeout(
            "move member",
            guild_id.move_member(&self.ctx, user_id, channel_id),
        )
        .await?;
        Ok(())
    }

    async fn join_voice(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<()> {
        let manager = songbird::get(&self.ctx)
            .await
            .ok_or_else(|| BotError::Platform("voice client is not registered".to_string()))?;
        self.with_timeout("voice join", manager.join(guild_id, channel_id))
            .await?;
        Ok(())
    }
}

/// serenity event handler feeding the dispatcher.
pub struct Handler {
    dispatcher: Arc<Dispatcher>,
    request_timeout: Duration,
}

impl Handler {
    /// Create a handler.
    pub fn new(dispatcher: Arc<Dispatcher>, request_timeout: Duration) -> Self {
        Self {
            dispatcher,
            request_timeout,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Bot is ready"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let platform = DiscordPlatform::new(ctx, self.request_timeout);
        let incoming = IncomingMessage {
            author_id: msg.author.id,
            guild_id: msg.guild_id,
            channel_id: msg.channel_id,
            message_id: msg.id,
            content: msg.content,
        };
        self.dispatcher.handle_message(&platform, &incoming).await;
    }
}

/// Connect to Discord and serve commands until SIGINT or SIGTERM.
pub async fn run(config: &Config) -> Result<()> {
    let dispatcher = Arc::new(Dispatcher::new(&config.discord));
    let handler = Handler::new(dispatcher, config.discord.request_timeout());

    let mut client = Client::builder(&config.discord.token, intents())
        .event_handler(handler)
        .register_songbird()
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        wait_for_shutdown().await;
        info!("Shutdown signal received, closing Discord session");
        shard_manager.shutdown_all().await;
    });

    if let Err(e) = client.start().await {
        error!(error = %e, "Discord client stopped with an error");
        return Err(e.into());
    }

    info!("Discord session closed");
    Ok(())
}

async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                warn!(error = %e, "Cannot listen for SIGTERM, waiting for Ctrl-C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
