use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;

use crate::errors::PlatformError;
use crate::structs::starboard::ResolvedMessage;

/// The slice of the chat platform the starboard needs. Narrowing it to a
/// trait keeps the sync engine testable without a gateway connection.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Bounded lookup of a single message by id. `Ok(None)` means the
    /// platform has no such message (deleted, or the id is garbage).
    async fn fetch_message(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<Option<ResolvedMessage>, PlatformError>;

    /// Posts to a channel, returning the new message id.
    async fn send_message(&self, channel_id: u64, text: &str) -> Result<u64, PlatformError>;

    /// Replaces a message's content. Returns `false` when the message no
    /// longer exists, so callers can run their drift recovery.
    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        text: &str,
    ) -> Result<bool, PlatformError>;

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), PlatformError>;

    /// Creates a text channel with restrictive overwrites (the bot may post,
    /// @everyone may only read). Returns the new channel id.
    async fn create_channel(&self, guild_id: u64, name: &str) -> Result<u64, PlatformError>;

    async fn channel_exists(&self, channel_id: u64) -> Result<bool, PlatformError>;
}

/// `ChatClient` over serenity's HTTP client.
pub struct DiscordClient {
    http: Arc<serenity::Http>,
}

impl DiscordClient {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

fn http_status(err: &serenity::Error) -> Option<u16> {
    if let serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(resp)) = err {
        Some(resp.status_code.as_u16())
    } else {
        None
    }
}

fn unavailable(err: serenity::Error) -> PlatformError {
    PlatformError::Unavailable(err.to_string())
}

fn resolve(message: &serenity::Message) -> ResolvedMessage {
    ResolvedMessage {
        author_id: message.author.id.get(),
        author_name: message.author.name.clone(),
        channel_id: message.channel_id.get(),
        timestamp: (*message.timestamp).to_utc(),
        content: message.content.clone(),
        attachment_url: message.attachments.first().map(|a| a.url.clone()),
    }
}

#[async_trait]
impl ChatClient for DiscordClient {
    async fn fetch_message(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<Option<ResolvedMessage>, PlatformError> {
        let channel = serenity::ChannelId::new(channel_id);
        // One message at-or-before the target id. A deleted target yields an
        // older message here, so the id has to be checked before trusting it.
        let builder = serenity::GetMessages::new()
            .before(serenity::MessageId::new(message_id.saturating_add(1)))
            .limit(1);

        match channel.messages(&self.http, builder).await {
            Ok(messages) => Ok(messages
                .first()
                .filter(|m| m.id.get() == message_id)
                .map(resolve)),
            Err(err) if http_status(&err) == Some(404) => Ok(None),
            Err(err) => Err(unavailable(err)),
        }
    }

    async fn send_message(&self, channel_id: u64, text: &str) -> Result<u64, PlatformError> {
        let channel = serenity::ChannelId::new(channel_id);
        let sent = channel
            .send_message(&self.http, serenity::CreateMessage::new().content(text))
            .await
            .map_err(unavailable)?;
        Ok(sent.id.get())
    }

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        text: &str,
    ) -> Result<bool, PlatformError> {
        let channel = serenity::ChannelId::new(channel_id);
        let message = serenity::MessageId::new(message_id);
        match channel
            .edit_message(&self.http, message, serenity::EditMessage::new().content(text))
            .await
        {
            Ok(_) => Ok(true),
            Err(err) if http_status(&err) == Some(404) => Ok(false),
            Err(err) => Err(unavailable(err)),
        }
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), PlatformError> {
        let channel = serenity::ChannelId::new(channel_id);
        match channel
            .delete_message(&self.http, serenity::MessageId::new(message_id))
            .await
        {
            Ok(()) => Ok(()),
            // already gone, which is what we wanted
            Err(err) if http_status(&err) == Some(404) => Ok(()),
            Err(err) => Err(unavailable(err)),
        }
    }

    async fn create_channel(&self, guild_id: u64, name: &str) -> Result<u64, PlatformError> {
        let guild = serenity::GuildId::new(guild_id);
        let me = self.http.get_current_user().await.map_err(unavailable)?;

        // Discord's @everyone role shares the guild's id.
        let overwrites = vec![
            serenity::PermissionOverwrite {
                allow: serenity::Permissions::VIEW_CHANNEL | serenity::Permissions::SEND_MESSAGES,
                deny: serenity::Permissions::empty(),
                kind: serenity::PermissionOverwriteType::Member(me.id),
            },
            serenity::PermissionOverwrite {
                allow: serenity::Permissions::empty(),
                deny: serenity::Permissions::SEND_MESSAGES,
                kind: serenity::PermissionOverwriteType::Role(serenity::RoleId::new(guild_id)),
            },
        ];

        let builder = serenity::CreateChannel::new(name)
            .kind(serenity::ChannelType::Text)
            .permissions(overwrites);

        match guild.create_channel(&self.http, builder).await {
            Ok(channel) => Ok(channel.id.get()),
            Err(err) if http_status(&err) == Some(403) => Err(PlatformError::Forbidden),
            Err(err) if http_status(&err) == Some(400) => Err(PlatformError::BadChannelName),
            Err(err) => Err(unavailable(err)),
        }
    }

    async fn channel_exists(&self, channel_id: u64) -> Result<bool, PlatformError> {
        match self.http.get_channel(serenity::ChannelId::new(channel_id)).await {
            Ok(_) => Ok(true),
            Err(err) if http_status(&err) == Some(404) => Ok(false),
            Err(err) => Err(unavailable(err)),
        }
    }
}
