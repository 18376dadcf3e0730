use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::errors::StarError;
use crate::helpers::events::GatewayEvent;
use crate::helpers::platform::ChatClient;
use crate::helpers::render::render;
use crate::helpers::resolver::MessageResolver;
use crate::helpers::starboard::StarStore;
use crate::structs::starboard::GuildStarConfig;

/// Messages older than this cannot receive a first or subsequent star.
const STAR_AGE_LIMIT_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndorseOutcome {
    /// A fresh mirror was created in the board channel.
    Created { starboard_message_id: u64 },
    /// An existing mirror was edited to the new count.
    Updated { stars: u64 },
}

/// The starboard sync engine. Reacts to the star command and to gateway
/// edit/delete notifications, keeping each guild's ledger and its mirror
/// messages consistent.
pub struct Starboard {
    store: Arc<dyn StarStore>,
    client: Arc<dyn ChatClient>,
    resolver: MessageResolver,
    // Per-guild mutual exclusion around every load-mutate-save sequence.
    // Two stars racing on the same guild would otherwise both read the same
    // base record and one save would overwrite the other's starrer.
    locks: StdMutex<HashMap<u64, Arc<Mutex<()>>>>,
}

impl Starboard {
    pub fn new(store: Arc<dyn StarStore>, client: Arc<dyn ChatClient>) -> Self {
        Self {
            store,
            client,
            resolver: MessageResolver::new(),
            locks: StdMutex::new(HashMap::new()),
        }
    }

    fn guild_lock(&self, guild_id: u64) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks.entry(guild_id).or_default().clone()
    }

    /// Stars a message on behalf of a user.
    ///
    /// Validation happens before any state change or platform write; the
    /// first valid star creates the mirror, later ones edit its count. A
    /// mirror that has vanished from the board channel is purged and the
    /// star restarts the lifecycle with a fresh mirror.
    pub async fn endorse(
        &self,
        guild_id: u64,
        channel_id: u64,
        message_id: u64,
        user_id: u64,
    ) -> Result<EndorseOutcome, StarError> {
        let lock = self.guild_lock(guild_id);
        let _guard = lock.lock().await;

        let mut config = self.store.load(guild_id).await?;
        let board = config.starboard_channel_id.ok_or(StarError::NotConfigured)?;

        if let Some(entry) = config.entry(message_id) {
            if entry.starred_by.contains(&user_id) {
                return Err(StarError::AlreadyEndorsed);
            }
        }

        let message = self
            .resolver
            .resolve(self.client.as_ref(), channel_id, message_id)
            .await?
            .ok_or(StarError::MessageNotFound)?;

        if message.author_id == user_id {
            return Err(StarError::SelfStar);
        }
        if message.channel_id == board {
            return Err(StarError::InsideStarboard);
        }
        if message.timestamp < Utc::now() - Duration::days(STAR_AGE_LIMIT_DAYS) {
            return Err(StarError::TooOld);
        }

        let stars = config.entry(message_id).map(|e| e.stars()).unwrap_or(0);
        let text = render(&message, stars + 1, message_id).ok_or(StarError::TooLong)?;

        let mirror = config.entry(message_id).and_then(|e| e.starboard_message_id);
        match mirror {
            None => {
                let mirror_id = self.client.send_message(board, &text).await?;
                config.record_endorsement(message_id, user_id, mirror_id)?;
                self.store.save(guild_id, &config).await?;
                Ok(EndorseOutcome::Created {
                    starboard_message_id: mirror_id,
                })
            }
            Some(mirror_id) => {
                if self.client.edit_message(board, mirror_id, &text).await? {
                    let stars = config.record_endorsement(message_id, user_id, mirror_id)?;
                    self.store.save(guild_id, &config).await?;
                    Ok(EndorseOutcome::Updated { stars })
                } else {
                    // The mirror was deleted out from under us; drop the
                    // stale entry and start over as a fresh star.
                    debug!(guild_id, message_id, "mirror message missing, restarting lifecycle");
                    config.purge(message_id);
                    let text = render(&message, 1, message_id).ok_or(StarError::TooLong)?;
                    let mirror_id = self.client.send_message(board, &text).await?;
                    config.record_endorsement(message_id, user_id, mirror_id)?;
                    self.store.save(guild_id, &config).await?;
                    Ok(EndorseOutcome::Created {
                        starboard_message_id: mirror_id,
                    })
                }
            }
        }
    }

    /// Sets up the board channel for a guild. Fails while the recorded
    /// channel is still live; a channel deleted behind our back is replaced
    /// and its star data discarded.
    pub async fn configure(&self, guild_id: u64, name: &str) -> Result<u64, StarError> {
        let lock = self.guild_lock(guild_id);
        let _guard = lock.lock().await;

        let config = self.store.load(guild_id).await?;
        if let Some(existing) = config.starboard_channel_id {
            if self.client.channel_exists(existing).await? {
                return Err(StarError::AlreadyConfigured {
                    channel_id: existing,
                });
            }
        }

        let channel_id = self.client.create_channel(guild_id, name).await?;
        let fresh = GuildStarConfig {
            starboard_channel_id: Some(channel_id),
            ..Default::default()
        };
        self.store.save(guild_id, &fresh).await?;
        Ok(channel_id)
    }

    /// Best-effort removal of a star invocation message; it is just noise
    /// next to the conversation being starred.
    pub async fn cleanup_invocation(&self, channel_id: u64, message_id: u64) {
        if let Err(err) = self.client.delete_message(channel_id, message_id).await {
            debug!(error = %err, "could not delete star invocation");
        }
    }

    /// Feeds a decoded gateway notification to the engine. Failures here are
    /// logged and swallowed; nothing on this path is user-facing.
    pub async fn handle_event(&self, event: GatewayEvent) {
        let result = match event {
            GatewayEvent::MessageDelete {
                guild_id: Some(guild_id),
                channel_id,
                message_id,
            } => self.mirror_deleted(guild_id, channel_id, message_id).await,
            GatewayEvent::MessageUpdate {
                guild_id: Some(guild_id),
                channel_id,
                message_id,
                content: Some(_),
            } => self.original_edited(guild_id, channel_id, message_id).await,
            // DMs and embed-only edits
            _ => Ok(()),
        };

        if let Err(err) = result {
            warn!(error = %err, "starboard event handling failed");
        }
    }

    /// A message was deleted inside the board channel: if it was one of our
    /// mirrors, forget the entry so the original can be starred afresh.
    /// Deletes anywhere else are ignored; in particular a deleted original
    /// leaves its mirror standing as an archival record.
    async fn mirror_deleted(
        &self,
        guild_id: u64,
        channel_id: u64,
        message_id: u64,
    ) -> Result<(), StarError> {
        let lock = self.guild_lock(guild_id);
        let _guard = lock.lock().await;

        let mut config = self.store.load(guild_id).await?;
        if config.starboard_channel_id != Some(channel_id) {
            return Ok(());
        }

        if let Some(original_id) = config.find_by_mirror(message_id) {
            config.purge(original_id);
            self.store.save(guild_id, &config).await?;
            debug!(guild_id, original_id, "mirror deleted externally, entry purged");
        }
        Ok(())
    }

    /// A tracked original was edited: re-render the mirror with the same
    /// star count. Best effort all the way down; an edit that can no longer
    /// be rendered (or delivered) is dropped and the mirror keeps its
    /// previous text.
    async fn original_edited(
        &self,
        guild_id: u64,
        channel_id: u64,
        message_id: u64,
    ) -> Result<(), StarError> {
        let lock = self.guild_lock(guild_id);
        let _guard = lock.lock().await;

        let config = self.store.load(guild_id).await?;
        let Some(board) = config.starboard_channel_id else {
            return Ok(());
        };
        let Some(entry) = config.entry(message_id) else {
            return Ok(());
        };
        let Some(mirror_id) = entry.starboard_message_id else {
            return Ok(());
        };
        let stars = entry.stars();

        self.resolver.invalidate(message_id);
        let Some(message) = self
            .resolver
            .resolve(self.client.as_ref(), channel_id, message_id)
            .await?
        else {
            return Ok(());
        };

        let Some(text) = render(&message, stars, message_id) else {
            debug!(guild_id, message_id, "edited content too long, keeping previous mirror text");
            return Ok(());
        };

        if let Err(err) = self.client.edit_message(board, mirror_id, &text).await {
            debug!(error = %err, guild_id, message_id, "mirror edit dropped");
        }
        Ok(())
    }
}
