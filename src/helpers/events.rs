use poise::serenity_prelude as serenity;
use serde::Deserialize;

/// Gateway notifications the starboard reacts to, decoded into a tagged
/// variant before they reach the sync engine. Everything else is dropped at
/// this boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    MessageUpdate {
        guild_id: Option<u64>,
        channel_id: u64,
        message_id: u64,
        /// None for embed-only edits, which carry no new content.
        content: Option<String>,
    },
    MessageDelete {
        guild_id: Option<u64>,
        channel_id: u64,
        message_id: u64,
    },
}

#[derive(Deserialize)]
struct RawFrame {
    #[serde(rename = "t")]
    event: Option<String>,
    #[serde(rename = "d")]
    payload: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct RawPayload {
    id: String,
    channel_id: String,
    #[serde(default)]
    guild_id: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

fn parse_id(raw: &str) -> Option<u64> {
    raw.parse().ok()
}

impl GatewayEvent {
    /// Decodes a raw gateway frame. Binary or non-JSON frames, unknown event
    /// types, and malformed ids all yield `None`.
    pub fn from_frame(frame: &[u8]) -> Option<GatewayEvent> {
        let frame: RawFrame = serde_json::from_slice(frame).ok()?;
        let event = frame.event?;
        if event != "MESSAGE_UPDATE" && event != "MESSAGE_DELETE" {
            return None;
        }

        let payload: RawPayload = serde_json::from_value(frame.payload?).ok()?;
        let message_id = parse_id(&payload.id)?;
        let channel_id = parse_id(&payload.channel_id)?;
        let guild_id = match payload.guild_id {
            Some(raw) => Some(parse_id(&raw)?),
            None => None,
        };

        Some(if event == "MESSAGE_DELETE" {
            GatewayEvent::MessageDelete {
                guild_id,
                channel_id,
                message_id,
            }
        } else {
            GatewayEvent::MessageUpdate {
                guild_id,
                channel_id,
                message_id,
                content: payload.content,
            }
        })
    }

    pub fn from_update(event: &serenity::MessageUpdateEvent) -> GatewayEvent {
        GatewayEvent::MessageUpdate {
            guild_id: event.guild_id.map(|id| id.get()),
            channel_id: event.channel_id.get(),
            message_id: event.id.get(),
            content: event.content.clone(),
        }
    }

    pub fn from_delete(
        guild_id: Option<serenity::GuildId>,
        channel_id: serenity::ChannelId,
        message_id: serenity::MessageId,
    ) -> GatewayEvent {
        GatewayEvent::MessageDelete {
            guild_id: guild_id.map(|id| id.get()),
            channel_id: channel_id.get(),
            message_id: message_id.get(),
        }
    }
}
