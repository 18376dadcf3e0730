use crate::errors::StarError;
use crate::types::{Context, Data, Error};

pub fn all_commands() -> Vec<poise::Command<Data, Error>> {
    vec![star(), starboard()]
}

fn star_failure(err: &StarError) -> String {
    match err {
        StarError::NotConfigured => "\u{26a0} Starboard channel not found.".into(),
        StarError::AlreadyEndorsed => "\u{1f6ab} You already starred this message.".into(),
        StarError::MessageNotFound => "\u{2753} This message could not be found.".into(),
        StarError::SelfStar => "\u{1f6ab} You cannot star your own message.".into(),
        StarError::InsideStarboard => "\u{1f6ab} You cannot star messages in the starboard.".into(),
        StarError::TooOld => "\u{1f6ab} This message is older than 7 days.".into(),
        StarError::TooLong => "\u{1f6ab} This message is too big to be starred.".into(),
        _ => "\u{26a0} Something went wrong while starring. Try again later.".into(),
    }
}

/// Stars a message via message ID.
///
/// You can only star a message once, and you cannot star messages older
/// than 7 days. Enable Developer Mode to get the Copy ID option.
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn star(
    ctx: Context<'_>,
    #[description = "ID of the message to star"] message: u64,
) -> Result<(), Error> {
    let guild_id = match ctx.guild_id() {
        Some(id) => id.get(),
        None => return Ok(()),
    };

    let starboard = &ctx.data().starboard;
    let result = starboard
        .endorse(guild_id, ctx.channel_id().get(), message, ctx.author().id.get())
        .await;

    match result {
        Ok(_) => {
            match ctx {
                // the invocation is noise next to the starred message
                poise::Context::Prefix(prefix_ctx) => {
                    starboard
                        .cleanup_invocation(ctx.channel_id().get(), prefix_ctx.msg.id.get())
                        .await;
                }
                poise::Context::Application(_) => {
                    ctx.say("\u{2b50}").await?;
                }
            }
        }
        Err(err) => {
            if !err.is_validation() {
                tracing::warn!(error = %err, guild_id, "star command failed");
            }
            ctx.say(star_failure(&err)).await?;
        }
    }

    Ok(())
}

/// Sets up the starboard for this server.
///
/// Creates a new channel with the given name (default "starboard") and
/// makes it the server's starboard. If the old starboard channel was
/// deleted, this replaces it and clears the old star data.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn starboard(
    ctx: Context<'_>,
    #[description = "Name for the starboard channel"] name: Option<String>,
) -> Result<(), Error> {
    let guild_id = match ctx.guild_id() {
        Some(id) => id.get(),
        None => return Ok(()),
    };
    let name = name.unwrap_or_else(|| "starboard".to_string());

    match ctx.data().starboard.configure(guild_id, &name).await {
        Ok(channel_id) => {
            ctx.say(format!("\u{1f31f} Starboard created at <#{channel_id}>"))
                .await?;
        }
        Err(StarError::AlreadyConfigured { channel_id }) => {
            ctx.say(format!(
                "This server already has a starboard (<#{channel_id}>)"
            ))
            .await?;
        }
        Err(StarError::Platform(crate::errors::PlatformError::Forbidden)) => {
            ctx.say("\u{1f6ab} I do not have permissions to create a channel.")
                .await?;
        }
        Err(StarError::Platform(crate::errors::PlatformError::BadChannelName)) => {
            ctx.say("\u{1f52b} This channel name is bad or an unknown error happened.")
                .await?;
        }
        Err(err) => {
            tracing::warn!(error = %err, guild_id, "starboard setup failed");
            ctx.say("\u{26a0} Could not set up the starboard. Try again later.")
                .await?;
        }
    }

    Ok(())
}
