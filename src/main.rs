use std::env;
use std::sync::Arc;

use poise::serenity_prelude as serenity;
use sqlx::SqlitePool;
use tokio::sync::Notify;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod errors;
mod helpers;
mod structs;
mod types;

use types::{Data, Error};

use crate::commands::all_commands;
use crate::helpers::events::GatewayEvent;
use crate::helpers::platform::DiscordClient;
use crate::helpers::schedule_task::schedule_prune_task;
use crate::helpers::splatoon::SplatoonStore;
use crate::helpers::starboard::SqliteStarStore;
use crate::helpers::starboard_manager::Starboard;

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match &error {
        poise::FrameworkError::Setup { error, .. } => panic!("Failed to start bot: {}", error),
        poise::FrameworkError::Command { ctx, error, .. }
        | poise::FrameworkError::ArgumentParse { ctx, error, .. } => {
            error!(command = %ctx.command().name, error = %error, "command failed");

            if let poise::Context::Prefix(prefix_ctx) = ctx {
                let _ = prefix_ctx
                    .msg
                    .react(&prefix_ctx.serenity_context().http, '\u{274c}')
                    .await;
            }
        }
        _ => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!(error = %e, "unhandled framework error");
            }
        }
    }
}

async fn event_handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::MessageUpdate { event, .. } => {
            data.starboard
                .handle_event(GatewayEvent::from_update(event))
                .await;
        }
        serenity::FullEvent::MessageDelete {
            channel_id,
            deleted_message_id,
            guild_id,
        } => {
            data.starboard
                .handle_event(GatewayEvent::from_delete(
                    *guild_id,
                    *channel_id,
                    *deleted_message_id,
                ))
                .await;
        }
        _ => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let token = env::var("DISCORD_TOKEN").expect("Missing DISCORD_TOKEN");
    let db_url = env::var("DATABASE_URL").expect("Missing DATABASE_URL");

    let pool = SqlitePool::connect(&db_url).await?;
    let http_client = Arc::new(serenity::Http::new(&token));

    let star_store = SqliteStarStore::new(pool.clone());
    star_store.create_tables().await?;

    let splatoon = SplatoonStore::new(pool.clone());
    splatoon.create_tables().await?;

    let starboard = Arc::new(Starboard::new(
        Arc::new(star_store),
        Arc::new(DiscordClient::new(Arc::clone(&http_client))),
    ));

    let shutdown = Arc::new(Notify::new());

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("?".into()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup({
            let splatoon = splatoon.clone();
            let shutdown = Arc::clone(&shutdown);
            move |_ctx, ready, _framework| {
                Box::pin(async move {
                    info!(user = %ready.user.name, "connected");

                    tokio::spawn(schedule_prune_task(splatoon.clone(), Arc::clone(&shutdown)));

                    Ok(Data { starboard, splatoon })
                })
            }
        })
        .build();

    let mut client = serenity::Client::builder(token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    shutdown.notify_one();

    Ok(())
}
