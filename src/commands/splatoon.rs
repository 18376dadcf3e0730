use rand::rng;

use crate::helpers::scrims;
use crate::types::{Context, Data, Error};

pub fn all_commands() -> Vec<poise::Command<Data, Error>> {
    vec![scrim(), weapon(), maps(), schedule()]
}

/// Generates Splatoon scrim map and mode combinations.
///
/// Modes rotate between the ranked modes unless you pick one, in which
/// case every game uses that mode instead.
#[poise::command(slash_command, prefix_command)]
pub async fn scrim(
    ctx: Context<'_>,
    #[description = "Number of games"] games: Option<u32>,
    #[description = "Play a single mode instead of rotating"]
    #[rest]
    mode: Option<String>,
) -> Result<(), Error> {
    let stages = ctx.data().splatoon.stages().await?;
    let games = games.unwrap_or(5) as usize;

    let lines = match mode {
        Some(raw) => {
            let Some(mode) = scrims::resolve_mode(&raw) else {
                ctx.say("Could not figure out what mode you meant.").await?;
                return Ok(());
            };
            let scrims = scrims::fixed_mode_scrims(&mut rng(), &stages, games, mode);
            match scrims {
                Some(set) => {
                    let mut lines = vec![format!("The following games will be played in {mode}.")];
                    lines.extend(
                        set.iter()
                            .enumerate()
                            .map(|(i, game)| format!("Game {}: {}", i + 1, game.stage)),
                    );
                    lines
                }
                None => {
                    ctx.say("Not enough stages registered to generate scrims.")
                        .await?;
                    return Ok(());
                }
            }
        }
        None => match {
            let scrims = scrims::random_scrims(&mut rng(), &stages, games);
            scrims
        } {
            Some(set) => set
                .iter()
                .enumerate()
                .map(|(i, game)| format!("Game {}: {} on {}", i + 1, game.mode, game.stage))
                .collect(),
            None => {
                ctx.say("Not enough stages registered to generate scrims.")
                    .await?;
                return Ok(());
            }
        },
    };

    ctx.say(lines.join("\n")).await?;
    Ok(())
}

/// Displays Splatoon weapon info from a query.
///
/// The query must be at least 3 characters long and matches the weapon
/// name, sub or special.
#[poise::command(slash_command, prefix_command)]
pub async fn weapon(
    ctx: Context<'_>,
    #[description = "Name, sub or special to search for"]
    #[rest]
    query: String,
) -> Result<(), Error> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < 3 {
        ctx.say("The query must be at least 3 characters long.").await?;
        return Ok(());
    }

    let results = ctx.data().splatoon.find_weapons(&query).await?;
    if results.is_empty() {
        ctx.say("No results found.").await?;
        return Ok(());
    }

    let mut output = vec![format!(
        "Found {} weapon{}:",
        results.len(),
        if results.len() == 1 { "" } else { "s" }
    )];
    output.extend(results.iter().map(|w| {
        format!("**{}**\nSub: {}, Special: {}", w.name, w.sub, w.special)
    }));

    ctx.say(output.join("\n")).await?;
    Ok(())
}

/// Shows the current maps in the Splatoon schedule.
#[poise::command(slash_command, prefix_command)]
pub async fn maps(ctx: Context<'_>) -> Result<(), Error> {
    let schedule = ctx.data().splatoon.schedule().await?;
    match schedule.iter().find(|e| e.is_current()) {
        Some(current) => ctx.say(current.to_string()).await?,
        None => ctx.say("No map data found. Try again later.").await?,
    };
    Ok(())
}

/// Shows the upcoming Splatoon schedule.
#[poise::command(slash_command, prefix_command)]
pub async fn schedule(ctx: Context<'_>) -> Result<(), Error> {
    let schedule = ctx.data().splatoon.schedule().await?;
    let upcoming: Vec<String> = schedule
        .iter()
        .filter(|e| !e.is_over())
        .map(|e| e.to_string())
        .collect();

    if upcoming.is_empty() {
        ctx.say("No map data found. Try again later.").await?;
    } else {
        ctx.say(upcoming.join("\n")).await?;
    }
    Ok(())
}
