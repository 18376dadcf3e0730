use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use crate::structs::splatoon::GameEntry;

pub const RANKED_MODES: [&str; 3] = ["Rainmaker", "Splat Zones", "Tower Control"];

/// Fewer than this and the stage-repetition rule cannot be satisfied.
pub const MIN_GAMES: usize = 3;

fn is_valid_entry(result: &[GameEntry], entry: &GameEntry) -> bool {
    // no duplicate stage/mode pairs
    if result.contains(entry) {
        return false;
    }

    // the stage must not have been played in the last two games
    result
        .iter()
        .rev()
        .take(2)
        .all(|prev| prev.stage != entry.stage)
}

/// Clamp the requested game count the way scrim organizers expect: never
/// more games than stages, never fewer than three.
pub fn clamp_games(games: usize, stage_count: usize) -> usize {
    games.min(stage_count).max(MIN_GAMES)
}

/// Generates a scrim set with rotating modes. Requires at least three
/// stages, otherwise the repetition rule above can never be met.
pub fn random_scrims<R: Rng>(
    rng: &mut R,
    stages: &[String],
    games: usize,
) -> Option<Vec<GameEntry>> {
    if stages.len() < MIN_GAMES {
        return None;
    }

    let mut modes: Vec<&str> = RANKED_MODES.to_vec();
    modes.shuffle(rng);

    let count = clamp_games(games, stages.len());
    let mut result = Vec::with_capacity(count);
    let mut mode_index = 0;

    for _ in 0..count {
        loop {
            let entry = GameEntry {
                stage: stages.choose(rng)?.clone(),
                mode: modes[mode_index].to_string(),
            };
            if is_valid_entry(&result, &entry) {
                result.push(entry);
                mode_index = (mode_index + 1) % modes.len();
                break;
            }
        }
    }

    Some(result)
}

/// Single-mode variant: distinct stages, sampled without replacement.
pub fn fixed_mode_scrims<R: Rng>(
    rng: &mut R,
    stages: &[String],
    games: usize,
    mode: &str,
) -> Option<Vec<GameEntry>> {
    if stages.len() < MIN_GAMES {
        return None;
    }

    let count = clamp_games(games, stages.len());
    let picks = stages.choose_multiple(rng, count);
    Some(
        picks
            .map(|stage| GameEntry {
                stage: stage.clone(),
                mode: mode.to_string(),
            })
            .collect(),
    )
}

/// Resolves a user-supplied mode string. Shortcuts first, then a
/// case-insensitive containment match against the known modes.
pub fn resolve_mode(query: &str) -> Option<&'static str> {
    let query = query.trim().to_lowercase();
    match query.as_str() {
        "rm" => return Some("Rainmaker"),
        "sz" => return Some("Splat Zones"),
        "tc" => return Some("Tower Control"),
        "tw" => return Some("Turf War"),
        _ => {}
    }

    RANKED_MODES
        .iter()
        .chain(["Turf War"].iter())
        .find(|mode| mode.to_lowercase().contains(&query))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn stages(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Stage {i}")).collect()
    }

    #[test]
    fn rotating_scrims_have_no_duplicate_pairs() {
        let stages = stages(6);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let games = random_scrims(&mut rng, &stages, 6).unwrap();
            for (i, a) in games.iter().enumerate() {
                assert!(!games[i + 1..].contains(a), "duplicate pair with seed {seed}");
            }
        }
    }

    #[test]
    fn a_stage_never_repeats_within_two_games() {
        let stages = stages(5);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let games = random_scrims(&mut rng, &stages, 5).unwrap();
            for window in games.windows(3) {
                assert_ne!(window[0].stage, window[1].stage);
                assert_ne!(window[0].stage, window[2].stage);
                assert_ne!(window[1].stage, window[2].stage);
            }
        }
    }

    #[test]
    fn modes_rotate_cyclically() {
        let stages = stages(9);
        let mut rng = StdRng::seed_from_u64(3);
        let games = random_scrims(&mut rng, &stages, 9).unwrap();
        for (i, game) in games.iter().enumerate() {
            assert_eq!(game.mode, games[i % 3].mode);
        }
        // all three modes appear in the first rotation
        let first: Vec<&str> = games[..3].iter().map(|g| g.mode.as_str()).collect();
        for mode in RANKED_MODES {
            assert!(first.contains(&mode));
        }
    }

    #[test]
    fn game_count_is_clamped() {
        assert_eq!(clamp_games(5, 4), 4);
        assert_eq!(clamp_games(1, 10), 3);
        assert_eq!(clamp_games(7, 10), 7);
    }

    #[test]
    fn too_few_stages_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(random_scrims(&mut rng, &stages(2), 5).is_none());
        assert!(fixed_mode_scrims(&mut rng, &stages(2), 5, "Rainmaker").is_none());
    }

    #[test]
    fn fixed_mode_uses_distinct_stages() {
        let stages = stages(8);
        let mut rng = StdRng::seed_from_u64(11);
        let games = fixed_mode_scrims(&mut rng, &stages, 8, "Splat Zones").unwrap();
        assert_eq!(games.len(), 8);
        for (i, game) in games.iter().enumerate() {
            assert_eq!(game.mode, "Splat Zones");
            assert!(!games[i + 1..].iter().any(|g| g.stage == game.stage));
        }
    }

    #[test]
    fn mode_queries_resolve() {
        assert_eq!(resolve_mode("rm"), Some("Rainmaker"));
        assert_eq!(resolve_mode("SZ"), Some("Splat Zones"));
        assert_eq!(resolve_mode("zones"), Some("Splat Zones"));
        assert_eq!(resolve_mode("turf"), Some("Turf War"));
        assert_eq!(resolve_mode("chess"), None);
    }
}
