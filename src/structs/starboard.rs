use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StarError;

/// Per-guild starboard record, stored as one JSON document keyed by guild id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuildStarConfig {
    pub starboard_channel_id: Option<u64>,
    #[serde(default)]
    pub entries: HashMap<u64, StarEntry>,
}

/// One tracked original message and its mirror in the starboard channel.
///
/// `starboard_message_id` is set exactly when the first star has been
/// recorded; `starred_by` never holds the same user twice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StarEntry {
    pub starboard_message_id: Option<u64>,
    #[serde(default)]
    pub starred_by: Vec<u64>,
}

impl StarEntry {
    pub fn stars(&self) -> u64 {
        self.starred_by.len() as u64
    }
}

impl GuildStarConfig {
    pub fn entry(&self, message_id: u64) -> Option<&StarEntry> {
        self.entries.get(&message_id)
    }

    /// Records one star, creating the entry on first use. Fails without
    /// mutating anything if the user already starred this message.
    pub fn record_endorsement(
        &mut self,
        message_id: u64,
        user_id: u64,
        starboard_message_id: u64,
    ) -> Result<u64, StarError> {
        let entry = self.entries.entry(message_id).or_default();
        if entry.starred_by.contains(&user_id) {
            return Err(StarError::AlreadyEndorsed);
        }
        entry.starred_by.push(user_id);
        entry.starboard_message_id = Some(starboard_message_id);
        Ok(entry.stars())
    }

    /// Drops the entry entirely. Re-starring afterwards begins a fresh
    /// lifecycle, as if the message had never been on the board.
    pub fn purge(&mut self, message_id: u64) -> Option<StarEntry> {
        self.entries.remove(&message_id)
    }

    /// Finds the original message tracked by the given mirror message.
    pub fn find_by_mirror(&self, starboard_message_id: u64) -> Option<u64> {
        self.entries
            .iter()
            .find(|(_, e)| e.starboard_message_id == Some(starboard_message_id))
            .map(|(id, _)| *id)
    }
}

/// A fetched message, held only long enough to validate and render.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMessage {
    pub author_id: u64,
    pub author_name: String,
    pub channel_id: u64,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    pub attachment_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_star_from_same_user_is_rejected() {
        let mut config = GuildStarConfig::default();
        assert_eq!(config.record_endorsement(1, 10, 99).unwrap(), 1);
        assert!(matches!(
            config.record_endorsement(1, 10, 99),
            Err(StarError::AlreadyEndorsed)
        ));
        assert_eq!(config.entry(1).unwrap().stars(), 1);
    }

    #[test]
    fn distinct_users_accumulate() {
        let mut config = GuildStarConfig::default();
        config.record_endorsement(1, 10, 99).unwrap();
        assert_eq!(config.record_endorsement(1, 11, 99).unwrap(), 2);
        assert_eq!(config.record_endorsement(1, 12, 99).unwrap(), 3);
    }

    #[test]
    fn purge_then_star_restarts_the_lifecycle() {
        let mut config = GuildStarConfig::default();
        config.record_endorsement(1, 10, 99).unwrap();
        config.record_endorsement(1, 11, 99).unwrap();
        assert!(config.purge(1).is_some());
        assert!(config.entry(1).is_none());

        let count = config.record_endorsement(1, 12, 100).unwrap();
        assert_eq!(count, 1);
        assert_eq!(config.entry(1).unwrap().starboard_message_id, Some(100));
    }

    #[test]
    fn find_by_mirror_matches_only_tracked_ids() {
        let mut config = GuildStarConfig::default();
        config.record_endorsement(1, 10, 99).unwrap();
        config.record_endorsement(2, 10, 77).unwrap();
        assert_eq!(config.find_by_mirror(99), Some(1));
        assert_eq!(config.find_by_mirror(77), Some(2));
        assert_eq!(config.find_by_mirror(42), None);
    }

    proptest::proptest! {
        #[test]
        fn starrers_are_never_duplicated(users in proptest::collection::vec(0u64..20, 1..40)) {
            let mut config = GuildStarConfig::default();
            for user in &users {
                let _ = config.record_endorsement(1, *user, 99);
            }

            let entry = config.entry(1).unwrap();
            let mut seen = entry.starred_by.clone();
            seen.sort_unstable();
            seen.dedup();
            proptest::prop_assert_eq!(seen.len(), entry.starred_by.len());

            // and every repeat is rejected
            for user in &users {
                proptest::prop_assert!(matches!(
                    config.record_endorsement(1, *user, 99),
                    Err(StarError::AlreadyEndorsed)
                ));
            }
        }
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut config = GuildStarConfig {
            starboard_channel_id: Some(5),
            ..Default::default()
        };
        config.record_endorsement(1, 10, 99).unwrap();

        let raw = serde_json::to_string(&config).unwrap();
        let back: GuildStarConfig = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.starboard_channel_id, Some(5));
        assert_eq!(back.entry(1).unwrap().starred_by, vec![10]);
        assert_eq!(back.entry(1).unwrap().starboard_message_id, Some(99));
    }
}
