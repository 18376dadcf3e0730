use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub sub: String,
    pub special: String,
}

impl Weapon {
    /// Case-insensitive substring match over all three fields.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.sub.to_lowercase().contains(&query)
            || self.special.to_lowercase().contains(&query)
    }
}

/// One rotation slot in the map schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub mode: String,
    pub stages: Vec<String>,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ScheduleEntry {
    pub fn is_over(&self) -> bool {
        self.end <= Utc::now()
    }

    pub fn is_current(&self) -> bool {
        let now = Utc::now();
        self.begin <= now && now < self.end
    }
}

impl fmt::Display for ScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (until {})",
            self.mode,
            self.stages.join(" and "),
            self.end.format("%Y-%m-%d %H:%M UTC")
        )
    }
}

/// One game in a generated scrim set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEntry {
    pub stage: String,
    pub mode: String,
}
