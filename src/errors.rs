use thiserror::Error;

/// Failures talking to Discord itself.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("missing permissions")]
    Forbidden,
    #[error("channel name rejected")]
    BadChannelName,
    #[error("platform request failed: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("corrupt config record: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Everything a starboard operation can fail with. The validation variants
/// are surfaced to the invoking user and never mutate state; `Platform` and
/// `Store` are operational failures scoped to a single guild operation.
#[derive(Debug, Error)]
pub enum StarError {
    #[error("starboard channel is not configured")]
    NotConfigured,
    #[error("user already starred this message")]
    AlreadyEndorsed,
    #[error("message could not be found")]
    MessageNotFound,
    #[error("cannot star your own message")]
    SelfStar,
    #[error("cannot star messages inside the starboard")]
    InsideStarboard,
    #[error("message is older than the starring window")]
    TooOld,
    #[error("rendered entry would exceed the message limit")]
    TooLong,
    #[error("starboard already exists in channel {channel_id}")]
    AlreadyConfigured { channel_id: u64 },
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl StarError {
    /// Whether this is a user mistake rather than an operational failure.
    pub fn is_validation(&self) -> bool {
        !matches!(self, StarError::Platform(_) | StarError::Store(_))
    }
}
