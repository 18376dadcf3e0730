use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::errors::PlatformError;
use crate::helpers::platform::ChatClient;
use crate::structs::starboard::ResolvedMessage;

/// Working set of recently starred messages; old entries fall out once the
/// board moves on.
const CACHE_CAPACITY: usize = 256;

struct LruCache {
    map: HashMap<u64, ResolvedMessage>,
    order: VecDeque<u64>,
    capacity: usize,
}

impl LruCache {
    fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    fn touch(&mut self, message_id: u64) {
        self.order.retain(|id| *id != message_id);
        self.order.push_back(message_id);
    }

    fn get(&mut self, message_id: u64) -> Option<ResolvedMessage> {
        let hit = self.map.get(&message_id).cloned()?;
        self.touch(message_id);
        Some(hit)
    }

    fn insert(&mut self, message_id: u64, message: ResolvedMessage) {
        while self.map.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.map.remove(&oldest);
                }
                None => break,
            }
        }
        self.map.insert(message_id, message);
        self.touch(message_id);
    }

    fn remove(&mut self, message_id: u64) {
        self.map.remove(&message_id);
        self.order.retain(|id| *id != message_id);
    }
}

/// Resolves (channel, message id) pairs to message content, saving Discord
/// some HTTP requests. Cached entries are immutable; edit propagation calls
/// `invalidate` before re-resolving.
pub struct MessageResolver {
    cache: Mutex<LruCache>,
}

impl MessageResolver {
    pub fn new() -> Self {
        Self::with_capacity(CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// At most one platform fetch per uncached lookup. Misses are not
    /// cached, so a message that appears later can still be found.
    pub async fn resolve(
        &self,
        client: &dyn ChatClient,
        channel_id: u64,
        message_id: u64,
    ) -> Result<Option<ResolvedMessage>, PlatformError> {
        if let Some(hit) = self.cache.lock().unwrap().get(message_id) {
            return Ok(Some(hit));
        }

        let fetched = client.fetch_message(channel_id, message_id).await?;
        if let Some(ref message) = fetched {
            self.cache
                .lock()
                .unwrap()
                .insert(message_id, message.clone());
        }
        Ok(fetched)
    }

    pub fn invalidate(&self, message_id: u64) {
        self.cache.lock().unwrap().remove(message_id);
    }
}

impl Default for MessageResolver {
    fn default() -> Self {
        Self::new()
    }
}
