use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::PlatformError;
use crate::helpers::platform::ChatClient;
use crate::structs::starboard::ResolvedMessage;

/// Scripted platform client for the sync engine tests. Records every write
/// so tests can assert on exactly which calls were issued.
pub struct MockClient {
    messages: Mutex<HashMap<(u64, u64), ResolvedMessage>>,
    channels: Mutex<HashSet<u64>>,
    missing_mirrors: Mutex<HashSet<u64>>,
    sent: Mutex<Vec<(u64, String)>>,
    edits: Mutex<Vec<(u64, u64, String)>>,
    deletes: Mutex<Vec<(u64, u64)>>,
    created: AtomicU64,
    fetches: AtomicU64,
    next_id: AtomicU64,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(HashMap::new()),
            channels: Mutex::new(HashSet::new()),
            missing_mirrors: Mutex::new(HashSet::new()),
            sent: Mutex::new(Vec::new()),
            edits: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
            created: AtomicU64::new(0),
            fetches: AtomicU64::new(0),
            next_id: AtomicU64::new(9000),
        }
    }

    pub fn put_message(&self, channel_id: u64, message_id: u64, message: ResolvedMessage) {
        self.messages
            .lock()
            .unwrap()
            .insert((channel_id, message_id), message);
    }

    pub fn put_channel(&self, channel_id: u64) {
        self.channels.lock().unwrap().insert(channel_id);
    }

    pub fn drop_channel(&self, channel_id: u64) {
        self.channels.lock().unwrap().remove(&channel_id);
    }

    /// Make subsequent edits of this message report it gone.
    pub fn mark_mirror_missing(&self, message_id: u64) {
        self.missing_mirrors.lock().unwrap().insert(message_id);
    }

    pub fn sent_messages(&self) -> Vec<(u64, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn edits(&self) -> Vec<(u64, u64, String)> {
        self.edits.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<(u64, u64)> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn created_channels(&self) -> u64 {
        self.created.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatClient for MockClient {
    async fn fetch_message(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<Option<ResolvedMessage>, PlatformError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .messages
            .lock()
            .unwrap()
            .get(&(channel_id, message_id))
            .cloned())
    }

    async fn send_message(&self, channel_id: u64, text: &str) -> Result<u64, PlatformError> {
        self.sent.lock().unwrap().push((channel_id, text.to_string()));
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        text: &str,
    ) -> Result<bool, PlatformError> {
        if self.missing_mirrors.lock().unwrap().contains(&message_id) {
            return Ok(false);
        }
        self.edits
            .lock()
            .unwrap()
            .push((channel_id, message_id, text.to_string()));
        Ok(true)
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), PlatformError> {
        self.deletes.lock().unwrap().push((channel_id, message_id));
        Ok(())
    }

    async fn create_channel(&self, _guild_id: u64, _name: &str) -> Result<u64, PlatformError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.put_channel(id);
        Ok(id)
    }

    async fn channel_exists(&self, channel_id: u64) -> Result<bool, PlatformError> {
        Ok(self.channels.lock().unwrap().contains(&channel_id))
    }
}
