//! Shared voice-message log
//!
//! A bounded FIFO of the most recent messages, shared by every session.
//! Deduplication compares a new clip only with the single most recently
//! stored message, byte for byte, whoever sent it.

use crate::types::{Message, VisibleMessage};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Messages kept before the oldest is evicted
pub const COMMS_LOG_CAPACITY: usize = 15;

/// Result of an append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Stored,
    /// Same audio as the previous message; nothing was stored
    DuplicateIgnored,
}

/// Broadcasts are visible to everyone, direct messages to sender and
/// recipient only
pub fn visible_to(viewer: &str, message: &Message) -> bool {
    message.is_visible_to(viewer)
}

#[derive(Debug)]
pub struct CommsStore {
    log: Mutex<VecDeque<Message>>,
    capacity: usize,
}

impl Default for CommsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CommsStore {
    pub fn new() -> Self {
        Self::with_capacity(COMMS_LOG_CAPACITY)
    }

    /// Log holding at most `capacity` messages (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            log: Mutex::new(VecDeque::with_capacity(capacity + 1)),
            capacity,
        }
    }

    fn log(&self) -> MutexGuard<'_, VecDeque<Message>> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn append(&self, message: Message) -> AppendOutcome {
        let mut log = self.log();
        if let Some(last) = log.back() {
            if last.audio.as_bytes() == message.audio.as_bytes() {
                debug!(
                    "Ignoring duplicate audio from {} ({} bytes)",
                    message.sender,
                    message.audio.len()
                );
                return AppendOutcome::DuplicateIgnored;
            }
        }
        log.push_back(message);
        while log.len() > self.capacity {
            log.pop_front();
        }
        AppendOutcome::Stored
    }

    /// Messages visible to `viewer`, newest first, tagged for display
    pub fn list_visible(&self, viewer: &str) -> Vec<VisibleMessage> {
        self.snapshot()
            .into_iter()
            .rev()
            .filter_map(|message| {
                message
                    .tag_for(viewer)
                    .map(|tag| VisibleMessage { tag, message })
            })
            .collect()
    }

    /// Point-in-time copy, oldest first
    pub fn snapshot(&self) -> Vec<Message> {
        self.log().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.log().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageTag, Recipient};

    fn clip(n: u8) -> Vec<u8> {
        vec![n; 8]
    }

    #[test]
    fn test_log_never_exceeds_capacity() {
        let store = CommsStore::new();
        for i in 0..40u8 {
            store.append(Message::new("Maverick", Recipient::Broadcast, i as u64, clip(i)));
            assert!(store.len() <= COMMS_LOG_CAPACITY);
        }
        let kept = store.snapshot();
        assert_eq!(kept.len(), COMMS_LOG_CAPACITY);
        // oldest evicted first
        assert_eq!(kept[0].timestamp, 25);
        assert_eq!(kept[14].timestamp, 39);
    }

    #[test]
    fn test_consecutive_duplicate_stored_once() {
        let store = CommsStore::new();
        let first = store.append(Message::new("Maverick", Recipient::Broadcast, 1, clip(7)));
        // different sender and recipient, same bytes
        let second = store.append(Message::new("Goose", Recipient::direct("Iceman"), 2, clip(7)));
        assert_eq!(first, AppendOutcome::Stored);
        assert_eq!(second, AppendOutcome::DuplicateIgnored);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_dedup_only_checks_most_recent() {
        let store = CommsStore::new();
        store.append(Message::new("Maverick", Recipient::Broadcast, 1, clip(1)));
        store.append(Message::new("Maverick", Recipient::Broadcast, 2, clip(2)));
        let outcome = store.append(Message::new("Maverick", Recipient::Broadcast, 3, clip(1)));
        assert_eq!(outcome, AppendOutcome::Stored);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_list_visible_newest_first_and_tagged() {
        let store = CommsStore::new();
        store.append(Message::new("Maverick", Recipient::Broadcast, 1, clip(1)));
        store.append(Message::new("Maverick", Recipient::direct("Goose"), 2, clip(2)));
        store.append(Message::new("Iceman", Recipient::direct("Viper"), 3, clip(3)));
        store.append(Message::new("Goose", Recipient::direct("Maverick"), 4, clip(4)));

        let goose = store.list_visible("Goose");
        let summary: Vec<_> = goose
            .iter()
            .map(|v| (v.message.timestamp, v.tag))
            .collect();
        assert_eq!(
            summary,
            vec![
                (4, MessageTag::DirectSent),
                (2, MessageTag::DirectReceived),
                (1, MessageTag::Broadcast),
            ]
        );

        let outsider = store.list_visible("Jester");
        assert_eq!(outsider.len(), 1);
        assert_eq!(outsider[0].tag, MessageTag::Broadcast);
    }

    #[test]
    fn test_visible_to_rule() {
        let msg = Message::new("Z", Recipient::direct("Y"), 0, clip(0));
        for viewer in ["X", "Y", "Z"] {
            assert_eq!(visible_to(viewer, &msg), viewer == "Y" || viewer == "Z");
        }
        let broadcast = Message::new("Z", Recipient::Broadcast, 0, clip(0));
        assert!(visible_to("X", &broadcast));
    }

    #[test]
    fn test_custom_capacity_floor() {
        let store = CommsStore::with_capacity(0);
        assert_eq!(store.capacity(), 1);
        store.append(Message::new("A", Recipient::Broadcast, 1, clip(1)));
        store.append(Message::new("A", Recipient::Broadcast, 2, clip(2)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot()[0].timestamp, 2);
    }
}
