use crate::types::{normalize_callsign, Timestamp};
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sender name recorded when a session has not set a callsign
pub const UNKNOWN_SENDER: &str = "Unknown";

/// Addressee of a voice message
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Recipient {
    /// Everyone in the fleet
    Broadcast,
    /// A single callsign
    Direct(String),
}

impl Recipient {
    pub fn direct(callsign: &str) -> Self {
        Recipient::Direct(normalize_callsign(callsign).to_string())
    }

    pub fn is_broadcast(&self) -> bool {
        matches!(self, Recipient::Broadcast)
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::Broadcast => f.write_str("All"),
            Recipient::Direct(callsign) => f.write_str(callsign),
        }
    }
}

/// Recorded audio, opaque to the core
///
/// Shared so that snapshots of the comms log never copy payloads.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AudioClip(Arc<[u8]>);

impl AudioClip {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for AudioClip {
    fn from(bytes: Vec<u8>) -> Self {
        AudioClip(Arc::from(bytes))
    }
}

impl From<&[u8]> for AudioClip {
    fn from(bytes: &[u8]) -> Self {
        AudioClip(Arc::from(bytes))
    }
}

impl fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AudioClip({} bytes)", self.0.len())
    }
}

/// A voice message; immutable once stored
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Message {
    pub sender: String,
    pub recipient: Recipient,
    pub timestamp: Timestamp,
    pub audio: AudioClip,
}

impl Message {
    pub fn new(
        sender: &str,
        recipient: Recipient,
        timestamp: Timestamp,
        audio: impl Into<AudioClip>,
    ) -> Self {
        Self {
            sender: sender.to_string(),
            recipient,
            timestamp,
            audio: audio.into(),
        }
    }

    /// Broadcasts are visible to everyone; direct messages only to their
    /// sender and recipient.
    pub fn is_visible_to(&self, viewer: &str) -> bool {
        self.tag_for(viewer).is_some()
    }

    /// Whether `viewer` sent this message; nobody owns anonymous messages
    fn is_sent_by(&self, viewer: &str) -> bool {
        self.sender != UNKNOWN_SENDER && normalize_callsign(&self.sender) == viewer
    }

    /// Presentation tag from the viewer's perspective, `None` if invisible
    pub fn tag_for(&self, viewer: &str) -> Option<MessageTag> {
        let viewer = normalize_callsign(viewer);
        match &self.recipient {
            Recipient::Broadcast => Some(MessageTag::Broadcast),
            Recipient::Direct(callsign) if normalize_callsign(callsign) == viewer => {
                Some(MessageTag::DirectReceived)
            }
            Recipient::Direct(_) if self.is_sent_by(viewer) => Some(MessageTag::DirectSent),
            Recipient::Direct(_) => None,
        }
    }
}

/// How a visible message is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MessageTag {
    Broadcast,
    DirectReceived,
    DirectSent,
}

impl MessageTag {
    pub fn is_private(&self) -> bool {
        !matches!(self, MessageTag::Broadcast)
    }
}

/// A message in a viewer's inbox
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VisibleMessage {
    pub tag: MessageTag,
    pub message: Message,
}

impl VisibleMessage {
    /// One-line heading such as `Goose (Direct) (14:05)`
    pub fn heading(&self) -> String {
        let clock = crate::conversion::format_clock(self.message.timestamp);
        match self.tag {
            MessageTag::Broadcast => format!("{} ({})", self.message.sender, clock),
            MessageTag::DirectReceived => {
                format!("{} (Direct) ({})", self.message.sender, clock)
            }
            MessageTag::DirectSent => format!("To: {} ({})", self.message.recipient, clock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direct(from: &str, to: &str) -> Message {
        Message::new(from, Recipient::direct(to), 0, vec![1u8, 2, 3])
    }

    #[test]
    fn test_broadcast_visible_to_everyone() {
        let msg = Message::new("Maverick", Recipient::Broadcast, 0, vec![0u8]);
        for viewer in ["Maverick", "Goose", "", "Iceman"] {
            assert!(msg.is_visible_to(viewer));
            assert_eq!(msg.tag_for(viewer), Some(MessageTag::Broadcast));
        }
    }

    #[test]
    fn test_direct_visible_to_sender_and_recipient_only() {
        let msg = direct("Maverick", "Goose");
        assert!(msg.is_visible_to("Goose"));
        assert!(msg.is_visible_to("Maverick"));
        assert!(!msg.is_visible_to("Iceman"));

        assert_eq!(msg.tag_for("Goose"), Some(MessageTag::DirectReceived));
        assert_eq!(msg.tag_for("Maverick"), Some(MessageTag::DirectSent));
        assert_eq!(msg.tag_for("Iceman"), None);
    }

    #[test]
    fn test_padded_viewer_matches_direct_message() {
        let msg = Message::new("Maverick ", Recipient::Direct(" Goose".to_string()), 0, vec![1u8]);
        assert_eq!(msg.tag_for(" Goose "), Some(MessageTag::DirectReceived));
        assert_eq!(msg.tag_for("Maverick"), Some(MessageTag::DirectSent));
    }

    #[test]
    fn test_anonymous_direct_messages_have_no_sender_view() {
        let msg = Message::new(UNKNOWN_SENDER, Recipient::direct("Goose"), 0, vec![1u8]);
        assert_eq!(msg.tag_for(UNKNOWN_SENDER), None);
        assert!(!msg.is_visible_to(UNKNOWN_SENDER));
        assert_eq!(msg.tag_for("Goose"), Some(MessageTag::DirectReceived));
    }

    #[test]
    fn test_heading_labels() {
        let received = VisibleMessage {
            tag: MessageTag::DirectReceived,
            message: Message::new("Maverick", Recipient::direct("Goose"), 14 * 3600 + 5 * 60, vec![1u8]),
        };
        assert_eq!(received.heading(), "Maverick (Direct) (14:05)");

        let sent = VisibleMessage {
            tag: MessageTag::DirectSent,
            ..received.clone()
        };
        assert_eq!(sent.heading(), "To: Goose (14:05)");
        assert!(sent.tag.is_private());
    }

    #[test]
    fn test_audio_debug_hides_payload() {
        let clip = AudioClip::from(vec![0u8; 2048]);
        assert_eq!(format!("{:?}", clip), "AudioClip(2048 bytes)");
    }
}
