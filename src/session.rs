//! Session context and shared-store handles
//!
//! A [`FleetHub`] is created once per process and cloned into every user
//! session. A [`Session`] owns everything that belongs to one user and is only
//! mutated by that user's own actions.

use crate::comms::{AppendOutcome, CommsStore};
use crate::config::Preferences;
use crate::error::{ChartError, Result};
use crate::planner::RoutePlanner;
use crate::presence::{PresenceChange, PresenceStore};
use crate::track::TrackRecorder;
use crate::types::{
    AudioClip, Fix, Message, Position, Recipient, Timestamp, VisibleMessage, VisibleVessel,
    DEFAULT_POSITION, UNKNOWN_SENDER,
};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Handles to the process-wide stores
#[derive(Debug, Clone, Default)]
pub struct FleetHub {
    pub presence: Arc<PresenceStore>,
    pub comms: Arc<CommsStore>,
}

impl FleetHub {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Result of watching another vessel
#[derive(Debug, Clone, PartialEq)]
pub enum Watch {
    Tracking(VisibleVessel),
    Private,
    Offline,
}

/// Current wall-clock time as a Unix timestamp
pub fn now() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct Session {
    preferences: Preferences,
    position: Position,
    recorder: TrackRecorder,
    planner: RoutePlanner,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

impl Session {
    pub fn new(preferences: Preferences) -> Self {
        let planner = RoutePlanner::new(preferences.default_speed_kts);
        Self {
            preferences,
            position: DEFAULT_POSITION,
            recorder: TrackRecorder::new(),
            planner,
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Replace preferences; presence changes take effect on the next fix
    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.planner.set_default_speed(preferences.default_speed_kts);
        self.preferences = preferences;
    }

    pub fn callsign(&self) -> &str {
        &self.preferences.callsign
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn recorder(&self) -> &TrackRecorder {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut TrackRecorder {
        &mut self.recorder
    }

    pub fn planner(&self) -> &RoutePlanner {
        &self.planner
    }

    pub fn planner_mut(&mut self) -> &mut RoutePlanner {
        &mut self.planner
    }

    /// Apply a GPS fix: move, record the track and push presence
    ///
    /// Presence is only shared once a callsign is set; `None` means nothing
    /// was pushed.
    pub fn on_fix(&mut self, fix: Fix, hub: &FleetHub) -> Result<Option<PresenceChange>> {
        self.position = fix.position;
        self.recorder.record(fix);

        if !self.preferences.has_callsign() {
            return Ok(None);
        }
        let update = self.preferences.presence_update(fix.position, fix.timestamp);
        let change = hub.presence.upsert(update)?;
        debug!("{} presence {:?}", self.callsign(), change);
        Ok(Some(change))
    }

    /// Post a voice clip to the shared log at `timestamp`
    ///
    /// Sender is the session callsign, or `"Unknown"` if none is set. A
    /// direct message needs a non-empty recipient.
    pub fn send_voice_at(
        &self,
        recipient: Recipient,
        audio: impl Into<AudioClip>,
        timestamp: Timestamp,
        hub: &FleetHub,
    ) -> Result<AppendOutcome> {
        if let Recipient::Direct(callsign) = &recipient {
            if callsign.trim().is_empty() {
                return Err(ChartError::InvalidCallsign);
            }
        }
        let sender = if self.preferences.has_callsign() {
            self.callsign()
        } else {
            UNKNOWN_SENDER
        };
        let target = recipient.to_string();
        let outcome = hub
            .comms
            .append(Message::new(sender, recipient, timestamp, audio));
        if outcome == AppendOutcome::Stored {
            info!("Voice message from {} to {}", sender, target);
        }
        Ok(outcome)
    }

    pub fn send_voice(
        &self,
        recipient: Recipient,
        audio: impl Into<AudioClip>,
        hub: &FleetHub,
    ) -> Result<AppendOutcome> {
        self.send_voice_at(recipient, audio, now(), hub)
    }

    /// Inbox for this session, newest first
    pub fn messages(&self, hub: &FleetHub) -> Vec<VisibleMessage> {
        hub.comms.list_visible(self.callsign())
    }

    /// Watch a friend's vessel ("Find Friend")
    pub fn watch(&self, target: &str, hub: &FleetHub) -> Watch {
        match hub.presence.lookup(self.callsign(), target) {
            Ok(state) => Watch::Tracking(state.to_visible()),
            Err(ChartError::AccessDenied(_)) => Watch::Private,
            Err(_) => Watch::Offline,
        }
    }

    pub fn visible_fleet(&self, hub: &FleetHub) -> Vec<VisibleVessel> {
        hub.presence.visible_fleet(self.callsign())
    }
}
