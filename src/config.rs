//! Per-user preferences
//!
//! Preferences live in the session only; nothing is persisted. With the
//! `json` feature they can be seeded from a JSON document.

use crate::planner::DEFAULT_SPEED_KTS;
use crate::error::{ChartError, Result};
use crate::types::{
    normalize_allowlist, normalize_callsign, PresenceUpdate, PrivacyMode, Position, Timestamp,
    UNKNOWN_SENDER,
};
use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Slowest default speed the settings page accepts (knots)
pub const MIN_DEFAULT_SPEED_KTS: f64 = 1.0;
/// Fastest default speed the settings page accepts (knots)
pub const MAX_DEFAULT_SPEED_KTS: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Preferences {
    /// Empty until the user picks one; presence is not shared without it
    pub callsign: String,
    pub default_speed_kts: f64,
    pub privacy: PrivacyMode,
    pub allowlist: BTreeSet<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            callsign: String::new(),
            default_speed_kts: DEFAULT_SPEED_KTS,
            privacy: PrivacyMode::Public,
            allowlist: BTreeSet::new(),
        }
    }
}

impl Preferences {
    /// Preferences for `callsign`; a reserved name leaves the callsign unset
    pub fn with_callsign(callsign: &str) -> Self {
        let mut prefs = Self::default();
        if !is_reserved_callsign(callsign) {
            prefs.callsign = normalize_callsign(callsign).to_string();
        }
        prefs
    }

    /// Set (or with an empty string, clear) the callsign
    ///
    /// The anonymous sender name is reserved and rejected with
    /// `InvalidCallsign`, leaving the current callsign in place.
    pub fn set_callsign(&mut self, callsign: &str) -> Result<()> {
        if is_reserved_callsign(callsign) {
            return Err(ChartError::InvalidCallsign);
        }
        self.callsign = normalize_callsign(callsign).to_string();
        Ok(())
    }

    pub fn has_callsign(&self) -> bool {
        !self.callsign.is_empty()
    }

    /// Store a default speed, clamped to the accepted range
    ///
    /// A NaN speed keeps the current value.
    pub fn set_default_speed(&mut self, speed_kts: f64) {
        if !speed_kts.is_nan() {
            self.default_speed_kts = speed_kts.clamp(MIN_DEFAULT_SPEED_KTS, MAX_DEFAULT_SPEED_KTS);
        }
    }

    /// Replace the allowlist from the comma separated settings field
    pub fn set_allowlist_text(&mut self, text: &str) {
        self.allowlist = parse_allowlist(text);
    }

    /// Presence record for the current fix
    pub fn presence_update(&self, position: Position, timestamp: Timestamp) -> PresenceUpdate {
        PresenceUpdate {
            callsign: self.callsign.clone(),
            position,
            timestamp,
            privacy: self.privacy,
            allowlist: self.allowlist.clone(),
        }
    }

    #[cfg(feature = "json")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut prefs: Preferences = serde_json::from_str(json)?;
        let callsign = std::mem::take(&mut prefs.callsign);
        prefs.set_callsign(&callsign)?;
        prefs.allowlist = normalize_allowlist(&prefs.allowlist);
        let speed = prefs.default_speed_kts;
        prefs.set_default_speed(speed);
        Ok(prefs)
    }
}

/// Whether `callsign` is the name anonymous messages are sent under
pub fn is_reserved_callsign(callsign: &str) -> bool {
    normalize_callsign(callsign).eq_ignore_ascii_case(UNKNOWN_SENDER)
}

/// Split `"Goose, Iceman,,Viper "` into trimmed, non-empty callsigns
pub fn parse_allowlist(text: &str) -> BTreeSet<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
