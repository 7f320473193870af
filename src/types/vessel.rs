use crate::types::{Position, Timestamp};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Canonical form of a callsign: surrounding whitespace removed
///
/// Every comparison between callsigns goes through this.
pub fn normalize_callsign(callsign: &str) -> &str {
    callsign.trim()
}

/// Normalized, non-empty allowlist entries
pub fn normalize_allowlist<I, S>(entries: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .map(|entry| normalize_callsign(entry.as_ref()).to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Who may see a vessel's presence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrivacyMode {
    /// Visible to every viewer
    #[default]
    Public,
    /// Visible only to callsigns on the allowlist
    Whitelist,
    /// Never stored, so never visible
    Hidden,
}

impl fmt::Display for PrivacyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrivacyMode::Public => "Public",
            PrivacyMode::Whitelist => "Private (Only Whitelist)",
            PrivacyMode::Hidden => "Hidden",
        };
        f.write_str(name)
    }
}

impl FromStr for PrivacyMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(PrivacyMode::Public),
            "whitelist" | "private" | "private (only whitelist)" => Ok(PrivacyMode::Whitelist),
            "hidden" => Ok(PrivacyMode::Hidden),
            other => Err(format!("unknown privacy mode '{}'", other)),
        }
    }
}

/// Last known state of a vessel in the shared fleet
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VesselState {
    pub callsign: String,
    pub position: Position,
    pub last_seen: Timestamp,
    pub privacy: PrivacyMode,
    pub allowlist: BTreeSet<String>,
}

impl VesselState {
    /// Whether `viewer` passes this vessel's privacy gate
    pub fn is_visible_to(&self, viewer: &str) -> bool {
        match self.privacy {
            PrivacyMode::Public => true,
            PrivacyMode::Whitelist => self.allowlist.contains(normalize_callsign(viewer)),
            PrivacyMode::Hidden => false,
        }
    }

    pub fn to_visible(&self) -> VisibleVessel {
        VisibleVessel {
            callsign: self.callsign.clone(),
            latitude: self.position.latitude,
            longitude: self.position.longitude,
            last_seen: self.last_seen,
        }
    }
}

/// Presence pushed by a session on every fix
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PresenceUpdate {
    pub callsign: String,
    pub position: Position,
    pub timestamp: Timestamp,
    pub privacy: PrivacyMode,
    pub allowlist: BTreeSet<String>,
}

impl PresenceUpdate {
    pub fn public(callsign: &str, position: Position, timestamp: Timestamp) -> Self {
        Self {
            callsign: callsign.to_string(),
            position,
            timestamp,
            privacy: PrivacyMode::Public,
            allowlist: BTreeSet::new(),
        }
    }

    pub fn with_privacy<I, S>(mut self, privacy: PrivacyMode, allowlist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.privacy = privacy;
        self.allowlist = normalize_allowlist(allowlist);
        self
    }
}

/// Row of the privacy-filtered fleet list handed to the map layer
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VisibleVessel {
    pub callsign: String,
    pub latitude: f64,
    pub longitude: f64,
    pub last_seen: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privacy_mode_parsing() {
        assert_eq!("Public".parse::<PrivacyMode>().unwrap(), PrivacyMode::Public);
        assert_eq!(" whitelist ".parse::<PrivacyMode>().unwrap(), PrivacyMode::Whitelist);
        assert_eq!(
            "Private (Only Whitelist)".parse::<PrivacyMode>().unwrap(),
            PrivacyMode::Whitelist
        );
        assert_eq!("HIDDEN".parse::<PrivacyMode>().unwrap(), PrivacyMode::Hidden);
        assert!("stealth".parse::<PrivacyMode>().is_err());
    }

    #[test]
    fn test_whitelist_visibility() {
        let state = VesselState {
            callsign: "Maverick".to_string(),
            position: Position::new(29.5, -95.0),
            last_seen: 0,
            privacy: PrivacyMode::Whitelist,
            allowlist: ["Goose".to_string()].into_iter().collect(),
        };
        assert!(state.is_visible_to("Goose"));
        assert!(!state.is_visible_to("Iceman"));
        assert!(!state.is_visible_to(""));
        assert!(state.is_visible_to(" Goose "));
    }

    #[test]
    fn test_allowlist_entries_are_normalized() {
        let update = PresenceUpdate::public("Maverick", Position::new(29.5, -95.0), 0)
            .with_privacy(PrivacyMode::Whitelist, [" Goose ", "", "  ", "Iceman"]);
        let names: Vec<_> = update.allowlist.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["Goose", "Iceman"]);
    }
}
