//! Shared fleet presence
//!
//! One [`PresenceStore`] is shared by every connected session (usually behind
//! an `Arc`, see [`crate::session::FleetHub`]). A single mutex serializes all
//! access; list operations copy a snapshot under the lock and filter it after
//! releasing it.
//!
//! Entries are never expired: `last_seen` is stored for display only.

use crate::error::{ChartError, Result};
use crate::types::{
    normalize_allowlist, normalize_callsign, PresenceUpdate, PrivacyMode, VesselState,
    VisibleVessel,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Effect of an upsert on the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceChange {
    /// Entry created or replaced
    Updated,
    /// Hidden vessel: any existing entry was removed
    Withdrawn,
}

#[derive(Debug, Default)]
pub struct PresenceStore {
    entries: Mutex<HashMap<String, VesselState>>,
}

impl PresenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, VesselState>> {
        // every critical section leaves the map consistent
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the vessel's entry with `update` (last fix wins)
    ///
    /// A Hidden update removes the entry instead of storing it. Fails with
    /// `InvalidCallsign` when the callsign is empty or whitespace.
    pub fn upsert(&self, update: PresenceUpdate) -> Result<PresenceChange> {
        let callsign = normalize_callsign(&update.callsign);
        if callsign.is_empty() {
            return Err(ChartError::InvalidCallsign);
        }

        if update.privacy == PrivacyMode::Hidden {
            let removed = self.entries().remove(callsign).is_some();
            debug!("{} went hidden (entry removed: {})", callsign, removed);
            return Ok(PresenceChange::Withdrawn);
        }

        let state = VesselState {
            callsign: callsign.to_string(),
            position: update.position,
            last_seen: update.timestamp,
            privacy: update.privacy,
            allowlist: normalize_allowlist(&update.allowlist),
        };
        self.entries().insert(state.callsign.clone(), state);
        Ok(PresenceChange::Updated)
    }

    /// Look up `target` on behalf of `viewer`
    ///
    /// `NotFound` when the vessel has no entry (offline or hidden),
    /// `AccessDenied` when its whitelist excludes the viewer.
    pub fn lookup(&self, viewer: &str, target: &str) -> Result<VesselState> {
        let entries = self.entries();
        let state = entries
            .get(normalize_callsign(target))
            .ok_or_else(|| ChartError::NotFound(target.to_string()))?;
        if !state.is_visible_to(viewer) {
            return Err(ChartError::AccessDenied(target.to_string()));
        }
        Ok(state.clone())
    }

    /// Point-in-time copy of every entry
    pub fn snapshot(&self) -> Vec<VesselState> {
        self.entries().values().cloned().collect()
    }

    /// Every vessel `viewer` may see, excluding the viewer's own entry,
    /// sorted by callsign
    pub fn visible_fleet(&self, viewer: &str) -> Vec<VisibleVessel> {
        let viewer = normalize_callsign(viewer);
        let mut fleet: Vec<VisibleVessel> = self
            .snapshot()
            .iter()
            .filter(|state| state.callsign != viewer && state.is_visible_to(viewer))
            .map(VesselState::to_visible)
            .collect();
        fleet.sort_by(|a, b| a.callsign.cmp(&b.callsign));
        fleet
    }

    pub fn remove(&self, callsign: &str) -> Option<VesselState> {
        self.entries().remove(normalize_callsign(callsign))
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
