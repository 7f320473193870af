//! Route and ETA planning
//!
//! The free functions are pure: distance depends only on waypoints, ETA only
//! on (distance, speed). [`RoutePlanner`] adds the per-session state: the
//! current route, the default speed for newly drawn legs and the id counter.

use crate::conversion::format_duration;
use crate::error::{ChartError, Result};
use crate::geometry::DrawnGeometry;
use crate::navigation::{distance_nm, eta_hours};
use crate::types::{Leg, LegId, Position, Route};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Speed given to new legs when no preference is set
pub const DEFAULT_SPEED_KTS: f64 = 20.0;

/// Sum of geodesic distances between consecutive waypoints
///
/// Legs with fewer than two waypoints have zero length.
pub fn leg_distance(leg: &Leg) -> f64 {
    path_distance(&leg.waypoints)
}

pub fn path_distance(waypoints: &[Position]) -> f64 {
    waypoints
        .windows(2)
        .map(|pair| distance_nm(pair[0], pair[1]))
        .sum()
}

/// Time en route for one leg at its own speed
///
/// Zero (never infinite or NaN) when the speed is zero, negative or NaN.
pub fn leg_eta(leg: &Leg) -> f64 {
    eta_hours(leg_distance(leg), leg.speed_kts)
}

pub fn total_distance(route: &Route) -> f64 {
    route.legs.iter().map(leg_distance).sum()
}

/// Sum of per-leg times, each at its own speed
pub fn total_time(route: &Route) -> f64 {
    route.legs.iter().map(leg_eta).sum()
}

fn check_index(route: &Route, index: usize) -> Result<()> {
    if index >= route.legs.len() {
        return Err(ChartError::LegOutOfRange {
            index,
            len: route.legs.len(),
        });
    }
    Ok(())
}

/// Copy of `route` with leg `index` running at `speed_kts`
pub fn set_leg_speed(route: &Route, index: usize, speed_kts: f64) -> Result<Route> {
    check_index(route, index)?;
    let mut updated = route.clone();
    updated.legs[index].speed_kts = speed_kts;
    Ok(updated)
}

/// Copy of `route` without leg `index`; the other legs are untouched
pub fn remove_leg(route: &Route, index: usize) -> Result<Route> {
    check_index(route, index)?;
    let mut updated = route.clone();
    updated.legs.remove(index);
    Ok(updated)
}

/// One row of the speed editor table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LegRow {
    pub leg_id: LegId,
    /// 1-based position in the route, as shown to the user
    pub number: usize,
    pub distance_nm: f64,
    pub speed_kts: f64,
    pub eta_hours: f64,
    pub eta_formatted: String,
}

/// Aggregate totals shown under the leg table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteSummary {
    pub total_distance_nm: f64,
    pub total_time_hours: f64,
    pub total_time_formatted: String,
    pub leg_count: usize,
}

pub fn leg_rows(route: &Route) -> Vec<LegRow> {
    route
        .legs
        .iter()
        .enumerate()
        .map(|(i, leg)| {
            let eta = leg_eta(leg);
            LegRow {
                leg_id: leg.id,
                number: i + 1,
                distance_nm: leg_distance(leg),
                speed_kts: leg.speed_kts,
                eta_hours: eta,
                eta_formatted: format_duration(eta),
            }
        })
        .collect()
}

pub fn summarize(route: &Route) -> RouteSummary {
    let total_time_hours = total_time(route);
    RouteSummary {
        total_distance_nm: total_distance(route),
        total_time_hours,
        total_time_formatted: format_duration(total_time_hours),
        leg_count: route.legs.len(),
    }
}

/// Outcome of reconciling a full drawing update with the current route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub kept: usize,
    pub added: usize,
    pub dropped: usize,
    pub ignored: usize,
}

/// Per-session route state
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    route: Route,
    default_speed_kts: f64,
    next_id: u64,
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED_KTS)
    }
}

impl RoutePlanner {
    pub fn new(default_speed_kts: f64) -> Self {
        Self {
            route: Route::default(),
            default_speed_kts,
            next_id: 1,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn default_speed(&self) -> f64 {
        self.default_speed_kts
    }

    /// Applies to legs created after the change only
    pub fn set_default_speed(&mut self, speed_kts: f64) {
        self.default_speed_kts = speed_kts;
    }

    fn allocate_id(&mut self) -> LegId {
        let id = LegId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a leg at the default speed and return its id
    pub fn add_leg(&mut self, waypoints: Vec<Position>) -> LegId {
        let id = self.allocate_id();
        self.route
            .legs
            .push(Leg::new(id, waypoints, self.default_speed_kts));
        id
    }

    /// Reconcile the complete set of drawn features with the route
    ///
    /// LineStrings whose path matches an existing leg keep that leg's id and
    /// speed; new paths become legs at the default speed; legs no longer drawn
    /// are dropped. Order follows the drawing. Any invalid coordinate rejects
    /// the whole update and leaves the route unchanged.
    pub fn sync_drawings(&mut self, features: Vec<DrawnGeometry>) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        let mut paths = Vec::with_capacity(features.len());
        for feature in features {
            let kind = feature.kind();
            match feature.into_route_path()? {
                Some(path) => paths.push(path),
                None => {
                    debug!("Ignoring drawn {} (not a route leg)", kind);
                    report.ignored += 1;
                }
            }
        }

        let mut previous = std::mem::take(&mut self.route.legs);
        let mut legs = Vec::with_capacity(paths.len());
        for path in paths {
            match previous.iter().position(|leg| leg.waypoints == path) {
                Some(found) => {
                    legs.push(previous.remove(found));
                    report.kept += 1;
                }
                None => {
                    let id = self.allocate_id();
                    legs.push(Leg::new(id, path, self.default_speed_kts));
                    report.added += 1;
                }
            }
        }
        report.dropped = previous.len();
        self.route.legs = legs;

        debug!(
            "Drawing sync: {} kept, {} added, {} dropped, {} ignored",
            report.kept, report.added, report.dropped, report.ignored
        );
        Ok(report)
    }

    pub fn set_leg_speed(&mut self, index: usize, speed_kts: f64) -> Result<()> {
        self.route = set_leg_speed(&self.route, index, speed_kts)?;
        Ok(())
    }

    /// Set the speed of the leg with `id`; `false` if no such leg
    pub fn set_speed(&mut self, id: LegId, speed_kts: f64) -> bool {
        match self.route.legs.iter_mut().find(|leg| leg.id == id) {
            Some(leg) => {
                leg.speed_kts = speed_kts;
                true
            }
            None => false,
        }
    }

    pub fn remove_leg(&mut self, index: usize) -> Result<Leg> {
        check_index(&self.route, index)?;
        Ok(self.route.legs.remove(index))
    }

    pub fn remove(&mut self, id: LegId) -> Option<Leg> {
        let index = self.route.index_of(id)?;
        Some(self.route.legs.remove(index))
    }

    /// Delete all routes
    pub fn clear(&mut self) {
        self.route.legs.clear();
    }

    pub fn rows(&self) -> Vec<LegRow> {
        leg_rows(&self.route)
    }

    pub fn summary(&self) -> RouteSummary {
        summarize(&self.route)
    }
}
