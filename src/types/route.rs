use crate::types::Position;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier assigned when a leg is created
///
/// Speed edits and removals address legs by id, so reordering or deleting
/// other legs never moves a speed onto the wrong leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LegId(pub u64);

impl fmt::Display for LegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One drawn segment of a route with its own speed
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Leg {
    pub id: LegId,
    pub waypoints: Vec<Position>,
    pub speed_kts: f64,
}

impl Leg {
    pub fn new(id: LegId, waypoints: Vec<Position>, speed_kts: f64) -> Self {
        Self {
            id,
            waypoints,
            speed_kts,
        }
    }
}

/// Ordered sequence of legs
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Route {
    pub legs: Vec<Leg>,
}

impl Route {
    pub fn new(legs: Vec<Leg>) -> Self {
        Self { legs }
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn leg(&self, id: LegId) -> Option<&Leg> {
        self.legs.iter().find(|leg| leg.id == id)
    }

    pub fn index_of(&self, id: LegId) -> Option<usize> {
        self.legs.iter().position(|leg| leg.id == id)
    }
}
