//! EZChart core library
//!
//! The shared fleet-presence and voice-comms model plus the route/ETA planning
//! engine behind the EZChartplotter dashboard. Map rendering, tile serving and
//! GPS access stay in the presentation layer; this crate receives already
//! resolved inputs (fixes, drawn geometry, speed edits, audio clips) and
//! returns the derived state to render.
//!
//! # Features
//!
//! - **`csv`** (default): Enable CSV export of tracks and leg tables
//! - **`cli`** (default): Build the `ezchart` command-line binary
//! - **`json`**: Parse saved GeoJSON drawings and JSON preferences
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Plan a leg and read its ETA:
//! ```rust
//! use ezchart::{format_duration, leg_eta, Position, RoutePlanner};
//!
//! let mut planner = RoutePlanner::new(20.0);
//! planner.add_leg(vec![Position::new(29.5, -95.0), Position::new(29.55, -94.9)]);
//! let leg = &planner.route().legs[0];
//! println!("ETA {}", format_duration(leg_eta(leg)));
//! ```
//!
//! Share presence between two sessions:
//! ```rust
//! use ezchart::{Fix, FleetHub, Preferences, Session, Watch};
//!
//! let hub = FleetHub::new();
//! let mut maverick = Session::new(Preferences::with_callsign("Maverick"));
//! maverick.on_fix(Fix::new(29.5, -95.0, 1_700_000_000), &hub).unwrap();
//!
//! let goose = Session::new(Preferences::with_callsign("Goose"));
//! assert!(matches!(goose.watch("Maverick", &hub), Watch::Tracking(_)));
//! ```
//!
//! # Public API
//!
//! ## Geo primitives
//! - [`distance_nm`] - WGS84 geodesic distance in nautical miles
//! - [`initial_bearing_deg`] - Initial great-circle bearing in [0, 360)
//! - [`course`] - Distance, heading and ETA for a direct course
//!
//! ## Route planning
//! - [`leg_distance`], [`leg_eta`], [`total_distance`], [`total_time`]
//! - [`set_leg_speed`], [`remove_leg`] - Pure route updates
//! - [`RoutePlanner`] - Per-session route with stable leg ids
//!
//! ## Shared state
//! - [`PresenceStore`] - Fleet positions behind privacy rules
//! - [`CommsStore`] - Bounded, deduplicated voice-message log
//! - [`FleetHub`], [`Session`] - Explicit handles and per-user context
//!
//! ## Export Functions
//! - [`export_track_csv`] - Export a recorded track to CSV
//! - [`export_track_gpx`] - Export a recorded track to GPX
//! - [`export_plan_csv`] - Export a leg table to CSV

// Module declarations
pub mod comms;
pub mod config;
pub mod conversion;
pub mod error;
pub mod export;
pub mod geometry;
pub mod navigation;
pub mod planner;
pub mod presence;
pub mod session;
pub mod track;
pub mod types;

// Re-export everything from modules for convenience
#[allow(ambiguous_glob_reexports)]
pub use comms::*;
#[allow(ambiguous_glob_reexports)]
pub use config::*;
#[allow(ambiguous_glob_reexports)]
pub use conversion::*;
#[allow(ambiguous_glob_reexports)]
pub use error::*;
#[allow(ambiguous_glob_reexports)]
pub use export::*;
#[allow(ambiguous_glob_reexports)]
pub use geometry::*;
#[allow(ambiguous_glob_reexports)]
pub use navigation::*;
#[allow(ambiguous_glob_reexports)]
pub use planner::*;
#[allow(ambiguous_glob_reexports)]
pub use presence::*;
#[allow(ambiguous_glob_reexports)]
pub use session::*;
#[allow(ambiguous_glob_reexports)]
pub use track::*;
#[allow(ambiguous_glob_reexports)]
pub use types::*;
