//! Relief Match - disaster relief map service
//!
//! This library recommends relief NGOs for disaster zones over India and
//! describes the map layers (disaster zones, safe zones, NGOs) for display.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{Matcher, MatchResult, Roster, Dataset, HoverSlot, distance::haversine_km};
pub use self::models::{Coordinate, Disaster, Ngo, NgoMatch, MatchPolicy, MatchRole, SafeZone, Severity};
