// Core algorithm exports
pub mod distance;
pub mod hover;
pub mod layers;
pub mod matcher;
pub mod roster;

pub use distance::{haversine_km, round_km, DistanceFn};
pub use hover::{HoverSlot, HoverView};
pub use layers::{connection_lines, map_layers, zone_color};
pub use matcher::{Matcher, MatchResult};
pub use roster::{Dataset, Roster, RosterError};
