// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Coordinate, Ngo, Disaster, SafeZone, Severity, MatchRole, NgoMatch, MatchPolicy, MapView};
pub use requests::MatchRequest;
pub use responses::{MatchResponse, DisasterZone, DisastersResponse, HealthResponse, ErrorResponse};
