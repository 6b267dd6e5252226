use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

use crate::models::domain::{Disaster, NgoMatch, Severity};

/// Response for the match endpoints
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub disaster: Disaster,
    pub severity: Severity,
    #[serde(rename = "radiusKm")]
    pub radius_km: Option<f64>,
    pub headline: String,
    pub matches: Vec<NgoMatch>,
    /// Lines from the disaster to each matched NGO
    pub connections: FeatureCollection,
}

/// Disaster with its zone color
#[derive(Debug, Clone, Serialize)]
pub struct DisasterZone {
    #[serde(flatten)]
    pub disaster: Disaster,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisastersResponse {
    pub disasters: Vec<DisasterZone>,
    pub total: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "rosterSize")]
    pub roster_size: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
