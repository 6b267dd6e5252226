use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180], both finite
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Relief NGO with location and resource level
///
/// A lower `resources` value means the NGO is more resource-constrained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ngo {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub resources: u32,
}

impl Ngo {
    pub fn coords(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Disaster zone as supplied by the disaster data source
///
/// `severity` keeps the raw label for display; use [`Disaster::severity`]
/// for the parsed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disaster {
    pub id: String,
    pub location: String,
    #[serde(rename = "severity")]
    pub severity_label: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Disaster {
    pub fn coords(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn severity(&self) -> Severity {
        Severity::from(self.severity_label.as_str())
    }
}

/// Safe zone shown on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeZone {
    pub id: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl SafeZone {
    pub fn coords(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Disaster severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Severe,
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Severe => "severe",
            Severity::Unknown => "unknown",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Severity::Unknown)
    }
}

impl From<&str> for Severity {
    /// Case-insensitive, surrounding whitespace ignored
    fn from(label: &str) -> Self {
        // Both the matcher branch and the zone color go through this parse,
        // so " high " is treated as high everywhere.
        match label.trim().to_lowercase().as_str() {
            "low" => Severity::Low,
            "moderate" => Severity::Moderate,
            "high" => Severity::High,
            "severe" => Severity::Severe,
            _ => Severity::Unknown,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an NGO was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchRole {
    Closest,
    LeastResourced,
}

/// A selected NGO together with its distance to the disaster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NgoMatch {
    pub ngo: Ngo,
    /// Rounded to 2 decimal places
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
    pub role: MatchRole,
}

/// Selection policy for the matcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPolicy {
    /// Search radius for "moderate" disasters
    pub moderate_radius_km: f64,
    /// Search radius for every other non-"high" severity
    pub default_radius_km: f64,
    /// Collapse [closest, least-resourced] into one entry when both are the same NGO
    pub dedupe: bool,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            moderate_radius_km: 50.0,
            default_radius_km: 150.0,
            dedupe: false,
        }
    }
}

/// Map view shown on first load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: Coordinate::new(20.5937, 78.9629),
            zoom: 5,
        }
    }
}
