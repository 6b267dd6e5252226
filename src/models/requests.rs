use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::Disaster;

/// Request to match NGOs against a disaster that is not in the data source
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchRequest {
    #[serde(default = "default_id")]
    pub id: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(length(min = 1))]
    pub severity: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

fn default_id() -> String {
    "adhoc".to_string()
}

impl From<MatchRequest> for Disaster {
    fn from(req: MatchRequest) -> Self {
        Disaster {
            id: req.id,
            location: req.location,
            severity_label: req.severity,
            latitude: req.latitude,
            longitude: req.longitude,
        }
    }
}
