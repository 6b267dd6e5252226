use crate::models::{Disaster, Ngo};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Firestore
#[derive(Debug, Error)]
pub enum FirestoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key or access denied by security rules")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Collection names in Firestore
#[derive(Debug, Clone)]
pub struct FirestoreCollections {
    pub disasters: String,
    pub ngos: String,
}

/// Firestore REST client
///
/// Reads the disaster and NGO collections. Documents are fetched page by
/// page until the API stops returning a `nextPageToken`.
pub struct FirestoreClient {
    base_url: String,
    project_id: String,
    database_id: String,
    api_key: Option<String>,
    page_size: u32,
    client: Client,
    collections: FirestoreCollections,
}

impl FirestoreClient {
    /// Create a new Firestore client
    pub fn new(
        base_url: String,
        project_id: String,
        database_id: String,
        api_key: Option<String>,
        page_size: u32,
        timeout: Duration,
        collections: FirestoreCollections,
    ) -> Result<Self, FirestoreError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            project_id,
            database_id,
            api_key: api_key.filter(|key| !key.is_empty()),
            page_size,
            client,
            collections,
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents/{}",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            self.database_id,
            collection
        )
    }

    /// Fetch every document of a collection, following page tokens
    async fn list_documents(&self, collection: &str) -> Result<Vec<Value>, FirestoreError> {
        let base = self.collection_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!("{}?pageSize={}", base, self.page_size);
            if let Some(token) = &page_token {
                url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
            }
            if let Some(key) = &self.api_key {
                url.push_str(&format!("&key={}", urlencoding::encode(key)));
            }

            tracing::debug!("Listing documents from collection {}", collection);

            let response = self.client.get(&url).send().await?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(FirestoreError::Unauthorized);
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
                tracing::error!("Failed to list {}: {} - {}", collection, status, body);
                return Err(FirestoreError::ApiError(format!(
                    "Failed to list {}: {}",
                    collection, status
                )));
            }

            let json: Value = response.json().await?;

            // An empty collection comes back without a documents array
            match json.get("documents") {
                Some(Value::Array(page)) => documents.extend(page.iter().cloned()),
                Some(_) => {
                    return Err(FirestoreError::InvalidResponse("documents is not an array".into()));
                }
                None => {}
            }

            page_token = json
                .get("nextPageToken")
                .and_then(|t| t.as_str())
                .filter(|t| !t.is_empty())
                .map(str::to_string);

            if page_token.is_none() {
                break;
            }
        }

        Ok(documents)
    }

    /// Fetch all current disaster records
    ///
    /// Records without a valid coordinate are skipped.
    pub async fn get_disasters(&self) -> Result<Vec<Disaster>, FirestoreError> {
        let documents = self.list_documents(&self.collections.disasters).await?;
        let total = documents.len();

        let disasters: Vec<Disaster> = documents.iter().filter_map(parse_disaster).collect();

        if disasters.len() < total {
            tracing::warn!(
                "Skipped {} disaster record(s) with missing or invalid coordinates",
                total - disasters.len()
            );
        }
        tracing::debug!("Fetched {} disasters", disasters.len());

        Ok(disasters)
    }

    /// Fetch the NGO roster from the ngos collection
    pub async fn get_ngos(&self) -> Result<Vec<Ngo>, FirestoreError> {
        let documents = self.list_documents(&self.collections.ngos).await?;
        let total = documents.len();

        let ngos: Vec<Ngo> = documents.iter().filter_map(parse_ngo).collect();

        if ngos.len() < total {
            tracing::warn!("Skipped {} malformed NGO record(s)", total - ngos.len());
        }

        Ok(ngos)
    }
}

/// Document id: last segment of the document resource name
pub fn document_id(doc: &Value) -> Option<String> {
    doc.get("name")
        .and_then(|n| n.as_str())
        .and_then(|n| n.rsplit('/').next())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn string_field(fields: &Value, key: &str) -> Option<String> {
    fields
        .get(key)?
        .get("stringValue")?
        .as_str()
        .map(str::to_string)
}

/// Numeric field stored either as doubleValue or integerValue (a string)
fn number_field(fields: &Value, key: &str) -> Option<f64> {
    let field = fields.get(key)?;

    if let Some(v) = field.get("doubleValue") {
        return v.as_f64();
    }

    match field.get("integerValue")? {
        Value::String(s) => s.parse().ok(),
        other => other.as_f64(),
    }
}

/// Resource level: a non-negative whole number that fits in u32
fn resources_field(fields: &Value, key: &str) -> Option<u32> {
    let field = fields.get(key)?;

    if let Some(Value::String(s)) = field.get("integerValue") {
        return s.parse::<u32>().ok();
    }

    let value = field
        .get("doubleValue")
        .or_else(|| field.get("integerValue"))?
        .as_f64()?;

    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return None;
    }

    Some(value as u32)
}

/// Decode a disaster document
pub fn parse_disaster(doc: &Value) -> Option<Disaster> {
    let id = document_id(doc)?;
    let fields = doc.get("fields")?;

    let disaster = Disaster {
        location: string_field(fields, "location").unwrap_or_default(),
        severity_label: string_field(fields, "severity").unwrap_or_default(),
        latitude: number_field(fields, "latitude")?,
        longitude: number_field(fields, "longitude")?,
        id,
    };

    if !disaster.coords().is_valid() {
        tracing::warn!(
            "Disaster {} has out-of-range coordinate ({}, {})",
            disaster.id,
            disaster.latitude,
            disaster.longitude
        );
        return None;
    }

    Some(disaster)
}

/// Decode an NGO document (fields: name, lat, lng, resources)
///
/// Fractional, negative or out-of-range resource levels reject the record.
pub fn parse_ngo(doc: &Value) -> Option<Ngo> {
    let id = document_id(doc)?;
    let fields = doc.get("fields")?;

    let Some(resources) = resources_field(fields, "resources") else {
        tracing::warn!("NGO {} has an invalid resource level", id);
        return None;
    };

    Some(Ngo {
        name: string_field(fields, "name")?,
        latitude: number_field(fields, "lat")?,
        longitude: number_field(fields, "lng")?,
        resources,
        id,
    })
}
