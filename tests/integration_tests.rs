// Integration tests for Relief Match

use std::time::Duration;

use relief_match::core::{map_layers, Dataset, HoverSlot, Matcher, Roster};
use relief_match::services::{DisasterCache, FirestoreClient, FirestoreCollections, FirestoreError};
use serde_json::json;

const DISASTERS_PATH: &str = "/v1/projects/relief-test/databases/(default)/documents/disasters";
const NGOS_PATH: &str = "/v1/projects/relief-test/databases/(default)/documents/ngos";

fn create_client(server: &mockito::ServerGuard) -> FirestoreClient {
    FirestoreClient::new(
        format!("{}/v1", server.url()),
        "relief-test".to_string(),
        "(default)".to_string(),
        None,
        2,
        Duration::from_secs(5),
        FirestoreCollections {
            disasters: "disasters".to_string(),
            ngos: "ngos".to_string(),
        },
    )
    .unwrap()
}

fn disaster_doc(id: &str, location: &str, severity: &str, lat: f64, lon: f64) -> serde_json::Value {
    json!({
        "name": format!("projects/relief-test/databases/(default)/documents/disasters/{}", id),
        "fields": {
            "location": { "stringValue": location },
            "severity": { "stringValue": severity },
            "latitude": { "doubleValue": lat },
            "longitude": { "doubleValue": lon }
        }
    })
}

fn path_matcher(path: &str) -> mockito::Matcher {
    mockito::Matcher::Regex(format!("^{}$", regex_escape(path)))
}

fn regex_escape(path: &str) -> String {
    path.replace('(', r"\(").replace(')', r"\)")
}

#[tokio::test]
async fn test_fetch_disasters_follows_page_tokens() {
    let mut server = mockito::Server::new_async().await;

    let first = server
        .mock("GET", path_matcher(DISASTERS_PATH))
        .match_query(mockito::Matcher::Exact("pageSize=2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "documents": [
                    disaster_doc("kerala", "Wayanad", "High", 11.6854, 76.1320),
                    disaster_doc("assam", "Silchar", "moderate", 24.8333, 92.7789)
                ],
                "nextPageToken": "page-2"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let second = server
        .mock("GET", path_matcher(DISASTERS_PATH))
        .match_query(mockito::Matcher::UrlEncoded("pageToken".into(), "page-2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "documents": [
                    disaster_doc("odisha", "Puri", "low", 19.8135, 85.8312),
                    disaster_doc("bad", "Nowhere", "low", 123.0, 85.0)
                ]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = create_client(&server);
    let disasters = client.get_disasters().await.unwrap();

    first.assert_async().await;
    second.assert_async().await;

    let ids: Vec<&str> = disasters.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["kerala", "assam", "odisha"]);
}

#[tokio::test]
async fn test_empty_api_key_is_not_sent() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", path_matcher(DISASTERS_PATH))
        .match_query(mockito::Matcher::Exact("pageSize=2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let client = FirestoreClient::new(
        format!("{}/v1", server.url()),
        "relief-test".to_string(),
        "(default)".to_string(),
        Some(String::new()),
        2,
        Duration::from_secs(5),
        FirestoreCollections {
            disasters: "disasters".to_string(),
            ngos: "ngos".to_string(),
        },
    )
    .unwrap();

    assert!(client.get_disasters().await.unwrap().is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_disasters_unauthorized() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", path_matcher(DISASTERS_PATH))
        .match_query(mockito::Matcher::Any)
        .with_status(403)
        .create_async()
        .await;

    let client = create_client(&server);
    let result = client.get_disasters().await;

    assert!(matches!(result, Err(FirestoreError::Unauthorized)));
}

#[tokio::test]
async fn test_empty_collection() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", path_matcher(DISASTERS_PATH))
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let client = create_client(&server);
    assert!(client.get_disasters().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_ngos_builds_roster() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", path_matcher(NGOS_PATH))
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "documents": [
                    {
                        "name": "projects/relief-test/databases/(default)/documents/ngos/goonj",
                        "fields": {
                            "name": { "stringValue": "Goonj" },
                            "lat": { "doubleValue": 28.5245 },
                            "lng": { "doubleValue": 77.1855 },
                            "resources": { "integerValue": "80" }
                        }
                    },
                    {
                        "name": "projects/relief-test/databases/(default)/documents/ngos/broken",
                        "fields": { "name": { "stringValue": "No location" } }
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = create_client(&server);
    let ngos = client.get_ngos().await.unwrap();
    let roster = Roster::new(ngos).unwrap();

    assert_eq!(roster.len(), 1);
    assert_eq!(roster.get("goonj").map(|n| n.resources), Some(80));
}

#[tokio::test]
async fn test_cache_fetches_once() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", path_matcher(DISASTERS_PATH))
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "documents": [disaster_doc("delhi", "Delhi", "moderate", 28.6139, 77.2090)] }).to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = create_client(&server);
    let cache = DisasterCache::new(300);

    let first = cache.get_or_fetch(&client).await.unwrap();
    let found = cache.find(&client, "delhi").await.unwrap();

    mock.assert_async().await;
    assert_eq!(first.len(), 1);
    assert_eq!(found.map(|d| d.location), Some("Delhi".to_string()));
}

#[tokio::test]
async fn test_end_to_end_hover_flow() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", path_matcher(DISASTERS_PATH))
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "documents": [
                    disaster_doc("pune", "Pune", "Moderate", 18.5204, 73.8567),
                    disaster_doc("mumbai", "Mumbai", "HIGH", 19.0760, 72.8777)
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = create_client(&server);
    let dataset = Dataset::embedded().unwrap();
    let matcher = Matcher::default();
    let disasters = client.get_disasters().await.unwrap();

    let layers = map_layers(&disasters, &dataset.safe_zones, &dataset.roster);
    assert_eq!(layers.features.len(), 2 + 2 + 51);

    let mut slot = HoverSlot::new();

    // Pune: Habitat for Humanity (85) is first at the exact coordinate,
    // Bharatiya Samaj Seva Kendra (40) is the least-resourced within 50 km
    let view = slot.enter(disasters[0].clone(), &dataset.roster, &matcher);
    assert_eq!(view.result.matches.len(), 2);
    assert_eq!(view.result.matches[0].ngo.name, "Habitat for Humanity India");
    assert_eq!(view.result.matches[1].ngo.name, "Bharatiya Samaj Seva Kendra");

    // Mumbai: high severity, single closest NGO
    let view = slot.enter(disasters[1].clone(), &dataset.roster, &matcher);
    assert_eq!(view.result.matches.len(), 1);
    assert_eq!(view.result.matches[0].ngo.name, "Save the Children India");
    assert_eq!(view.headline(), "Best NGO: Save the Children India");

    slot.leave();
    assert!(slot.current().is_none());
}
