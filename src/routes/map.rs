use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{connection_lines, hover::headline, map_layers, zone_color, Matcher, Roster};
use crate::models::{
    Disaster, DisasterZone, DisastersResponse, ErrorResponse, HealthResponse, MapView, MatchRequest,
    MatchResponse, SafeZone,
};
use crate::services::{DisasterCache, FirestoreClient, FirestoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub firestore: Arc<FirestoreClient>,
    pub cache: Arc<DisasterCache>,
    pub roster: Arc<Roster>,
    pub safe_zones: Arc<Vec<SafeZone>>,
    pub matcher: Matcher,
    pub map_view: MapView,
}

/// Configure all map-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/map/view", web::get().to(map_view))
        .route("/map/layers", web::get().to(get_layers))
        .route("/ngos", web::get().to(get_ngos))
        .route("/safe-zones", web::get().to(get_safe_zones))
        .route("/disasters", web::get().to(get_disasters))
        .route("/disasters/refresh", web::post().to(refresh_disasters))
        .route("/disasters/{id}/matches", web::get().to(hover_matches))
        .route("/matches", web::post().to(adhoc_matches));
}

fn source_error(e: FirestoreError) -> HttpResponse {
    tracing::error!("Failed to fetch disasters: {}", e);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: "Failed to fetch disasters".to_string(),
        message: e.to_string(),
        status_code: 500,
    })
}

fn build_match_response(state: &AppState, disaster: Disaster) -> MatchResponse {
    let result = state.matcher.find_matches(&disaster, &state.roster);
    let connections = connection_lines(&disaster, &result.matches);

    MatchResponse {
        headline: headline(&result),
        severity: result.severity,
        radius_km: result.radius_km,
        matches: result.matches,
        connections,
        disaster,
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        roster_size: state.roster.len(),
        timestamp: chrono::Utc::now(),
    })
}

async fn map_view(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.map_view)
}

/// All map layers as one GeoJSON FeatureCollection
///
/// GET /api/v1/map/layers
async fn get_layers(state: web::Data<AppState>) -> impl Responder {
    let disasters = match state.cache.get_or_fetch(&state.firestore).await {
        Ok(d) => d,
        Err(e) => return source_error(e),
    };

    HttpResponse::Ok().json(map_layers(&disasters, &state.safe_zones, &state.roster))
}

async fn get_ngos(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.roster.as_slice())
}

async fn get_safe_zones(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.safe_zones.as_slice())
}

/// Current disasters with their zone colors
///
/// GET /api/v1/disasters
async fn get_disasters(state: web::Data<AppState>) -> impl Responder {
    let disasters = match state.cache.get_or_fetch(&state.firestore).await {
        Ok(d) => d,
        Err(e) => return source_error(e),
    };

    let zones: Vec<DisasterZone> = disasters
        .iter()
        .map(|d| DisasterZone {
            color: zone_color(d.severity()),
            disaster: d.clone(),
        })
        .collect();

    HttpResponse::Ok().json(DisastersResponse {
        total: zones.len(),
        disasters: zones,
    })
}

async fn refresh_disasters(state: web::Data<AppState>) -> impl Responder {
    state.cache.invalidate().await;
    tracing::info!("Disaster snapshot invalidated");
    HttpResponse::NoContent().finish()
}

/// Best NGO(s) for a hovered disaster
///
/// GET /api/v1/disasters/{id}/matches
async fn hover_matches(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    let disaster = match state.cache.find(&state.firestore, &id).await {
        Ok(Some(d)) => d,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Disaster not found".to_string(),
                message: format!("No disaster with id {}", id),
                status_code: 404,
            });
        }
        Err(e) => return source_error(e),
    };

    let response = build_match_response(&state, disaster);

    tracing::info!(
        "Matched {} NGO(s) for disaster {} (severity: {})",
        response.matches.len(),
        id,
        response.severity
    );

    HttpResponse::Ok().json(response)
}

/// Match NGOs against a disaster given in the request body
///
/// POST /api/v1/matches
///
/// Request body:
/// ```json
/// {
///   "location": "string",
///   "severity": "low|moderate|high|severe",
///   "latitude": 19.81,
///   "longitude": 85.83
/// }
/// ```
async fn adhoc_matches(state: web::Data<AppState>, req: web::Json<MatchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for match request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let disaster = Disaster::from(req.into_inner());
    HttpResponse::Ok().json(build_match_response(&state, disaster))
}
