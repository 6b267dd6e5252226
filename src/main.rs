use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use relief_match::config::{RosterSource, Settings};
use relief_match::core::{Dataset, Roster};
use relief_match::models::{ErrorResponse, MapView, MatchPolicy};
use relief_match::routes::{self, AppState};
use relief_match::services::{DisasterCache, FirestoreClient, FirestoreCollections};
use relief_match::Matcher;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error for malformed request payloads
#[derive(Debug)]
pub struct JsonError(ErrorResponse);

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.error, self.0.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(&self.0)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError(ErrorResponse {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    })
    .into()
}

fn exit_with(message: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", message, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", message, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging comes up before the settings error is reported so it is not lost
    let settings = Settings::load();
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default()
        .with_env_overrides();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.is_pretty() {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }

    info!("Starting relief map service...");

    let settings = settings.map_err(|e| exit_with("Failed to load configuration", e))?;

    info!("Configuration loaded successfully");

    let firestore = FirestoreClient::new(
        settings.firestore.base_url.clone(),
        settings.firestore.project_id.clone(),
        settings.firestore.database_id.clone(),
        settings.firestore.api_key.clone(),
        settings.firestore.page_size,
        Duration::from_secs(settings.firestore.timeout_secs),
        FirestoreCollections {
            disasters: settings.firestore.disasters_collection.clone(),
            ngos: settings.firestore.ngos_collection.clone(),
        },
    )
    .map_err(|e| exit_with("Failed to create Firestore client", e))?;

    info!("Firestore client initialized for project {}", settings.firestore.project_id);

    // Load the NGO roster and safe zones once; both stay read-only from here on
    let dataset = match (settings.roster.source, &settings.roster.path) {
        (RosterSource::File, Some(path)) => Dataset::from_path(path),
        (RosterSource::File, None) => {
            return Err(exit_with("Invalid roster settings", "roster.source = \"file\" requires roster.path"));
        }
        _ => Dataset::embedded(),
    }
    .map_err(|e| exit_with("Failed to load relief dataset", e))?;

    let roster = if settings.roster.source == RosterSource::Firestore {
        let ngos = firestore
            .get_ngos()
            .await
            .map_err(|e| exit_with("Failed to fetch NGO roster", e))?;
        Roster::new(ngos).map_err(|e| exit_with("Invalid NGO roster", e))?
    } else {
        dataset.roster
    };

    info!("NGO roster ready ({} NGOs, source: {:?})", roster.len(), settings.roster.source);

    let cache = DisasterCache::new(settings.cache.ttl_secs);

    info!("Disaster cache initialized (TTL: {}s)", cache.ttl_secs());

    let policy = MatchPolicy::from(&settings.matching);
    let matcher = Matcher::new(policy);

    info!("Matcher initialized with policy: {:?}", policy);

    let app_state = AppState {
        firestore: Arc::new(firestore),
        cache: Arc::new(cache),
        roster: Arc::new(roster),
        safe_zones: Arc::new(dataset.safe_zones),
        matcher,
        map_view: MapView::from(&settings.map),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
