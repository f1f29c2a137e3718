// Processor Catalog - Web Server
// REST API exposing both fetch strategies and the perf comparison

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use processor_catalog::{
    compare_sources, FlatSource, JoinedSource, ProcessorSource, SystemClock,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json("OK")
}

/// GET /api/processors/resultMap - Hierarchy assembled by the store
async fn get_by_result_map(State(state): State<AppState>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();

    match JoinedSource::new(&conn).fetch() {
        Ok(processors) => (StatusCode::OK, Json(processors)).into_response(),
        Err(e) => {
            eprintln!("Error fetching processors (resultMap): {}", e);
            server_error()
        }
    }
}

/// GET /api/processors/stream - Flat rows transformed in memory
async fn get_by_stream(State(state): State<AppState>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();

    match FlatSource::new(&conn).fetch() {
        Ok(processors) => (StatusCode::OK, Json(processors)).into_response(),
        Err(e) => {
            eprintln!("Error fetching processors (stream): {}", e);
            server_error()
        }
    }
}

/// GET /api/processors/perf - Time both strategies back to back
async fn perf_test(State(state): State<AppState>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();
    let clock = SystemClock::new();

    match compare_sources(&JoinedSource::new(&conn), &FlatSource::new(&conn), &clock) {
        Ok(report) => (StatusCode::OK, report).into_response(),
        Err(e) => {
            eprintln!("Error running perf comparison: {}", e);
            server_error()
        }
    }
}

fn server_error() -> axum::response::Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 Processor Catalog - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "catalog.db".to_string());
    let db_path = std::path::PathBuf::from(db_path);

    if !db_path.exists() {
        eprintln!("❌ Database not found at {:?}", db_path);
        eprintln!("   Run: processor-catalog seed");
        eprintln!("   to generate the dataset first.");
        std::process::exit(1);
    }

    let conn = Connection::open(&db_path).expect("Failed to open database");
    println!("✓ Database opened: {:?}", db_path);

    // Create shared state
    let state = AppState {
        db: Arc::new(Mutex::new(conn)),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/processors/resultMap", get(get_by_result_map))
        .route("/processors/stream", get(get_by_stream))
        .route("/processors/perf", get(perf_test))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   GET /api/processors/resultMap");
    println!("   GET /api/processors/stream");
    println!("   GET /api/processors/perf");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
