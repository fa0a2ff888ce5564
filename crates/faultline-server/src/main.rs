//! Binary entrypoint for the faultline HTTP server.
//!
//! Reads configuration from environment variables:
//! - `FAULTLINE_DB_PATH`: feedback SQLite file path (default: "faultline.db")
//! - `FAULTLINE_PORT`: server listen port (default: "3000")

use faultline_server::router::build_router;
use faultline_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let db_path =
        std::env::var("FAULTLINE_DB_PATH").unwrap_or_else(|_| "faultline.db".to_string());
    let port = std::env::var("FAULTLINE_PORT").unwrap_or_else(|_| "3000".to_string());

    let state = AppState::new(&db_path).expect("Failed to initialize application state");

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("faultline server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
