//! Fableforge Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fableforge_engine::infrastructure::ollama::OllamaClient;
use fableforge_engine::infrastructure::resilient_llm::{ResilientLlmClient, RetryConfig};
use fableforge_engine::infrastructure::sqlite::{connect, SqliteRepositories};
use fableforge_engine::{api, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from the working directory, if present.
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fableforge_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Fableforge Engine");

    // Load configuration
    let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| "fableforge.db".into());
    let ollama_url = std::env::var("OLLAMA_URL")
        .or_else(|_| std::env::var("OLLAMA_BASE_URL"))
        .unwrap_or_else(|_| "http://localhost:11434".into());
    let ollama_model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".into());
    let server_host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let server_port: u16 = std::env::var("SERVER_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "5000".into())
        .parse()
        .unwrap_or(5000);
    let cors_origin = std::env::var("CORS_ORIGIN").ok();

    // Open the database
    tracing::info!(path = %database_path, "Opening SQLite database");
    let pool = connect(&database_path).await?;
    let repos = SqliteRepositories::new(pool);

    // LLM client with timeout + bounded retry
    let retry_config = RetryConfig::default();
    tracing::info!(
        max_retries = retry_config.max_retries,
        timeout_secs = retry_config.request_timeout_secs,
        "LLM client configured"
    );
    let ollama = Arc::new(OllamaClient::new(&ollama_url, &ollama_model));
    let llm = Arc::new(ResilientLlmClient::new(ollama, retry_config));

    // Create application
    let app = Arc::new(App::new(
        repos.users,
        repos.characters,
        repos.sessions,
        repos.npcs,
        llm,
    ));

    // CORS: a configured origin gets credentials; otherwise stay open
    // for local development.
    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let router = api::routes()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app);

    let addr: SocketAddr = format!("{server_host}:{server_port}").parse()?;
    tracing::info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
