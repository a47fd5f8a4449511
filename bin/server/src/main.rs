use axum::{
    Router,
    routing::{get, post},
};
use chalkline_server::{
    auth::{self, AppState, IdentityClient, OAuthClient, StudentAuthClient, db::SessionRepository},
    config::ServerConfig,
    content::ContentClient,
    pages,
    tenancy::DirectoryClient,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    // Create database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("failed to run migrations");

    // Cleanup expired sessions on startup
    let session_repo = SessionRepository::new(db_pool.clone());
    match session_repo.delete_expired().await {
        Ok(count) if count > 0 => {
            tracing::info!(
                deleted_sessions = count,
                "Cleaned up expired sessions on startup"
            );
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Failed to cleanup expired sessions on startup");
        }
    }

    // Spawn periodic session cleanup task
    let cleanup_pool = db_pool.clone();
    let cleanup_interval_secs = config.session.cleanup_interval_seconds;
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(cleanup_interval_secs));
        loop {
            interval.tick().await;
            let repo = SessionRepository::new(cleanup_pool.clone());
            match repo.delete_expired().await {
                Ok(count) if count > 0 => {
                    tracing::debug!(deleted_sessions = count, "Periodic session cleanup");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to cleanup expired sessions");
                }
            }
        }
    });

    // One HTTP client shared by every upstream API client
    let http_client = reqwest::Client::builder()
        .build()
        .expect("failed to create HTTP client");

    let oauth_client = OAuthClient::new(&config.oauth).expect("invalid OAuth configuration");
    let api_base_url = config.upstream.api_base_url.clone();

    let listen_addr = config.listen_addr.clone();

    // Create application state
    let app_state = Arc::new(AppState {
        db_pool,
        oauth_client,
        identity_client: IdentityClient::new(http_client.clone(), api_base_url.clone()),
        student_client: StudentAuthClient::new(http_client.clone(), api_base_url.clone()),
        directory_client: DirectoryClient::new(http_client.clone(), api_base_url.clone()),
        content_client: ContentClient::new(http_client, api_base_url),
        session_config: config.session,
        tenancy_config: config.tenancy,
    });

    let app = Router::new()
        // Public site
        .route("/", get(pages::home))
        .route("/healthz", get(pages::healthz))
        // Role dashboards
        .route("/dashboard", get(pages::admin_dashboard))
        .route("/teacher-dashboard", get(pages::teacher_dashboard))
        .route("/student-dashboard", get(pages::student_dashboard))
        .route("/admin-portal", get(pages::admin_portal))
        // Auth routes
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/handoff", get(auth::handoff))
        .route("/auth/student", post(auth::student_login))
        .route("/auth/logout", get(auth::logout))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", listen_addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
