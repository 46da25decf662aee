//! feed-rs server entry point.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{Router, middleware, routing::get};
use feed_api::{AppState, auth_middleware, router as api_router};
use feed_common::Config;
use feed_core::{
    CommentService, FeedActions, InvalidationBroadcaster, LikeService, NotificationService,
    PostService, ProfileService, TokenAuthenticator,
};
use feed_db::repositories::{
    CommentRepository, LikeRepository, NotificationRepository, PostRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

async fn healthz() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feed=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting feed-rs server...");

    let config = Config::load().context("failed to load configuration")?;

    let db = feed_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    feed_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    // Initialize repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));

    // Initialize services
    let invalidations = InvalidationBroadcaster::default();
    let post_service = PostService::new(
        post_repo.clone(),
        comment_repo.clone(),
        like_repo.clone(),
        user_repo.clone(),
    );
    let like_service = LikeService::new(like_repo, post_repo.clone());
    let comment_service = CommentService::new(comment_repo, post_repo.clone());
    let actions = FeedActions::new(
        post_service,
        like_service,
        comment_service,
        Arc::new(invalidations.clone()),
    );

    let state = AppState {
        actions,
        notification_service: NotificationService::new(notification_repo, user_repo.clone()),
        profile_service: ProfileService::new(user_repo.clone(), post_repo),
        authenticator: TokenAuthenticator::new(user_repo),
        invalidations,
    };

    // Build router
    let app = Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = config.bind_address();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
