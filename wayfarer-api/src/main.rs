use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfarer_api::{app, AppState};
use wayfarer_booking::Reservations;
use wayfarer_store::{DbClient, PgReservationStore, PgTripRepository, RedisClient};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfarer_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = wayfarer_store::Config::load().expect("Failed to load config");
    tracing::info!("Starting Wayfarer API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let redis_client = RedisClient::new(&config.redis.url)
        .await
        .expect("Failed to connect to Redis");

    let trip_repo = Arc::new(PgTripRepository::new(db.pool.clone()));
    let reservation_store = Arc::new(PgReservationStore::new(db.pool.clone()));

    let app_state = AppState {
        trips: trip_repo,
        reservations: Reservations::new(reservation_store),
        redis: Arc::new(redis_client),
        rate_limit: config.rate_limit.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
