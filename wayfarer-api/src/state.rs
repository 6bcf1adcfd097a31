use std::sync::Arc;

use wayfarer_booking::Reservations;
use wayfarer_catalog::TripRepository;
use wayfarer_store::app_config::RateLimitConfig;
use wayfarer_store::RedisClient;

#[derive(Clone)]
pub struct AppState {
    pub trips: Arc<dyn TripRepository>,
    pub reservations: Reservations,
    pub redis: Arc<RedisClient>,
    pub rate_limit: RateLimitConfig,
}
