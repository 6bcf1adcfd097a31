pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod redis_repo;
pub mod trip_repo;

pub use app_config::Config;
pub use booking_repo::PgReservationStore;
pub use database::DbClient;
pub use redis_repo::RedisClient;
pub use trip_repo::PgTripRepository;
