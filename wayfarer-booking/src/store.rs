use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;
use wayfarer_catalog::{Trip, TripAvailability};

use crate::models::{Booking, BookingDraft};
use crate::reservation::ReservationError;

/// Persistence seam for the reservation pipeline.
///
/// The lookup methods are plain reads used for the guard checks;
/// `commit_reservation` is the authoritative step and must re-verify the
/// availability row under whatever write isolation the backend provides
/// (a row lock for Postgres, a state mutex for the in-memory store)
/// before inserting the booking and incrementing the booked count in the
/// same atomic unit.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn find_trip(&self, id: Uuid) -> Result<Option<Trip>, ReservationError>;

    async fn find_availability(
        &self,
        trip_id: Uuid,
        travel_date: NaiveDate,
    ) -> Result<Option<TripAvailability>, ReservationError>;

    async fn user_exists(&self, id: Uuid) -> Result<bool, ReservationError>;

    async fn commit_reservation(&self, draft: &BookingDraft) -> Result<Booking, ReservationError>;

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ReservationError>;
}
