use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Booking, BookingRequest};
use crate::store::ReservationStore;

/// Which referenced record was missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingEntity {
    Trip,
    Availability,
    User,
}

impl fmt::Display for MissingEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingEntity::Trip => write!(f, "Trip"),
            MissingEntity::Availability => write!(f, "Availability"),
            MissingEntity::User => write!(f, "User"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} not found.")]
    NotFound(MissingEntity),

    #[error("Not enough availability for the selected trip and date.")]
    CapacityExceeded { requested: i32, available: i32 },

    #[error("Booking already exists for this data.")]
    DuplicateBooking,

    #[error("Booking storage error: {0}")]
    Persistence(String),
}

/// Booking reservation entry point. Stateless across calls; every
/// invocation is fully parameterized by its request and the store.
#[derive(Clone)]
pub struct Reservations {
    store: Arc<dyn ReservationStore>,
}

impl Reservations {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    /// Create a booking against a trip's per-date capacity.
    ///
    /// Guard checks run in a fixed order (input, trip, availability,
    /// capacity, user) so the caller always sees the same error for the
    /// same broken precondition; none of them mutate anything. The final
    /// `commit_reservation` re-checks the availability row under the
    /// store's write lock, which is the decision that counts when
    /// concurrent requests race for the last seats.
    pub async fn create_booking(&self, request: BookingRequest) -> Result<Booking, ReservationError> {
        let draft = request.validate()?;

        let trip = self
            .store
            .find_trip(draft.trip_id)
            .await?
            .ok_or(ReservationError::NotFound(MissingEntity::Trip))?;

        let availability = self
            .store
            .find_availability(draft.trip_id, draft.travel_date)
            .await?
            .ok_or(ReservationError::NotFound(MissingEntity::Availability))?;

        let requested = draft.requested_seats();
        if requested <= 0 {
            return Err(ReservationError::InvalidInput(
                "Booking must include at least one traveler.".into(),
            ));
        }
        if !availability.can_fit(requested) {
            return Err(ReservationError::CapacityExceeded {
                requested,
                available: availability.remaining_seats(),
            });
        }

        if let Some(user_id) = draft.user_id {
            if !self.store.user_exists(user_id).await? {
                return Err(ReservationError::NotFound(MissingEntity::User));
            }
        }

        let booking = match self.store.commit_reservation(&draft).await {
            Ok(booking) => booking,
            Err(err) => {
                warn!(trip_id = %draft.trip_id, date = %draft.travel_date, error = %err,
                    "booking commit rejected");
                return Err(err);
            }
        };

        info!(booking_id = %booking.id, trip = %trip.name, date = %booking.travel_date,
            seats = requested, "booking created");
        Ok(booking)
    }

    pub async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, ReservationError> {
        self.store.find_booking(id).await
    }
}
