use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;
use wayfarer_catalog::{TourType, Trip, TripAvailability};

use crate::models::{Booking, BookingDraft};
use crate::reservation::{MissingEntity, ReservationError};
use crate::store::ReservationStore;

#[derive(Default)]
struct MemoryState {
    trips: HashMap<Uuid, Trip>,
    availability: HashMap<(Uuid, NaiveDate), TripAvailability>,
    users: HashSet<Uuid>,
    bookings: Vec<Booking>,
}

/// In-memory reservation store. The single state mutex is what makes
/// `commit_reservation` atomic here, standing in for the database row
/// lock the Postgres store takes.
#[derive(Default)]
pub struct InMemoryReservationStore {
    inner: Mutex<MemoryState>,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a minimal trip and return its id.
    pub async fn seed_trip(&self, name: &str) -> Uuid {
        let trip_id = Uuid::new_v4();
        let now = Utc::now();
        let trip = Trip {
            id: trip_id,
            name: name.to_string(),
            description: String::new(),
            location: String::new(),
            duration: "7 days".to_string(),
            category: "general".to_string(),
            tour_type: TourType::Group,
            label: None,
            price_cents: 0,
            discount_price_cents: None,
            created_at: now,
            updated_at: now,
            images: vec![],
            itineraries: vec![],
            availabilities: vec![],
        };
        self.inner.lock().await.trips.insert(trip_id, trip);
        trip_id
    }

    pub async fn seed_availability(
        &self,
        trip_id: Uuid,
        travel_date: NaiveDate,
        max_travelers: i32,
        booked_count: i32,
    ) {
        let row = TripAvailability {
            id: Uuid::new_v4(),
            trip_id,
            travel_date,
            max_travelers,
            booked_count,
            adult_price_cents: 150_00,
            child_price_cents: 90_00,
        };
        self.inner
            .lock()
            .await
            .availability
            .insert((trip_id, travel_date), row);
    }

    pub async fn seed_user(&self, id: Uuid) {
        self.inner.lock().await.users.insert(id);
    }

    pub async fn booked_count(&self, trip_id: Uuid, travel_date: NaiveDate) -> Option<i32> {
        self.inner
            .lock()
            .await
            .availability
            .get(&(trip_id, travel_date))
            .map(|row| row.booked_count)
    }

    pub async fn booking_total(&self) -> usize {
        self.inner.lock().await.bookings.len()
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservationStore {
    async fn find_trip(&self, id: Uuid) -> Result<Option<Trip>, ReservationError> {
        Ok(self.inner.lock().await.trips.get(&id).cloned())
    }

    async fn find_availability(
        &self,
        trip_id: Uuid,
        travel_date: NaiveDate,
    ) -> Result<Option<TripAvailability>, ReservationError> {
        Ok(self
            .inner
            .lock()
            .await
            .availability
            .get(&(trip_id, travel_date))
            .cloned())
    }

    async fn user_exists(&self, id: Uuid) -> Result<bool, ReservationError> {
        Ok(self.inner.lock().await.users.contains(&id))
    }

    async fn commit_reservation(&self, draft: &BookingDraft) -> Result<Booking, ReservationError> {
        let mut state = self.inner.lock().await;

        let duplicate = state.bookings.iter().any(|existing| {
            existing.trip_id == draft.trip_id
                && existing.travel_date == draft.travel_date
                && existing.email == draft.email
        });
        if duplicate {
            return Err(ReservationError::DuplicateBooking);
        }

        let requested = draft.requested_seats();
        let row = state
            .availability
            .get_mut(&(draft.trip_id, draft.travel_date))
            .ok_or(ReservationError::NotFound(MissingEntity::Availability))?;
        if !row.can_fit(requested) {
            return Err(ReservationError::CapacityExceeded {
                requested,
                available: row.remaining_seats(),
            });
        }
        row.booked_count += requested;

        let booking = Booking {
            id: Uuid::new_v4(),
            email: draft.email.clone(),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            phone: draft.phone.clone(),
            country: draft.country.clone(),
            address: draft.address.clone(),
            city: draft.city.clone(),
            state: draft.state.clone(),
            zip_code: draft.zip_code.clone(),
            travel_date: draft.travel_date,
            adults: draft.adults,
            children: draft.children,
            subtotal_cents: draft.subtotal_cents,
            total_price_cents: draft.total_price_cents,
            payment_method: draft.payment_method,
            status: draft.status,
            order_note: draft.order_note.clone(),
            user_id: draft.user_id,
            trip_id: draft.trip_id,
            created_at: Utc::now(),
        };
        state.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ReservationError> {
        Ok(self
            .inner
            .lock()
            .await
            .bookings
            .iter()
            .find(|booking| booking.id == id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{BookingRequest, PaymentMethod};
    use crate::reservation::Reservations;

    fn july(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn request(trip_id: Uuid, email: &str, adults: i32, children: i32) -> BookingRequest {
        BookingRequest {
            email: email.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: Some("+44 20 7946 0000".to_string()),
            country: "UK".to_string(),
            address: "12 Analytical Row".to_string(),
            city: "London".to_string(),
            state: "London".to_string(),
            zip_code: "EC1".to_string(),
            travel_date: "2025-07-14".to_string(),
            adults,
            children,
            subtotal: 450.00,
            total_price: 495.50,
            payment_method: PaymentMethod::CreditCard,
            status: None,
            order_note: None,
            user_id: None,
            trip_id,
        }
    }

    async fn engine_with_capacity(max: i32, booked: i32) -> (Reservations, Arc<InMemoryReservationStore>, Uuid) {
        let store = Arc::new(InMemoryReservationStore::new());
        let trip_id = store.seed_trip("Highland Trek").await;
        store.seed_availability(trip_id, july(14), max, booked).await;
        let engine = Reservations::new(store.clone());
        (engine, store, trip_id)
    }

    #[tokio::test]
    async fn test_successful_booking_increments_count() {
        let (engine, store, trip_id) = engine_with_capacity(10, 8).await;

        let booking = engine
            .create_booking(request(trip_id, "ada@example.com", 1, 1))
            .await
            .unwrap();

        assert_eq!(booking.adults, 1);
        assert_eq!(booking.children, 1);
        assert_eq!(store.booked_count(trip_id, july(14)).await, Some(10));
        assert_eq!(store.booking_total().await, 1);

        let fetched = engine.get_booking(booking.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_capacity_exceeded_leaves_state_untouched() {
        let (engine, store, trip_id) = engine_with_capacity(10, 8).await;

        let err = engine
            .create_booking(request(trip_id, "ada@example.com", 3, 0))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReservationError::CapacityExceeded {
                requested: 3,
                available: 2
            }
        ));
        assert_eq!(store.booked_count(trip_id, july(14)).await, Some(8));
        assert_eq!(store.booking_total().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_date_fails_before_lookups() {
        let (engine, store, trip_id) = engine_with_capacity(10, 0).await;

        let mut req = request(trip_id, "ada@example.com", 1, 0);
        req.travel_date = "not-a-date".to_string();
        let err = engine.create_booking(req).await.unwrap_err();

        assert!(matches!(err, ReservationError::InvalidInput(_)));
        assert_eq!(store.booking_total().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_trip_reports_trip_missing() {
        let (engine, _store, _trip_id) = engine_with_capacity(10, 0).await;

        let err = engine
            .create_booking(request(Uuid::new_v4(), "ada@example.com", 1, 0))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReservationError::NotFound(MissingEntity::Trip)
        ));
    }

    #[tokio::test]
    async fn test_date_without_availability_reports_availability_missing() {
        let (engine, _store, trip_id) = engine_with_capacity(10, 0).await;

        let mut req = request(trip_id, "ada@example.com", 1, 0);
        req.travel_date = "2025-08-01".to_string();
        let err = engine.create_booking(req).await.unwrap_err();

        assert!(matches!(
            err,
            ReservationError::NotFound(MissingEntity::Availability)
        ));
    }

    #[tokio::test]
    async fn test_unknown_user_rejected() {
        let (engine, store, trip_id) = engine_with_capacity(10, 0).await;

        let known = Uuid::new_v4();
        store.seed_user(known).await;

        let mut req = request(trip_id, "ada@example.com", 1, 0);
        req.user_id = Some(Uuid::new_v4());
        let err = engine.create_booking(req).await.unwrap_err();
        assert!(matches!(
            err,
            ReservationError::NotFound(MissingEntity::User)
        ));

        let mut req = request(trip_id, "ada@example.com", 1, 0);
        req.user_id = Some(known);
        assert!(engine.create_booking(req).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_booking_rejected() {
        let (engine, store, trip_id) = engine_with_capacity(10, 0).await;

        engine
            .create_booking(request(trip_id, "ada@example.com", 1, 0))
            .await
            .unwrap();
        let err = engine
            .create_booking(request(trip_id, "ada@example.com", 1, 0))
            .await
            .unwrap_err();

        assert!(matches!(err, ReservationError::DuplicateBooking));
        assert_eq!(store.booked_count(trip_id, july(14)).await, Some(1));
        assert_eq!(store.booking_total().await, 1);
    }

    #[tokio::test]
    async fn test_failed_validation_is_repeatable_without_mutation() {
        let (engine, store, trip_id) = engine_with_capacity(10, 0).await;

        for _ in 0..3 {
            let mut req = request(trip_id, "ada@example.com", 0, 0);
            req.adults = 0;
            assert!(engine.create_booking(req).await.is_err());
        }
        assert_eq!(store.booked_count(trip_id, july(14)).await, Some(0));
        assert_eq!(store.booking_total().await, 0);
    }

    /// Concurrent requests against one trip+date must never oversell:
    /// the accepted seat sum is bounded by capacity and the final count
    /// equals exactly what was accepted.
    #[tokio::test]
    async fn test_concurrent_requests_never_oversell() {
        let (engine, store, trip_id) = engine_with_capacity(10, 0).await;

        let mut handles = Vec::new();
        for n in 0..20 {
            let engine = engine.clone();
            let email = format!("traveler{n}@example.com");
            handles.push(tokio::spawn(async move {
                engine
                    .create_booking(request(trip_id, &email, 1, 1))
                    .await
                    .is_ok()
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                accepted += 1;
            }
        }

        // 10 seats, 2 per request: exactly 5 winners.
        assert_eq!(accepted, 5);
        assert_eq!(store.booked_count(trip_id, july(14)).await, Some(10));
        assert_eq!(store.booking_total().await, 5);
    }
}
