use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use wayfarer_booking::{
    Booking, BookingDraft, BookingStatus, MissingEntity, PaymentMethod, ReservationError,
    ReservationStore,
};
use wayfarer_catalog::{Trip, TripAvailability, TripRepository};

use crate::trip_repo::{AvailabilityRow, PgTripRepository};

pub struct PgReservationStore {
    pool: PgPool,
    trips: PgTripRepository,
}

impl PgReservationStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            trips: PgTripRepository::new(pool.clone()),
            pool,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    phone: Option<String>,
    country: String,
    address: String,
    city: String,
    state: String,
    zip_code: String,
    travel_date: NaiveDate,
    adults: i32,
    children: i32,
    subtotal_cents: i64,
    total_price_cents: i64,
    payment_method: String,
    status: String,
    order_note: Option<String>,
    user_id: Option<Uuid>,
    trip_id: Uuid,
    created_at: chrono::DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking, ReservationError> {
        let payment_method = PaymentMethod::parse(&self.payment_method).ok_or_else(|| {
            ReservationError::Persistence(format!(
                "unknown payment_method value: {}",
                self.payment_method
            ))
        })?;
        let status = BookingStatus::parse(&self.status).ok_or_else(|| {
            ReservationError::Persistence(format!("unknown status value: {}", self.status))
        })?;

        Ok(Booking {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            country: self.country,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            travel_date: self.travel_date,
            adults: self.adults,
            children: self.children,
            subtotal_cents: self.subtotal_cents,
            total_price_cents: self.total_price_cents,
            payment_method,
            status,
            order_note: self.order_note,
            user_id: self.user_id,
            trip_id: self.trip_id,
            created_at: self.created_at,
        })
    }
}

fn persistence(err: sqlx::Error) -> ReservationError {
    tracing::error!("Booking store query failed: {}", err);
    ReservationError::Persistence(err.to_string())
}

#[async_trait]
impl ReservationStore for PgReservationStore {
    async fn find_trip(&self, id: Uuid) -> Result<Option<Trip>, ReservationError> {
        self.trips
            .find_trip(id)
            .await
            .map_err(|err| ReservationError::Persistence(err.to_string()))
    }

    async fn find_availability(
        &self,
        trip_id: Uuid,
        travel_date: NaiveDate,
    ) -> Result<Option<TripAvailability>, ReservationError> {
        let row = sqlx::query_as::<_, AvailabilityRow>(
            "SELECT id, trip_id, travel_date, max_travelers, booked_count, \
             adult_price_cents, child_price_cents \
             FROM trip_availability WHERE trip_id = $1 AND travel_date = $2",
        )
        .bind(trip_id)
        .bind(travel_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence)?;

        Ok(row.map(AvailabilityRow::into_availability))
    }

    async fn user_exists(&self, id: Uuid) -> Result<bool, ReservationError> {
        let found: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence)?;
        Ok(found.is_some())
    }

    /// The authoritative reservation step. Locks the availability row
    /// with SELECT ... FOR UPDATE so the capacity read and the counter
    /// increment are serialized against concurrent bookings on the same
    /// trip+date; the booking insert and the increment commit or roll
    /// back together.
    async fn commit_reservation(&self, draft: &BookingDraft) -> Result<Booking, ReservationError> {
        let requested = draft.requested_seats();
        if requested <= 0 {
            return Err(ReservationError::InvalidInput(
                "Booking must include at least one traveler.".into(),
            ));
        }

        let mut tx = self.pool.begin().await.map_err(persistence)?;

        let locked = sqlx::query_as::<_, AvailabilityRow>(
            "SELECT id, trip_id, travel_date, max_travelers, booked_count, \
             adult_price_cents, child_price_cents \
             FROM trip_availability WHERE trip_id = $1 AND travel_date = $2 \
             FOR UPDATE",
        )
        .bind(draft.trip_id)
        .bind(draft.travel_date)
        .fetch_optional(&mut *tx)
        .await
        .map_err(persistence)?;

        // Dropping the transaction rolls back; nothing was written yet.
        let Some(row) = locked else {
            return Err(ReservationError::NotFound(MissingEntity::Availability));
        };

        if row.booked_count + requested > row.max_travelers {
            return Err(ReservationError::CapacityExceeded {
                requested,
                available: (row.max_travelers - row.booked_count).max(0),
            });
        }

        let booking_id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            "INSERT INTO bookings (id, email, first_name, last_name, phone, country, address, \
             city, state, zip_code, travel_date, adults, children, subtotal_cents, \
             total_price_cents, payment_method, status, order_note, user_id, trip_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
             $18, $19, $20, $21)",
        )
        .bind(booking_id)
        .bind(&draft.email)
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.phone)
        .bind(&draft.country)
        .bind(&draft.address)
        .bind(&draft.city)
        .bind(&draft.state)
        .bind(&draft.zip_code)
        .bind(draft.travel_date)
        .bind(draft.adults)
        .bind(draft.children)
        .bind(draft.subtotal_cents)
        .bind(draft.total_price_cents)
        .bind(draft.payment_method.as_str())
        .bind(draft.status.as_str())
        .bind(&draft.order_note)
        .bind(draft.user_id)
        .bind(draft.trip_id)
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err {
                if db_err.is_unique_violation() {
                    return ReservationError::DuplicateBooking;
                }
            }
            persistence(err)
        })?;

        sqlx::query("UPDATE trip_availability SET booked_count = booked_count + $1 WHERE id = $2")
            .bind(requested)
            .bind(row.id)
            .execute(&mut *tx)
            .await
            .map_err(persistence)?;

        tx.commit().await.map_err(persistence)?;

        Ok(Booking {
            id: booking_id,
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
            created_at,
        })
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ReservationError> {
        let row = sqlx::query_as::<_, BookingRow>(
            "SELECT id, email, first_name, last_name, phone, country, address, city, state, \
             zip_code, travel_date, adults, children, subtotal_cents, total_price_cents, \
             payment_method, status, order_note, user_id, trip_id, created_at \
             FROM bookings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence)?;

        row.map(BookingRow::into_booking).transpose()
    }
}
