use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reservation::ReservationError;

/// Booking status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(BookingStatus::Pending),
            "CONFIRMED" => Some(BookingStatus::Confirmed),
            "CANCELLED" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    BankTransfer,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::Paypal => "PAYPAL",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::Cash => "CASH",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CREDIT_CARD" => Some(PaymentMethod::CreditCard),
            "PAYPAL" => Some(PaymentMethod::Paypal),
            "BANK_TRANSFER" => Some(PaymentMethod::BankTransfer),
            "CASH" => Some(PaymentMethod::Cash),
            _ => None,
        }
    }
}

/// A persisted booking. Immutable once created; seats it consumed are
/// reflected in the availability row's booked count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub country: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub travel_date: NaiveDate,
    pub adults: i32,
    pub children: i32,
    pub subtotal_cents: i64,
    pub total_price_cents: i64,
    pub payment_method: PaymentMethod,
    pub status: BookingStatus,
    pub order_note: Option<String>,
    pub user_id: Option<Uuid>,
    pub trip_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Raw booking request as it arrives over the wire. Field names follow
/// the public API's camelCase contract. Prices are 2-decimal amounts and
/// `travel_date` is an ISO date string until `validate` normalizes them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub country: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub travel_date: String,
    pub adults: i32,
    pub children: i32,
    pub subtotal: f64,
    pub total_price: f64,
    pub payment_method: PaymentMethod,
    pub status: Option<BookingStatus>,
    pub order_note: Option<String>,
    pub user_id: Option<Uuid>,
    pub trip_id: Uuid,
}

/// A booking request that passed input validation: date normalized to
/// day granularity, amounts converted to cents.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub country: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub travel_date: NaiveDate,
    pub adults: i32,
    pub children: i32,
    pub subtotal_cents: i64,
    pub total_price_cents: i64,
    pub payment_method: PaymentMethod,
    pub status: BookingStatus,
    pub order_note: Option<String>,
    pub user_id: Option<Uuid>,
    pub trip_id: Uuid,
}

impl BookingDraft {
    /// Seats this booking consumes against the date's capacity.
    pub fn requested_seats(&self) -> i32 {
        self.adults.saturating_add(self.children)
    }
}

impl BookingRequest {
    /// Validate and normalize the request before any data access.
    pub fn validate(self) -> Result<BookingDraft, ReservationError> {
        let travel_date = parse_travel_date(&self.travel_date)
            .ok_or_else(|| ReservationError::InvalidInput("Invalid travel date format.".into()))?;

        if self.adults < 1 {
            return Err(ReservationError::InvalidInput(
                "At least one adult traveler is required.".into(),
            ));
        }
        if self.children < 0 {
            return Err(ReservationError::InvalidInput(
                "Children count cannot be negative.".into(),
            ));
        }

        require_text("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(ReservationError::InvalidInput(
                "email must be a valid address".into(),
            ));
        }
        require_text("firstName", &self.first_name)?;
        require_text("lastName", &self.last_name)?;
        require_text("country", &self.country)?;
        require_text("address", &self.address)?;
        require_text("city", &self.city)?;
        require_text("state", &self.state)?;
        require_text("zipCode", &self.zip_code)?;

        let subtotal_cents = to_cents("subtotal", self.subtotal)?;
        let total_price_cents = to_cents("totalPrice", self.total_price)?;

        Ok(BookingDraft {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            country: self.country,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            travel_date,
            adults: self.adults,
            children: self.children,
            subtotal_cents,
            total_price_cents,
            payment_method: self.payment_method,
            status: self.status.unwrap_or(BookingStatus::Pending),
            order_note: self.order_note,
            user_id: self.user_id,
            trip_id: self.trip_id,
        })
    }
}

/// Accepts a bare ISO date or a full RFC 3339 timestamp; time-of-day is
/// discarded so it can never cause a false "no availability" miss.
fn parse_travel_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    None
}

fn require_text(field: &str, value: &str) -> Result<(), ReservationError> {
    if value.trim().is_empty() {
        return Err(ReservationError::InvalidInput(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

fn to_cents(field: &str, amount: f64) -> Result<i64, ReservationError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ReservationError::InvalidInput(format!(
            "{field} must be a positive amount"
        )));
    }
    let scaled = amount * 100.0;
    let rounded = scaled.round();
    if (scaled - rounded).abs() > 1e-6 {
        return Err(ReservationError::InvalidInput(format!(
            "{field} must have at most two decimal places"
        )));
    }
    Ok(rounded as i64)
}
