pub mod memory;
pub mod models;
pub mod reservation;
pub mod store;

pub use memory::InMemoryReservationStore;
pub use models::{Booking, BookingDraft, BookingRequest, BookingStatus, PaymentMethod};
pub use reservation::{MissingEntity, ReservationError, Reservations};
pub use store::ReservationStore;
