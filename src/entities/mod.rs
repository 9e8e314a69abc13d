//! Resource kinds served by the API

pub mod booking;
pub mod person;
pub mod price;
pub mod user;

pub use booking::{Booking, BookingDraft, BookingPatch};
pub use person::{Person, PersonDraft, PersonPatch};
pub use price::{Price, PriceDraft, PricePatch};
pub use user::{User, UserDraft, UserPatch};
