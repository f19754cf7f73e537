//! Database entities.

pub mod attraction;
pub mod booking;
pub mod favorite;
pub mod flight_booking;
pub mod hotel;
pub mod itinerary;
pub mod payment;
pub mod restaurant;
pub mod status;
pub mod user;

pub use attraction::Entity as Attraction;
pub use booking::Entity as Booking;
pub use favorite::Entity as Favorite;
pub use flight_booking::Entity as FlightBooking;
pub use hotel::Entity as Hotel;
pub use itinerary::Entity as Itinerary;
pub use payment::Entity as Payment;
pub use restaurant::Entity as Restaurant;
pub use status::{ListingKind, ModerationStatus};
pub use user::Entity as User;
