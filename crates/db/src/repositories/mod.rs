//! Repositories wrapping entity queries.

pub mod attraction;
pub mod booking;
pub mod favorite;
pub mod flight_booking;
pub mod hotel;
pub mod itinerary;
pub mod payment;
pub mod restaurant;
pub mod user;

pub use attraction::AttractionRepository;
pub use booking::BookingRepository;
pub use favorite::FavoriteRepository;
pub use flight_booking::FlightBookingRepository;
pub use hotel::HotelRepository;
pub use itinerary::ItineraryRepository;
pub use payment::PaymentRepository;
pub use restaurant::RestaurantRepository;
pub use user::UserRepository;

/// Filters accepted by the public listing queries.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    /// Exact city match.
    pub city: Option<String>,
    /// Substring of the name.
    pub query: Option<String>,
    /// Lower price bound in cents (hotels, attractions) or price level (restaurants).
    pub min_price: Option<i64>,
    /// Upper price bound, same unit as `min_price`.
    pub max_price: Option<i64>,
    /// Restaurant cuisine or attraction category.
    pub category: Option<String>,
}
