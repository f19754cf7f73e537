//! Business logic services.

#![allow(missing_docs)]

pub mod attraction;
pub mod booking;
pub mod email;
pub mod favorite;
pub mod flight_booking;
pub mod flight_search;
pub mod hotel;
pub mod identity;
pub mod itinerary;
pub mod listing;
pub mod newsletter;
pub mod notification;
pub mod payment;
pub mod places;
pub mod restaurant;
pub mod user;

#[cfg(test)]
pub(crate) mod fixtures;

pub use attraction::{AttractionService, CreateAttractionInput, UpdateAttractionInput};
pub use booking::{BookingService, CreateBookingInput};
pub use email::{EmailMessage, Mailer, MailerService, NoOpMailer, SmtpMailer};
pub use favorite::{AddFavoriteInput, FavoriteService};
pub use flight_booking::{CreateFlightBookingInput, FlightBookingService};
pub use flight_search::{FlightOffer, FlightSearchQuery, FlightSearchService};
pub use hotel::{CreateHotelInput, HotelService, UpdateHotelInput};
pub use identity::{FirebaseTokenVerifier, TokenVerifier, TokenVerifierService, VerifiedIdentity};
pub use itinerary::{
    CreateItineraryInput, ItemKind, ItineraryItem, ItineraryService, UpdateItineraryInput,
};
pub use listing::{ListingDirectory, ListingSnapshot};
pub use newsletter::{NewsletterService, SubscribeInput, Subscription};
pub use notification::{BookingEvent, BookingNotifier};
pub use payment::{CreatePaymentInput, PaymentService};
pub use places::{Place, PlaceSearchQuery, PlacesService};
pub use restaurant::{CreateRestaurantInput, RestaurantService, UpdateRestaurantInput};
pub use user::{RegisterInput, UpdateProfileInput, UserService};
