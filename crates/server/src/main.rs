//! Voyage server entry point.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware};
use sea_orm::DatabaseConnection;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voyage_api::{AppState, auth_middleware, router as api_router};
use voyage_common::Config;
use voyage_core::{
    AttractionService, BookingNotifier, BookingService, FavoriteService, FirebaseTokenVerifier,
    FlightBookingService, FlightSearchService, HotelService, ItineraryService, ListingDirectory,
    MailerService, NewsletterService, NoOpMailer, PaymentService, PlacesService,
    RestaurantService, SmtpMailer, UserService,
};
use voyage_db::repositories::{
    AttractionRepository, BookingRepository, FavoriteRepository, FlightBookingRepository,
    HotelRepository, ItineraryRepository, PaymentRepository, RestaurantRepository,
    UserRepository,
};

/// Request bodies above this size are refused.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Waits for SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}

fn build_state(config: &Config, db: Arc<DatabaseConnection>) -> anyhow::Result<AppState> {
    let user_repo = UserRepository::new(Arc::clone(&db));
    let hotel_repo = HotelRepository::new(Arc::clone(&db));
    let restaurant_repo = RestaurantRepository::new(Arc::clone(&db));
    let attraction_repo = AttractionRepository::new(Arc::clone(&db));
    let booking_repo = BookingRepository::new(Arc::clone(&db));
    let flight_repo = FlightBookingRepository::new(Arc::clone(&db));
    let itinerary_repo = ItineraryRepository::new(Arc::clone(&db));
    let favorite_repo = FavoriteRepository::new(Arc::clone(&db));
    let payment_repo = PaymentRepository::new(db);

    let (mailer, admin_address): (MailerService, Option<String>) = match &config.email {
        Some(email) => {
            info!(host = %email.smtp_host, from = %email.from_address, "SMTP email enabled");
            (
                Arc::new(SmtpMailer::new(email)?),
                Some(email.admin_address.clone()),
            )
        }
        None => {
            info!("Email not configured, booking notifications are disabled");
            (Arc::new(NoOpMailer), None)
        }
    };
    let notifier = BookingNotifier::new(mailer, admin_address, "Voyage", &config.server.url);

    let listings = ListingDirectory::new(
        hotel_repo.clone(),
        restaurant_repo.clone(),
        attraction_repo.clone(),
    );

    let integrations = &config.integrations;
    let flight_search_service = integrations.amadeus.clone().map(FlightSearchService::new);
    let places_service = integrations.google_places.clone().map(PlacesService::new);
    let newsletter_service = integrations.mailchimp.clone().map(NewsletterService::new);
    info!(
        amadeus = flight_search_service.is_some(),
        google_places = places_service.is_some(),
        mailchimp = newsletter_service.is_some(),
        "Integrations configured"
    );

    Ok(AppState {
        verifier: Arc::new(FirebaseTokenVerifier::new(&config.auth)),
        user_service: UserService::new(user_repo),
        hotel_service: HotelService::new(hotel_repo),
        restaurant_service: RestaurantService::new(restaurant_repo),
        attraction_service: AttractionService::new(attraction_repo),
        booking_service: BookingService::new(
            booking_repo.clone(),
            listings.clone(),
            notifier.clone(),
        ),
        flight_booking_service: FlightBookingService::new(
            flight_repo.clone(),
            notifier,
        ),
        itinerary_service: ItineraryService::new(itinerary_repo),
        favorite_service: FavoriteService::new(favorite_repo, listings),
        payment_service: PaymentService::new(payment_repo, booking_repo, flight_repo),
        flight_search_service,
        places_service,
        newsletter_service,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voyage=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting voyage server...");

    let config = Config::load()?;

    let db = voyage_db::init(&config.database).await?;
    voyage_db::migrate(&db).await?;

    let state = build_state(&config, Arc::new(db))?;

    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
