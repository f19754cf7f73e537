//! Booking notification emails.
//!
//! Templates are keyed by resource kind and the status the booking just
//! entered. Delivery is attempted once; failures are logged and never reach
//! the caller.

use voyage_db::entities::{ModerationStatus, booking, flight_booking};

use super::email::{EmailMessage, MailerService, escape_html, wrap_html};
use crate::moderation::ResourceKind;

/// Facts about a booking that the templates need.
#[derive(Debug, Clone)]
pub struct BookingEvent {
    pub kind: ResourceKind,
    pub booking_id: i32,
    pub reference: String,
    /// One-line description, e.g. "Hotel #3, 2026-06-01 to 2026-06-04".
    pub summary: String,
    pub amount_cents: i64,
    pub currency: String,
    pub contact_email: String,
    pub status: ModerationStatus,
    pub note: Option<String>,
}

impl From<&booking::Model> for BookingEvent {
    fn from(b: &booking::Model) -> Self {
        let dates = match b.end_date {
            Some(end) => format!("{} to {}", b.start_date, end),
            None => b.start_date.to_string(),
        };
        Self {
            kind: ResourceKind::Booking,
            booking_id: b.id,
            reference: b.reference.clone(),
            summary: format!(
                "{} #{} ({}), {dates}, {} guest(s)",
                capitalize(b.resource_type.as_str()),
                b.resource_id,
                b.option,
                b.guests
            ),
            amount_cents: b.amount_cents,
            currency: b.currency.clone(),
            contact_email: b.contact_email.clone(),
            status: b.status,
            note: b.review_note.clone(),
        }
    }
}

impl From<&flight_booking::Model> for BookingEvent {
    fn from(f: &flight_booking::Model) -> Self {
        Self {
            kind: ResourceKind::FlightBooking,
            booking_id: f.id,
            reference: f.reference.clone(),
            summary: format!(
                "{} {} to {}, departing {}, {} passenger(s), {}",
                f.flight_number,
                f.origin,
                f.destination,
                f.departure_at.format("%Y-%m-%d %H:%M UTC"),
                f.passengers,
                f.cabin_class
            ),
            amount_cents: f.amount_cents,
            currency: f.currency.clone(),
            contact_email: f.contact_email.clone(),
            status: f.status,
            note: f.review_note.clone(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn format_amount(cents: i64, currency: &str) -> String {
    format!("{}.{:02} {currency}", cents / 100, (cents % 100).abs())
}

/// Rendered subject and bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Sends booking emails to customers and the admin mailbox.
#[derive(Clone)]
pub struct BookingNotifier {
    mailer: MailerService,
    admin_address: Option<String>,
    app_name: String,
    app_url: String,
}

impl BookingNotifier {
    /// Create a notifier.
    #[must_use]
    pub fn new(
        mailer: MailerService,
        admin_address: Option<String>,
        app_name: impl Into<String>,
        app_url: impl Into<String>,
    ) -> Self {
        Self {
            mailer,
            admin_address,
            app_name: app_name.into(),
            app_url: app_url.into(),
        }
    }

    /// A new booking was submitted: tell the customer and the admin mailbox.
    pub async fn booking_created(&self, event: &BookingEvent) {
        let rendered = self.render(event);
        self.deliver(&event.contact_email, &rendered, event).await;

        if let Some(admin) = &self.admin_address {
            let admin_mail = self.render_admin_alert(event);
            self.deliver(admin, &admin_mail, event).await;
        }
    }

    /// The booking entered `event.status`: tell the customer.
    pub async fn status_changed(&self, event: &BookingEvent) {
        let rendered = self.render(event);
        self.deliver(&event.contact_email, &rendered, event).await;
    }

    async fn deliver(&self, to: &str, rendered: &RenderedEmail, event: &BookingEvent) {
        let message = EmailMessage {
            to: to.to_string(),
            subject: rendered.subject.clone(),
            text_body: rendered.text.clone(),
            html_body: rendered.html.clone(),
        };

        match self.mailer.send(message).await {
            Ok(()) => tracing::info!(
                kind = %event.kind,
                booking_id = event.booking_id,
                status = %event.status,
                to = %to,
                "Booking notification sent"
            ),
            Err(e) => tracing::warn!(
                kind = %event.kind,
                booking_id = event.booking_id,
                status = %event.status,
                to = %to,
                error = %e,
                "Booking notification failed"
            ),
        }
    }

    /// Render the customer email for `(event.kind, event.status)`.
    #[must_use]
    pub fn render(&self, event: &BookingEvent) -> RenderedEmail {
        let what = match event.kind {
            ResourceKind::FlightBooking => "flight booking",
            _ => "booking",
        };
        let amount = format_amount(event.amount_cents, &event.currency);
        let reference = &event.reference;

        let (subject, headline, detail) = match (event.kind, event.status) {
            (_, ModerationStatus::Pending) => (
                format!("We received your {what} {reference}"),
                format!("Thanks! Your {what} request is waiting for confirmation."),
                "You will get another email as soon as it has been reviewed.".to_string(),
            ),
            (ResourceKind::FlightBooking, ModerationStatus::Approved) => (
                format!("Your flight {reference} is confirmed"),
                "Your flight booking has been confirmed.".to_string(),
                "Please arrive at the airport at least two hours before departure.".to_string(),
            ),
            (_, ModerationStatus::Approved) => (
                format!("Your {what} {reference} is confirmed"),
                format!("Good news: your {what} has been confirmed."),
                format!(
                    "You can now pay online from your bookings page: {}/bookings",
                    self.app_url
                ),
            ),
            (_, ModerationStatus::Rejected) => (
                format!("Your {what} {reference} could not be confirmed"),
                format!("Unfortunately we could not confirm your {what}."),
                event.note.as_ref().map_or_else(
                    || "No payment has been taken.".to_string(),
                    |note| format!("Reason: {note}"),
                ),
            ),
            (_, ModerationStatus::Cancelled) => (
                format!("Your {what} {reference} was cancelled"),
                format!("Your {what} has been cancelled."),
                "Any payment made for it has been refunded.".to_string(),
            ),
        };

        let text = format!(
            "{headline}\n\nReference: {reference}\nDetails: {}\nTotal: {amount}\n\n{detail}\n\n{}",
            event.summary, self.app_url
        );
        let html = wrap_html(
            &format!(
                "<p>{}</p>\
                <table>\
                <tr><td>Reference</td><td><strong>{}</strong></td></tr>\
                <tr><td>Details</td><td>{}</td></tr>\
                <tr><td>Total</td><td>{amount}</td></tr>\
                </table>\
                <p>{}</p>",
                escape_html(&headline),
                escape_html(reference),
                escape_html(&event.summary),
                escape_html(&detail)
            ),
            &self.app_name,
            &self.app_url,
        );

        RenderedEmail {
            subject: format!("{subject} | {}", self.app_name),
            text,
            html,
        }
    }

    fn render_admin_alert(&self, event: &BookingEvent) -> RenderedEmail {
        let amount = format_amount(event.amount_cents, &event.currency);
        let subject = format!("New {} awaiting review: {}", event.kind, event.reference);
        let text = format!(
            "{} {} was submitted by {}.\n\nDetails: {}\nTotal: {amount}\n\nReview queue: {}/admin",
            event.kind, event.reference, event.contact_email, event.summary, self.app_url
        );
        let html = wrap_html(
            &format!(
                "<p>{} <strong>{}</strong> was submitted by {}.</p>\
                <p>{}<br>Total: {amount}</p>\
                <p><a href=\"{}/admin\">Open the review queue</a></p>",
                event.kind,
                escape_html(&event.reference),
                escape_html(&event.contact_email),
                escape_html(&event.summary),
                self.app_url
            ),
            &self.app_name,
            &self.app_url,
        );

        RenderedEmail {
            subject,
            text,
            html,
        }
    }
}
