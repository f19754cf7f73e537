//! Outbound email.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
};
use std::sync::Arc;
use voyage_common::{AppError, AppResult, config::EmailConfig};

/// Email message to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain text body
    pub text_body: String,
    /// HTML body
    pub html_body: String,
}

/// Something that can deliver an [`EmailMessage`].
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message. No retries.
    async fn send(&self, message: EmailMessage) -> AppResult<()>;
}

/// Shared mailer handle.
pub type MailerService = Arc<dyn Mailer>;

/// SMTP delivery through a STARTTLS relay (Gmail by default).
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the transport. No connection is opened until the first send.
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        let from = Mailbox::new(
            Some(config.from_name.clone()),
            config
                .from_address
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid from address: {e}")))?,
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| AppError::Config(format!("Invalid SMTP relay: {e}")))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| AppError::Email(format!("Invalid recipient {}: {e}", message.to)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject)
            .multipart(MultiPart::alternative_plain_html(
                message.text_body,
                message.html_body,
            ))
            .map_err(|e| AppError::Email(format!("Failed to build message: {e}")))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| AppError::Email(format!("SMTP send failed: {e}")))?;

        Ok(())
    }
}

/// Mailer used when SMTP is not configured. Drops every message.
pub struct NoOpMailer;

#[async_trait]
impl Mailer for NoOpMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        tracing::debug!(
            to = %message.to,
            subject = %message.subject,
            "Email disabled, message dropped"
        );
        Ok(())
    }
}

/// Wrap HTML content in the shared email layout.
#[must_use]
pub fn wrap_html(content: &str, app_name: &str, app_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }}
        a {{ color: #0b7285; }}
        table {{ border-collapse: collapse; }}
        td {{ padding: 4px 12px 4px 0; }}
    </style>
</head>
<body>
    {content}
    <hr style="margin-top: 40px; border: none; border-top: 1px solid #e9ecef;">
    <p style="font-size: 12px; color: #6c757d;">
        Sent by <a href="{app_url}">{app_name}</a>.
    </p>
</body>
</html>"#
    )
}

/// Escape text interpolated into HTML bodies.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
