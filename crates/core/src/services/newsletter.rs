//! Newsletter subscriptions through Mailchimp.

use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;
use voyage_common::{AppError, AppResult, config::MailchimpConfig};

/// Input for subscribing.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 128))]
    pub first_name: Option<String>,
    #[validate(length(max = 128))]
    pub last_name: Option<String>,
}

/// Result of a subscription request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub email: String,
    /// Mailchimp member status, usually `subscribed`.
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct MemberResponse {
    email_address: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    title: String,
    #[serde(default)]
    detail: String,
}

fn map_error(status: reqwest::StatusCode, body: &str) -> AppError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) if err.title == "Member Exists" => {
            AppError::Conflict("Email is already subscribed".to_string())
        }
        Ok(err) if status == reqwest::StatusCode::BAD_REQUEST => {
            AppError::invalid_field("email", err.detail)
        }
        _ => AppError::ExternalService(format!("Mailchimp API error: {status} - {body}")),
    }
}

/// Mailchimp audience client.
#[derive(Clone)]
pub struct NewsletterService {
    config: MailchimpConfig,
    http_client: reqwest::Client,
}

impl NewsletterService {
    /// Create a new newsletter client.
    #[must_use]
    pub fn new(config: MailchimpConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Add an address to the audience.
    pub async fn subscribe(&self, input: SubscribeInput) -> AppResult<Subscription> {
        input.validate()?;

        let dc = self.config.data_center().ok_or_else(|| {
            AppError::Config("Mailchimp API key has no data center suffix".to_string())
        })?;
        let url = format!(
            "https://{dc}.api.mailchimp.com/3.0/lists/{}/members",
            self.config.list_id
        );

        let body = json!({
            "email_address": input.email,
            "status": "subscribed",
            "merge_fields": {
                "FNAME": input.first_name.unwrap_or_default(),
                "LNAME": input.last_name.unwrap_or_default(),
            }
        });

        let response = self
            .http_client
            .post(url)
            .basic_auth("voyage", Some(&self.config.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Mailchimp request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_error(status, &text));
        }

        let member: MemberResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse Mailchimp response: {e}"))
        })?;

        tracing::info!(status = %member.status, "Newsletter subscription added");
        Ok(Subscription {
            email: member.email_address,
            status: member.status,
        })
    }
}
