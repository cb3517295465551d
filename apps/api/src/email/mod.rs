//! Transactional email over the Resend HTTP API.
//!
//! Code emails degrade to a console fallback: when no API key is configured,
//! or the provider refuses the recipient (403, typical of sandbox accounts),
//! the code is written to the log and the send counts as delivered.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

pub mod templates;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email service configuration error: API key missing")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("email API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl EmailError {
    fn allows_console_fallback(&self) -> bool {
        matches!(
            self,
            EmailError::NotConfigured | EmailError::Api { status: 403, .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent { id: String },
    /// The provider was unavailable; the code was written to the log instead.
    Logged,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one email, returning the provider's message id.
    async fn send(&self, email: &OutgoingEmail) -> Result<String, EmailError>;
}

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResendError {
    message: String,
}

#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    api_key: Option<String>,
    from: String,
}

impl ResendMailer {
    pub fn new(api_key: Option<String>, from: String) -> Result<Self, EmailError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .build()?,
            api_key,
            from,
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, EmailError> {
        let api_key = self.api_key.as_deref().ok_or(EmailError::NotConfigured)?;

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(api_key)
            .json(&ResendRequest {
                from: &self.from,
                to: [&email.to],
                subject: &email.subject,
                html: &email.html,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ResendError>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(EmailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let sent: ResendResponse = response.json().await?;
        Ok(sent.id)
    }
}

pub async fn send_verification_code(
    mailer: &dyn Mailer,
    to: &str,
    username: &str,
    code: &str,
) -> Result<Delivery, EmailError> {
    deliver_code(mailer, templates::verification_email(to, username, code), code).await
}

pub async fn send_password_reset_code(
    mailer: &dyn Mailer,
    to: &str,
    username: &str,
    code: &str,
) -> Result<Delivery, EmailError> {
    deliver_code(mailer, templates::password_reset_email(to, username, code), code).await
}

async fn deliver_code(
    mailer: &dyn Mailer,
    email: OutgoingEmail,
    code: &str,
) -> Result<Delivery, EmailError> {
    match mailer.send(&email).await {
        Ok(id) => {
            info!(to = %email.to, id = %id, "Email sent");
            Ok(Delivery::Sent { id })
        }
        Err(e) if e.allows_console_fallback() => {
            warn!(
                to = %email.to,
                code = %code,
                "Email delivery unavailable ({e}); code logged instead"
            );
            Ok(Delivery::Logged)
        }
        Err(e) => {
            error!(to = %email.to, "Failed to send email: {e}");
            Err(e)
        }
    }
}
