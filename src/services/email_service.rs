//! Envío de emails transaccionales
//!
//! `BrevoEmailService` usa la API HTTP de Brevo. Sin `BREVO_API_KEY` se usa
//! `LogEmailService`, que solo escribe el enlace de verificación en el log.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{error, info};

use crate::config::EnvironmentConfig;

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Devuelve `true` si el proveedor aceptó el email
    async fn send_verification(&self, email: &str, token: &str) -> bool;
}

/// Enlace que el usuario abre para verificar su email
pub fn verification_link(frontend_url: &str, token: &str) -> String {
    format!(
        "{}/verify-email?token={}",
        frontend_url.trim_end_matches('/'),
        token
    )
}

pub struct BrevoEmailService {
    client: Client,
    api_key: String,
    sender_email: String,
    sender_name: String,
    frontend_url: String,
}

impl BrevoEmailService {
    pub fn new(config: &EnvironmentConfig, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            sender_email: config.email_from.clone(),
            sender_name: config.email_from_name.clone(),
            frontend_url: config.frontend_url.clone(),
        }
    }
}

#[async_trait]
impl EmailSender for BrevoEmailService {
    async fn send_verification(&self, email: &str, token: &str) -> bool {
        let link = verification_link(&self.frontend_url, token);
        let payload = json!({
            "sender": { "name": self.sender_name, "email": self.sender_email },
            "to": [{ "email": email }],
            "subject": "Verify your email address",
            "htmlContent": format!(
                "<p>Welcome to {}!</p><p>Please confirm your email address by clicking \
                 <a href=\"{link}\">this link</a>.</p><p>If the link does not work, copy it \
                 into your browser: {link}</p>",
                self.sender_name,
                link = link
            ),
        });

        let response = self
            .client
            .post(BREVO_SEND_URL)
            .header("api-key", &self.api_key)
            .header("accept", "application/json")
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("📧 Verification email sent to {}", email);
                true
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                error!("❌ Brevo rejected email to {}: {} {}", email, status, body);
                false
            }
            Err(e) => {
                error!("❌ Brevo request failed for {}: {}", email, e);
                false
            }
        }
    }
}

/// Sender de desarrollo: registra el enlace en lugar de enviarlo
pub struct LogEmailService {
    frontend_url: String,
}

impl LogEmailService {
    pub fn new(frontend_url: impl Into<String>) -> Self {
        Self {
            frontend_url: frontend_url.into(),
        }
    }
}

#[async_trait]
impl EmailSender for LogEmailService {
    async fn send_verification(&self, email: &str, token: &str) -> bool {
        info!(
            "📧 [dev] Verification link for {}: {}",
            email,
            verification_link(&self.frontend_url, token)
        );
        true
    }
}
