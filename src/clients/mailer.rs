use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    models::mail::{MailApiRequest, OutgoingMail},
};

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<(), Error>;
}

/// Sends mail through a JSON mail-provider API with bearer authentication.
pub struct HttpMailer {
    http_client: Client,
    api_url: String,
    api_key: String,
}

impl HttpMailer {
    pub fn new(config: &Config) -> Self {
        info!(api_url = %config.mail_api_url, "Mail client initialized");

        Self {
            http_client: Client::new(),
            api_url: config.mail_api_url.clone(),
            api_key: config.mail_api_key.clone(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<(), Error> {
        debug!(
            subject = %mail.subject,
            recipients = mail.recipients.len(),
            "Sending mail"
        );

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&MailApiRequest::from(mail))
            .send()
            .await?;

        if response.status().is_success() {
            info!("Mail accepted by provider");
            Ok(())
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            Err(anyhow!("Mail request failed with status {}: {}", status, error_text))
        }
    }
}

/// Returns whether the provider accepted the mail. Failures are logged and
/// dropped.
pub async fn send_mail_silently(mailer: &dyn Mailer, mail: &OutgoingMail) -> bool {
    match mailer.send_mail(mail).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, subject = %mail.subject, "Mail send failed, dropping");
            false
        }
    }
}
