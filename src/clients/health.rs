use std::{collections::HashMap, time::{Duration, Instant}};

use anyhow::{Error, Result, anyhow};
use chrono::Utc;
use reqwest::Client;
use tracing::{debug, warn};

use crate::{
    config::Config,
    models::health::{HealthCheckResponse, HealthStatus, ServiceHealth},
};

const PROBE_TIMEOUT_SECONDS: u64 = 5;

pub struct HealthChecker {
    config: Config,
    http_client: Client,
}

impl HealthChecker {
    pub fn new(config: Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(PROBE_TIMEOUT_SECONDS))
            .build()
            .map_err(|_| anyhow!("Failed to create health probe HTTP client"))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub async fn check_all(&self) -> HealthCheckResponse {
        let mut checks = HashMap::new();

        checks.insert("geolocation".to_string(), self.check_geolocation().await);
        checks.insert("mailer".to_string(), self.check_mailer());

        let status = determine_overall_status(&checks);

        HealthCheckResponse {
            status,
            timestamp: Utc::now(),
            checks,
        }
    }

    async fn check_geolocation(&self) -> ServiceHealth {
        let start = Instant::now();

        // Any HTTP answer means the provider is reachable.
        match self
            .http_client
            .get(&self.config.geolocation_base_url)
            .send()
            .await
        {
            Ok(response) => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(
                    response_time_ms = elapsed,
                    status = %response.status(),
                    "Geolocation health check passed"
                );
                ServiceHealth::healthy(Some(elapsed))
            }
            Err(e) => {
                warn!(error = %e, "Geolocation provider unreachable");
                ServiceHealth::degraded(format!("Provider unreachable: {}", e))
            }
        }
    }

    // Without a provider or recipient no notification can ever be delivered.
    fn check_mailer(&self) -> ServiceHealth {
        if self.config.mail_api_url.trim().is_empty() {
            warn!("Mail API URL is not configured");
            return ServiceHealth::unhealthy("Mail API URL is not configured".to_string());
        }

        if self.config.admin_email.trim().is_empty() {
            warn!("Admin recipient is not configured");
            return ServiceHealth::unhealthy("Admin recipient is not configured".to_string());
        }

        ServiceHealth::healthy(None)
    }
}

fn determine_overall_status(checks: &HashMap<String, ServiceHealth>) -> HealthStatus {
    let has_unhealthy = checks
        .values()
        .any(|health| health.status == HealthStatus::Unhealthy);

    let has_degraded = checks
        .values()
        .any(|health| health.status == HealthStatus::Degraded);

    if has_unhealthy {
        HealthStatus::Unhealthy
    } else if has_degraded {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}
