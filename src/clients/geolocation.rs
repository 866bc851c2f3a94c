use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    models::{geolocation::GeolocationResponse, visit::Location},
};

#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn locate(&self, address: &str) -> Result<Location, Error>;
}

/// Client for ipapi-style providers: `GET {base}/{address}/json/`.
pub struct IpApiClient {
    http_client: Client,
    base_url: Url,
}

impl IpApiClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let base_url = Url::parse(&config.geolocation_base_url)
            .map_err(|e| anyhow!("Invalid geolocation base URL: {}", e))?;

        let mut builder = Client::builder();
        match config.geolocation_timeout_seconds {
            Some(seconds) => builder = builder.timeout(Duration::from_secs(seconds)),
            None => warn!(
                base_url = %base_url,
                "Geolocation lookups have no timeout, a stalled provider stalls every tracked request"
            ),
        }

        let http_client = builder
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!(base_url = %base_url, "Geolocation client initialized");

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn lookup_url(&self, address: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Geolocation base URL cannot carry a path"))?
            .pop_if_empty()
            .push(address)
            .push("json")
            .push("");
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl GeoLocator for IpApiClient {
    async fn locate(&self, address: &str) -> Result<Location, Error> {
        let url = self.lookup_url(address)?;

        debug!(address, "Looking up visitor location");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Geolocation request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Geolocation service returned status {}", status));
        }

        let body: GeolocationResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse geolocation JSON: {}", e))?;

        if body.error == Some(true) {
            debug!(
                address,
                reason = body.reason.as_deref().unwrap_or_default(),
                "Geolocation provider has no data for address"
            );
        }

        Ok(Location::from_parts(body.city, body.country_name))
    }
}

/// Every failure collapses to the placeholder location.
pub async fn locate_or_unknown(locator: &dyn GeoLocator, address: Option<&str>) -> Location {
    let Some(address) = address.map(str::trim).filter(|a| !a.is_empty()) else {
        debug!("No visitor address available, skipping geolocation");
        return Location::unknown();
    };

    match locator.locate(address).await {
        Ok(location) => location,
        Err(e) => {
            warn!(address, error = %e, "Geolocation lookup failed");
            Location::unknown()
        }
    }
}
