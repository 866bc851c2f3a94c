use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::models::mail::NotifierSettings;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub default_from_email: String,
    pub admin_email: String,

    pub mail_api_url: String,
    pub mail_api_key: String,

    #[serde(default = "default_geolocation_base_url")]
    pub geolocation_base_url: String,
    #[serde(default)]
    pub geolocation_timeout_seconds: Option<u64>,

    #[serde(default = "default_server_port")]
    pub server_port: u16,
}

fn default_geolocation_base_url() -> String {
    "https://ipapi.co".to_string()
}

fn default_server_port() -> u16 {
    8000
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|e| anyhow!("Invalid or missing environmental variable: {}", e))?;
        Ok(config)
    }

    pub fn from_pairs<I>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Self>(pairs)
            .map_err(|e| anyhow!("Invalid or missing configuration value: {}", e))
    }

    pub fn notifier_settings(&self) -> NotifierSettings {
        NotifierSettings {
            from_address: self.default_from_email.clone(),
            recipients: vec![self.admin_email.clone()],
        }
    }
}
