use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeolocationResponse {
    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub country_name: Option<String>,

    #[serde(default)]
    pub error: Option<bool>,

    #[serde(default)]
    pub reason: Option<String>,
}
