use std::sync::Arc;

use anyhow::{Error, Result};
use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{
    clients::{
        geolocation::{GeoLocator, IpApiClient, locate_or_unknown},
        mailer::{HttpMailer, Mailer, send_mail_silently},
    },
    config::Config,
    models::{mail::NotifierSettings, visit::VisitEvent},
    utils::{build_notification, extract_client_address, extract_client_signature, observe},
};

pub const SITE_ROOT: &str = "/";

/// Shared state of the visit hook. Built once at startup and never mutated.
pub struct VisitNotifier {
    locator: Arc<dyn GeoLocator>,
    mailer: Arc<dyn Mailer>,
    settings: NotifierSettings,
}

impl VisitNotifier {
    pub fn new(
        locator: Arc<dyn GeoLocator>,
        mailer: Arc<dyn Mailer>,
        settings: NotifierSettings,
    ) -> Self {
        Self {
            locator,
            mailer,
            settings,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let locator = IpApiClient::new(config)?;
        let mailer = HttpMailer::new(config);

        Ok(Self::new(
            Arc::new(locator),
            Arc::new(mailer),
            config.notifier_settings(),
        ))
    }

    /// Resolves the location on the caller's task, then hands the
    /// notification to a detached task. The returned handle may be dropped.
    pub async fn track(&self, address: Option<String>, client_signature: String) -> JoinHandle<bool> {
        let location = locate_or_unknown(self.locator.as_ref(), address.as_deref()).await;
        let visit = VisitEvent::new(address, client_signature, location);

        debug!(
            trace_id = %visit.trace_id,
            address = visit.address.as_deref().unwrap_or_default(),
            city = %visit.location.city,
            country = %visit.location.country,
            "Visit to site root recorded"
        );

        self.dispatch(visit)
    }

    pub fn dispatch(&self, visit: VisitEvent) -> JoinHandle<bool> {
        let mailer = Arc::clone(&self.mailer);
        let settings = self.settings.clone();

        tokio::spawn(async move {
            let trace_id = visit.trace_id.clone();
            let mail = build_notification(&observe(visit), &settings);

            let sent = send_mail_silently(mailer.as_ref(), &mail).await;
            if sent {
                info!(trace_id = %trace_id, "Visit notification sent");
            }
            sent
        })
    }
}

pub async fn track_visits(
    State(notifier): State<Arc<VisitNotifier>>,
    request: Request,
    next: Next,
) -> Response {
    if request.uri().path() == SITE_ROOT {
        let address = extract_client_address(request.headers(), request.extensions());
        let client_signature = extract_client_signature(request.headers());

        let _ = notifier.track(address, client_signature).await;
    }

    next.run(request).await
}

/// Layers the visit hook onto an existing router.
pub fn attach<S>(router: Router<S>, notifier: Arc<VisitNotifier>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(notifier, track_visits))
}
