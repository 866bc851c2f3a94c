#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tokio::{
    net::TcpListener,
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    time::timeout,
};
use visit_notifier::{
    clients::{geolocation::IpApiClient, mailer::Mailer},
    config::Config,
    middleware::{VisitNotifier, attach},
    models::mail::OutgoingMail,
};

pub const HOME_BODY: &str = "home page";
pub const ABOUT_BODY: &str = "about page";

pub fn test_config(geolocation_base_url: &str, extra: &[(&str, &str)]) -> Result<Config> {
    let mut pairs = vec![
        ("DEFAULT_FROM_EMAIL".to_string(), "site@example.com".to_string()),
        ("ADMIN_EMAIL".to_string(), "owner@example.com".to_string()),
        ("MAIL_API_URL".to_string(), "http://127.0.0.1:9/emails".to_string()),
        ("MAIL_API_KEY".to_string(), "test-key".to_string()),
        ("GEOLOCATION_BASE_URL".to_string(), geolocation_base_url.to_string()),
    ];
    for (key, value) in extra {
        pairs.retain(|(existing, _)| existing != key);
        pairs.push((key.to_string(), value.to_string()));
    }

    Config::from_pairs(pairs)
}

/// Delivers every mail it is handed to the paired receiver.
pub struct RecordingMailer {
    sender: UnboundedSender<OutgoingMail>,
}

impl RecordingMailer {
    pub fn new() -> (Self, UnboundedReceiver<OutgoingMail>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<()> {
        self.sender
            .send(mail.clone())
            .map_err(|_| anyhow!("Recording receiver dropped"))
    }
}

/// Rejects every mail, reporting each attempt to the paired receiver.
pub struct RejectingMailer {
    attempts: UnboundedSender<OutgoingMail>,
}

impl RejectingMailer {
    pub fn new() -> (Self, UnboundedReceiver<OutgoingMail>) {
        let (attempts, receiver) = unbounded_channel();
        (Self { attempts }, receiver)
    }
}

#[async_trait]
impl Mailer for RejectingMailer {
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<()> {
        let _ = self.attempts.send(mail.clone());
        Err(anyhow!("Provider rejected message: sender not verified"))
    }
}

pub fn notifier(config: &Config, mailer: Arc<dyn Mailer>) -> Result<Arc<VisitNotifier>> {
    let locator = IpApiClient::new(config)?;
    Ok(Arc::new(VisitNotifier::new(
        Arc::new(locator),
        mailer,
        config.notifier_settings(),
    )))
}

async fn home() -> impl IntoResponse {
    (StatusCode::CREATED, [("x-downstream", "home")], HOME_BODY)
}

async fn about() -> impl IntoResponse {
    (StatusCode::OK, [("x-downstream", "about")], ABOUT_BODY)
}

/// Site with the hook attached, served on an ephemeral local port.
pub async fn spawn_site(notifier: Arc<VisitNotifier>) -> Result<SocketAddr> {
    let router = attach(
        Router::new()
            .route("/", get(home))
            .route("/about", get(about)),
        notifier,
    );

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let _ = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await;
    });

    Ok(addr)
}

pub async fn next_mail(receiver: &mut UnboundedReceiver<OutgoingMail>) -> Result<OutgoingMail> {
    timeout(Duration::from_secs(5), receiver.recv())
        .await
        .map_err(|_| anyhow!("No mail dispatched within 5s"))?
        .ok_or_else(|| anyhow!("Mail channel closed"))
}

pub async fn assert_no_mail(receiver: &mut UnboundedReceiver<OutgoingMail>) {
    let outcome = timeout(Duration::from_millis(300), receiver.recv()).await;
    assert!(outcome.is_err(), "No mail should have been dispatched");
}
