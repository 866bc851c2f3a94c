use std::net::SocketAddr;

use axum::{
    extract::ConnectInfo,
    http::{HeaderMap, Extensions, header::USER_AGENT},
};
use chrono::Local;

use crate::models::{
    mail::{NotifierSettings, OutgoingMail},
    visit::{ObservedVisit, VisitEvent},
};

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
pub const NOTIFICATION_SUBJECT: &str = "New Portfolio Visitor Alert!";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// First non-empty entry of `X-Forwarded-For`, else the peer IP recorded by
/// the server.
pub fn extract_client_address(headers: &HeaderMap, extensions: &Extensions) -> Option<String> {
    let forwarded = headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty());

    if let Some(first) = forwarded {
        return Some(first.to_string());
    }

    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

pub fn extract_client_signature(headers: &HeaderMap) -> String {
    headers
        .get(USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub fn observe(visit: VisitEvent) -> ObservedVisit {
    ObservedVisit {
        visit,
        observed_at: Local::now(),
    }
}

pub fn render_notification(observed: &ObservedVisit) -> String {
    let visit = &observed.visit;

    format!(
        "New visitor on your portfolio website!\n\
         \n\
         Time: {}\n\
         IP Address: {}\n\
         Location: {}, {}\n\
         Browser/OS: {}\n",
        observed.observed_at.format(TIMESTAMP_FORMAT),
        visit.address.as_deref().unwrap_or_default(),
        visit.location.city,
        visit.location.country,
        visit.client_signature,
    )
}

pub fn build_notification(observed: &ObservedVisit, settings: &NotifierSettings) -> OutgoingMail {
    OutgoingMail {
        subject: NOTIFICATION_SUBJECT.to_string(),
        message: render_notification(observed),
        from_address: settings.from_address.clone(),
        recipients: settings.recipients.clone(),
    }
}
