pub mod geolocation;
pub mod health;
pub mod mailer;
