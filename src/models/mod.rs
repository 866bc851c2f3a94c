pub mod geolocation;
pub mod health;
pub mod mail;
pub mod visit;
