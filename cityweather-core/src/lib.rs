//! Core library for the `cityweather` app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weatherapi.com client and its domain models
//! - On-device key-value persistence
//! - Search debouncing, favorites reconciliation, and the screen
//!   controllers driven by the interactive frontend
//!
//! It is used by `cityweather-cli`, but can also be reused by other
//! frontends or services.

pub mod api;
pub mod config;
pub mod debounce;
pub mod favorites;
pub mod model;
pub mod screen;
pub mod storage;
pub mod units;

pub use api::{ApiError, WeatherApiClient, WeatherSource};
pub use config::Config;
pub use model::{LocationCandidate, WeatherSnapshot};
pub use storage::KvStore;
pub use units::TemperatureUnit;
