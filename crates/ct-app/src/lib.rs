//! Shared service layer for coldtrace front ends.
//!
//! Loads engine configuration and trend profiles, synthesizes device series
//! into a store, and prepares stored series for display.

pub mod config;
pub mod error;
pub mod profile;
pub mod service;
pub mod templates;

pub use config::{EngineConfig, load_config, load_config_or_default};
pub use error::{AppError, AppResult};
pub use profile::{TrendProfile, load_profile, save_profile, validate_profile};
pub use service::{
    SeriesSummary, generate_into_store, generate_series, load_devices, render_window,
    series_summary,
};
pub use templates::{template, template_names};
