//! # Azure App Exporter Library
//!
//! Pulls application metadata from the Azure Graph API on a schedule,
//! caches it in memory, and exposes time-to-expiry metrics for the
//! password credentials of every cached application.
//!
//! Modules:
//! - `config` — service configuration loading and validation
//! - `azure` — API token renewal, application cache and refresh loop
//! - `observability` — Prometheus registry and exposition route
//! - `server` — axum application server

pub mod azure;
pub mod config;
pub mod error;
pub mod observability;
pub mod server;
pub mod tests;
pub mod utils;

pub use crate::config::settings::ServiceConfig;
