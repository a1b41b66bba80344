pub mod app;
pub mod auth;
pub mod config;
pub mod display;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod form;
pub mod handlers;
pub mod provider;
pub mod state;
pub mod telemetry;
pub mod types;
pub mod validators;
