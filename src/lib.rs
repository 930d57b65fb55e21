pub mod analyzer;
pub mod app_state;
pub mod classifier;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod logging;
pub mod media;
pub mod routes;
