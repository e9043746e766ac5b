use crate::backend::HttpBackend;
use crate::error::AppResult;

pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod backend;
pub mod error;
pub mod model;
pub mod order;
pub mod shop;
pub mod view;

#[cfg(test)]
mod test_support;

pub use shop::Shop;

static APPLICATION_NAME: &str = "lesson-shop";

/// Builds a shop talking to the configured backend. `base_url` overrides the
/// configured one.
pub async fn build_shop(base_url: Option<&str>) -> AppResult<Shop<HttpBackend>> {
    let use_local = cfg!(debug_assertions);
    let config = Config::get_or_init(use_local).await;

    let backend = match base_url {
        Some(url) => HttpBackend::new(url, config.backend().timeout())?,
        None => HttpBackend::from_config(config)?,
    };
    tracing::debug!("using backend at {}", backend.base_url());

    Ok(Shop::from_config(backend, config))
}

pub fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}
