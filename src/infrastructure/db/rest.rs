use std::time::Duration;

use anyhow::Context;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
};
use zeroize::Zeroizing;

use crate::settings::AppConfig;

/// Builds the HTTP client for the hosted gateway. Every request carries
/// the project key both as `apikey` and as a bearer token.
pub fn create_gateway_client(config: &AppConfig) -> anyhow::Result<Client> {
    let key = Zeroizing::new(config.supabase_key.clone());

    let mut headers = HeaderMap::new();
    let mut api_key = HeaderValue::from_str(&key).context("supabase key is not a valid header value")?;
    api_key.set_sensitive(true);
    headers.insert("apikey", api_key);

    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", key.as_str()))
        .context("supabase key is not a valid header value")?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);

    let client = Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(format!("{}/{}", config.name, env!("CARGO_PKG_VERSION")))
        .build()
        .context("building gateway client")?;

    tracing::info!(gateway = %config.supabase_url, "Content gateway client ready.");
    Ok(client)
}
