use crate::config::Config;
use crate::deals::api_types::{DealItem, NewDeal};
use color_eyre::{eyre::eyre, Result};
use reqwest::{Response, StatusCode};
use tracing::{debug, info};
use url::Url;

/// Deals API client wrapper
#[derive(Clone)]
pub struct DealsClient {
  http: reqwest::Client,
  deals_url: Url,
}

impl DealsClient {
  pub fn new(config: &Config) -> Result<Self> {
    let http = reqwest::Client::builder()
      .user_agent(concat!("sharkdeck/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      deals_url: config.deals_url()?,
    })
  }

  pub fn deals_url(&self) -> &Url {
    &self.deals_url
  }

  /// Fetch every stored deal in one request
  pub async fn list_deals(&self) -> Result<Vec<DealItem>> {
    debug!(url = %self.deals_url, "fetching deals");

    let response = self
      .http
      .get(self.deals_url.clone())
      .send()
      .await
      .map_err(|e| eyre!("Failed to fetch deals: {}", e))?;

    let response = error_for_status(response, "fetch deals").await?;

    let items: Vec<DealItem> = response
      .json()
      .await
      .map_err(|e| eyre!("Failed to parse deals: {}", e))?;

    info!(count = items.len(), "fetched deals");
    Ok(items)
  }

  /// Store a new deal; an existing deal with the same id is overwritten
  pub async fn create_deal(&self, deal: &NewDeal) -> Result<DealItem> {
    let id = deal.deal_id().map_err(|e| eyre!("Refusing to create deal: {}", e))?;
    debug!(%id, "creating deal");

    let response = self
      .http
      .post(self.deals_url.clone())
      .json(deal)
      .send()
      .await
      .map_err(|e| eyre!("Failed to create deal {}: {}", id, e))?;

    let response = error_for_status(response, "create deal").await?;

    let item: DealItem = response
      .json()
      .await
      .map_err(|e| eyre!("Failed to parse created deal {}: {}", id, e))?;

    info!(id = %item.id, "created deal");
    Ok(item)
  }
}

/// Turn a non-2xx response into an error carrying the status and body
async fn error_for_status(response: Response, action: &str) -> Result<Response> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }

  let body = response.text().await.unwrap_or_default();
  Err(eyre!("Failed to {}: {}", action, describe_failure(status, &body)))
}

/// The API reports failures as `{"error": ..., "details": ...}`
fn describe_failure(status: StatusCode, body: &str) -> String {
  #[derive(serde::Deserialize)]
  struct ApiError {
    error: String,
    details: Option<String>,
  }

  match serde_json::from_str::<ApiError>(body) {
    Ok(ApiError {
      error,
      details: Some(details),
    }) => format!("{} ({}: {})", status, error, details),
    Ok(ApiError { error, .. }) => format!("{} ({})", status, error),
    Err(_) if body.trim().is_empty() => status.to_string(),
    Err(_) => format!("{} ({})", status, body.trim()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_describe_failure_with_api_error_body() {
    let body = r#"{"error": "Failed to fetch deals", "details": "table missing"}"#;
    assert_eq!(
      describe_failure(StatusCode::INTERNAL_SERVER_ERROR, body),
      "500 Internal Server Error (Failed to fetch deals: table missing)"
    );
  }

  #[test]
  fn test_describe_failure_plain_body() {
    assert_eq!(
      describe_failure(StatusCode::BAD_GATEWAY, "upstream down"),
      "502 Bad Gateway (upstream down)"
    );
    assert_eq!(describe_failure(StatusCode::NOT_FOUND, ""), "404 Not Found");
  }
}
