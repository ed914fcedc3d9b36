use crate::config::IdentityConfig;
use crate::error::BudgetError;
use crate::identity::{ExternalProfile, IdentityProvider};

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Identity provider spoken to over HTTP (Clerk-style backend API).
///
/// - tokens are verified by the provider's userinfo endpoint
/// - profiles are read from `{users_url}/{subject}` with the backend secret key
///
/// Calls are bounded by the configured timeout and never retried.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    verify_url: Url,
    users_url: Url,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    #[serde(default)]
    sub: String,
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    #[serde(default)]
    primary_email_address_id: Option<String>,
    #[serde(default)]
    email_addresses: Vec<ProviderEmail>,
}

#[derive(Debug, Deserialize)]
struct ProviderEmail {
    #[serde(default)]
    id: Option<String>,
    email_address: String,
}

impl ProviderUser {
    /// The address marked primary, else the first one listed.
    fn primary_email(self) -> Option<String> {
        let primary_id = self.primary_email_address_id;
        let mut addresses = self.email_addresses;
        let primary = primary_id.and_then(|pid| {
            addresses
                .iter()
                .position(|e| e.id.as_deref() == Some(pid.as_str()))
        });
        let email = match primary {
            Some(idx) => Some(addresses.swap_remove(idx).email_address),
            None => addresses.into_iter().next().map(|e| e.email_address),
        };
        email.filter(|email| !email.is_empty())
    }
}

fn provider_unreachable(err: reqwest::Error) -> BudgetError {
    warn!(error = %err, "identity provider request failed");
    BudgetError::Unauthorized("identity provider unavailable".to_string())
}

impl HttpIdentityProvider {
    pub fn new(cfg: &IdentityConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("envelope-budget/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            client,
            verify_url: cfg.verify_url.clone(),
            users_url: cfg.users_url.clone(),
            secret_key: cfg.secret_key.clone(),
        })
    }

    fn profile_url(&self, subject: &str) -> Result<Url, BudgetError> {
        let mut url = self.users_url.clone();
        url.path_segments_mut()
            .map_err(|_| BudgetError::Unauthorized("identity users url is not a base".to_string()))?
            .pop_if_empty()
            .push(subject);
        Ok(url)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<String, BudgetError> {
        let resp = self
            .client
            .get(self.verify_url.clone())
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(provider_unreachable)?;

        let status = resp.status();
        if !status.is_success() {
            debug!(%status, "identity provider rejected token");
            return Err(BudgetError::Unauthorized(format!(
                "token rejected by identity provider ({status})"
            )));
        }

        let info: TokenInfo = resp.json().await.map_err(provider_unreachable)?;
        if info.sub.is_empty() {
            return Err(BudgetError::Unauthorized(
                "token carries no subject".to_string(),
            ));
        }
        Ok(info.sub)
    }

    async fn fetch_profile(&self, subject: &str) -> Result<Option<ExternalProfile>, BudgetError> {
        let url = self.profile_url(subject)?;
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.secret_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(provider_unreachable)?;

        match resp.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => {
                warn!(%status, "identity provider profile lookup failed");
                return Err(BudgetError::Unauthorized(format!(
                    "profile lookup failed ({status})"
                )));
            }
            _ => {}
        }

        let user: ProviderUser = resp.json().await.map_err(provider_unreachable)?;
        Ok(Some(ExternalProfile {
            email: user.primary_email(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(users_url: &str) -> HttpIdentityProvider {
        let cfg = IdentityConfig {
            users_url: Url::parse(users_url).unwrap(),
            ..IdentityConfig::default()
        };
        HttpIdentityProvider::new(&cfg).unwrap()
    }

    #[test]
    fn primary_email_wins_over_list_order() {
        let user: ProviderUser = serde_json::from_value(serde_json::json!({
            "primary_email_address_id": "idn_2",
            "email_addresses": [
                {"id": "idn_1", "email_address": "old@example.com"},
                {"id": "idn_2", "email_address": "main@example.com"}
            ]
        }))
        .unwrap();
        assert_eq!(user.primary_email().as_deref(), Some("main@example.com"));
    }

    #[test]
    fn first_email_is_used_without_primary_marker() {
        let user: ProviderUser = serde_json::from_value(serde_json::json!({
            "email_addresses": [{"email_address": "only@example.com"}]
        }))
        .unwrap();
        assert_eq!(user.primary_email().as_deref(), Some("only@example.com"));

        let empty: ProviderUser = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(empty.primary_email(), None);
    }

    #[test]
    fn profile_url_escapes_subject_and_tolerates_trailing_slash() {
        let with_slash = provider("https://idp.example.com/v1/users/");
        let without = provider("https://idp.example.com/v1/users");
        assert_eq!(
            with_slash.profile_url("user_1").unwrap().as_str(),
            "https://idp.example.com/v1/users/user_1"
        );
        assert_eq!(
            without.profile_url("a/b").unwrap().as_str(),
            "https://idp.example.com/v1/users/a%2Fb"
        );
    }
}
