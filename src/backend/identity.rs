use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::{domain::user::UserProfile, infra::config::AuthConfig};

use super::http::{build_client, fetch_json, parse_url, BackendError};

const USERINFO_TIMEOUT: Duration = Duration::from_secs(15);

/// Exchanges an OAuth access token for the user's profile.
#[derive(Debug, Clone)]
pub struct GoogleIdentityClient {
    client: Client,
    userinfo_url: Url,
}

impl GoogleIdentityClient {
    pub fn new(config: &AuthConfig) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(USERINFO_TIMEOUT)?,
            userinfo_url: parse_url(&config.userinfo_url)?,
        })
    }

    pub async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, BackendError> {
        fetch_json(
            "userinfo",
            self.client
                .get(self.userinfo_url.clone())
                .bearer_auth(access_token),
        )
        .await
    }
}
