use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub backend: BackendConfig,
    pub auth: AuthConfig,
    pub typing: TypingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// File name under the state log directory.
    pub file_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file_name: "chatline.log".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_owned(),
            request_timeout_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthConfig {
    pub userinfo_url: String,
    /// Page where the user obtains an access token from the provider.
    pub token_page_url: String,
    pub open_browser: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            userinfo_url: "https://www.googleapis.com/oauth2/v3/userinfo".to_owned(),
            token_page_url: "https://developers.google.com/oauthplayground/".to_owned(),
            open_browser: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypingConfig {
    pub chars_per_tick: usize,
    pub tick_ms: u64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            chars_per_tick: 3,
            tick_ms: 30,
        }
    }
}
