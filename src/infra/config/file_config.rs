use serde::Deserialize;

use crate::infra::config::{AppConfig, AuthConfig, BackendConfig, LogConfig, TypingConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub backend: Option<FileBackendConfig>,
    pub auth: Option<FileAuthConfig>,
    pub typing: Option<FileTypingConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(backend) = self.backend {
            backend.merge_into(&mut config.backend);
        }

        if let Some(auth) = self.auth {
            auth.merge_into(&mut config.auth);
        }

        if let Some(typing) = self.typing {
            typing.merge_into(&mut config.typing);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
    pub file_name: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }

        if let Some(file_name) = self.file_name {
            config.file_name = file_name;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileBackendConfig {
    pub base_url: Option<String>,
    pub request_timeout_ms: Option<u64>,
}

impl FileBackendConfig {
    fn merge_into(self, config: &mut BackendConfig) {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }

        if let Some(timeout_ms) = self.request_timeout_ms {
            config.request_timeout_ms = timeout_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileAuthConfig {
    pub userinfo_url: Option<String>,
    pub token_page_url: Option<String>,
    pub open_browser: Option<bool>,
}

impl FileAuthConfig {
    fn merge_into(self, config: &mut AuthConfig) {
        if let Some(userinfo_url) = self.userinfo_url {
            config.userinfo_url = userinfo_url;
        }

        if let Some(token_page_url) = self.token_page_url {
            config.token_page_url = token_page_url;
        }

        if let Some(open_browser) = self.open_browser {
            config.open_browser = open_browser;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileTypingConfig {
    pub chars_per_tick: Option<usize>,
    pub tick_ms: Option<u64>,
}

impl FileTypingConfig {
    fn merge_into(self, config: &mut TypingConfig) {
        if let Some(chars_per_tick) = self.chars_per_tick {
            config.chars_per_tick = chars_per_tick.max(1);
        }

        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms.max(1);
        }
    }
}
