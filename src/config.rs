use crate::error::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

pub const DEFAULT_API_BASE_URL: &str = "https://api.notion.com";
pub const DEFAULT_NOTION_VERSION: &str = "2021-08-16";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_API_TOKEN: &str = "NOTION_API_TOKEN";
const ENV_DATABASE_ID: &str = "NOTION_DATABASE_ID";
const ENV_AUTHOR: &str = "PARTE_AUTHOR";

/// Settings shared read-only by the client, locator and renderer for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Person who writes the reports; always listed last among participants.
    pub author: String,
    pub api_token: String,
    /// Top-level database holding one page per day.
    pub database_id: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_notion_version")]
    pub notion_version: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_notion_version() -> String {
    DEFAULT_NOTION_VERSION.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    pub fn new(
        author: impl Into<String>,
        api_token: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            api_token: api_token.into(),
            database_id: database_id.into(),
            api_base_url: default_api_base_url(),
            notion_version: default_notion_version(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Reads the TOML file, applies environment overrides and validates the result.
    pub fn load(path: &Path) -> ReportResult<Self> {
        let text = fs::read_to_string(path).map_err(|err| {
            ReportError::config(format!("cannot read {}: {err}", path.display()))
        })?;
        let config = Self::from_toml(&text)?.with_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> ReportResult<Self> {
        toml::from_str(text).map_err(|err| ReportError::config(format!("invalid config: {err}")))
    }

    /// Replaces settings with the values `lookup` finds for the known environment keys.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api_token = token;
        }
        if let Some(database_id) = lookup(ENV_DATABASE_ID) {
            self.database_id = database_id;
        }
        if let Some(author) = lookup(ENV_AUTHOR) {
            self.author = author;
        }
        self
    }

    pub fn validate(&self) -> ReportResult<()> {
        let required = [
            ("author", &self.author),
            ("api_token", &self.api_token),
            ("database_id", &self.database_id),
            ("api_base_url", &self.api_base_url),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ReportError::config(format!("`{name}` must not be empty")));
            }
        }
        if self.page_size == 0 || self.page_size > 100 {
            return Err(ReportError::config("`page_size` must be between 1 and 100"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
