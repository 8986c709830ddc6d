//! Configuration loading.
//!
//! Settings come from `precis.toml`, looked up in the working directory and
//! then in the user configuration directory. Every field is optional.
//!
//! ```toml
//! [reader]
//! width = 100
//! indent = "    "
//! timeout = 10
//!
//! [summary]
//! provider = "openai"
//! model = "gpt-4o-mini"
//! ```
//!
//! API keys may be set in the file, but the CLI normally supplies them from
//! the environment through [`Config::apply_api_keys`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assemble::{DEFAULT_INDENT, DEFAULT_WIDTH};
use crate::fetch::{DEFAULT_TIMEOUT_SECS, FetchConfig};
use crate::summarize::{Provider, SummaryConfig};
use crate::{PrecisError, Result};

pub const CONFIG_FILE_NAME: &str = "precis.toml";

/// The `[reader]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSection {
    pub width: usize,
    pub indent: String,
    /// Fetch timeout in seconds
    pub timeout: u64,
    pub user_agent: Option<String>,
    /// Emit ANSI styling
    pub styled: bool,
}

impl Default for ReaderSection {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            indent: DEFAULT_INDENT.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            styled: true,
        }
    }
}

impl ReaderSection {
    pub fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig { timeout: self.timeout, ..Default::default() };
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }
        config
    }
}

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reader: ReaderSection,
    pub summary: SummaryConfig,
}

impl Config {
    /// Load from an explicit path, or from the first config file found
    ///
    /// An explicit path must exist. Without one, a missing file yields the
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if !path.exists() => Err(PrecisError::FileNotFound(path.to_path_buf())),
            Some(path) => Self::load_from(path),
            None => match Self::find_config_file() {
                Some(path) => Self::load_from(&path),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Look for `precis.toml` in the working directory, then the user config directory
    pub fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Some(local);
        }

        dirs::config_dir().map(|dir| dir.join("precis").join(CONFIG_FILE_NAME)).filter(|path| path.exists())
    }

    /// Switch the summary provider
    ///
    /// A key read from the file belongs to the file's provider, so it is
    /// dropped when the provider changes.
    pub fn set_provider(&mut self, provider: Provider) {
        if self.summary.provider != provider {
            self.summary.provider = provider;
            self.summary.api_key = None;
        }
    }

    /// Override the summary API key with the key for the configured provider
    pub fn apply_api_keys(&mut self, gemini: Option<String>, openai: Option<String>) {
        let key = match self.summary.provider {
            Provider::Gemini => gemini,
            Provider::OpenAi => openai,
        };
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.summary.api_key = Some(key);
        }
    }
}
