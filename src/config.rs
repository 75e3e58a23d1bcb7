//! Workspace configuration (`feesd.toml`).

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

pub const CONFIG_FILE: &str = "feesd.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Key of the durable slot holding the student collection.
    pub storage_key: String,
    /// Shared code for the login gate. A UI gate only; it protects nothing.
    pub access_code: String,
    pub splash_delay_ms: u64,
    pub login_error_ms: u64,
    pub currency_symbol: String,
    pub messaging_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_key: "shivsadhana_students".to_string(),
            access_code: "suhaspatilsir".to_string(),
            splash_delay_ms: 2000,
            login_error_ms: 3000,
            currency_symbol: "₹".to_string(),
            messaging_base_url: "https://wa.me/919834252755".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `feesd.toml` from the workspace. A missing file means defaults;
    /// an unreadable or invalid one is logged and also falls back to defaults.
    pub fn load(workspace: &Path) -> Self {
        let path = workspace.join(CONFIG_FILE);
        if !path.is_file() {
            return Self::default();
        }
        match std::fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|text| Self::parse(&text))
        {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::default()
            }
        }
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn splash_delay(&self) -> Duration {
        Duration::from_millis(self.splash_delay_ms)
    }

    pub fn login_error_duration(&self) -> Duration {
        Duration::from_millis(self.login_error_ms)
    }
}
