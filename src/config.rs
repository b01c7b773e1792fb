//! Configuration loading
//!
//! The config file is JSON with the account credentials and the paths of the
//! log directory and the error table:
//! ```json
//! {
//!   "user_account": "08201234",
//!   "user_password": "secret",
//!   "operator": "telecom",
//!   "log_file_path": "/var/log/logincumt/",
//!   "info_sheet_path": "/usr/local/share/logincumt/ret_err_info_sheet.json"
//! }
//! ```

use crate::gateway::LoginRequest;
use anyhow::{bail, Context, Result};
use campus_autologin_shared::{defaults, ErrorTable};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file used when the environment does not name one
pub const DEFAULT_CONFIG_PATH: &str = "/usr/local/share/logincumt/login_config.json";

/// Environment variable overriding the config file path
pub const CONFIG_PATH_ENV: &str = "CAMPUS_LOGIN_CONFIG";

/// Application configuration
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    pub user_account: String,
    pub user_password: String,
    pub operator: String,
    /// Directory receiving the rotating log files
    pub log_file_path: PathBuf,
    /// JSON error table file
    pub info_sheet_path: PathBuf,
    #[serde(default = "default_gateway_host")]
    pub gateway_host: String,
    #[serde(default = "default_probe_url")]
    pub probe_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_gateway_host() -> String {
    defaults::GATEWAY_HOST.to_string()
}

fn default_probe_url() -> String {
    defaults::PROBE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    defaults::REQUEST_TIMEOUT_SECS
}

impl AppConfig {
    /// Read and validate the config file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Error reading config file {}", path.display()))?;
        Self::from_json(&data).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse and validate a JSON config
    pub fn from_json(data: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("user_account", &self.user_account),
            ("user_password", &self.user_password),
            ("operator", &self.operator),
            ("gateway_host", &self.gateway_host),
            ("probe_url", &self.probe_url),
        ] {
            if value.trim().is_empty() {
                bail!("{} must not be empty", name);
            }
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be positive");
        }
        Ok(())
    }

    /// Login request for the configured account
    pub fn login_request(&self) -> LoginRequest {
        LoginRequest::new(
            &self.gateway_host,
            &self.user_account,
            &self.operator,
            &self.user_password,
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("user_account", &self.user_account)
            .field("user_password", &"******")
            .field("operator", &self.operator)
            .field("log_file_path", &self.log_file_path)
            .field("info_sheet_path", &self.info_sheet_path)
            .field("gateway_host", &self.gateway_host)
            .field("probe_url", &self.probe_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Config file path from the environment, or the default
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load the error table named by the config
pub fn load_error_table(path: &Path) -> Result<ErrorTable> {
    let file = File::open(path)
        .with_context(|| format!("Error reading ret_err_info_sheet file {}", path.display()))?;
    ErrorTable::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid ret_err_info_sheet file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"{
        "user_account": "08201234",
        "user_password": "s3cret",
        "operator": "telecom",
        "log_file_path": "/tmp/logincumt/",
        "info_sheet_path": "/tmp/sheet.json"
    }"#;

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_json(MINIMAL).expect("parse failed");
        assert_eq!(config.gateway_host, defaults::GATEWAY_HOST);
        assert_eq!(config.probe_url, defaults::PROBE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(
            config.login_request().url(),
            "http://10.2.5.251:801/eportal/?c=Portal&a=login&login_method=1\
             &user_account=08201234%40telecom&user_password=s3cret"
        );
    }

    #[test]
    fn test_overrides() {
        let json = MINIMAL.replacen(
            "\"operator\": \"telecom\",",
            "\"operator\": \"telecom\", \"gateway_host\": \"127.0.0.1:8080\", \"request_timeout_secs\": 5,",
            1,
        );
        let config = AppConfig::from_json(&json).expect("parse failed");
        assert_eq!(config.gateway_host, "127.0.0.1:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = MINIMAL.replace("\"operator\": \"telecom\",", "");
        assert!(AppConfig::from_json(&json).is_err());
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let json = MINIMAL.replace("\"s3cret\"", "\"\"");
        let err = AppConfig::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("user_password"));
    }

    #[test]
    fn test_debug_masks_password() {
        let config = AppConfig::from_json(MINIMAL).expect("parse failed");
        assert!(!format!("{:?}", config).contains("s3cret"));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().expect("tempdir");

        let sheet_path = dir.path().join("sheet.json");
        let mut sheet = File::create(&sheet_path).expect("create");
        sheet
            .write_all(
                r#"[{"ret_code":"1","raw_info":"userid error1","info_zh":"账号不存在","info_en":"Account does not exist"}]"#
                    .as_bytes(),
            )
            .expect("write");

        let config_path = dir.path().join("login_config.json");
        std::fs::write(&config_path, MINIMAL).expect("write");

        let config = AppConfig::load(&config_path).expect("load failed");
        assert_eq!(config.user_account, "08201234");

        let table = load_error_table(&sheet_path).expect("table failed");
        assert_eq!(table.len(), 1);
        assert!(table.lookup("userid error1").is_some());
    }

    #[test]
    fn test_missing_files_are_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(AppConfig::load(&dir.path().join("nope.json")).is_err());
        assert!(load_error_table(&dir.path().join("nope.json")).is_err());
    }
}
