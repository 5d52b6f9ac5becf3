use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::error::Result;
use crate::domain::paystub::ValidationPolicy;

/// Environment variable naming an alternative TOML file
pub const CONFIG_PATH_VAR: &str = "PAYSTUB_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "paystub.toml";

/// Flat variable names, shared between the TOML file and the environment
const ENV_KEYS: &[&str] = &[
    "smtp_host",
    "smtp_port",
    "smtp_user",
    "smtp_password",
    "smtp_timeout_secs",
    "from_email",
    "users",
    "passwords",
    "assets_dir",
    "bind_host",
    "bind_port",
    "reconciliation_tolerance",
    "max_upload_bytes",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    #[serde(deserialize_with = "lenient_string")]
    pub smtp_user: String,
    #[serde(deserialize_with = "lenient_string")]
    pub smtp_password: String,
    pub smtp_timeout_secs: u64,
    pub from_email: String,
    /// Comma separated user names, paired positionally with `passwords`
    #[serde(deserialize_with = "lenient_string")]
    pub users: String,
    #[serde(deserialize_with = "lenient_string")]
    pub passwords: String,
    pub assets_dir: PathBuf,
    pub bind_host: String,
    pub bind_port: u16,
    /// Decimal text, e.g. "1" or "0.01"
    #[serde(deserialize_with = "lenient_string")]
    pub reconciliation_tolerance: String,
    /// Largest accepted CSV upload
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_user: String::new(),
            smtp_password: String::new(),
            smtp_timeout_secs: 30,
            from_email: String::new(),
            users: String::new(),
            passwords: String::new(),
            assets_dir: PathBuf::from("assets"),
            bind_host: "127.0.0.1".to_string(),
            bind_port: 8000,
            reconciliation_tolerance: "1".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Environment values are typed by their text, so `12345` arrives as a number
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    })
}

/// SMTP connection settings handed to the mailer
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from_email: String,
    pub timeout: Duration,
}

impl AppConfig {
    /// Defaults, then `.env`, the TOML file, and finally the process environment.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::figment(&path).extract().map_err(Into::into)
    }

    pub fn figment(toml_path: &str) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(toml_path))
            .merge(Env::raw().only(ENV_KEYS))
    }

    pub fn validation_policy(&self) -> Result<ValidationPolicy> {
        ValidationPolicy::with_tolerance(&self.reconciliation_tolerance)
    }

    pub fn smtp(&self) -> SmtpSettings {
        SmtpSettings {
            host: self.smtp_host.clone(),
            port: self.smtp_port,
            user: self.smtp_user.clone(),
            password: self.smtp_password.clone(),
            from_email: self.from_email.clone(),
            timeout: Duration::from_secs(self.smtp_timeout_secs),
        }
    }
}
