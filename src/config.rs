// src/config.rs

use anyhow::{anyhow, Context, Result};
use std::{collections::HashMap, env, time::Duration};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://vitibrasil.cnpuv.embrapa.br/index.php";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USERS: &str = "user1:password1,user2:password2";

/// Fixed username → password table used for basic auth.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    users: HashMap<String, String>,
}

impl Credentials {
    /// Parse `user:pass,user:pass`. Blank entries are ignored.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut users = HashMap::new();
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (user, pass) = entry
                .split_once(':')
                .with_context(|| format!("credential entry '{}' is not user:password", entry))?;
            if user.is_empty() {
                return Err(anyhow!("credential entry '{}' has an empty username", entry));
            }
            users.insert(user.to_string(), pass.to_string());
        }
        Ok(Self { users })
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|p| constant_time_eq(p.as_bytes(), password.as_bytes()))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Compares every byte regardless of where the first mismatch is.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Process-wide settings, resolved once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub log_level: String,
    pub base_url: Url,
    pub fetch_timeout: Duration,
    pub credentials: Credentials,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_vars<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT '{}' is not a valid port", raw))?,
            None => DEFAULT_PORT,
        };

        let log_level = get("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let base_raw = get("VITIBRASIL_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(base_raw.trim())
            .with_context(|| format!("VITIBRASIL_BASE_URL '{}' is not a URL", base_raw))?;

        let timeout_secs = match get("FETCH_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("FETCH_TIMEOUT_SECS '{}' is not a number", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(anyhow!("FETCH_TIMEOUT_SECS must be greater than zero"));
        }

        let users = get("API_USERS").unwrap_or_else(|| DEFAULT_USERS.to_string());
        let credentials = Credentials::parse(&users).context("parsing API_USERS")?;
        if credentials.is_empty() {
            return Err(anyhow!("API_USERS defines no users"));
        }

        Ok(Self {
            port,
            log_level,
            base_url,
            fetch_timeout: Duration::from_secs(timeout_secs),
            credentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_password_compare() {
        assert!(constant_time_eq(b"password1", b"password1"));
        assert!(constant_time_eq(b"", b""));
        assert!(!constant_time_eq(b"password1", b"password2"));
        assert!(!constant_time_eq(b"password1", b"xassword1"));
        assert!(!constant_time_eq(b"password", b"password1"));
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let cfg = AppConfig::from_vars(vars(&[]))?;
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(30));
        assert!(cfg.credentials.verify("user1", "password1"));
        assert!(cfg.credentials.verify("user2", "password2"));
        assert!(!cfg.credentials.verify("user1", "password2"));
        Ok(())
    }

    #[test]
    fn test_overrides() -> Result<()> {
        let cfg = AppConfig::from_vars(vars(&[
            ("PORT", "5000"),
            ("FETCH_TIMEOUT_SECS", "5"),
            ("API_USERS", "alice:secret"),
            ("VITIBRASIL_BASE_URL", "http://localhost:9000/index.php"),
        ]))?;
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(5));
        assert_eq!(cfg.credentials.len(), 1);
        assert!(cfg.credentials.verify("alice", "secret"));
        assert!(!cfg.credentials.verify("user1", "password1"));
        assert_eq!(cfg.base_url.host_str(), Some("localhost"));
        Ok(())
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(AppConfig::from_vars(vars(&[("PORT", "eighty")])).is_err());
        assert!(AppConfig::from_vars(vars(&[("FETCH_TIMEOUT_SECS", "0")])).is_err());
        assert!(AppConfig::from_vars(vars(&[("API_USERS", "nocolon")])).is_err());
        assert!(AppConfig::from_vars(vars(&[("API_USERS", " , ")])).is_err());
    }

    #[test]
    fn test_password_may_contain_colon() -> Result<()> {
        let creds = Credentials::parse("bob:pa:ss")?;
        assert!(creds.verify("bob", "pa:ss"));
        Ok(())
    }
}
