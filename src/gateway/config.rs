// ABOUTME: Environment-driven gateway settings, validated once at startup
// ABOUTME: Loads `.env` when present; any invalid value aborts before the listener opens

use crate::client::{BindCredentials, KeepAliveConfig, SessionOptions};
use crate::gateway::service::{CacheFailurePolicy, IdentifierPolicy, ServiceSettings};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name}={value:?} is invalid: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// SMSC host and port, as `host:port`
    pub smsc_address: String,
    pub credentials: BindCredentials,
    pub default_sender: String,
    pub redis_url: String,
    pub cache_ttl: Duration,
    pub clients_file: PathBuf,
    pub http_port: u16,
    pub id_policy: IdentifierPolicy,
    pub cache_failure_policy: CacheFailurePolicy,
    pub smpp_response_timeout: Duration,
    /// Zero disables keep-alive
    pub enquire_link_interval: Duration,
    pub keep_alive_max_failures: u32,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let host = vars.required("SMS_IP")?;
        let port: u16 = parse("SMS_PORT", &vars.required("SMS_PORT")?)?;
        let smsc_address = format!("{host}:{port}");

        let credentials = BindCredentials::transmitter(
            vars.required("SMS_LOGIN")?,
            vars.required("SMS_PASSWORD")?,
        )
        .with_system_type(vars.get("SMS_SYSTEM_TYPE").unwrap_or_default());

        let cache_ttl = vars.positive_secs("CACHE_TTL_SECONDS", 15)?;
        let smpp_response_timeout = vars.positive_secs("SMPP_RESPONSE_TIMEOUT_SECS", 10)?;
        let enquire_link_interval =
            Duration::from_secs(vars.parsed("SMPP_ENQUIRE_LINK_SECS", 30u64)?);

        Ok(Self {
            smsc_address,
            credentials,
            default_sender: vars.required("SMS_NUMBER")?,
            redis_url: vars
                .get("REDIS_URL")
                .unwrap_or_else(|| "redis://localhost:6379".to_string()),
            cache_ttl,
            clients_file: vars
                .get("CLIENTS_FILE")
                .unwrap_or_else(|| "clients.json".to_string())
                .into(),
            http_port: vars.parsed("PORT", 8080u16)?,
            id_policy: vars.parsed("ID_POLICY", IdentifierPolicy::Client)?,
            cache_failure_policy: vars.parsed("CACHE_FAILURE_POLICY", CacheFailurePolicy::Error)?,
            smpp_response_timeout,
            enquire_link_interval,
            keep_alive_max_failures: vars.positive("SMPP_KEEPALIVE_MAX_FAILURES", 3u32)?,
        })
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            default_sender: self.default_sender.clone(),
            cache_ttl: self.cache_ttl,
            id_policy: self.id_policy,
            cache_failure_policy: self.cache_failure_policy,
        }
    }

    pub fn keep_alive(&self) -> KeepAliveConfig {
        if self.enquire_link_interval.is_zero() {
            return KeepAliveConfig::disabled();
        }
        KeepAliveConfig::new(self.enquire_link_interval)
            .with_max_failures(self.keep_alive_max_failures)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            response_timeout: self.smpp_response_timeout,
            keep_alive: self.keep_alive(),
        }
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::Missing(name))
    }

    fn parsed<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(name) {
            Some(value) => parse(name, &value),
            None => Ok(default),
        }
    }

    fn positive<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr + Default + PartialEq + std::fmt::Display,
        T::Err: std::fmt::Display,
    {
        let value = self.parsed(name, default)?;
        if value == T::default() {
            return Err(ConfigError::Invalid {
                name,
                value: value.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    }

    fn positive_secs(&self, name: &'static str, default: u64) -> Result<Duration, ConfigError> {
        self.positive(name, default).map(Duration::from_secs)
    }
}

fn parse<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(extra: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let mut vars: HashMap<String, String> = [
            ("SMS_IP", "10.0.0.5"),
            ("SMS_PORT", "2775"),
            ("SMS_LOGIN", "gw"),
            ("SMS_PASSWORD", "pw"),
            ("SMS_NUMBER", "SHOP"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in extra {
            vars.insert(k.to_string(), v.to_string());
        }
        GatewayConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[]).unwrap();
        assert_eq!(config.smsc_address, "10.0.0.5:2775");
        assert_eq!(config.credentials.system_id, "gw");
        assert_eq!(config.credentials.system_type, "");
        assert_eq!(config.redis_url, "redis://localhost:6379");
        assert_eq!(config.cache_ttl, Duration::from_secs(15));
        assert_eq!(config.clients_file, PathBuf::from("clients.json"));
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.id_policy, IdentifierPolicy::Client);
        assert_eq!(config.cache_failure_policy, CacheFailurePolicy::Error);
        assert_eq!(config.smpp_response_timeout, Duration::from_secs(10));

        let keep_alive = config.keep_alive();
        assert!(keep_alive.enabled);
        assert_eq!(keep_alive.interval, Duration::from_secs(30));
        assert_eq!(keep_alive.max_failures, 3);
    }

    #[test]
    fn overrides_apply() {
        let config = load(&[
            ("CACHE_TTL_SECONDS", "300"),
            ("ID_POLICY", "carrier"),
            ("CACHE_FAILURE_POLICY", "warn"),
            ("SMS_SYSTEM_TYPE", "OTP"),
            ("PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.id_policy, IdentifierPolicy::Carrier);
        assert_eq!(config.cache_failure_policy, CacheFailurePolicy::Warn);
        assert_eq!(config.credentials.system_type, "OTP");
        assert_eq!(config.http_port, 9000);

        let settings = config.service_settings();
        assert_eq!(settings.default_sender, "SHOP");
        assert_eq!(settings.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn missing_required_variable() {
        let mut vars = HashMap::new();
        vars.insert("SMS_IP".to_string(), "h".to_string());
        let result = GatewayConfig::from_lookup(|name| vars.get(name).cloned());
        assert_eq!(result.unwrap_err(), ConfigError::Missing("SMS_PORT"));
    }

    #[test]
    fn ttl_must_be_a_positive_integer() {
        for bad in ["0", "-5", "15s", "abc", "1.5"] {
            let err = load(&[("CACHE_TTL_SECONDS", bad)]).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { name: "CACHE_TTL_SECONDS", .. }),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn zero_response_timeout_is_rejected() {
        assert!(load(&[("SMPP_RESPONSE_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn keep_alive_failure_budget_must_be_positive() {
        let err = load(&[("SMPP_KEEPALIVE_MAX_FAILURES", "0")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { name: "SMPP_KEEPALIVE_MAX_FAILURES", .. }
        ));
        let config = load(&[("SMPP_KEEPALIVE_MAX_FAILURES", "5")]).unwrap();
        assert_eq!(config.keep_alive().max_failures, 5);
    }

    #[test]
    fn unknown_policies_are_rejected() {
        assert!(load(&[("ID_POLICY", "server")]).is_err());
        assert!(load(&[("CACHE_FAILURE_POLICY", "ignore")]).is_err());
    }

    #[test]
    fn zero_interval_disables_keep_alive() {
        let config = load(&[("SMPP_ENQUIRE_LINK_SECS", "0")]).unwrap();
        assert!(!config.session_options().keep_alive.enabled);
    }

    #[test]
    fn bad_port_is_rejected() {
        assert!(load(&[("SMS_PORT", "70000")]).is_err());
        assert!(load(&[("PORT", "http")]).is_err());
    }
}
