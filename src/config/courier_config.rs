use crate::domain::sizing::LoadLimits;
use crate::utils::error::{CourierError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ROADIE_BASE_URL: &str = "https://connect.roadie.com";
pub const MIN_TOKEN_LENGTH: usize = 20;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourierConfig {
    #[serde(default)]
    pub roadie: RoadieConfig,
    #[serde(default)]
    pub limits: LoadLimits,
    #[serde(default)]
    pub shipment: ShipmentOptions,
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadieConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_ROADIE_BASE_URL.to_string()
}

impl Default for RoadieConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            timeout_seconds: None,
        }
    }
}

/// Delivery options sent with every shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentOptions {
    #[serde(default)]
    pub signature_required: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default)]
    pub over_21_required: bool,
    #[serde(default)]
    pub extra_compensation: f64,
    #[serde(default)]
    pub trailer_required: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ShipmentOptions {
    fn default() -> Self {
        Self {
            signature_required: false,
            notifications_enabled: true,
            over_21_required: false,
            extra_compensation: 0.0,
            trailer_required: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PersistenceConfig {
    #[default]
    None,
    Rest {
        endpoint: String,
        api_key: String,
        #[serde(default = "default_table")]
        table: String,
        #[serde(default = "default_store_timeout_seconds")]
        timeout_seconds: u64,
    },
    Local {
        path: String,
    },
}

fn default_table() -> String {
    "bookings".to_string()
}

pub const DEFAULT_STORE_TIMEOUT_SECONDS: u64 = 10;

fn default_store_timeout_seconds() -> u64 {
    DEFAULT_STORE_TIMEOUT_SECONDS
}

fn env_number<T: std::str::FromStr>(name: &str, value: Option<String>) -> Result<Option<T>> {
    match value {
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            CourierError::configuration(format!("{} must be a number, got '{}'", name, raw))
        }),
        None => Ok(None),
    }
}

fn is_unresolved_placeholder(value: &str) -> bool {
    value.starts_with("${") && value.ends_with('}')
}

impl CourierConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            CourierError::configuration(format!(
                "Cannot read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| CourierError::configuration(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${ROADIE_API_TOKEN})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| CourierError::configuration(format!("Invalid pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 從環境變數建立配置 (Lambda / edge function 使用)
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut limits = LoadLimits::default();
        if let Some(max_items) = env_number("COURIER_MAX_ITEMS", lookup("COURIER_MAX_ITEMS"))? {
            limits.max_items = max_items;
        }
        if let Some(max_weight) =
            env_number("COURIER_MAX_WEIGHT_LB", lookup("COURIER_MAX_WEIGHT_LB"))?
        {
            limits.max_weight_lb = max_weight;
        }

        let api_url = lookup("BOOKINGS_API_URL");
        let store_kind = lookup("BOOKINGS_STORE").unwrap_or_else(|| {
            if api_url.is_some() {
                "rest".to_string()
            } else {
                "none".to_string()
            }
        });

        let persistence = match store_kind.to_lowercase().as_str() {
            "none" => PersistenceConfig::None,
            "rest" => PersistenceConfig::Rest {
                endpoint: api_url.ok_or_else(|| {
                    CourierError::configuration("BOOKINGS_API_URL is required for the rest store")
                })?,
                api_key: lookup("BOOKINGS_API_KEY").ok_or_else(|| {
                    CourierError::configuration("BOOKINGS_API_KEY is required for the rest store")
                })?,
                table: lookup("BOOKINGS_TABLE").unwrap_or_else(default_table),
                timeout_seconds: env_number(
                    "BOOKINGS_TIMEOUT_SECONDS",
                    lookup("BOOKINGS_TIMEOUT_SECONDS"),
                )?
                .unwrap_or(DEFAULT_STORE_TIMEOUT_SECONDS),
            },
            "local" => PersistenceConfig::Local {
                path: lookup("BOOKINGS_LOCAL_PATH").unwrap_or_else(|| "./bookings".to_string()),
            },
            other => {
                return Err(CourierError::configuration(format!(
                    "Unsupported BOOKINGS_STORE '{}'. Valid stores: none, rest, local",
                    other
                )))
            }
        };

        Ok(Self {
            roadie: RoadieConfig {
                base_url: lookup("ROADIE_BASE_URL").unwrap_or_else(default_base_url),
                api_token: lookup("ROADIE_API_TOKEN"),
                timeout_seconds: env_number(
                    "ROADIE_TIMEOUT_SECONDS",
                    lookup("ROADIE_TIMEOUT_SECONDS"),
                )?,
            },
            limits,
            shipment: ShipmentOptions::default(),
            persistence,
        })
    }

    /// Bearer token for the courier API. Checked on every request so a
    /// missing token fails before anything goes over the wire.
    pub fn bearer_token(&self) -> Result<&str> {
        let token = self
            .roadie
            .api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && !is_unresolved_placeholder(t))
            .ok_or_else(|| {
                CourierError::configuration("Roadie API token is not configured (ROADIE_API_TOKEN)")
            })?;

        if token.len() < MIN_TOKEN_LENGTH {
            return Err(CourierError::configuration(format!(
                "Roadie API token looks invalid (shorter than {} characters)",
                MIN_TOKEN_LENGTH
            )));
        }

        Ok(token)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.roadie.base_url.trim_end_matches('/'), path)
    }
}

impl Validate for CourierConfig {
    fn validate(&self) -> Result<()> {
        validate_url("roadie.base_url", &self.roadie.base_url)?;

        if let Some(timeout) = self.roadie.timeout_seconds {
            validate_range("roadie.timeout_seconds", timeout, 1, 300)?;
        }

        validate_range("limits.max_items", self.limits.max_items, 1, 500)?;
        validate_range("limits.max_weight_lb", self.limits.max_weight_lb, 1, 10_000)?;

        match &self.persistence {
            PersistenceConfig::None => {}
            PersistenceConfig::Rest {
                endpoint,
                api_key,
                table,
                timeout_seconds,
            } => {
                validate_url("persistence.endpoint", endpoint)?;
                validate_non_empty_string("persistence.api_key", api_key)?;
                validate_non_empty_string("persistence.table", table)?;
                validate_range("persistence.timeout_seconds", *timeout_seconds, 1, 300)?;
            }
            PersistenceConfig::Local { path } => {
                validate_path("persistence.path", path)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TOKEN: &str = "rd_live_0123456789abcdef";

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[roadie]
base_url = "https://connect-sandbox.roadie.com"
api_token = "rd_live_0123456789abcdef"
timeout_seconds = 15

[limits]
max_items = 20

[shipment]
signature_required = true

[persistence]
kind = "rest"
endpoint = "https://db.example.com"
api_key = "service-key"
"#;

        let config = CourierConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.roadie.base_url, "https://connect-sandbox.roadie.com");
        assert_eq!(config.roadie.timeout_seconds, Some(15));
        assert_eq!(config.limits.max_items, 20);
        assert_eq!(config.limits.max_weight_lb, 250);
        assert!(config.shipment.signature_required);
        assert!(config.shipment.notifications_enabled);
        assert_eq!(
            config.persistence,
            PersistenceConfig::Rest {
                endpoint: "https://db.example.com".to_string(),
                api_key: "service-key".to_string(),
                table: "bookings".to_string(),
                timeout_seconds: DEFAULT_STORE_TIMEOUT_SECONDS,
            }
        );
        assert_eq!(config.bearer_token().unwrap(), TOKEN);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = CourierConfig::from_toml_str("").unwrap();
        assert_eq!(config.roadie.base_url, DEFAULT_ROADIE_BASE_URL);
        assert_eq!(config.limits, LoadLimits::default());
        assert_eq!(config.persistence, PersistenceConfig::None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DONATION_COURIER_TEST_TOKEN", TOKEN);

        let toml_content = r#"
[roadie]
api_token = "${DONATION_COURIER_TEST_TOKEN}"
"#;

        let config = CourierConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.roadie.api_token.as_deref(), Some(TOKEN));

        std::env::remove_var("DONATION_COURIER_TEST_TOKEN");
    }

    #[test]
    fn test_unresolved_placeholder_counts_as_missing_token() {
        let toml_content = r#"
[roadie]
api_token = "${DONATION_COURIER_UNSET_VARIABLE}"
"#;

        let config = CourierConfig::from_toml_str(toml_content).unwrap();
        let err = config.bearer_token().unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }

    #[test]
    fn test_bearer_token_checks() {
        let mut config = CourierConfig::default();
        assert!(matches!(
            config.bearer_token(),
            Err(CourierError::Configuration { .. })
        ));

        config.roadie.api_token = Some("short-token".to_string());
        let err = config.bearer_token().unwrap_err();
        assert!(err.to_string().contains("looks invalid"));

        config.roadie.api_token = Some(TOKEN.to_string());
        assert_eq!(config.bearer_token().unwrap(), TOKEN);
    }

    #[test]
    fn test_from_env_with_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("ROADIE_API_TOKEN", TOKEN),
            ("ROADIE_TIMEOUT_SECONDS", "10"),
            ("COURIER_MAX_ITEMS", "25"),
            ("BOOKINGS_API_URL", "https://db.example.com"),
            ("BOOKINGS_API_KEY", "service-key"),
            ("BOOKINGS_TIMEOUT_SECONDS", "3"),
        ]);

        let config =
            CourierConfig::from_env_with(|name| vars.get(name).map(|v| v.to_string())).unwrap();

        assert_eq!(config.roadie.base_url, DEFAULT_ROADIE_BASE_URL);
        assert_eq!(config.roadie.timeout_seconds, Some(10));
        assert_eq!(config.limits.max_items, 25);
        assert!(matches!(
            config.persistence,
            PersistenceConfig::Rest {
                timeout_seconds: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_from_env_rejects_bad_values() {
        let vars: HashMap<&str, &str> = HashMap::from([("ROADIE_TIMEOUT_SECONDS", "soon")]);
        assert!(CourierConfig::from_env_with(|name| vars.get(name).map(|v| v.to_string())).is_err());

        let vars: HashMap<&str, &str> = HashMap::from([("BOOKINGS_STORE", "rest")]);
        assert!(CourierConfig::from_env_with(|name| vars.get(name).map(|v| v.to_string())).is_err());

        let vars: HashMap<&str, &str> = HashMap::from([("BOOKINGS_STORE", "s3")]);
        assert!(CourierConfig::from_env_with(|name| vars.get(name).map(|v| v.to_string())).is_err());
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[roadie]
base_url = "invalid-url"
"#;

        let config = CourierConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[limits]
max_items = 0
"#;
        let config = CourierConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let mut config = CourierConfig::default();
        config.roadie.base_url = "http://127.0.0.1:8080/".to_string();
        assert_eq!(config.endpoint("/v1/estimates"), "http://127.0.0.1:8080/v1/estimates");
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[roadie]
api_token = "rd_live_0123456789abcdef"

[persistence]
kind = "local"
path = "./bookings"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = CourierConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(
            config.persistence,
            PersistenceConfig::Local {
                path: "./bookings".to_string()
            }
        );
    }
}
