//! Loader for `lookout.yaml` with environment overlays.
//!
//! Sources merge in the order they are added; `LOOKOUT_`-prefixed variables
//! are applied last and win (`LOOKOUT_SEARCH__TOKEN` sets `search.token`).
//! Environment values arrive as strings, so only string fields can be
//! overridden that way. After merging, `${VAR}` placeholders in any string
//! are expanded from the process environment.
//!
//! Every section has a default, so an empty source set is a valid config.
use config::{Config, ConfigError, Environment, File, FileFormat};
use lookout_common::observability::{LogFormat, LogSink};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "LOOKOUT";

#[derive(Debug, Clone, Deserialize)]
pub struct LookoutConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default = "default_credit_cost")]
    pub credit_cost: u32,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl Default for LookoutConfig {
    fn default() -> Self {
        Self {
            version: None,
            search: SearchConfig::default(),
            accounts: AccountsConfig::default(),
            session: SessionConfig::default(),
            credit_cost: default_credit_cost(),
            logging: LoggingConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Path below `endpoint` the query is POSTed to.
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            path: String::new(),
            token: None,
            limit: default_limit(),
            lang: default_lang(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Where profiles live and where credits are spent. The tag is `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AccountsConfig {
    Memory {
        /// Seed profiles keyed by user id.
        #[serde(default)]
        profiles: BTreeMap<String, ProfileSeed>,
        #[serde(default)]
        deny_writes: bool,
    },
    Http {
        endpoint: String,
        #[serde(default)]
        auth_token: Option<String>,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl Default for AccountsConfig {
    fn default() -> Self {
        AccountsConfig::Memory {
            profiles: BTreeMap::new(),
            deny_writes: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileSeed {
    #[serde(default)]
    pub searches_allotted: Option<f64>,
    #[serde(default)]
    pub searches_used: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Signed-in user; unset or blank means anonymous.
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub sink: LogSink,
    /// Used when `RUST_LOG` is unset.
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub width: Option<usize>,
    /// `None` means colour when stdout is a terminal.
    #[serde(default)]
    pub color: Option<bool>,
}

fn default_credit_cost() -> u32 {
    1
}
fn default_limit() -> u32 {
    100
}
fn default_lang() -> String {
    "en".into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// Expand `${VAR}` / `$VAR` until the text stops changing, at most
/// [`MAXIMUM_ENV_EXPANSION_DEPTH`] rounds. Unknown variables stay literal.
fn expand_str(text: &str) -> String {
    let mut current = text.to_string();
    for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
        let Ok(next) = shellexpand::env(&current) else {
            break;
        };
        if next == current {
            break;
        }
        current = next.into_owned();
    }
    current
}

fn expand_env_in_value(value: &mut Value) {
    match value {
        Value::String(text) if text.contains('$') => *text = expand_str(text),
        Value::Array(items) => items.iter_mut().for_each(expand_env_in_value),
        Value::Object(map) => map.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder over the `config` crate.
pub struct LookoutConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for LookoutConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl LookoutConfigLoader {
    /// ```
    /// use lookout_config::LookoutConfigLoader;
    ///
    /// let config = LookoutConfigLoader::new()
    ///     .with_yaml_str("version: '1'\ncredit_cost: 2")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.credit_cost, 2);
    /// assert_eq!(config.search.limit, 100);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// ```
    /// use lookout_config::{AccountsConfig, LookoutConfigLoader};
    ///
    /// let cfg = LookoutConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// accounts:
    ///   kind: http
    ///   endpoint: "https://accounts.example.com/v1"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(matches!(cfg.accounts, AccountsConfig::Http { timeout_secs: 30, .. }));
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge all sources, apply `LOOKOUT_*` overrides, expand `${VAR}` and
    /// deserialize.
    pub fn load(self) -> Result<LookoutConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("LOOKOUT_TEST_FOO", Some("bar"), || {
            let mut v = json!("prefix-${LOOKOUT_TEST_FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_nested_values_and_skips_scalars() {
        temp_env::with_vars([("CITY", Some("Winston")), ("STATE", Some("NC"))], || {
            let mut v = json!({
                "search": {"endpoint": "https://$CITY.example"},
                "tags": [{"loc": "${CITY}-${STATE}"}, 42, true, null],
            });
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!({
                    "search": {"endpoint": "https://Winston.example"},
                    "tags": [{"loc": "Winston-NC"}, 42, true, null],
                })
            );
        });
    }

    #[test]
    fn expands_through_chained_variables() {
        temp_env::with_vars(
            [
                ("HOP_C", Some("qux")),
                ("HOP_B", Some("mid-${HOP_C}")),
                ("HOP_A", Some("start-${HOP_B}-end")),
            ],
            || {
                let mut v = json!("X=${HOP_A}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("X=start-mid-qux-end"));
            },
        );
    }

    #[test]
    fn cycles_terminate_unresolved() {
        temp_env::with_vars([("CYC_A", Some("${CYC_B}")), ("CYC_B", Some("${CYC_A}"))], || {
            let mut v = json!("x=${CYC_A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${LOOKOUT_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${LOOKOUT_DOES_NOT_EXIST}"));
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let config: LookoutConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.credit_cost, 1);
        assert_eq!(config.search.lang, "en");
        assert_eq!(config.search.timeout(), Duration::from_secs(30));
        assert!(config.session.user_id.is_none());
        assert_eq!(config.logging.sink, LogSink::File);
        assert!(matches!(
            config.accounts,
            AccountsConfig::Memory { ref profiles, deny_writes: false } if profiles.is_empty()
        ));
    }
}
