//! Turns a [`LookoutConfig`] into live collaborators.

use anyhow::{Context, Result, bail};
use lookout_accounts::{
    CreditLedger, HttpAccounts, MemoryAccounts, Profile, ProfileStore, StaticSession,
};
use lookout_common::observability::LogConfig;
use lookout_config::{
    AccountsConfig, LoggingConfig, LookoutConfig, LookoutConfigLoader, ProfileSeed, RenderConfig,
    SearchConfig, SessionConfig,
};
use lookout_render::TextLayout;
use lookout_search::{HttpSearchBackend, SearchBackend};
use serde_json::Map;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "lookout.yaml";
const FALLBACK_WIDTH: usize = 100;

pub fn load_config(path: Option<&Path>) -> Result<LookoutConfig> {
    let loader = LookoutConfigLoader::new();
    let loader = match path {
        Some(path) => loader.with_file(path),
        None => loader.with_optional_file(DEFAULT_CONFIG_FILE),
    };
    loader.load().context("loading configuration")
}

pub fn log_config(cfg: &LoggingConfig) -> LogConfig {
    let mut log = LogConfig {
        app_name: "lookout",
        log_dir: cfg.dir.as_ref().map(PathBuf::from),
        sink: cfg.sink,
        format: cfg.format,
        ..LogConfig::default()
    };
    if let Some(filter) = cfg.filter.as_ref().filter(|f| !f.trim().is_empty()) {
        log.default_filter = filter.clone();
    }
    log
}

/// A CLI `--user` wins over the configured identity.
pub fn session_provider(cfg: &SessionConfig, user: Option<String>) -> StaticSession {
    StaticSession::from_option(user.or_else(|| cfg.user_id.clone()))
}

/// One store seen through both account seams.
pub struct Accounts {
    pub profiles: Arc<dyn ProfileStore>,
    pub ledger: Arc<dyn CreditLedger>,
}

pub fn build_accounts(cfg: &AccountsConfig) -> Result<Accounts> {
    match cfg {
        AccountsConfig::Memory {
            profiles,
            deny_writes,
        } => {
            let store = profiles
                .iter()
                .fold(MemoryAccounts::new(), |store, (user, seed)| {
                    store.with_profile(user.as_str(), seed_profile(seed))
                })
                .with_denied_writes(*deny_writes);
            tracing::debug!(profiles = profiles.len(), deny_writes, "wiring.accounts.memory");
            let store = Arc::new(store);
            Ok(Accounts {
                profiles: store.clone(),
                ledger: store,
            })
        }
        AccountsConfig::Http {
            endpoint,
            auth_token,
            timeout_secs,
        } => {
            let store = HttpAccounts::new(
                endpoint,
                auth_token.clone(),
                Duration::from_secs(*timeout_secs),
            )
            .with_context(|| format!("accounts endpoint {endpoint}"))?;
            tracing::debug!(endpoint = %endpoint, "wiring.accounts.http");
            let store = Arc::new(store);
            Ok(Accounts {
                profiles: store.clone(),
                ledger: store,
            })
        }
    }
}

fn seed_profile(seed: &ProfileSeed) -> Profile {
    Profile {
        searches_allotted: seed.searches_allotted,
        searches_used: seed.searches_used,
        extra: Map::new(),
    }
}

pub fn build_backend(cfg: &SearchConfig) -> Result<Arc<dyn SearchBackend>> {
    let Some(endpoint) = cfg.endpoint.as_deref().filter(|e| !e.trim().is_empty()) else {
        bail!("search.endpoint is not configured");
    };
    let Some(token) = cfg.token.as_deref().filter(|t| !t.trim().is_empty()) else {
        bail!("search.token is not configured (set LOOKOUT_SEARCH__TOKEN)");
    };
    let backend = HttpSearchBackend::new(endpoint, token)
        .with_context(|| format!("search endpoint {endpoint}"))?
        .with_path(cfg.path.clone())
        .with_limit(cfg.limit)
        .with_lang(cfg.lang.clone())
        .with_timeout(cfg.timeout());
    Ok(Arc::new(backend))
}

/// Unset values follow the terminal: its width, and colour only on a tty
/// without `NO_COLOR`.
pub fn text_layout(cfg: &RenderConfig) -> TextLayout {
    let width = cfg.width.unwrap_or_else(|| {
        crossterm::terminal::size()
            .map(|(cols, _)| usize::from(cols))
            .unwrap_or(FALLBACK_WIDTH)
    });
    let color = cfg.color.unwrap_or_else(|| {
        std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
    });
    TextLayout::new(width, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_accounts::{SessionProvider, UserId, compute_remaining};
    use lookout_common::observability::{LogFormat, LogSink};
    use std::collections::BTreeMap;

    fn memory_config(deny_writes: bool) -> AccountsConfig {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "alice".to_string(),
            ProfileSeed {
                searches_allotted: Some(3.0),
                searches_used: Some(1.0),
            },
        );
        AccountsConfig::Memory {
            profiles,
            deny_writes,
        }
    }

    #[tokio::test]
    async fn memory_accounts_are_seeded_and_shared() {
        let accounts = build_accounts(&memory_config(false)).unwrap();
        let alice = UserId::new("alice");

        accounts.ledger.deduct(&alice, 1).await.unwrap();
        let profile = accounts.profiles.load_profile(&alice).await.unwrap();
        assert_eq!(compute_remaining(profile.as_ref()), 1.0);
    }

    #[tokio::test]
    async fn denied_writes_surface_as_permission_denied() {
        let accounts = build_accounts(&memory_config(true)).unwrap();
        let err = accounts
            .ledger
            .deduct(&UserId::new("alice"), 1)
            .await
            .unwrap_err();
        assert!(err.is_permission_denied());
    }

    #[tokio::test]
    async fn cli_user_overrides_configured_session() {
        let cfg = SessionConfig {
            user_id: Some("alice".into()),
        };
        let session = session_provider(&cfg, Some("bob".into()))
            .authenticate()
            .await
            .unwrap();
        assert_eq!(session.user_id, UserId::new("bob"));

        let session = session_provider(&cfg, None).authenticate().await.unwrap();
        assert_eq!(session.user_id, UserId::new("alice"));

        let anonymous = session_provider(&SessionConfig::default(), Some("  ".into()));
        assert!(anonymous.authenticate().await.is_none());
    }

    #[test]
    fn backend_requires_endpoint_and_token() {
        let mut cfg = SearchConfig::default();
        let err = build_backend(&cfg).err().unwrap();
        assert!(err.to_string().contains("search.endpoint"));

        cfg.endpoint = Some("https://search.example.com".into());
        let err = build_backend(&cfg).err().unwrap();
        assert!(err.to_string().contains("search.token"));

        cfg.token = Some("t".into());
        assert!(build_backend(&cfg).is_ok());
    }

    #[test]
    fn logging_section_maps_onto_log_config() {
        let log = log_config(&LoggingConfig {
            format: LogFormat::Json,
            sink: LogSink::Stderr,
            filter: Some("lookout=trace".into()),
            dir: Some("/tmp/lookout-logs".into()),
        });
        assert_eq!(log.format, LogFormat::Json);
        assert_eq!(log.sink, LogSink::Stderr);
        assert_eq!(log.default_filter, "lookout=trace");
        assert_eq!(log.log_dir, Some(PathBuf::from("/tmp/lookout-logs")));

        let log = log_config(&LoggingConfig::default());
        assert_eq!(log.default_filter, "info");
    }

    #[test]
    fn explicit_render_settings_win() {
        let layout = text_layout(&RenderConfig {
            width: Some(90),
            color: Some(false),
        });
        assert_eq!(layout.width, 90);
        assert!(!layout.color);
    }

    #[test]
    fn no_color_disables_styling() {
        let layout = temp_env::with_var("NO_COLOR", Some("1"), || {
            text_layout(&RenderConfig {
                width: Some(80),
                color: None,
            })
        });
        assert!(!layout.color);
    }
}
