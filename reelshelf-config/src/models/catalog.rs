use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
};

use reelshelf_core::RetryConfig;
use reelshelf_model::PagingWindowConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::remote::RemoteConfig;
use crate::{
    Result,
    error::ConfigError,
    overrides::{self, ENV_CONFIG_JSON, ENV_CONFIG_PATH},
};

/// Source that produced the catalog configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Default => f.write_str("defaults"),
            ConfigSource::EnvPath(path) => {
                write!(f, "{} (via {ENV_CONFIG_PATH})", path.display())
            }
            ConfigSource::EnvInline => f.write_str(ENV_CONFIG_JSON),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Everything the engine needs to browse: the remote catalog, how hard to
/// retry it, and the shape of the local library window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub remote: RemoteConfig,
    /// Backoff applied when the catalog answers 429.
    pub retry: RetryConfig,
    /// Page size and resident page count for the library window.
    pub window: PagingWindowConfig,
}

impl CatalogConfig {
    /// Load configuration from the process environment.
    /// Evaluation order:
    /// 1) `$REELSHELF_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$REELSHELF_CONFIG_JSON` (inline JSON),
    /// 3) the first default file found in the working directory,
    /// 4) defaults if none of the above exist.
    ///
    /// A `.env` file is read first when present, and single-value overrides
    /// are applied on top of whichever source won.
    pub fn load_from_env() -> Result<(Self, ConfigSource)> {
        load_dotenv()?;
        Self::load_with(|key| env::var(key).ok(), Path::new("."))
    }

    /// Load an explicit file, skipping discovery. Overrides still apply.
    pub fn load_from_path(path: &Path) -> Result<(Self, ConfigSource)> {
        load_dotenv()?;
        let mut config = Self::load_from_file(path)?;
        config.finish(|key| env::var(key).ok())?;

        let source = ConfigSource::File(path.to_path_buf());
        info!(%source, "catalog configuration loaded");
        Ok((config, source))
    }

    /// [`Self::load_from_env`] against an arbitrary variable lookup and
    /// discovery root.
    pub fn load_with<F>(lookup: F, root: &Path) -> Result<(Self, ConfigSource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (mut config, source) = Self::discover(&lookup, root)?;
        config.finish(lookup)?;

        info!(%source, "catalog configuration loaded");
        Ok((config, source))
    }

    fn discover<F>(lookup: &F, root: &Path) -> Result<(Self, ConfigSource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path_str) = lookup(ENV_CONFIG_PATH)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str.trim());
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = lookup(ENV_CONFIG_JSON)
            && !raw.trim().is_empty()
        {
            let config = Self::parse_json(&raw)?;
            return Ok((config, ConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file(root) {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((Self::default(), ConfigSource::Default))
    }

    fn finish<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let applied = overrides::apply(self, lookup)?;
        if !applied.is_empty() {
            debug!(?applied, "environment overrides applied");
        }
        self.validate()
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let origin = path.display().to_string();

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents).map_err(|err| {
                ConfigError::Parse {
                    origin,
                    reason: err.to_string(),
                }
            }),
            Some("toml") | Some("tml") => {
                toml::from_str(&contents).map_err(|err| ConfigError::Parse {
                    origin,
                    reason: err.to_string(),
                })
            }
            _ => Self::parse_from_str(&contents, &origin),
        }
    }

    /// Parse contents of unknown format: TOML first, then JSON.
    pub fn parse_from_str(contents: &str, origin: &str) -> Result<Self> {
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                ConfigError::Parse {
                    origin: origin.to_string(),
                    reason: format!(
                        "toml error: {toml_err}; json error: {json_err}"
                    ),
                }
            })
        })
    }

    pub fn parse_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|err| ConfigError::Parse {
            origin: ENV_CONFIG_JSON.to_string(),
            reason: err.to_string(),
        })
    }

    fn find_default_file(root: &Path) -> Option<PathBuf> {
        const CANDIDATES: &[&str] = &[
            "reelshelf.toml",
            "reelshelf.json",
            "config/reelshelf.toml",
            "config/reelshelf.json",
        ];

        CANDIDATES
            .iter()
            .map(|candidate| root.join(candidate))
            .find(|path| path.exists())
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.remote.page_size == 0 {
            return Err(ConfigError::ZeroRemotePageSize);
        }
        self.remote.parsed_base_url()?;
        self.window.validate()?;

        let retry = &self.retry;
        if retry.max_retries == 0 {
            return Err(ConfigError::InvalidRetry {
                reason: "max_retries must be at least 1".into(),
            });
        }
        if !(retry.backoff_multiplier >= 1.0) {
            return Err(ConfigError::InvalidRetry {
                reason: format!(
                    "backoff_multiplier must be >= 1.0, got {}",
                    retry.backoff_multiplier
                ),
            });
        }
        if retry.max_backoff_ms < retry.initial_backoff_ms {
            return Err(ConfigError::InvalidRetry {
                reason: format!(
                    "max_backoff_ms ({}) is below initial_backoff_ms ({})",
                    retry.max_backoff_ms, retry.initial_backoff_ms
                ),
            });
        }

        Ok(())
    }
}

fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "loaded .env");
            Ok(())
        }
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err.into()),
    }
}
