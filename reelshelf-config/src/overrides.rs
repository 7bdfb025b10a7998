//! Single-value environment overrides layered over the loaded file.

use crate::{CatalogConfig, Result, error::ConfigError};

pub const ENV_CONFIG_PATH: &str = "REELSHELF_CONFIG_PATH";
pub const ENV_CONFIG_JSON: &str = "REELSHELF_CONFIG_JSON";
pub const ENV_API_BASE_URL: &str = "REELSHELF_API_BASE_URL";
pub const ENV_ITEM_CAP: &str = "REELSHELF_ITEM_CAP";
pub const ENV_MAX_RETRIES: &str = "REELSHELF_MAX_RETRIES";
pub const ENV_MAX_BACKOFF: &str = "REELSHELF_MAX_BACKOFF";

/// Apply every override `lookup` resolves. Blank values are ignored.
/// Returns the names of the variables that took effect.
pub(crate) fn apply<F>(
    config: &mut CatalogConfig,
    lookup: F,
) -> Result<Vec<&'static str>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = Vec::new();
    let value = |var: &'static str| {
        lookup(var)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
    };

    if let Some(url) = value(ENV_API_BASE_URL) {
        config.remote.base_url = url;
        applied.push(ENV_API_BASE_URL);
    }

    if let Some(raw) = value(ENV_ITEM_CAP) {
        config.remote.item_cap = if raw.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(raw.parse().map_err(|err: std::num::ParseIntError| {
                invalid(ENV_ITEM_CAP, &raw, err.to_string())
            })?)
        };
        applied.push(ENV_ITEM_CAP);
    }

    if let Some(raw) = value(ENV_MAX_RETRIES) {
        config.retry.max_retries =
            raw.parse().map_err(|err: std::num::ParseIntError| {
                invalid(ENV_MAX_RETRIES, &raw, err.to_string())
            })?;
        applied.push(ENV_MAX_RETRIES);
    }

    if let Some(raw) = value(ENV_MAX_BACKOFF) {
        let duration = humantime::parse_duration(&raw)
            .map_err(|err| invalid(ENV_MAX_BACKOFF, &raw, err.to_string()))?;
        config.retry.max_backoff_ms =
            u64::try_from(duration.as_millis()).map_err(|_| {
                invalid(ENV_MAX_BACKOFF, &raw, "duration too large".into())
            })?;
        applied.push(ENV_MAX_BACKOFF);
    }

    Ok(applied)
}

fn invalid(var: &'static str, value: &str, reason: String) -> ConfigError {
    ConfigError::InvalidOverride {
        var,
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(
        pairs: &[(&str, &str)],
    ) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn overrides_replace_loaded_values() {
        let mut config = CatalogConfig::default();
        let applied = apply(
            &mut config,
            lookup(&[
                (ENV_API_BASE_URL, "https://catalog.example/v2"),
                (ENV_ITEM_CAP, "60"),
                (ENV_MAX_RETRIES, "3"),
                (ENV_MAX_BACKOFF, "4s 500ms"),
            ]),
        )
        .unwrap();

        assert_eq!(applied.len(), 4);
        assert_eq!(config.remote.base_url, "https://catalog.example/v2");
        assert_eq!(config.remote.item_cap, Some(60));
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.max_backoff_ms, 4_500);
    }

    #[test]
    fn blank_values_are_ignored() {
        let mut config = CatalogConfig::default();
        let applied =
            apply(&mut config, lookup(&[(ENV_ITEM_CAP, "  ")])).unwrap();
        assert!(applied.is_empty());
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn item_cap_can_be_cleared() {
        let mut config = CatalogConfig::default();
        config.remote.item_cap = Some(10);
        apply(&mut config, lookup(&[(ENV_ITEM_CAP, "None")])).unwrap();
        assert_eq!(config.remote.item_cap, None);
    }

    #[test]
    fn unparsable_values_name_the_variable() {
        let mut config = CatalogConfig::default();
        let err = apply(&mut config, lookup(&[(ENV_MAX_BACKOFF, "soon")]))
            .unwrap_err();
        match err {
            ConfigError::InvalidOverride { var, value, .. } => {
                assert_eq!(var, ENV_MAX_BACKOFF);
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
