use std::collections::BTreeSet;
use std::path::PathBuf;

use faultled_bus::MatchRule;
use faultled_core::interfaces::INVENTORY_ROOT;
use faultled_core::{ObjectPath, Platform, UnknownPlatform};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("FAULTLED_PLATFORM: {0}")]
    Platform(#[from] UnknownPlatform),

    #[error("{var} must be a boolean, got {value:?}")]
    InvalidBool { var: &'static str, value: String },
}

/// Monitor configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Platform preset contributing reserved indicator groups.
    pub platform: Platform,
    /// Extra excluded indicator groups, parsed from comma-separated
    /// `FAULTLED_EXCLUDED_GROUPS`.
    pub extra_excluded_groups: Vec<ObjectPath>,
    /// Only inventory objects below this path are monitored.
    pub inventory_namespace: String,
    /// JSON object tree seeding the in-memory bus.
    pub snapshot: Option<PathBuf>,
    /// Print the final object tree on exit.
    pub dump_state: bool,
}

impl MonitorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                          |
    /// |--------------------------------|----------------------------------|
    /// | `FAULTLED_PLATFORM`            | `generic`                        |
    /// | `FAULTLED_EXCLUDED_GROUPS`     | (empty)                          |
    /// | `FAULTLED_INVENTORY_NAMESPACE` | `/xyz/openbmc_project/inventory` |
    /// | `FAULTLED_SNAPSHOT`            | (unset)                          |
    /// | `FAULTLED_DUMP_STATE`          | `false`                          |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let platform: Platform = lookup("FAULTLED_PLATFORM")
            .unwrap_or_default()
            .parse()?;

        let extra_excluded_groups: Vec<ObjectPath> = lookup("FAULTLED_EXCLUDED_GROUPS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let inventory_namespace = lookup("FAULTLED_INVENTORY_NAMESPACE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| INVENTORY_ROOT.to_string());

        let snapshot = lookup("FAULTLED_SNAPSHOT")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let dump_state = match lookup("FAULTLED_DUMP_STATE") {
            None => false,
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidBool {
                var: "FAULTLED_DUMP_STATE",
                value,
            })?,
        };

        Ok(Self {
            platform,
            extra_excluded_groups,
            inventory_namespace,
            snapshot,
            dump_state,
        })
    }

    /// Platform-reserved groups merged with the configured extras.
    pub fn excluded_groups(&self) -> BTreeSet<ObjectPath> {
        self.platform
            .reserved_groups()
            .iter()
            .map(|p| p.to_string())
            .chain(self.extra_excluded_groups.iter().cloned())
            .collect()
    }

    pub fn match_rule(&self) -> MatchRule {
        MatchRule::operational_status(self.inventory_namespace.clone())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
