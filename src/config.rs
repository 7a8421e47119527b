//! Container configuration.
//!
//! Configuration is explicit: a [`ContainerConfig`] is built in code or read
//! from the environment with [`ContainerConfig::from_env`], then handed to
//! [`Container::with_config`](crate::Container::with_config).

use std::env;

use tracing::warn;

/// Environment variable toggling the install-time validation pass.
pub const VALIDATE_ENV: &str = "FERROUS_BIND_VALIDATE";
/// Environment variable overriding the resolution depth limit.
pub const MAX_DEPTH_ENV: &str = "FERROUS_BIND_MAX_DEPTH";

const DEFAULT_MAX_DEPTH: usize = 1024;

/// Container behavior switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Resolve every binding once during install to prove the graph is
    /// constructible. Defaults to on in debug builds, off in release builds.
    pub validate_on_install: bool,
    /// Maximum nesting of constructions in progress.
    pub max_depth: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            validate_on_install: cfg!(debug_assertions),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ContainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate_on_install(mut self, enabled: bool) -> Self {
        self.validate_on_install = enabled;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Defaults overridden by `FERROUS_BIND_VALIDATE` and `FERROUS_BIND_MAX_DEPTH`.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var(VALIDATE_ENV) {
            match parse_flag(&raw) {
                Some(enabled) => config.validate_on_install = enabled,
                None => warn!(variable = VALIDATE_ENV, value = %raw, "ignoring invalid flag"),
            }
        }

        if let Ok(raw) = env::var(MAX_DEPTH_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_depth = depth,
                _ => warn!(variable = MAX_DEPTH_ENV, value = %raw, "ignoring invalid depth"),
            }
        }

        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
