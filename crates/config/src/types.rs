//! Configuration types and their defaults.

use std::{path::PathBuf, time::Duration};

use quickswitch_protocol::{DEFAULT_TEMPLATE, SuggestionKind};
use serde::{Deserialize, Serialize};

use crate::{Error, default_state_path};

/// Provider deadline used when the config does not set one.
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 1500;

/// External filter program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Picker {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for Picker {
    fn default() -> Self {
        Self {
            command: "dmenu".to_string(),
            args: Vec::new(),
        }
    }
}

/// Top-level user configuration.
///
/// Every field has a default, so a user file only needs the fields it
/// changes; the rest keep their built-in values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Program that presents the menu.
    pub picker: Picker,
    /// Picker label template.
    pub template: String,
    /// Enabled providers.
    pub providers: Vec<SuggestionKind>,
    /// Deadline for each provider, in milliseconds.
    pub provider_timeout_ms: u64,
    /// Where the recency snapshot lives; `None` means the default location.
    pub state_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            picker: Picker::default(),
            template: DEFAULT_TEMPLATE.to_string(),
            providers: SuggestionKind::ALL.to_vec(),
            provider_timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
            state_path: None,
        }
    }
}

impl Config {
    /// Per-provider deadline.
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    /// Effective recency snapshot path.
    pub fn state_path(&self) -> PathBuf {
        self.state_path.clone().unwrap_or_else(default_state_path)
    }

    /// Whether `kind` is enabled.
    pub fn provider_enabled(&self, kind: SuggestionKind) -> bool {
        self.providers.contains(&kind)
    }

    /// Reject values that parse but cannot work.
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |message: &str| {
            Err(Error::Validation {
                path: None,
                message: message.to_string(),
            })
        };
        if self.picker.command.trim().is_empty() {
            return invalid("picker.command must not be empty");
        }
        if self.providers.is_empty() {
            return invalid("providers must enable at least one provider");
        }
        if self.provider_timeout_ms == 0 {
            return invalid("provider_timeout_ms must be greater than zero");
        }
        Ok(())
    }
}
