//! User configuration for quickswitch.
//!
//! Configuration is a RON file, by default `~/.quickswitch/config.ron`:
//!
//! ```ron
//! (
//!     picker: (command: "rofi", args: ["-dmenu", "-i"]),
//!     template: "{index} {type} {title}",
//!     providers: [openTab, closedTab, bookmark, history],
//!     provider_timeout_ms: 1000,
//! )
//! ```
#![allow(missing_docs)]

use std::{env, path::PathBuf};

mod error;
mod loader;
mod types;

#[cfg(test)]
mod test_parse;

pub use error::{Error, excerpt_at};
pub use loader::{load, load_from_path, parse};
pub use quickswitch_protocol::DEFAULT_TEMPLATE;
pub use types::{Config, DEFAULT_PROVIDER_TIMEOUT_MS, Picker};

/// Directory holding quickswitch's files (`~/.quickswitch`).
pub fn config_dir() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".quickswitch");
    p
}

/// Preferred user config path (`~/.quickswitch/config.ron`).
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.ron")
}

/// Default recency snapshot path (`~/.quickswitch/state.json`).
pub fn default_state_path() -> PathBuf {
    config_dir().join("state.json")
}
