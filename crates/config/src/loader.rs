//! Parse and load user configuration.

use std::{fs, io::ErrorKind, path::Path};

use tracing::{debug, info};

use crate::{Config, Error, default_config_path, error::excerpt_at};

/// Parse and validate a configuration from RON text.
pub fn parse(source: &str) -> Result<Config, Error> {
    let config: Config = ron::from_str(source).map_err(|e| {
        let start = e.span.start;
        let (line, col) = (start.line.max(1), start.col.max(1));
        Error::Parse {
            path: None,
            line,
            col,
            message: e.code.to_string(),
            excerpt: excerpt_at(source, line, col),
        }
    })?;
    config.validate()?;
    Ok(config)
}

/// Load a configuration from a RON file at `path`.
pub fn load_from_path(path: &Path) -> Result<Config, Error> {
    let source = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    let config = parse(&source).map_err(|e| e.at(path))?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load the effective configuration.
///
/// Policy:
/// 1) An `explicit` path must exist and parse.
/// 2) Else `~/.quickswitch/config.ron` is used when it exists.
/// 3) Else the built-in defaults apply.
pub fn load(explicit: Option<&Path>) -> Result<Config, Error> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }
    let preferred = default_config_path();
    match fs::metadata(&preferred) {
        Ok(_) => load_from_path(&preferred),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %preferred.display(), "no config file; using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(Error::Read {
            path: Some(preferred),
            message: e.to_string(),
        }),
    }
}
