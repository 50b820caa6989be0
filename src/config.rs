//! Environment-driven client configuration.
//!
//! | Variable             | Meaning                                   | Default              |
//! |----------------------|-------------------------------------------|----------------------|
//! | `NATNET_LIBRARY`     | Path of the vendor NatNet shared library  | platform library name|
//! | `NATNET_VERBOSITY`   | Vendor log level applied at creation      | unset (SDK default)  |
//! | `NATNET_FRAME_QUEUE` | Capacity of [`FrameStream`] channels      | 256                  |
//!
//! [`FrameStream`]: crate::FrameStream

use crate::types::Verbosity;
use std::path::PathBuf;

pub const ENV_LIBRARY: &str = "NATNET_LIBRARY";
pub const ENV_VERBOSITY: &str = "NATNET_VERBOSITY";
pub const ENV_FRAME_QUEUE: &str = "NATNET_FRAME_QUEUE";

pub const DEFAULT_FRAME_QUEUE: usize = 256;

#[cfg(target_os = "windows")]
pub const DEFAULT_LIBRARY: &str = "NatNetLib.dll";
#[cfg(target_os = "macos")]
pub const DEFAULT_LIBRARY: &str = "libNatNetLib.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const DEFAULT_LIBRARY: &str = "libNatNetLib.so";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub library_path: PathBuf,
    pub verbosity: Option<Verbosity>,
    pub frame_queue: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            library_path: PathBuf::from(DEFAULT_LIBRARY),
            verbosity: None,
            frame_queue: DEFAULT_FRAME_QUEUE,
        }
    }
}

impl ClientConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> ClientConfig {
        Self::from_lookup(&|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> ClientConfig {
        let verbosity = read_env_string(lookup, ENV_VERBOSITY).and_then(|v| {
            match v.parse::<Verbosity>() {
                Ok(level) => Some(level),
                Err(e) => {
                    log::warn!("{}: {}, leaving SDK default", ENV_VERBOSITY, e);
                    None
                }
            }
        });

        ClientConfig {
            library_path: read_env_string(lookup, ENV_LIBRARY)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LIBRARY)),
            verbosity,
            frame_queue: read_env_usize(lookup, ENV_FRAME_QUEUE, DEFAULT_FRAME_QUEUE).max(1),
        }
    }
}

fn read_env_usize(lookup: &dyn Fn(&str) -> Option<String>, name: &str, default: usize) -> usize {
    lookup(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn read_env_string(lookup: &dyn Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(&|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]), ClientConfig::default());
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            (ENV_LIBRARY, " /opt/natnet/libNatNetLib.so "),
            (ENV_VERBOSITY, "warning"),
            (ENV_FRAME_QUEUE, "16"),
        ]);
        assert_eq!(cfg.library_path, PathBuf::from("/opt/natnet/libNatNetLib.so"));
        assert_eq!(cfg.verbosity, Some(Verbosity::Warning));
        assert_eq!(cfg.frame_queue, 16);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = config(&[
            (ENV_LIBRARY, "   "),
            (ENV_VERBOSITY, "chatty"),
            (ENV_FRAME_QUEUE, "lots"),
        ]);
        assert_eq!(cfg.library_path, PathBuf::from(DEFAULT_LIBRARY));
        assert_eq!(cfg.verbosity, None);
        assert_eq!(cfg.frame_queue, DEFAULT_FRAME_QUEUE);

        assert_eq!(config(&[(ENV_FRAME_QUEUE, "0")]).frame_queue, 1);
    }
}
