//! Process settings, loaded from `MEDIATOR_*` environment variables.
//!
//! | variable                            | default                      |
//! |-------------------------------------|------------------------------|
//! | `MEDIATOR_DATA_FOLDER`              | `data`                       |
//! | `MEDIATOR_PROBLEM_TYPE_PREFIX`      | `https://example.com/errors` |
//! | `MEDIATOR_BIND_ADDR`                | `127.0.0.1:5000`             |
//! | `MEDIATOR_LOG`                      | `info`                       |
//! | `MEDIATOR_EXTENDED_ERROR_MAPPING`   | `false`                      |

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transport::{MapperConfig, DEFAULT_PROBLEM_TYPE_PREFIX};

pub const ENV_PREFIX: &str = "MEDIATOR_";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigLoadError {
    #[error("{key} is not valid unicode")]
    NotUnicode { key: String },
    #[error("{key}={value:?} is not a valid {expected}")]
    Invalid {
        key: String,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Folder for the JSON file store. Created on startup.
    pub data_folder: PathBuf,
    pub problem_type_prefix: String,
    pub bind_addr: SocketAddr,
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence.
    pub log_filter: String,
    /// Map not-found / conflict / forbidden to 404 / 409 / 403.
    pub extended_error_mapping: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_folder: PathBuf::from("data"),
            problem_type_prefix: DEFAULT_PROBLEM_TYPE_PREFIX.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            log_filter: "info".to_string(),
            extended_error_mapping: false,
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigLoadError::NotUnicode {
                key: key.to_string(),
            }),
        })
    }

    /// Load settings through `lookup`, which maps a full variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Result<Option<String>, ConfigLoadError>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let mut settings = Self::default();

        if let Some(folder) = var("DATA_FOLDER")? {
            settings.data_folder = PathBuf::from(folder);
        }
        if let Some(prefix) = var("PROBLEM_TYPE_PREFIX")? {
            settings.problem_type_prefix = prefix;
        }
        if let Some(addr) = var("BIND_ADDR")? {
            settings.bind_addr = addr.parse().map_err(|_| ConfigLoadError::Invalid {
                key: format!("{ENV_PREFIX}BIND_ADDR"),
                value: addr.clone(),
                expected: "socket address",
            })?;
        }
        if let Some(filter) = var("LOG")? {
            settings.log_filter = filter;
        }
        if let Some(flag) = var("EXTENDED_ERROR_MAPPING")? {
            settings.extended_error_mapping =
                parse_bool(&flag).ok_or_else(|| ConfigLoadError::Invalid {
                    key: format!("{ENV_PREFIX}EXTENDED_ERROR_MAPPING"),
                    value: flag.clone(),
                    expected: "boolean",
                })?;
        }

        Ok(settings)
    }

    pub fn mapper_config(&self) -> MapperConfig {
        MapperConfig {
            problem_type_prefix: self.problem_type_prefix.clone(),
            map_extended_kinds: self.extended_error_mapping,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
