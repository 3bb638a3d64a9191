//! Location of the declarative permission table.
//!
//! - `PERMISSIONS_PATH`: JSON file with the `module -> role -> action -> bool`
//!   table (default: `config/permissions.json`). When the file does not exist
//!   the server falls back to the table compiled into the binary.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_PERMISSIONS_PATH: &str = "config/permissions.json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermissionsConfig {
    pub path: PathBuf,
}

impl PermissionsConfig {
    pub fn from_env() -> Self {
        let path = env::var("PERMISSIONS_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PERMISSIONS_PATH.to_string());

        Self {
            path: PathBuf::from(path),
        }
    }
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PERMISSIONS_PATH),
        }
    }
}
