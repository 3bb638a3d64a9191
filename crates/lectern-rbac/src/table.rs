//! The declarative permission table.
//!
//! A nested mapping `module -> role -> action -> allowed`, read once at
//! startup and never mutated afterwards. The table is shared behind an `Arc`
//! by the [`AccessGate`](crate::AccessGate), so no locking is involved.
//!
//! Absence is meaningful at every level:
//!
//! | Lookup | Decision |
//! |--------|----------|
//! | module missing | [`PermissionDecision::DeniedUnknownModule`] |
//! | role missing under module | [`PermissionDecision::DeniedUnknownRole`] |
//! | action missing or `false` | [`PermissionDecision::DeniedExplicit`] |
//! | action `true` | [`PermissionDecision::Allowed`] |
//!
//! # Example
//!
//! ```
//! use lectern_rbac::{PermissionDecision, PermissionTable};
//!
//! let table = PermissionTable::load(r#"{"course": {"student": {"view": true}}}"#).unwrap();
//!
//! assert_eq!(table.allows("course", "student", "view"), PermissionDecision::Allowed);
//! assert_eq!(table.allows("course", "student", "create"), PermissionDecision::DeniedExplicit);
//! assert_eq!(table.allows("course", "teacher", "view"), PermissionDecision::DeniedUnknownRole);
//! assert_eq!(table.allows("grades", "student", "view"), PermissionDecision::DeniedUnknownModule);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Table compiled into the binary, used when no file is configured.
const BUILTIN_PERMISSIONS: &str = include_str!("../permissions.json");

pub type ActionRules = BTreeMap<String, bool>;
pub type RoleRules = BTreeMap<String, ActionRules>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionDecision {
    Allowed,
    DeniedExplicit,
    DeniedUnknownRole,
    DeniedUnknownModule,
}

impl PermissionDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, PermissionDecision::Allowed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionDecision::Allowed => "allowed",
            PermissionDecision::DeniedExplicit => "denied_explicit",
            PermissionDecision::DeniedUnknownRole => "denied_unknown_role",
            PermissionDecision::DeniedUnknownModule => "denied_unknown_module",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PermissionTableError {
    #[error("failed to read permission table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed permission table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where a loaded table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    File(PathBuf),
    Builtin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionTable {
    modules: BTreeMap<String, RoleRules>,
}

impl PermissionTable {
    /// Parses a table from its JSON form.
    ///
    /// Any non-boolean leaf is rejected, so a typo such as `"view": "yes"`
    /// fails at startup instead of silently denying.
    pub fn load(source: &str) -> Result<Self, PermissionTableError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, PermissionTableError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PermissionTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(&raw)
    }

    /// The table embedded at compile time. A broken embedded document is an
    /// error like any other malformed table, never an empty table.
    pub fn builtin() -> Result<Self, PermissionTableError> {
        Self::load(BUILTIN_PERMISSIONS)
    }

    /// Loads `path` when it exists, otherwise the built-in table.
    ///
    /// An existing but unreadable or malformed file is an error: falling back
    /// would hide an operator mistake.
    pub fn load_or_builtin(path: &Path) -> Result<(Self, TableSource), PermissionTableError> {
        if path.exists() {
            let table = Self::from_path(path)?;
            Ok((table, TableSource::File(path.to_path_buf())))
        } else {
            Ok((Self::builtin()?, TableSource::Builtin))
        }
    }

    pub fn allows(&self, module: &str, role: &str, action: &str) -> PermissionDecision {
        let Some(roles) = self.modules.get(module) else {
            return PermissionDecision::DeniedUnknownModule;
        };
        let Some(actions) = roles.get(role) else {
            return PermissionDecision::DeniedUnknownRole;
        };
        match actions.get(action) {
            Some(true) => PermissionDecision::Allowed,
            Some(false) | None => PermissionDecision::DeniedExplicit,
        }
    }

    pub fn modules(&self) -> impl Iterator<Item = (&str, &RoleRules)> {
        self.modules.iter().map(|(name, roles)| (name.as_str(), roles))
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
