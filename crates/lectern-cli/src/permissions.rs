//! Offline inspection of a permission table.
//!
//! Loads a table the same way the server does and expands it into one
//! decision per module, role and action, so an operator can review what a
//! table change will allow before deploying it.

use lectern_models::Role;
use lectern_rbac::{PermissionDecision, PermissionTable};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionRow {
    pub module: String,
    pub role: Role,
    pub action: String,
    pub decision: PermissionDecision,
}

#[derive(Debug, Default)]
pub struct PermissionReport {
    pub rows: Vec<DecisionRow>,
    /// `(module, role)` pairs with no entry; requests from that role are refused with 403.
    pub missing_roles: Vec<(String, Role)>,
    /// `(module, role)` pairs naming a role the API does not know.
    pub unknown_roles: Vec<(String, String)>,
}

impl PermissionReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_roles.is_empty() && self.unknown_roles.is_empty()
    }
}

/// Every action named under a module is evaluated for every known role.
pub fn build_report(table: &PermissionTable) -> PermissionReport {
    let mut report = PermissionReport::default();

    for (module, roles) in table.modules() {
        let actions: BTreeSet<&str> = roles
            .values()
            .flat_map(|actions| actions.keys().map(String::as_str))
            .collect();

        for role_name in roles.keys() {
            if role_name.parse::<Role>().is_err() {
                report
                    .unknown_roles
                    .push((module.to_string(), role_name.clone()));
            }
        }

        for role in Role::ALL {
            if !roles.contains_key(role.as_str()) {
                report.missing_roles.push((module.to_string(), role));
                continue;
            }
            for action in &actions {
                report.rows.push(DecisionRow {
                    module: module.to_string(),
                    role,
                    action: action.to_string(),
                    decision: table.allows(module, role.as_str(), action),
                });
            }
        }
    }

    report
}

pub fn print_report(report: &PermissionReport) {
    println!("{:<12} {:<8} {:<16} DECISION", "MODULE", "ROLE", "ACTION");
    for row in &report.rows {
        let marker = if row.decision.is_allowed() { "✓" } else { "✗" };
        println!(
            "{:<12} {:<8} {:<16} {} {}",
            row.module,
            row.role.as_str(),
            row.action,
            marker,
            row.decision.as_str()
        );
    }

    for (module, role) in &report.missing_roles {
        println!("⚠️  Role '{}' not configured for '{}'", role.as_str(), module);
    }
    for (module, role) in &report.unknown_roles {
        println!("⚠️  Unknown role '{}' in '{}'", role, module);
    }
}
