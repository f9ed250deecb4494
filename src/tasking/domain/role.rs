//! Role taxonomy and the seniority priority table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Role assigned to an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Read-mostly external participant.
    Guest,
    /// Junior member with restricted edit rights.
    Intern,
    /// Regular member working on assigned tasks.
    Contributor,
    /// Member with oversight responsibility for tasks and projects.
    Lead,
    /// Administrative member.
    Admin,
    /// Unrestricted administrator; bypasses nearly all checks.
    SuperAdmin,
}

impl Role {
    /// All roles in ascending seniority order.
    pub const ALL_ASCENDING: [Self; 6] = [
        Self::Guest,
        Self::Intern,
        Self::Contributor,
        Self::Lead,
        Self::Admin,
        Self::SuperAdmin,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "GUEST",
            Self::Intern => "INTERN",
            Self::Contributor => "CONTRIBUTOR",
            Self::Lead => "LEAD",
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPER_ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "GUEST" => Ok(Self::Guest),
            "INTERN" => Ok(Self::Intern),
            "CONTRIBUTOR" => Ok(Self::Contributor),
            "LEAD" => Ok(Self::Lead),
            "ADMIN" => Ok(Self::Admin),
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Error returned while parsing a role from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Error returned when a role has no configured priority.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("role {0} has no configured priority")]
pub struct UnknownRoleError(pub Role);

/// Total-order seniority ranking over roles.
///
/// Built once from the configured seniority list and passed by reference
/// into every decision that compares two roles. A lookup miss means the
/// deployment configuration dropped a role; callers treat that as a denial
/// rather than a fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePriorityTable {
    ranks: HashMap<Role, u8>,
}

impl RolePriorityTable {
    /// Builds a table from roles listed in ascending seniority order.
    ///
    /// Rank starts at 1 for the most junior role; later duplicates of a
    /// role overwrite earlier entries, so the resulting order is total and
    /// tie-free.
    #[must_use]
    pub fn from_seniority_order(order: &[Role]) -> Self {
        let ranks = order
            .iter()
            .enumerate()
            .map(|(index, role)| {
                let rank = u8::try_from(index + 1).unwrap_or(u8::MAX);
                (*role, rank)
            })
            .collect();
        Self { ranks }
    }

    /// Returns the priority rank of a role.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRoleError`] when the role is absent from the
    /// configured seniority order.
    pub fn priority_of(&self, role: Role) -> Result<u8, UnknownRoleError> {
        self.ranks.get(&role).copied().ok_or(UnknownRoleError(role))
    }
}

impl Default for RolePriorityTable {
    fn default() -> Self {
        Self::from_seniority_order(&Role::ALL_ASCENDING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_table_is_total_and_tie_free() {
        let table = RolePriorityTable::default();
        let mut seen = Vec::new();
        for role in Role::ALL_ASCENDING {
            let rank = table.priority_of(role).expect("role should be ranked");
            assert!(!seen.contains(&rank), "duplicate rank for {role}");
            seen.push(rank);
        }
        assert_eq!(seen.len(), Role::ALL_ASCENDING.len());
    }

    #[test]
    fn seniority_ordering_is_consistent() {
        let table = RolePriorityTable::default();
        let ranks: Vec<u8> = Role::ALL_ASCENDING
            .iter()
            .map(|role| table.priority_of(*role).expect("role should be ranked"))
            .collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(ranks, sorted, "ascending list must produce ascending ranks");
    }

    #[test]
    fn missing_role_is_reported_not_defaulted() {
        let table = RolePriorityTable::from_seniority_order(&[Role::Guest, Role::Admin]);
        assert_eq!(
            table.priority_of(Role::Lead),
            Err(UnknownRoleError(Role::Lead))
        );
    }

    #[rstest]
    #[case("SUPER_ADMIN", Role::SuperAdmin)]
    #[case(" lead ", Role::Lead)]
    #[case("contributor", Role::Contributor)]
    fn parses_wire_forms(#[case] input: &str, #[case] expected: Role) {
        assert_eq!(Role::try_from(input), Ok(expected));
    }

    #[test]
    fn rejects_unknown_wire_form() {
        assert!(Role::try_from("OWNER").is_err());
    }
}
