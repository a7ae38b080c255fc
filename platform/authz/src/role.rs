use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Position in the organisation hierarchy.
///
/// Variants are declared from most to least senior. The numeric rank is not
/// the declaration index: `Coo` and `Cto` share rank 2.
#[cfg_attr(feature = "graphql", derive(async_graphql::Enum))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum Role {
    #[serde(rename = "Founder / Director")]
    FounderDirector,
    #[serde(rename = "CEO")]
    Ceo,
    #[serde(rename = "COO")]
    Coo,
    #[serde(rename = "CTO")]
    Cto,
    #[serde(rename = "Vice President")]
    VicePresident,
    #[serde(rename = "Senior Manager")]
    SeniorManager,
    #[serde(rename = "Manager")]
    Manager,
    #[serde(rename = "Assistant Manager")]
    AssistantManager,
    #[serde(rename = "Team Lead")]
    TeamLead,
    #[serde(rename = "Senior Employee")]
    SeniorEmployee,
    #[serde(rename = "Employee")]
    Employee,
    #[serde(rename = "Intern")]
    Intern,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 12] = [
        Role::FounderDirector,
        Role::Ceo,
        Role::Coo,
        Role::Cto,
        Role::VicePresident,
        Role::SeniorManager,
        Role::Manager,
        Role::AssistantManager,
        Role::TeamLead,
        Role::SeniorEmployee,
        Role::Employee,
        Role::Intern,
    ];

    /// The role that bypasses every hierarchy check.
    pub const TOP: Role = Role::FounderDirector;

    /// Lowest rank allowed to hand out tasks.
    pub const TASK_ASSIGNER_FLOOR: Role = Role::AssistantManager;

    /// Authority rank, 0 is the most senior.
    pub const fn rank(self) -> u8 {
        match self {
            Role::FounderDirector => 0,
            Role::Ceo => 1,
            Role::Coo | Role::Cto => 2,
            Role::VicePresident => 3,
            Role::SeniorManager => 4,
            Role::Manager => 5,
            Role::AssistantManager => 6,
            Role::TeamLead => 7,
            Role::SeniorEmployee => 8,
            Role::Employee => 9,
            Role::Intern => 10,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::FounderDirector => "Founder / Director",
            Role::Ceo => "CEO",
            Role::Coo => "COO",
            Role::Cto => "CTO",
            Role::VicePresident => "Vice President",
            Role::SeniorManager => "Senior Manager",
            Role::Manager => "Manager",
            Role::AssistantManager => "Assistant Manager",
            Role::TeamLead => "Team Lead",
            Role::SeniorEmployee => "Senior Employee",
            Role::Employee => "Employee",
            Role::Intern => "Intern",
        }
    }

    /// Lenient lookup used at string boundaries; unknown labels are `None`.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Role::ALL.into_iter().find(|role| role.as_str() == label)
    }

    pub fn is_top(self) -> bool {
        self == Role::TOP
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_the_hierarchy() {
        let ranks: Vec<u8> = Role::ALL.iter().map(|r| r.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn labels_round_trip_through_parse() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn unknown_labels_do_not_parse() {
        assert_eq!(Role::parse("Janitor"), None);
        assert_eq!(Role::parse("ceo"), None);
        assert_eq!(
            "Janitor".parse::<Role>(),
            Err(UnknownRole("Janitor".to_string()))
        );
    }

    #[test]
    fn serde_uses_display_labels() {
        let json = serde_json::to_string(&Role::FounderDirector).unwrap();
        assert_eq!(json, "\"Founder / Director\"");
        let role: Role = serde_json::from_str("\"Assistant Manager\"").unwrap();
        assert_eq!(role, Role::AssistantManager);
    }
}
