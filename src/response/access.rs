use serde::Deserialize;
use std::fmt;

/// Maturity tier of an agent or a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum AgentAccess {
    #[serde(rename = "PG")]
    PG,
    #[serde(rename = "M")]
    Mature,
    #[serde(rename = "A")]
    Adult,
    /// Sent by some older grids in place of `PG`.
    #[serde(rename = "G")]
    General,
}

impl AgentAccess {
    pub fn as_tag(self) -> &'static str {
        match self {
            AgentAccess::PG => "PG",
            AgentAccess::Mature => "M",
            AgentAccess::Adult => "A",
            AgentAccess::General => "G",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "PG" => Some(AgentAccess::PG),
            "M" => Some(AgentAccess::Mature),
            "A" => Some(AgentAccess::Adult),
            "G" => Some(AgentAccess::General),
            _ => None,
        }
    }
}

impl fmt::Display for AgentAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}
