//! Enumerated values: record lifecycle status and user roles.

use serde::{Deserialize, Serialize};

/// Lifecycle status shared by orders and TI tickets.
///
/// Records are created as [`Status::Aberto`] and only move through an
/// explicit patch. Any transition between the three values is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Open, nobody has picked it up yet.
    #[default]
    Aberto,
    /// Being worked on.
    EmAndamento,
    /// Closed.
    Finalizado,
}

impl Status {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Aberto, Self::EmAndamento, Self::Finalizado];

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Aberto => "aberto",
            Self::EmAndamento => "em_andamento",
            Self::Finalizado => "finalizado",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aberto" => Ok(Self::Aberto),
            "em_andamento" => Ok(Self::EmAndamento),
            "finalizado" => Ok(Self::Finalizado),
            _ => Err(format!("invalid status: {s}")),
        }
    }
}

/// Role carried by a user account; returned by a successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Submits material orders.
    Solicitante,
    /// Handles material orders.
    Responsavel,
    /// Submits TI tickets.
    SolicitanteTi,
    /// Handles TI tickets.
    ResponsavelTi,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Solicitante => write!(f, "solicitante"),
            Self::Responsavel => write!(f, "responsavel"),
            Self::SolicitanteTi => write!(f, "solicitante_ti"),
            Self::ResponsavelTi => write!(f, "responsavel_ti"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solicitante" => Ok(Self::Solicitante),
            "responsavel" => Ok(Self::Responsavel),
            "solicitante_ti" => Ok(Self::SolicitanteTi),
            "responsavel_ti" => Ok(Self::ResponsavelTi),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
