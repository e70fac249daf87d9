//! Evaluation outcome.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a flag evaluated the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Caller holds the admin bypass
    Admin,
    /// Flag is on with no rollout limit
    FullyEnabled,
    /// Flag's master switch is off
    Disabled,
    /// No such flag in the registry
    NotFound,
    /// Registry lookup failed
    Error,
    /// Percentage rollout needs a user id and there is none
    NotAuthenticated,
    /// User's bucket is inside the rollout
    PercentageEnabled,
    /// User's bucket is outside the rollout
    PercentageDisabled,
}

impl Reason {
    pub fn as_str(self) -> &'static str {
        match self {
            Reason::Admin => "admin",
            Reason::FullyEnabled => "fully_enabled",
            Reason::Disabled => "disabled",
            Reason::NotFound => "not_found",
            Reason::Error => "error",
            Reason::NotAuthenticated => "not_authenticated",
            Reason::PercentageEnabled => "percentage_enabled",
            Reason::PercentageDisabled => "percentage_disabled",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final decision for one flag and one caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub enabled: bool,
    pub reason: Reason,
}

impl EvaluationResult {
    pub fn on(reason: Reason) -> Self {
        Self {
            enabled: true,
            reason,
        }
    }

    pub fn off(reason: Reason) -> Self {
        Self {
            enabled: false,
            reason,
        }
    }
}
