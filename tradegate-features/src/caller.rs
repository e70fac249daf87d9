//! Who is asking, and whether they bypass rollouts.

use serde::{Deserialize, Serialize};

/// Identity of the caller being evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    /// Stable user identifier, `None` for anonymous visitors
    pub user_id: Option<String>,

    /// Roles held by the caller
    #[serde(default)]
    pub roles: Vec<String>,
}

impl CallerContext {
    /// An unauthenticated caller.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An authenticated caller.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// User id usable for bucketing. Blank ids count as anonymous.
    pub fn bucketing_id(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }
}

/// Decides whether a caller sees every feature regardless of flag state.
pub trait AdminPolicy: Send + Sync {
    fn is_admin(&self, caller: &CallerContext) -> bool;
}

/// Grants the bypass to holders of a single role.
#[derive(Debug, Clone)]
pub struct RoleAdminPolicy {
    role: String,
}

impl RoleAdminPolicy {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }

    pub fn role(&self) -> &str {
        &self.role
    }
}

impl Default for RoleAdminPolicy {
    fn default() -> Self {
        Self::new("admin")
    }
}

impl AdminPolicy for RoleAdminPolicy {
    fn is_admin(&self, caller: &CallerContext) -> bool {
        caller.has_role(&self.role)
    }
}

/// Nobody bypasses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAdminPolicy;

impl AdminPolicy for NoAdminPolicy {
    fn is_admin(&self, _caller: &CallerContext) -> bool {
        false
    }
}

impl<F> AdminPolicy for F
where
    F: Fn(&CallerContext) -> bool + Send + Sync,
{
    fn is_admin(&self, caller: &CallerContext) -> bool {
        self(caller)
    }
}
