//! Feature flag model.
//!
//! [`FlagRow`] is what a registry hands back; [`FeatureFlag`] is the checked
//! form the evaluator works with.

use crate::error::RegistryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Share of users, in percent, that see an enabled flag. Always in `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RolloutPercentage(u8);

impl RolloutPercentage {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    /// Returns `None` outside `1..=100`.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// Every authenticated user.
    pub fn full() -> Self {
        Self(Self::MAX)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Whether a bucket in `1..=100` falls inside this rollout.
    pub fn includes(self, bucket: u8) -> bool {
        bucket <= self.0
    }
}

impl TryFrom<i64> for RolloutPercentage {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| format!("rollout percentage must be between 1 and 100, got {}", value))
    }
}

impl From<RolloutPercentage> for u8 {
    fn from(value: RolloutPercentage) -> Self {
        value.0
    }
}

impl fmt::Display for RolloutPercentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// A named feature switch with an optional gradual rollout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlag {
    /// Flag name, unique within a registry
    pub name: String,

    /// Master switch
    pub enabled: bool,

    /// When set on an enabled flag, limits it to this share of users
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollout_percentage: Option<RolloutPercentage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FeatureFlag {
    /// A flag that is on for everyone.
    ///
    /// # Examples
    ///
    /// ```
    /// use tradegate_features::FeatureFlag;
    ///
    /// let flag = FeatureFlag::enabled("trade-finance");
    /// assert!(flag.enabled);
    /// assert!(flag.rollout_percentage.is_none());
    /// ```
    pub fn enabled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            rollout_percentage: None,
            description: None,
            updated_at: None,
        }
    }

    /// A flag that is off for everyone except admins.
    pub fn disabled(name: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::enabled(name)
        }
    }

    /// An enabled flag limited to `percentage` of users.
    ///
    /// A 0% rollout is a disabled flag; values above 100 are capped at 100.
    pub fn rollout(name: impl Into<String>, percentage: u8) -> Self {
        match RolloutPercentage::new(percentage.min(RolloutPercentage::MAX)) {
            Some(percentage) => Self {
                rollout_percentage: Some(percentage),
                ..Self::enabled(name)
            },
            None => Self::disabled(name),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }
}

/// A flag record as stored by the backing table.
///
/// Columns are loosely typed there: the percentage is any integer or null and
/// unknown columns are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct FlagRow {
    pub name: String,

    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub rollout_percentage: Option<i64>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<FlagRow> for FeatureFlag {
    type Error = RegistryError;

    fn try_from(row: FlagRow) -> Result<Self, Self::Error> {
        if row.name.trim().is_empty() {
            return Err(RegistryError::InvalidFlag {
                name: row.name,
                reason: "name cannot be empty".to_string(),
            });
        }

        let rollout_percentage = match row.rollout_percentage {
            Some(raw) => Some(RolloutPercentage::try_from(raw).map_err(|reason| {
                RegistryError::InvalidFlag {
                    name: row.name.clone(),
                    reason,
                }
            })?),
            None => None,
        };

        Ok(FeatureFlag {
            name: row.name,
            enabled: row.enabled,
            rollout_percentage,
            description: row.description,
            updated_at: row.updated_at,
        })
    }
}
