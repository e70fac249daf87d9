//! Stable user bucketing.
//!
//! A user's bucket depends only on their identifier, so the same user lands in
//! the same bucket for every flag and across restarts. Raising a rollout's
//! percentage therefore only ever adds users.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Number of rollout buckets. Buckets are numbered `1..=BUCKETS`.
pub const BUCKETS: u32 = 100;

/// Hash used to place identifiers into buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashStrategy {
    /// 31-multiplier polynomial hash over UTF-16 code units with 32-bit
    /// signed wraparound. Matches assignments made by the web client.
    #[default]
    Legacy,
    /// First four bytes of SHA-256, big-endian.
    Sha256,
}

impl HashStrategy {
    pub fn hash(self, id: &str) -> u32 {
        match self {
            HashStrategy::Legacy => legacy_hash(id),
            HashStrategy::Sha256 => sha256_hash(id),
        }
    }

    /// Bucket in `1..=100` for `id`.
    pub fn bucket(self, id: &str) -> u8 {
        // < 101, so the narrowing is lossless
        ((self.hash(id) % BUCKETS) + 1) as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HashStrategy::Legacy => "legacy",
            HashStrategy::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Ok(HashStrategy::Legacy),
            "sha256" => Ok(HashStrategy::Sha256),
            other => Err(format!("unknown hash strategy: {}", other)),
        }
    }
}

/// `h = h * 31 + unit` in wrapping `i32`, then the absolute value.
///
/// `i32::MIN` has no positive `i32` counterpart and maps to `2^31`.
pub fn legacy_hash(id: &str) -> u32 {
    id.encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

pub fn sha256_hash(id: &str) -> u32 {
    let digest = Sha256::digest(id.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}
