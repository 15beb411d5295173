//! Priority tiers used to group shopping items.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Ordered priority tier. `Need` ranks highest.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Need,
    Good,
    Nice,
}

impl Tier {
    /// Every tier in allocation order.
    pub const ALL: [Tier; 3] = [Tier::Need, Tier::Good, Tier::Nice];

    /// Allocation rank, starting at 1 for `Need`.
    pub fn rank(self) -> u8 {
        match self {
            Tier::Need => 1,
            Tier::Good => 2,
            Tier::Nice => 3,
        }
    }

    /// Short machine-friendly key (`need`, `good`, `nice`).
    pub fn key(self) -> &'static str {
        match self {
            Tier::Need => "need",
            Tier::Good => "good",
            Tier::Nice => "nice",
        }
    }

    /// Section heading used when listing items.
    pub fn title(self) -> &'static str {
        match self {
            Tier::Need => "Need to Have",
            Tier::Good => "Good to Have",
            Tier::Nice => "Nice to Have",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raised when text does not name a known tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTier(pub String);

impl fmt::Display for UnknownTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category `{}` (expected need, good or nice)", self.0)
    }
}

impl std::error::Error for UnknownTier {}

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "need" | "need-to-have" => Ok(Tier::Need),
            "good" | "good-to-have" => Ok(Tier::Good),
            "nice" | "nice-to-have" => Ok(Tier::Nice),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_priority() {
        assert!(Tier::Need.rank() < Tier::Good.rank());
        assert!(Tier::Good.rank() < Tier::Nice.rank());
        assert_eq!(Tier::ALL.iter().map(|t| t.rank()).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn parses_keys_case_insensitively() {
        assert_eq!("NEED".parse::<Tier>().unwrap(), Tier::Need);
        assert_eq!(" good ".parse::<Tier>().unwrap(), Tier::Good);
        assert!("later".parse::<Tier>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Tier::Nice).unwrap();
        assert_eq!(json, "\"nice\"");
    }
}
