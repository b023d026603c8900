//! Run-wide benefit toggles applied uniformly to every truck in the fleet.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Permanent breakdown-probability discount granted by the referral program.
///
/// The discount applies to every trip of every truck for the whole run and
/// stacks additively with the repair tool while the tool is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ReferralTier {
    #[default]
    None,
    Tier1,
    Tier2,
    Tier3,
}

impl ReferralTier {
    /// Breakdown-probability reduction for this tier.
    #[must_use]
    pub const fn reduction(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Tier1 => 0.02,
            Self::Tier2 => 0.03,
            Self::Tier3 => 0.05,
        }
    }

    /// Numeric tier key as exposed to callers (0-3).
    #[must_use]
    pub const fn key(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Tier1 => 1,
            Self::Tier2 => 2,
            Self::Tier3 => 3,
        }
    }
}

/// Error raised when a numeric tier key falls outside 0-3.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid referral tier {0} (expected 0-3)")]
pub struct InvalidReferralTier(pub u8);

impl TryFrom<u8> for ReferralTier {
    type Error = InvalidReferralTier;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Tier1),
            2 => Ok(Self::Tier2),
            3 => Ok(Self::Tier3),
            other => Err(InvalidReferralTier(other)),
        }
    }
}

impl From<ReferralTier> for u8 {
    fn from(tier: ReferralTier) -> Self {
        tier.key()
    }
}

/// Benefits in effect for one simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Repair tool: -0.05 breakdown probability for each truck's first two
    /// trips, at a one-time fee charged when the truck enters service.
    pub repair_tool: bool,
    pub referral_tier: ReferralTier,
}

impl Modifiers {
    /// Returns true when any benefit differs from the no-benefit baseline.
    #[must_use]
    pub const fn is_active(self) -> bool {
        self.repair_tool || !matches!(self.referral_tier, ReferralTier::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_reductions_match_program_table() {
        assert!((ReferralTier::None.reduction() - 0.0).abs() < f64::EPSILON);
        assert!((ReferralTier::Tier1.reduction() - 0.02).abs() < f64::EPSILON);
        assert!((ReferralTier::Tier2.reduction() - 0.03).abs() < f64::EPSILON);
        assert!((ReferralTier::Tier3.reduction() - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn tier_keys_round_trip() {
        for key in 0u8..=3 {
            let tier = ReferralTier::try_from(key).expect("tier in range");
            assert_eq!(tier.key(), key);
        }
        assert_eq!(
            ReferralTier::try_from(4),
            Err(InvalidReferralTier(4)),
            "tier 4 does not exist"
        );
    }

    #[test]
    fn default_modifiers_are_inactive() {
        assert!(!Modifiers::default().is_active());
        assert!(
            Modifiers {
                repair_tool: true,
                ..Modifiers::default()
            }
            .is_active()
        );
        assert!(
            Modifiers {
                referral_tier: ReferralTier::Tier1,
                ..Modifiers::default()
            }
            .is_active()
        );
    }
}
