//! Subscription-tier policy for plant creation.

/// Subscription level, parsed from the tier column on the user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionTier {
    Free,
    Basic,
    Premium,
}

impl SubscriptionTier {
    /// Parse the stored tier name. Unrecognized values yield `None`,
    /// which the policy treats as deny.
    pub fn parse(tier: &str) -> Option<Self> {
        match tier {
            "Free" => Some(Self::Free),
            "Basic" => Some(Self::Basic),
            "Premium" => Some(Self::Premium),
            _ => None,
        }
    }

    /// Maximum number of plants for this tier; `None` means unlimited.
    pub fn plant_limit(self) -> Option<i64> {
        match self {
            Self::Free => Some(5),
            Self::Basic => Some(25),
            Self::Premium => None,
        }
    }
}

/// Pure allow/deny decision for adding one more plant.
///
/// Callers evaluate this immediately before insert within the same
/// logical operation. There is no lock across the check and the insert:
/// two concurrent creations can both pass and transiently exceed the
/// limit. Known, accepted consistency gap.
pub fn can_add_plant(tier: &str, current_count: i64) -> bool {
    match SubscriptionTier::parse(tier).map(SubscriptionTier::plant_limit) {
        Some(Some(limit)) => current_count < limit,
        Some(None) => true,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_tier_is_capped_at_five() {
        assert!(can_add_plant("Free", 0));
        assert!(can_add_plant("Free", 4));
        assert!(!can_add_plant("Free", 5));
        assert!(!can_add_plant("Free", 6));
    }

    #[test]
    fn basic_tier_is_capped_at_twenty_five() {
        assert!(can_add_plant("Basic", 24));
        assert!(!can_add_plant("Basic", 25));
    }

    #[test]
    fn premium_tier_is_unlimited() {
        assert!(can_add_plant("Premium", 0));
        assert!(can_add_plant("Premium", 1000));
    }

    #[test]
    fn unknown_tier_denies() {
        assert!(!can_add_plant("Gold", 0));
        assert!(!can_add_plant("", 0));
        assert!(!can_add_plant("free", 0)); // tier names are exact
    }
}
