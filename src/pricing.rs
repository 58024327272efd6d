//! Pure order-pricing and tank-dashboard math.
//!
//! Kept free of any HTTP or state concerns so the order form and dashboard
//! can be exercised in unit tests.

use crate::suppliers::PricingTier;

/// Water-level display bands (percent)
pub mod levels {
    /// At or below this the level counts as critical
    pub const CRITICAL: f64 = 20.0;

    /// At or below this (and above critical) the level counts as a warning
    pub const WARNING: f64 = 40.0;
}

/// Display classification of a tank level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelBand {
    Critical,
    Warning,
    Safe,
}

/// Classify a fill percentage into its display band
pub fn level_band(level_percent: f64) -> LevelBand {
    if level_percent <= levels::CRITICAL {
        LevelBand::Critical
    } else if level_percent <= levels::WARNING {
        LevelBand::Warning
    } else {
        LevelBand::Safe
    }
}

/// Compute the total price for a requested quantity from a supplier's
/// ordered tier list.
///
/// The first tier whose inclusive `[min_volume, max_volume]` range contains
/// the quantity applies; the result is quantity times the tier's unit
/// price, rounded to 2 decimals. A quantity matching no tier prices at 0.0;
/// the order is still permitted at that price so the data-quality gap is
/// visible rather than silently rejected.
pub fn order_price(tiers: &[PricingTier], quantity: f64) -> f64 {
    let tier = tiers
        .iter()
        .find(|tier| quantity >= tier.min_volume && quantity <= tier.max_volume);

    match tier {
        Some(tier) => round2(quantity * tier.price_per_liter),
        None => 0.0,
    }
}

/// Project how many whole days of supply remain in a tank.
///
/// Returns `None` ("unknown") when the average daily usage is zero or
/// negative instead of letting a division produce infinity.
pub fn days_remaining(level_percent: f64, capacity: f64, avg_daily_usage: f64) -> Option<u32> {
    if avg_daily_usage <= 0.0 {
        return None;
    }
    let remaining_liters = (level_percent / 100.0) * capacity;
    Some((remaining_liters / avg_daily_usage).floor() as u32)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers() -> Vec<PricingTier> {
        vec![
            PricingTier {
                min_volume: 0.0,
                max_volume: 999.0,
                price_per_liter: 0.10,
            },
            PricingTier {
                min_volume: 1000.0,
                max_volume: 4999.0,
                price_per_liter: 0.08,
            },
        ]
    }

    #[test]
    fn price_uses_the_matching_tier() {
        assert_eq!(order_price(&tiers(), 1500.0), 120.00);
        assert_eq!(order_price(&tiers(), 500.0), 50.00);
    }

    #[test]
    fn price_is_zero_when_no_tier_matches() {
        assert_eq!(order_price(&tiers(), 10_000.0), 0.0);
    }

    #[test]
    fn price_tier_bounds_are_inclusive() {
        assert_eq!(order_price(&tiers(), 999.0), 99.90);
        assert_eq!(order_price(&tiers(), 1000.0), 80.00);
    }

    #[test]
    fn days_remaining_floors_whole_days() {
        assert_eq!(days_remaining(50.0, 4000.0, 100.0), Some(20));
        assert_eq!(days_remaining(65.0, 5000.0, 125.0), Some(26));
    }

    #[test]
    fn days_remaining_is_unknown_for_zero_usage() {
        assert_eq!(days_remaining(50.0, 4000.0, 0.0), None);
        assert_eq!(days_remaining(50.0, 4000.0, -1.0), None);
    }

    #[test]
    fn level_bands() {
        assert_eq!(level_band(10.0), LevelBand::Critical);
        assert_eq!(level_band(20.0), LevelBand::Critical);
        assert_eq!(level_band(35.0), LevelBand::Warning);
        assert_eq!(level_band(80.0), LevelBand::Safe);
    }
}
