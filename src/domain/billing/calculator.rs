//! Family billing calculator.
//!
//! The household total is the standalone total scaled by the schedule's
//! factor for the household size, rounded once. Savings are the standalone
//! total minus that rounded figure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FamilyPricing, MemberType};

/// One line of the quote breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBreakdown {
    pub member_type: MemberType,
    pub count: usize,
    pub standalone_rate: Decimal,
    /// Per-member rate after the household discount.
    pub unit_rate: Decimal,
}

/// Monthly quote for a household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyQuote {
    pub monthly_total: Decimal,
    pub breakdown: Vec<TierBreakdown>,
    pub savings: Decimal,
    /// What the same members would pay individually.
    pub vs_individual: Decimal,
    pub member_count: usize,
    pub discount_percent: Decimal,
}

impl FamilyQuote {
    fn empty() -> Self {
        Self {
            monthly_total: Decimal::ZERO,
            breakdown: Vec::new(),
            savings: Decimal::ZERO,
            vs_individual: Decimal::ZERO,
            member_count: 0,
            discount_percent: Decimal::ZERO,
        }
    }
}

impl FamilyPricing {
    /// Quotes the given ordered member types.
    pub fn quote(&self, members: &[MemberType]) -> FamilyQuote {
        if members.is_empty() {
            return FamilyQuote::empty();
        }

        let factor = self.schedule.factor(members.len());

        let mut breakdown: Vec<TierBreakdown> = Vec::new();
        for member_type in members {
            match breakdown.iter_mut().find(|b| b.member_type == *member_type) {
                Some(line) => line.count += 1,
                None => {
                    let standalone_rate = self.standalone_rate(*member_type);
                    breakdown.push(TierBreakdown {
                        member_type: *member_type,
                        count: 1,
                        standalone_rate,
                        unit_rate: self.rounding.apply(standalone_rate * factor),
                    });
                }
            }
        }

        let vs_individual: Decimal = breakdown
            .iter()
            .map(|b| b.standalone_rate * Decimal::from(b.count))
            .sum();
        let monthly_total = self.rounding.apply(vs_individual * factor).max(Decimal::ZERO);
        let savings = (vs_individual - monthly_total).max(Decimal::ZERO);

        FamilyQuote {
            monthly_total,
            breakdown,
            savings,
            vs_individual,
            member_count: members.len(),
            discount_percent: self.schedule.discount_percent(members.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::{DiscountSchedule, DiscountStep, RoundingRule};

    fn dec(v: &str) -> Decimal {
        v.parse().unwrap()
    }

    fn pricing() -> FamilyPricing {
        FamilyPricing::new(dec("100"), dec("75"), DiscountSchedule::default())
    }

    #[test]
    fn empty_household_is_all_zeros() {
        let quote = pricing().quote(&[]);
        assert_eq!(quote.monthly_total, Decimal::ZERO);
        assert_eq!(quote.savings, Decimal::ZERO);
        assert_eq!(quote.vs_individual, Decimal::ZERO);
        assert_eq!(quote.member_count, 0);
        assert!(quote.breakdown.is_empty());
    }

    #[test]
    fn single_member_pays_standalone_rate() {
        let quote = pricing().quote(&[MemberType::Adult]);
        assert_eq!(quote.monthly_total, dec("100"));
        assert_eq!(quote.savings, Decimal::ZERO);
    }

    #[test]
    fn two_kids_and_an_adult_at_ten_percent_compounding() {
        let quote = pricing().quote(&[MemberType::Kid, MemberType::Kid, MemberType::Adult]);
        assert_eq!(quote.vs_individual, dec("250"));
        assert_eq!(quote.monthly_total, dec("202.50"));
        assert_eq!(quote.savings, dec("47.50"));
        assert_eq!(quote.member_count, 3);
        assert_eq!(quote.discount_percent, dec("19"));
    }

    #[test]
    fn breakdown_groups_by_first_appearance() {
        let quote = pricing().quote(&[MemberType::Kid, MemberType::Adult, MemberType::Kid]);
        assert_eq!(quote.breakdown.len(), 2);
        assert_eq!(quote.breakdown[0].member_type, MemberType::Kid);
        assert_eq!(quote.breakdown[0].count, 2);
        assert_eq!(quote.breakdown[0].unit_rate, dec("60.75"));
        assert_eq!(quote.breakdown[1].member_type, MemberType::Adult);
        assert_eq!(quote.breakdown[1].unit_rate, dec("81"));
    }

    #[test]
    fn rounding_rule_applies_to_total() {
        let pricing = FamilyPricing::new(dec("99.99"), dec("0"), DiscountSchedule::default())
            .with_rounding(RoundingRule::Down);
        // 199.98 * 0.9 = 179.982
        let quote = pricing.quote(&[MemberType::Adult, MemberType::Adult]);
        assert_eq!(quote.monthly_total, dec("179.98"));
        assert_eq!(quote.savings, dec("20.00"));
    }

    #[test]
    fn tiered_schedule_starts_at_threshold() {
        let pricing = FamilyPricing::new(
            dec("100"),
            dec("75"),
            DiscountSchedule::Tiered {
                steps: vec![DiscountStep {
                    min_members: 3,
                    percent: dec("15"),
                }],
            },
        );
        let two = pricing.quote(&[MemberType::Adult, MemberType::Adult]);
        assert_eq!(two.savings, Decimal::ZERO);
        let three = pricing.quote(&[MemberType::Adult, MemberType::Adult, MemberType::Kid]);
        assert_eq!(three.monthly_total, dec("233.75"));
        assert_eq!(three.savings, dec("41.25"));
    }
}
