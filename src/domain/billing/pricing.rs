//! Family pricing configuration: base rates, volume discount, rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::MemberType;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// How computed amounts are rounded to cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingRule {
    #[default]
    HalfUp,
    HalfEven,
    Down,
    Up,
}

impl RoundingRule {
    pub fn apply(&self, amount: Decimal) -> Decimal {
        let strategy = match self {
            RoundingRule::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingRule::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingRule::Down => RoundingStrategy::ToZero,
            RoundingRule::Up => RoundingStrategy::AwayFromZero,
        };
        amount.round_dp_with_strategy(2, strategy)
    }
}

/// Discount applied once a household reaches `min_members`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountStep {
    pub min_members: u32,
    /// Whole-bill discount, 0 to 100.
    pub percent: Decimal,
}

/// Volume discount as a function of household size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscountSchedule {
    /// Each member after the first multiplies the bill by `1 - percent/100`.
    Compounding { percent_per_additional: Decimal },
    /// The highest step whose `min_members` is reached applies.
    Tiered { steps: Vec<DiscountStep> },
}

impl DiscountSchedule {
    pub fn none() -> Self {
        DiscountSchedule::Tiered { steps: Vec::new() }
    }

    /// Multiplier applied to the standalone total for `count` members.
    pub fn factor(&self, count: usize) -> Decimal {
        if count == 0 {
            return Decimal::ONE;
        }
        match self {
            DiscountSchedule::Compounding {
                percent_per_additional,
            } => {
                let per_member = Decimal::ONE - *percent_per_additional / HUNDRED;
                (1..count).fold(Decimal::ONE, |acc, _| acc * per_member)
            }
            DiscountSchedule::Tiered { steps } => {
                let percent = steps
                    .iter()
                    .filter(|s| (s.min_members as usize) <= count)
                    .map(|s| s.percent)
                    .max()
                    .unwrap_or(Decimal::ZERO);
                Decimal::ONE - percent / HUNDRED
            }
        }
    }

    /// Effective discount percentage for `count` members.
    pub fn discount_percent(&self, count: usize) -> Decimal {
        ((Decimal::ONE - self.factor(count)) * HUNDRED).normalize()
    }

    /// Rejects schedules that could make a larger household cheaper to skip.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            DiscountSchedule::Compounding {
                percent_per_additional,
            } => check_percent("billing.discount.percent_per_additional", *percent_per_additional),
            DiscountSchedule::Tiered { steps } => {
                let mut previous: Option<&DiscountStep> = None;
                for step in steps {
                    check_percent("billing.discount.steps.percent", step.percent)?;
                    if step.min_members == 0 {
                        return Err(ValidationError::out_of_range(
                            "billing.discount.steps.min_members",
                            1,
                            i64::from(u32::MAX),
                            0,
                        ));
                    }
                    if let Some(prev) = previous {
                        if step.min_members <= prev.min_members {
                            return Err(ValidationError::invalid_format(
                                "billing.discount.steps",
                                "steps must be ordered by increasing min_members",
                            ));
                        }
                        if step.percent < prev.percent {
                            return Err(ValidationError::invalid_format(
                                "billing.discount.steps",
                                "discount must not decrease as the household grows",
                            ));
                        }
                    }
                    previous = Some(step);
                }
                Ok(())
            }
        }
    }
}

impl Default for DiscountSchedule {
    fn default() -> Self {
        DiscountSchedule::Compounding {
            percent_per_additional: Decimal::TEN,
        }
    }
}

fn check_percent(field: &str, percent: Decimal) -> Result<(), ValidationError> {
    if percent < Decimal::ZERO || percent > HUNDRED {
        return Err(ValidationError::invalid_format(
            field,
            format!("{} is outside 0..=100", percent),
        ));
    }
    Ok(())
}

/// Everything the family billing calculator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyPricing {
    pub adult_rate: Decimal,
    pub kid_rate: Decimal,
    pub schedule: DiscountSchedule,
    pub rounding: RoundingRule,
}

impl FamilyPricing {
    pub fn new(adult_rate: Decimal, kid_rate: Decimal, schedule: DiscountSchedule) -> Self {
        Self {
            adult_rate,
            kid_rate,
            schedule,
            rounding: RoundingRule::default(),
        }
    }

    pub fn with_rounding(mut self, rounding: RoundingRule) -> Self {
        self.rounding = rounding;
        self
    }

    /// Standalone monthly rate for one member of the given type.
    pub fn standalone_rate(&self, member_type: MemberType) -> Decimal {
        match member_type {
            MemberType::Adult => self.adult_rate,
            MemberType::Kid => self.kid_rate,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, rate) in [
            ("billing.adult_rate", self.adult_rate),
            ("billing.kid_rate", self.kid_rate),
        ] {
            if rate < Decimal::ZERO {
                return Err(ValidationError::invalid_format(field, "rate must not be negative"));
            }
            if rate.round_dp(2) != rate {
                return Err(ValidationError::invalid_format(field, "rate must be whole cents"));
            }
        }
        self.schedule.validate()
    }
}
