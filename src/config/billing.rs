//! Billing configuration

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::billing::{
    DiscountSchedule, DiscountStep, FamilyPricing, ProgramCatalog, ProgramPrice, RoundingRule,
};

use super::error::ValidationError;

/// How the family volume discount grows
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    #[default]
    Compounding,
    Tiered,
}

/// One configured program
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramConfig {
    pub monthly_rate: Decimal,

    /// Processor price id
    pub price_id: String,
}

/// Billing configuration (rates, discounts, programs, promos)
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Standalone monthly rate for an adult
    #[serde(default = "default_adult_rate")]
    pub adult_rate: Decimal,

    /// Standalone monthly rate for a kid
    #[serde(default = "default_kid_rate")]
    pub kid_rate: Decimal,

    /// One-time drop-in visit price
    #[serde(default = "default_drop_in_price")]
    pub drop_in_price: Decimal,

    /// ISO 4217 currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Free days on a new subscription
    #[serde(default = "default_trial_days")]
    pub trial_days: u32,

    #[serde(default)]
    pub discount_kind: DiscountKind,

    /// Percent off per additional member (compounding)
    #[serde(default = "default_discount_percent")]
    pub discount_percent: Decimal,

    /// Steps for the tiered schedule
    #[serde(default)]
    pub discount_steps: Vec<DiscountStep>,

    #[serde(default)]
    pub rounding: RoundingRule,

    /// Programs by name
    #[serde(default)]
    pub programs: HashMap<String, ProgramConfig>,

    /// Local promo catalogue: code -> processor coupon id
    #[serde(default)]
    pub promo_codes: HashMap<String, String>,
}

impl BillingConfig {
    pub fn discount_schedule(&self) -> DiscountSchedule {
        match self.discount_kind {
            DiscountKind::Compounding => DiscountSchedule::Compounding {
                percent_per_additional: self.discount_percent,
            },
            DiscountKind::Tiered => DiscountSchedule::Tiered {
                steps: self.discount_steps.clone(),
            },
        }
    }

    pub fn family_pricing(&self) -> FamilyPricing {
        FamilyPricing::new(self.adult_rate, self.kid_rate, self.discount_schedule())
            .with_rounding(self.rounding)
    }

    pub fn program_catalog(&self) -> ProgramCatalog {
        ProgramCatalog::new(self.programs.iter().map(|(name, program)| {
            (
                name.as_str(),
                ProgramPrice {
                    monthly_rate: program.monthly_rate,
                    price_id: program.price_id.clone(),
                },
            )
        }))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.family_pricing().validate()?;

        if self.drop_in_price <= Decimal::ZERO || self.drop_in_price.round_dp(2) != self.drop_in_price
        {
            return Err(ValidationError::InvalidDropInPrice);
        }

        let currency = self.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrency(self.currency.clone()));
        }

        for (name, program) in &self.programs {
            if program.monthly_rate < Decimal::ZERO || program.price_id.trim().is_empty() {
                return Err(ValidationError::InvalidProgramPrice(name.clone()));
            }
        }

        Ok(())
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            adult_rate: default_adult_rate(),
            kid_rate: default_kid_rate(),
            drop_in_price: default_drop_in_price(),
            currency: default_currency(),
            trial_days: default_trial_days(),
            discount_kind: DiscountKind::default(),
            discount_percent: default_discount_percent(),
            discount_steps: Vec::new(),
            rounding: RoundingRule::default(),
            programs: HashMap::new(),
            promo_codes: HashMap::new(),
        }
    }
}

fn default_adult_rate() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn default_kid_rate() -> Decimal {
    Decimal::new(75, 0)
}

fn default_drop_in_price() -> Decimal {
    Decimal::new(25, 0)
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_trial_days() -> u32 {
    7
}

fn default_discount_percent() -> Decimal {
    Decimal::TEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::MemberType;

    fn dec(v: &str) -> Decimal {
        v.parse().unwrap()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(BillingConfig::default().validate().is_ok());
    }

    #[test]
    fn default_pricing_quotes_reference_household() {
        let quote = BillingConfig::default().family_pricing().quote(&[
            MemberType::Kid,
            MemberType::Kid,
            MemberType::Adult,
        ]);
        assert_eq!(quote.monthly_total, dec("202.50"));
    }

    #[test]
    fn tiered_schedule_from_steps() {
        let config = BillingConfig {
            discount_kind: DiscountKind::Tiered,
            discount_steps: vec![
                DiscountStep {
                    min_members: 2,
                    percent: dec("5"),
                },
                DiscountStep {
                    min_members: 4,
                    percent: dec("15"),
                },
            ],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.discount_schedule().discount_percent(5), dec("15"));
    }

    #[test]
    fn fractional_cent_drop_in_is_rejected() {
        let config = BillingConfig {
            drop_in_price: dec("12.345"),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidDropInPrice)
        ));
    }

    #[test]
    fn bad_currency_is_rejected() {
        let config = BillingConfig {
            currency: "dollars".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn program_catalog_from_map() {
        let mut config = BillingConfig::default();
        config.programs.insert(
            "bjj".to_string(),
            ProgramConfig {
                monthly_rate: dec("150"),
                price_id: "price_bjj".to_string(),
            },
        );
        let catalog = config.program_catalog();
        assert_eq!(catalog.get("BJJ").map(|p| p.price_id.as_str()), Some("price_bjj"));
    }

    #[test]
    fn program_without_price_id_is_rejected() {
        let mut config = BillingConfig::default();
        config.programs.insert(
            "yoga".to_string(),
            ProgramConfig {
                monthly_rate: dec("80"),
                price_id: " ".to_string(),
            },
        );
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidProgramPrice(_))
        ));
    }
}
