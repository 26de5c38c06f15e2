//! FamilyBillingHandler - Quotes consolidated household billing.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::billing::{FamilyGroup, FamilyPricing, FamilyQuote, FamilyRoster, MemberType};
use crate::domain::errors::EngineError;
use crate::domain::foundation::{FamilyAccountId, MemberId};
use crate::ports::MemberRepository;

/// Query to quote an existing household.
#[derive(Debug, Clone)]
pub struct QuoteFamilyQuery {
    pub family_account_id: FamilyAccountId,
    /// Date used to decide who is still a minor.
    pub today: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct QuoteFamilyResult {
    pub family_account_id: FamilyAccountId,
    pub primary_member_id: MemberId,
    /// Processor customer the household is billed through.
    pub billing_customer_id: Option<String>,
    pub member_types: Vec<MemberType>,
    pub quote: FamilyQuote,
}

/// Quote for a prospective household submitted as a roster.
#[derive(Debug, Clone)]
pub struct RosterQuote {
    pub roster: FamilyRoster,
    pub quote: FamilyQuote,
}

/// Handler for family billing quotes.
pub struct FamilyBillingHandler {
    members: Arc<dyn MemberRepository>,
    pricing: FamilyPricing,
    adult_age: i32,
}

impl FamilyBillingHandler {
    pub fn new(members: Arc<dyn MemberRepository>, pricing: FamilyPricing, adult_age: i32) -> Self {
        Self {
            members,
            pricing,
            adult_age,
        }
    }

    pub fn pricing(&self) -> &FamilyPricing {
        &self.pricing
    }

    /// Quotes the members currently linked to a family account.
    pub async fn quote_family(&self, query: QuoteFamilyQuery) -> Result<QuoteFamilyResult, EngineError> {
        let members = self.members.find_by_family(&query.family_account_id).await?;
        let group = FamilyGroup::from_members(query.family_account_id, members)?;

        let member_types = group.member_types(query.today, self.adult_age);
        let quote = self.pricing.quote(&member_types);
        tracing::debug!(
            family_account_id = %query.family_account_id,
            members = quote.member_count,
            total = %quote.monthly_total,
            "family quoted"
        );

        Ok(QuoteFamilyResult {
            family_account_id: group.family_account_id(),
            primary_member_id: group.primary().id,
            billing_customer_id: group.billing_customer_id().map(str::to_string),
            member_types,
            quote,
        })
    }

    /// Quotes a roster given as parallel name and member-type arrays.
    pub fn quote_roster<N, T>(&self, names: &[N], tags: &[T]) -> Result<RosterQuote, EngineError>
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let roster = FamilyRoster::from_parallel(names, tags)?;
        let quote = self.pricing.quote(&roster.member_types());
        Ok(RosterQuote { roster, quote })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMemberRepository;
    use crate::domain::billing::DiscountSchedule;
    use crate::domain::errors::ErrorKind;
    use crate::domain::foundation::Timestamp;
    use crate::domain::member::Member;
    use crate::domain::waiver::ADULT_AGE;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn pricing() -> FamilyPricing {
        FamilyPricing::new(
            dec("100"),
            dec("50"),
            DiscountSchedule::Compounding {
                percent_per_additional: dec("10"),
            },
        )
    }

    fn family_member(
        family: FamilyAccountId,
        name: &str,
        birth: Option<(i32, u32, u32)>,
        primary: bool,
    ) -> Member {
        let now = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let mut m = Member::new(
            MemberId::new(),
            name,
            format!("{}@example.com", name.to_lowercase()),
            "bjj",
            now,
        );
        m.birth_date = birth.and_then(|(y, mo, d)| NaiveDate::from_ymd_opt(y, mo, d));
        m.family_account_id = Some(family);
        m.is_primary_account_holder = primary;
        if primary {
            m.billing_customer_id = Some("cus_family".to_string());
        }
        m
    }

    async fn handler_with(members: &[Member]) -> FamilyBillingHandler {
        let repo = Arc::new(InMemoryMemberRepository::new());
        for m in members {
            repo.save(m).await.unwrap();
        }
        FamilyBillingHandler::new(repo, pricing(), ADULT_AGE)
    }

    #[tokio::test]
    async fn quotes_household_through_primary() {
        let family = FamilyAccountId::new();
        let parent = family_member(family, "Ana", Some((1985, 3, 1)), true);
        let other = family_member(family, "Ben", Some((1986, 7, 9)), false);
        let kid = family_member(family, "Cy", Some((2015, 2, 2)), false);
        let handler = handler_with(&[parent.clone(), other, kid]).await;

        let result = handler
            .quote_family(QuoteFamilyQuery {
                family_account_id: family,
                today: today(),
            })
            .await
            .unwrap();

        assert_eq!(result.primary_member_id, parent.id);
        assert_eq!(result.billing_customer_id.as_deref(), Some("cus_family"));
        assert_eq!(result.quote.member_count, 3);
        assert_eq!(result.quote.vs_individual, dec("250"));
        assert_eq!(result.quote.monthly_total, dec("202.50"));
        assert_eq!(result.quote.savings, dec("47.50"));
        assert_eq!(
            result.member_types.iter().filter(|t| **t == MemberType::Kid).count(),
            1
        );
    }

    #[tokio::test]
    async fn household_without_primary_is_rejected() {
        let family = FamilyAccountId::new();
        let a = family_member(family, "Ana", None, false);
        let b = family_member(family, "Ben", None, false);
        let handler = handler_with(&[a, b]).await;

        let err = handler
            .quote_family(QuoteFamilyQuery {
                family_account_id: family,
                today: today(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    }

    #[tokio::test]
    async fn unknown_family_is_rejected() {
        let handler = handler_with(&[]).await;
        let err = handler
            .quote_family(QuoteFamilyQuery {
                family_account_id: FamilyAccountId::new(),
                today: today(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    }

    #[tokio::test]
    async fn quotes_roster_from_parallel_arrays() {
        let handler = handler_with(&[]).await;

        let result = handler
            .quote_roster(&["Ana", "Ben", "Cy"], &["adult", "Adult", "child"])
            .unwrap();

        assert_eq!(result.roster.len(), 3);
        assert_eq!(result.quote.monthly_total, dec("202.50"));
    }

    #[tokio::test]
    async fn mismatched_roster_arrays_are_rejected() {
        let handler = handler_with(&[]).await;
        let err = handler
            .quote_roster(&["Ana", "Ben"], &["adult"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    }

    #[tokio::test]
    async fn unknown_member_type_is_rejected() {
        let handler = handler_with(&[]).await;
        let err = handler.quote_roster(&["Ana"], &["senior"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    }

    #[tokio::test]
    async fn empty_roster_quotes_zero() {
        let handler = handler_with(&[]).await;
        let empty: [&str; 0] = [];
        let result = handler.quote_roster(&empty, &empty).unwrap();
        assert_eq!(result.quote.monthly_total, Decimal::ZERO);
        assert_eq!(result.quote.savings, Decimal::ZERO);
    }
}
