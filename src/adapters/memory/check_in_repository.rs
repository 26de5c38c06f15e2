//! In-memory check-in repository.
//!
//! The uniqueness check and the insert happen under one write guard, so of
//! two concurrent admits for the same key exactly one is stored.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::check_in::{CheckIn, LocalDay};
use crate::domain::foundation::{DomainError, MemberId};
use crate::ports::{CheckInRepository, InsertOutcome};

#[derive(Debug, Clone, Default)]
pub struct InMemoryCheckInRepository {
    check_ins: Arc<RwLock<Vec<CheckIn>>>,
}

impl InMemoryCheckInRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored check-ins.
    pub async fn count(&self) -> usize {
        self.check_ins.read().await.len()
    }
}

#[async_trait]
impl CheckInRepository for InMemoryCheckInRepository {
    async fn find_for_day(
        &self,
        member_id: &MemberId,
        day: &LocalDay,
    ) -> Result<Vec<CheckIn>, DomainError> {
        Ok(self
            .check_ins
            .read()
            .await
            .iter()
            .filter(|c| &c.member_id == member_id && day.contains(c.checked_in_at))
            .cloned()
            .collect())
    }

    async fn insert(&self, check_in: &CheckIn) -> Result<InsertOutcome, DomainError> {
        let mut check_ins = self.check_ins.write().await;
        let key = check_in.key();
        if let Some(existing) = check_ins.iter().find(|c| c.key() == key) {
            return Ok(InsertOutcome::Duplicate(existing.clone()));
        }
        check_ins.push(check_in.clone());
        Ok(InsertOutcome::Inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::check_in::CheckInMethod;
    use crate::domain::foundation::Timestamp;
    use chrono::{TimeZone, Utc};
    use chrono_tz::Tz;

    fn check_in(member_id: MemberId, hour: u32, class_type: Option<&str>) -> CheckIn {
        let at = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap());
        CheckIn::new(member_id, at, at.local_date(Tz::UTC), CheckInMethod::Kiosk)
            .with_class(None, class_type.map(str::to_string))
    }

    #[tokio::test]
    async fn second_insert_for_same_key_is_duplicate() {
        let repo = InMemoryCheckInRepository::new();
        let member = MemberId::new();
        let first = check_in(member, 9, None);

        assert_eq!(repo.insert(&first).await.unwrap(), InsertOutcome::Inserted);
        let outcome = repo.insert(&check_in(member, 17, None)).await.unwrap();
        assert_eq!(outcome, InsertOutcome::Duplicate(first));
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn different_class_type_is_a_different_key() {
        let repo = InMemoryCheckInRepository::new();
        let member = MemberId::new();
        repo.insert(&check_in(member, 9, Some("gi"))).await.unwrap();
        let outcome = repo.insert(&check_in(member, 17, Some("no-gi"))).await.unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);
    }

    #[tokio::test]
    async fn concurrent_inserts_store_one_row() {
        let repo = InMemoryCheckInRepository::new();
        let member = MemberId::new();
        let a = check_in(member, 9, None);
        let b = check_in(member, 9, None);

        let (ra, rb) = tokio::join!(repo.insert(&a), repo.insert(&b));
        let outcomes = [ra.unwrap(), rb.unwrap()];
        let inserted = outcomes
            .iter()
            .filter(|o| matches!(o, InsertOutcome::Inserted))
            .count();
        assert_eq!(inserted, 1);
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn find_for_day_respects_bounds() {
        let repo = InMemoryCheckInRepository::new();
        let member = MemberId::new();
        repo.insert(&check_in(member, 9, None)).await.unwrap();

        let day = LocalDay::of(chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), Tz::UTC);
        assert_eq!(repo.find_for_day(&member, &day).await.unwrap().len(), 1);

        let next = LocalDay::of(chrono::NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(), Tz::UTC);
        assert!(repo.find_for_day(&member, &next).await.unwrap().is_empty());
    }
}
