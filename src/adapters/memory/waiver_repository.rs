//! In-memory waiver repository.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, MemberId};
use crate::domain::waiver::{latest_of_type, Waiver};
use crate::ports::WaiverRepository;

/// Append-only in-memory waiver storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWaiverRepository {
    waivers: Arc<RwLock<Vec<Waiver>>>,
}

impl InMemoryWaiverRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WaiverRepository for InMemoryWaiverRepository {
    async fn save(&self, waiver: &Waiver) -> Result<(), DomainError> {
        let mut waivers = self.waivers.write().await;
        if waivers.iter().any(|w| w.id == waiver.id) {
            return Err(DomainError::validation(
                "id",
                format!("waiver {} already exists", waiver.id),
            ));
        }
        waivers.push(waiver.clone());
        Ok(())
    }

    async fn find_latest_by_type(
        &self,
        member_id: &MemberId,
        waiver_type: &str,
    ) -> Result<Option<Waiver>, DomainError> {
        let waivers = self.waivers.read().await;
        Ok(latest_of_type(
            waivers.iter().filter(|w| &w.member_id == member_id),
            waiver_type,
        )
        .cloned())
    }

    async fn list_for_member(&self, member_id: &MemberId) -> Result<Vec<Waiver>, DomainError> {
        let mut waivers: Vec<Waiver> = self
            .waivers
            .read()
            .await
            .iter()
            .filter(|w| &w.member_id == member_id)
            .cloned()
            .collect();
        waivers.sort_by_key(|w| w.signed_at());
        Ok(waivers)
    }
}
