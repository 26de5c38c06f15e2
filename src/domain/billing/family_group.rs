//! Household billing group.

use chrono::NaiveDate;

use crate::domain::errors::EngineError;
use crate::domain::foundation::FamilyAccountId;
use crate::domain::member::Member;
use crate::domain::waiver::is_minor;

use super::MemberType;

/// Members sharing one `family_account_id`.
///
/// All billing for the group goes through the primary holder's processor
/// customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyGroup {
    family_account_id: FamilyAccountId,
    members: Vec<Member>,
    primary_index: usize,
}

impl FamilyGroup {
    /// Builds the group from its members.
    ///
    /// Fails when a member belongs to another household, when no member is
    /// primary, or when more than one is.
    pub fn from_members(
        family_account_id: FamilyAccountId,
        members: Vec<Member>,
    ) -> Result<Self, EngineError> {
        if members.is_empty() {
            return Err(EngineError::validation(
                "family_account_id",
                format!("family {} has no members", family_account_id),
            ));
        }

        if let Some(stray) = members
            .iter()
            .find(|m| m.family_account_id != Some(family_account_id))
        {
            return Err(EngineError::validation(
                "family_account_id",
                format!("member {} is not in family {}", stray.id, family_account_id),
            ));
        }

        let primaries: Vec<usize> = members
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_primary_account_holder)
            .map(|(i, _)| i)
            .collect();

        match primaries.as_slice() {
            [primary_index] => Ok(Self {
                family_account_id,
                members,
                primary_index: *primary_index,
            }),
            [] => Err(EngineError::validation(
                "is_primary_account_holder",
                format!("family {} has no primary account holder", family_account_id),
            )),
            _ => Err(EngineError::validation(
                "is_primary_account_holder",
                format!(
                    "family {} has {} primary account holders",
                    family_account_id,
                    primaries.len()
                ),
            )),
        }
    }

    pub fn family_account_id(&self) -> FamilyAccountId {
        self.family_account_id
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn primary(&self) -> &Member {
        &self.members[self.primary_index]
    }

    /// Processor customer every charge for this household routes through.
    pub fn billing_customer_id(&self) -> Option<&str> {
        self.primary().billing_customer_id.as_deref()
    }

    /// Pricing tier of each member, minors as kids.
    pub fn member_types(&self, today: NaiveDate, adult_age: i32) -> Vec<MemberType> {
        self.members
            .iter()
            .map(|m| {
                if is_minor(m.birth_date, today, adult_age) {
                    MemberType::Kid
                } else {
                    MemberType::Adult
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
