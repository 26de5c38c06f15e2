//! Check-in record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CheckInId, MemberId, Timestamp};

/// How the member was checked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInMethod {
    Kiosk,
    Qr,
    Admin,
    MemberCode,
    Phone,
}

impl CheckInMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckInMethod::Kiosk => "kiosk",
            CheckInMethod::Qr => "qr",
            CheckInMethod::Admin => "admin",
            CheckInMethod::MemberCode => "member_code",
            CheckInMethod::Phone => "phone",
        }
    }
}

/// Storage uniqueness key: one check-in per member, local date and class type.
///
/// A check-in without a class type (or with a blank one) is its own bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckInKey {
    pub member_id: MemberId,
    pub local_date: NaiveDate,
    pub class_type: Option<String>,
}

/// A recorded attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: CheckInId,
    pub member_id: MemberId,
    pub checked_in_at: Timestamp,
    /// Facility-local date of `checked_in_at`.
    pub local_date: NaiveDate,
    pub check_in_method: CheckInMethod,
    pub class_id: Option<String>,
    pub class_type: Option<String>,
    pub notes: Option<String>,
}

impl CheckIn {
    pub fn new(
        member_id: MemberId,
        checked_in_at: Timestamp,
        local_date: NaiveDate,
        check_in_method: CheckInMethod,
    ) -> Self {
        Self {
            id: CheckInId::new(),
            member_id,
            checked_in_at,
            local_date,
            check_in_method,
            class_id: None,
            class_type: None,
            notes: None,
        }
    }

    pub fn with_class(mut self, class_id: Option<String>, class_type: Option<String>) -> Self {
        self.class_id = class_id;
        self.class_type = class_slot(class_type.as_deref());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn key(&self) -> CheckInKey {
        CheckInKey {
            member_id: self.member_id,
            local_date: self.local_date,
            class_type: self.class_type.clone(),
        }
    }

    /// Returns true if this check-in occupies the same slot as `class_type`.
    pub fn same_class(&self, class_type: Option<&str>) -> bool {
        self.class_type.as_deref() == class_slot(class_type).as_deref()
    }
}

/// Class types compare trimmed and case-insensitively.
pub fn normalize_class_type(class_type: &str) -> String {
    class_type.trim().to_lowercase()
}

/// Slot a class type occupies; a blank type is open gym, same as none.
pub fn class_slot(class_type: Option<&str>) -> Option<String> {
    class_type
        .map(normalize_class_type)
        .filter(|t| !t.is_empty())
}
