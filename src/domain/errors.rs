//! Engine error taxonomy.
//!
//! Every fallible engine operation returns [`EngineError`]. Policy denials and
//! conflicts are expected, frequent outcomes and carry a stable reason code
//! plus a human-readable message; the request layer maps [`ErrorKind`] to a
//! transport status.
//!
//! # HTTP Status Mapping (request layer)
//!
//! | Kind | HTTP Status |
//! |------|-------------|
//! | NotFound | 404 |
//! | PolicyDenied | 403 |
//! | Conflict | 409 |
//! | ValidationFailure | 400 |
//! | UpstreamFailure | 502 |
//! | Infrastructure | 500 |

use std::fmt;

use crate::domain::check_in::DenialReason;
use crate::domain::foundation::{
    DomainError, ErrorCode, FamilyAccountId, MemberId, ValidationError,
};

/// Coarse category of an engine failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    PolicyDenied,
    Conflict,
    UpstreamFailure,
    ValidationFailure,
    Infrastructure,
}

/// Specific reason behind a `Conflict`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictReason {
    /// Another member already holds this alternate lookup key.
    DuplicateLookupKey { key: String },

    /// Member already belongs to a different family account.
    FamilyLinkExists {
        member_id: MemberId,
        family_account_id: FamilyAccountId,
    },

    /// Member has no live subscription left to cancel.
    AlreadyCancelled { member_id: MemberId },

    /// Member already has a live subscription.
    AlreadySubscribed { member_id: MemberId },

    /// Lifecycle transition not permitted from the current state.
    InvalidTransition { from: String, to: String },
}

impl ConflictReason {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConflictReason::DuplicateLookupKey { .. } => ErrorCode::DuplicateLookupKey,
            ConflictReason::FamilyLinkExists { .. } => ErrorCode::FamilyLinkExists,
            ConflictReason::AlreadyCancelled { .. } => ErrorCode::AlreadyCancelled,
            ConflictReason::AlreadySubscribed { .. } => ErrorCode::AlreadySubscribed,
            ConflictReason::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ConflictReason::DuplicateLookupKey { key } => {
                format!("Lookup key '{}' is already assigned to another member", key)
            }
            ConflictReason::FamilyLinkExists {
                member_id,
                family_account_id,
            } => format!(
                "Member {} is already linked to family account {}",
                member_id, family_account_id
            ),
            ConflictReason::AlreadyCancelled { member_id } => {
                format!("Member {} has no active subscription to cancel", member_id)
            }
            ConflictReason::AlreadySubscribed { member_id } => {
                format!("Member {} already has an active subscription", member_id)
            }
            ConflictReason::InvalidTransition { from, to } => {
                format!("Cannot move membership from {} to {}", from, to)
            }
        }
    }
}

/// Errors produced by the eligibility and compliance engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No member matched the lookup.
    MemberNotFound(String),

    /// Member exists but has no waiver of the requested type.
    WaiverNotFound {
        member_id: MemberId,
        waiver_type: String,
    },

    /// A check-in gate refused the member.
    PolicyDenied(DenialReason),

    /// Request conflicts with the current records.
    Conflict(ConflictReason),

    /// Payment processor call failed.
    UpstreamFailure {
        code: String,
        message: String,
        retryable: bool,
    },

    /// Malformed input.
    ValidationFailed { field: String, message: String },

    /// Storage port failure.
    Infrastructure(String),
}

impl EngineError {
    pub fn member_not_found(key: impl Into<String>) -> Self {
        EngineError::MemberNotFound(key.into())
    }

    pub fn waiver_not_found(member_id: MemberId, waiver_type: impl Into<String>) -> Self {
        EngineError::WaiverNotFound {
            member_id,
            waiver_type: waiver_type.into(),
        }
    }

    pub fn denied(reason: DenialReason) -> Self {
        EngineError::PolicyDenied(reason)
    }

    pub fn conflict(reason: ConflictReason) -> Self {
        EngineError::Conflict(reason)
    }

    pub fn upstream(code: impl Into<String>, message: impl Into<String>, retryable: bool) -> Self {
        EngineError::UpstreamFailure {
            code: code.into(),
            message: message.into(),
            retryable,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        EngineError::Infrastructure(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::MemberNotFound(_) | EngineError::WaiverNotFound { .. } => {
                ErrorKind::NotFound
            }
            EngineError::PolicyDenied(DenialReason::NotFound) => ErrorKind::NotFound,
            EngineError::PolicyDenied(_) => ErrorKind::PolicyDenied,
            EngineError::Conflict(_) => ErrorKind::Conflict,
            EngineError::UpstreamFailure { .. } => ErrorKind::UpstreamFailure,
            EngineError::ValidationFailed { .. } => ErrorKind::ValidationFailure,
            EngineError::Infrastructure(_) => ErrorKind::Infrastructure,
        }
    }

    /// Returns the stable reason code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::MemberNotFound(_) => ErrorCode::MemberNotFound,
            EngineError::WaiverNotFound { .. } => ErrorCode::WaiverNotFound,
            EngineError::PolicyDenied(reason) => reason.code(),
            EngineError::Conflict(reason) => reason.code(),
            EngineError::UpstreamFailure { .. } => ErrorCode::PaymentProviderError,
            EngineError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            EngineError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing message.
    pub fn message(&self) -> String {
        match self {
            EngineError::MemberNotFound(key) => format!("No member found for '{}'", key),
            EngineError::WaiverNotFound {
                member_id,
                waiver_type,
            } => format!("Member {} has no {} waiver on file", member_id, waiver_type),
            EngineError::PolicyDenied(reason) => reason.message().to_string(),
            EngineError::Conflict(reason) => reason.message(),
            EngineError::UpstreamFailure { code, message, .. } => {
                format!("Payment processor error ({}): {}", code, message)
            }
            EngineError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            EngineError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::Infrastructure(_) => true,
            EngineError::UpstreamFailure { retryable, .. } => *retryable,
            _ => false,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for EngineError {}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => EngineError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::DuplicateLookupKey => {
                EngineError::Conflict(ConflictReason::DuplicateLookupKey {
                    key: err
                        .details
                        .get("key")
                        .cloned()
                        .unwrap_or_else(|| err.message.clone()),
                })
            }
            ErrorCode::MemberNotFound => EngineError::MemberNotFound(err.message),
            _ => EngineError::Infrastructure(err.to_string()),
        }
    }
}
