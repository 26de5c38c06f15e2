//! Waiver record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MemberId, Timestamp, WaiverId};

/// Waiver type required for check-in.
pub const LIABILITY_WAIVER: &str = "liability";

/// Who signed the waiver on the subject's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignerRelationship {
    /// The subject signed for themselves.
    #[serde(rename = "self")]
    SelfSigned,
    Parent,
    Guardian,
}

impl SignerRelationship {
    /// Returns true if an adult signed for a minor subject.
    pub fn signed_for_minor(&self) -> bool {
        matches!(self, SignerRelationship::Parent | SignerRelationship::Guardian)
    }
}

/// Capture details recorded alongside the signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureMetadata {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A signed liability-consent record.
///
/// `signed_at` has no setter: renewed consent is a new waiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waiver {
    pub id: WaiverId,
    pub member_id: MemberId,
    pub waiver_type: String,
    pub signer_name: String,
    pub signer_relationship: SignerRelationship,
    /// Opaque signature payload (e.g. a data URL of the drawn signature).
    pub signature_data: String,
    signed_at: Timestamp,
    /// Explicit expiry recorded at signing, if any.
    pub expires_at: Option<Timestamp>,
    pub capture: CaptureMetadata,
}

impl Waiver {
    pub fn new(
        member_id: MemberId,
        waiver_type: impl Into<String>,
        signer_name: impl Into<String>,
        signer_relationship: SignerRelationship,
        signature_data: impl Into<String>,
        signed_at: Timestamp,
    ) -> Self {
        Self {
            id: WaiverId::new(),
            member_id,
            waiver_type: waiver_type.into(),
            signer_name: signer_name.into(),
            signer_relationship,
            signature_data: signature_data.into(),
            signed_at,
            expires_at: None,
            capture: CaptureMetadata::default(),
        }
    }

    pub fn with_expires_at(mut self, expires_at: Timestamp) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn with_capture(mut self, capture: CaptureMetadata) -> Self {
        self.capture = capture;
        self
    }

    pub fn signed_at(&self) -> Timestamp {
        self.signed_at
    }

    pub fn is_type(&self, waiver_type: &str) -> bool {
        self.waiver_type.eq_ignore_ascii_case(waiver_type)
    }
}

/// Picks the governing waiver: the most recently signed one of the given type.
pub fn latest_of_type<'a, I>(waivers: I, waiver_type: &str) -> Option<&'a Waiver>
where
    I: IntoIterator<Item = &'a Waiver>,
{
    waivers
        .into_iter()
        .filter(|w| w.is_type(waiver_type))
        .max_by_key(|w| w.signed_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
    }

    fn waiver(member_id: MemberId, waiver_type: &str, signed: Timestamp) -> Waiver {
        Waiver::new(
            member_id,
            waiver_type,
            "Ana Silva",
            SignerRelationship::SelfSigned,
            "data:image/png;base64,AAAA",
            signed,
        )
    }

    #[test]
    fn relationship_serializes_self_keyword() {
        let json = serde_json::to_string(&SignerRelationship::SelfSigned).unwrap();
        assert_eq!(json, "\"self\"");
        let parsed: SignerRelationship = serde_json::from_str("\"guardian\"").unwrap();
        assert_eq!(parsed, SignerRelationship::Guardian);
    }

    #[test]
    fn parent_and_guardian_sign_for_minors() {
        assert!(SignerRelationship::Parent.signed_for_minor());
        assert!(SignerRelationship::Guardian.signed_for_minor());
        assert!(!SignerRelationship::SelfSigned.signed_for_minor());
    }

    #[test]
    fn latest_of_type_picks_most_recent_signature() {
        let member = MemberId::new();
        let waivers = vec![
            waiver(member, LIABILITY_WAIVER, at(2023, 1, 1)),
            waiver(member, LIABILITY_WAIVER, at(2024, 1, 1)),
            waiver(member, "photo_release", at(2024, 6, 1)),
        ];

        let latest = latest_of_type(&waivers, LIABILITY_WAIVER).unwrap();
        assert_eq!(latest.signed_at(), at(2024, 1, 1));
    }

    #[test]
    fn latest_of_type_is_none_without_matching_type() {
        let waivers = vec![waiver(MemberId::new(), "photo_release", at(2024, 1, 1))];
        assert!(latest_of_type(&waivers, LIABILITY_WAIVER).is_none());
    }

    #[test]
    fn type_match_is_case_insensitive() {
        let w = waiver(MemberId::new(), "Liability", at(2024, 1, 1));
        assert!(w.is_type(LIABILITY_WAIVER));
    }
}
