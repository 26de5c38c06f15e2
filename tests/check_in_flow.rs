//! Integration tests for the check-in flow.
//!
//! These tests verify the end-to-end path a kiosk takes:
//! 1. Member is resolved from whatever key was scanned or typed
//! 2. Waiver is signed through the waiver handler
//! 3. Eligibility gate admits or denies
//! 4. Check-in row is recorded once per local day
//!
//! Uses in-memory adapters to test the flow without external dependencies.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use gym_ops::adapters::{InMemoryCheckInRepository, InMemoryMemberRepository, InMemoryWaiverRepository};
use gym_ops::application::handlers::check_in::{
    CheckInMemberCommand, CheckInMemberHandler, CheckInOutcome, GetWaiverStatusHandler,
    GetWaiverStatusQuery, MemberRef, MemberResolverChain, SignWaiverCommand, SignWaiverHandler,
};
use gym_ops::domain::check_in::{CheckInMethod, EligibilityGate};
use gym_ops::domain::errors::ErrorKind;
use gym_ops::domain::foundation::{ErrorCode, MemberId, Timestamp};
use gym_ops::domain::member::{Member, MemberStatus, PaymentStatus};
use gym_ops::domain::waiver::{CaptureMetadata, Severity, SignerRelationship, WaiverPolicy};
use gym_ops::ports::MemberRepository;

// =============================================================================
// Test Infrastructure
// =============================================================================

const DENVER: Tz = chrono_tz::America::Denver;

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
    Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap())
}

struct Desk {
    members: Arc<InMemoryMemberRepository>,
    check_ins: Arc<InMemoryCheckInRepository>,
    check_in: CheckInMemberHandler,
    sign: SignWaiverHandler,
    status: GetWaiverStatusHandler,
}

impl Desk {
    fn new() -> Self {
        let members = Arc::new(InMemoryMemberRepository::new());
        let waivers = Arc::new(InMemoryWaiverRepository::new());
        let check_ins = Arc::new(InMemoryCheckInRepository::new());
        let policy = WaiverPolicy::default();

        let resolver = Arc::new(MemberResolverChain::standard(members.clone()));
        let check_in = CheckInMemberHandler::new(
            resolver,
            waivers.clone(),
            check_ins.clone(),
            EligibilityGate::new(policy.clone(), DENVER),
        );
        let sign = SignWaiverHandler::new(members.clone(), waivers.clone(), policy.clone());
        let status = GetWaiverStatusHandler::new(members.clone(), waivers, policy);

        Self {
            members,
            check_ins,
            check_in,
            sign,
            status,
        }
    }

    async fn enrol(&self, name: &str, birth_date: Option<NaiveDate>) -> Member {
        let mut member = Member::new(
            MemberId::new(),
            name,
            format!("{}@example.com", name.to_lowercase()),
            "bjj",
            utc(2023, 1, 1, 0, 0),
        );
        member.status = MemberStatus::Active;
        member.payment_status = PaymentStatus::Active;
        member.birth_date = birth_date;
        member.qr_code = Some(format!("QR-{}", name.to_uppercase()));
        member.phone = Some("(303) 555-0147".to_string());
        self.members.save(&member).await.unwrap();
        member
    }

    async fn sign(&self, member: &Member, relationship: SignerRelationship, at: Timestamp) {
        self.sign
            .handle(SignWaiverCommand {
                member_id: member.id,
                waiver_type: None,
                signer_name: "Signer".to_string(),
                signer_relationship: relationship,
                signature_data: "data:image/png;base64,AAAA".to_string(),
                capture: CaptureMetadata::default(),
                now: at,
            })
            .await
            .unwrap();
    }

    fn command(&self, key: &str, at: Timestamp) -> CheckInMemberCommand {
        CheckInMemberCommand {
            member: MemberRef::Lookup(key.to_string()),
            method: CheckInMethod::Kiosk,
            class_id: None,
            class_type: None,
            notes: None,
            now: at,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn double_scan_admits_once_per_local_day() {
    let desk = Desk::new();
    let member = desk.enrol("Kai", None).await;
    desk.sign(&member, SignerRelationship::SelfSigned, utc(2024, 1, 10, 17, 0))
        .await;

    let first = desk
        .check_in
        .handle(desk.command("QR-KAI", utc(2024, 6, 1, 15, 0)))
        .await
        .unwrap();
    let second = desk
        .check_in
        .handle(desk.command("QR-KAI", utc(2024, 6, 1, 18, 0)))
        .await
        .unwrap();

    assert!(matches!(first.outcome, CheckInOutcome::Admitted(_)));
    assert!(matches!(second.outcome, CheckInOutcome::AlreadyCheckedIn(_)));
    assert_eq!(first.outcome.check_in().id, second.outcome.check_in().id);
    assert_eq!(desk.check_ins.count().await, 1);
}

#[tokio::test]
async fn local_midnight_starts_a_new_day() {
    let desk = Desk::new();
    let member = desk.enrol("Lee", None).await;
    desk.sign(&member, SignerRelationship::SelfSigned, utc(2024, 1, 10, 17, 0))
        .await;

    // 23:30 and 00:30 Denver time, same UTC date
    let late = desk
        .check_in
        .handle(desk.command("0147", utc(2024, 6, 2, 5, 30)))
        .await
        .unwrap();
    let early = desk
        .check_in
        .handle(desk.command("0147", utc(2024, 6, 2, 6, 30)))
        .await
        .unwrap();

    assert!(late.outcome.is_new());
    assert!(early.outcome.is_new());
    assert_eq!(
        late.outcome.check_in().local_date,
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    );
    assert_eq!(
        early.outcome.check_in().local_date,
        NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
    );
    assert_eq!(desk.check_ins.count().await, 2);
}

#[tokio::test]
async fn inactive_member_is_denied_before_waiver_check() {
    let desk = Desk::new();
    let mut member = desk.enrol("Max", None).await;
    member.status = MemberStatus::Inactive;
    desk.members.update(&member).await.unwrap();

    let err = desk
        .check_in
        .handle(desk.command("max@example.com", utc(2024, 6, 1, 15, 0)))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PolicyDenied);
    assert_eq!(err.code(), ErrorCode::InactiveMembership);
    assert_eq!(desk.check_ins.count().await, 0);
}

#[tokio::test]
async fn unknown_key_is_not_found_denial() {
    let desk = Desk::new();
    let err = desk
        .check_in
        .handle(desk.command("QR-NOBODY", utc(2024, 6, 1, 15, 0)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn member_who_turned_adult_must_re_sign() {
    let desk = Desk::new();
    let member = desk
        .enrol("Nia", NaiveDate::from_ymd_opt(2006, 1, 1))
        .await;
    desk.sign(&member, SignerRelationship::Parent, utc(2023, 6, 1, 16, 0))
        .await;
    let now = utc(2024, 5, 2, 15, 0);

    let status = desk
        .status
        .handle(GetWaiverStatusQuery {
            member_id: member.id,
            now,
        })
        .await
        .unwrap();
    assert!(status.status.turned_adult);
    assert!(status.status.window_valid);
    assert!(!status.status.is_valid);
    assert_eq!(status.status.warning.severity, Severity::Critical);

    let err = desk
        .check_in
        .handle(desk.command("QR-NIA", now))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::WaiverInvalidOrMissing);

    desk.sign(&member, SignerRelationship::SelfSigned, now).await;
    let admitted = desk
        .check_in
        .handle(desk.command("QR-NIA", now.add_secs(60)))
        .await
        .unwrap();
    assert!(admitted.outcome.is_new());
    assert!(admitted.waiver.map(|w| w.is_valid).unwrap_or(false));
}

#[tokio::test]
async fn missing_waiver_is_denied() {
    let desk = Desk::new();
    desk.enrol("Oli", None).await;

    let err = desk
        .check_in
        .handle(desk.command("QR-OLI", utc(2024, 6, 1, 15, 0)))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::WaiverInvalidOrMissing);
}
