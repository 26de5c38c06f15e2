//! Member resolver chain.
//!
//! Kiosk input is a single string that may be a scanned QR payload, a
//! member code, a short numeric id, an email, or the last digits of a phone
//! number. Strategies run in order and the first one that finds a member
//! wins; exact keys come before the fuzzy phone-suffix match.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::EngineError;
use crate::domain::foundation::MemberId;
use crate::domain::member::{Member, MemberStatus};
use crate::ports::MemberRepository;

/// Number of trailing phone digits accepted as a lookup key.
pub const PHONE_SUFFIX_DIGITS: usize = 4;

/// One lookup strategy.
#[async_trait]
pub trait MemberResolver: Send + Sync {
    /// Strategy name for logs.
    fn name(&self) -> &'static str;

    /// Returns the member for `input`, or `None` if this strategy does not
    /// apply or finds nothing.
    async fn resolve(
        &self,
        members: &dyn MemberRepository,
        input: &str,
    ) -> Result<Option<Member>, EngineError>;
}

/// Internal id, for staff tools that already know it.
pub struct IdResolver;

#[async_trait]
impl MemberResolver for IdResolver {
    fn name(&self) -> &'static str {
        "id"
    }

    async fn resolve(
        &self,
        members: &dyn MemberRepository,
        input: &str,
    ) -> Result<Option<Member>, EngineError> {
        match input.parse::<MemberId>() {
            Ok(id) => Ok(members.find_by_id(&id).await?),
            Err(_) => Ok(None),
        }
    }
}

pub struct QrCodeResolver;

#[async_trait]
impl MemberResolver for QrCodeResolver {
    fn name(&self) -> &'static str {
        "qr_code"
    }

    async fn resolve(
        &self,
        members: &dyn MemberRepository,
        input: &str,
    ) -> Result<Option<Member>, EngineError> {
        Ok(members.find_by_qr_code(input).await?)
    }
}

pub struct MemberCodeResolver;

#[async_trait]
impl MemberResolver for MemberCodeResolver {
    fn name(&self) -> &'static str {
        "member_code"
    }

    async fn resolve(
        &self,
        members: &dyn MemberRepository,
        input: &str,
    ) -> Result<Option<Member>, EngineError> {
        Ok(members.find_by_member_code(input).await?)
    }
}

/// Short numeric id, optionally written with a leading `#`.
pub struct ShortIdResolver;

#[async_trait]
impl MemberResolver for ShortIdResolver {
    fn name(&self) -> &'static str {
        "short_id"
    }

    async fn resolve(
        &self,
        members: &dyn MemberRepository,
        input: &str,
    ) -> Result<Option<Member>, EngineError> {
        match input.trim_start_matches('#').parse::<u32>() {
            Ok(short_id) => Ok(members.find_by_short_id(short_id).await?),
            Err(_) => Ok(None),
        }
    }
}

pub struct EmailResolver;

#[async_trait]
impl MemberResolver for EmailResolver {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn resolve(
        &self,
        members: &dyn MemberRepository,
        input: &str,
    ) -> Result<Option<Member>, EngineError> {
        if !input.contains('@') {
            return Ok(None);
        }
        Ok(members.find_by_email(input).await?)
    }
}

/// Last digits of a phone number.
///
/// Several matches are narrowed to active members when any of them is
/// active; if more than one remains, the input is ambiguous and the caller
/// must ask for another key.
pub struct PhoneSuffixResolver;

#[async_trait]
impl MemberResolver for PhoneSuffixResolver {
    fn name(&self) -> &'static str {
        "phone_suffix"
    }

    async fn resolve(
        &self,
        members: &dyn MemberRepository,
        input: &str,
    ) -> Result<Option<Member>, EngineError> {
        if input.len() != PHONE_SUFFIX_DIGITS || !input.chars().all(|c| c.is_ascii_digit()) {
            return Ok(None);
        }

        let mut matches = members.find_by_phone_suffix(input).await?;
        if matches.len() > 1 && matches.iter().any(|m| m.status == MemberStatus::Active) {
            matches.retain(|m| m.status == MemberStatus::Active);
        }

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(EngineError::validation(
                "lookup",
                format!("{} members share phone digits {}; use another key", n, input),
            )),
        }
    }
}

/// Ordered list of resolvers over one member repository.
pub struct MemberResolverChain {
    members: Arc<dyn MemberRepository>,
    resolvers: Vec<Box<dyn MemberResolver>>,
}

impl MemberResolverChain {
    pub fn new(members: Arc<dyn MemberRepository>, resolvers: Vec<Box<dyn MemberResolver>>) -> Self {
        Self { members, resolvers }
    }

    /// id, QR code, member code, short id, email, phone suffix.
    pub fn standard(members: Arc<dyn MemberRepository>) -> Self {
        Self::new(
            members,
            vec![
                Box::new(IdResolver),
                Box::new(QrCodeResolver),
                Box::new(MemberCodeResolver),
                Box::new(ShortIdResolver),
                Box::new(EmailResolver),
                Box::new(PhoneSuffixResolver),
            ],
        )
    }

    pub fn repository(&self) -> &Arc<dyn MemberRepository> {
        &self.members
    }

    /// Runs the strategies in order.
    pub async fn resolve(&self, input: &str) -> Result<Option<Member>, EngineError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(EngineError::validation("lookup", "lookup key is empty"));
        }

        for resolver in &self.resolvers {
            if let Some(member) = resolver.resolve(self.members.as_ref(), input).await? {
                tracing::debug!(strategy = resolver.name(), member_id = %member.id, "member resolved");
                return Ok(Some(member));
            }
        }
        Ok(None)
    }
}
