//! Billing member types and household rosters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Pricing tier of one household member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberType {
    Adult,
    Kid,
}

impl MemberType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberType::Adult => "adult",
            MemberType::Kid => "kid",
        }
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adult" => Ok(MemberType::Adult),
            "kid" | "child" => Ok(MemberType::Kid),
            other => Err(ValidationError::invalid_format(
                "member_type",
                format!("unknown member type '{}'", other),
            )),
        }
    }
}

/// Parses an ordered list of tags, failing on the first unknown one.
pub fn parse_member_types<S: AsRef<str>>(tags: &[S]) -> Result<Vec<MemberType>, ValidationError> {
    tags.iter().map(|t| t.as_ref().parse()).collect()
}

/// One named household member awaiting a quote or signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub member_type: MemberType,
}

/// Ordered household roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyRoster {
    entries: Vec<RosterEntry>,
}

impl FamilyRoster {
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        Self { entries }
    }

    /// Builds a roster from parallel name and tag arrays.
    ///
    /// Arrays of different lengths are rejected rather than truncated.
    pub fn from_parallel<N, T>(names: &[N], tags: &[T]) -> Result<Self, ValidationError>
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        if names.len() != tags.len() {
            return Err(ValidationError::invalid_format(
                "family_members",
                format!(
                    "{} names but {} member types",
                    names.len(),
                    tags.len()
                ),
            ));
        }

        let mut entries = Vec::with_capacity(names.len());
        for (name, tag) in names.iter().zip(tags) {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(ValidationError::empty_field("family_members.name"));
            }
            entries.push(RosterEntry {
                name: name.to_string(),
                member_type: tag.as_ref().parse()?,
            });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn member_types(&self) -> Vec<MemberType> {
        self.entries.iter().map(|e| e.member_type).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
