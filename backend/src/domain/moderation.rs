//! Content flags raised by listeners and reviewed by moderators.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Error, ItemKind, ItemRef, UserId};

/// Review state of a content flag.
///
/// Flags start `Pending`. Review may set any of the three states, including
/// moving a reviewed flag back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagStatus {
    Pending,
    Approved,
    Rejected,
}

impl FlagStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for FlagStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlagStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(Error::invalid_status(format!(
                "status must be approved, rejected, or pending, got {other}"
            ))),
        }
    }
}

/// Parse a flag target kind, mapping anything else to `InvalidTargetKind`.
pub fn parse_flag_target_kind(raw: &str) -> Result<ItemKind, Error> {
    raw.trim()
        .to_lowercase()
        .parse::<ItemKind>()
        .map_err(|err| Error::invalid_target_kind(err.to_string()))
}

/// Maximum length of a flag reason.
pub const FLAG_REASON_MAX: usize = 255;

/// Unvalidated flag submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSubmission {
    pub reporter_id: UserId,
    pub target_kind: String,
    pub target_id: Uuid,
    pub reason: String,
    pub description: Option<String>,
}

/// A recorded content flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFlag {
    pub id: Uuid,
    pub reporter_id: UserId,
    pub target: ItemRef,
    pub reason: String,
    pub description: Option<String>,
    pub status: FlagStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentFlag {
    /// Open a pending flag against `target`.
    pub fn open(
        reporter_id: UserId,
        target: ItemRef,
        reason: &str,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, Error> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(Error::invalid_request("reason must not be empty"));
        }
        if reason.chars().count() > FLAG_REASON_MAX {
            return Err(Error::invalid_request(format!(
                "reason must be at most {FLAG_REASON_MAX} characters"
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            reporter_id,
            target,
            reason: reason.to_owned(),
            description: description.filter(|text| !text.trim().is_empty()),
            status: FlagStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}
