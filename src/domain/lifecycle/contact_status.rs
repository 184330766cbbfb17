use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lifecycle::LifecycleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    New,
    Read,
    Replied,
    Archived,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Read => "read",
            ContactStatus::Replied => "replied",
            ContactStatus::Archived => "archived",
        }
    }

    /// `read` is only reachable from `new`, `replied` and `archived` from
    /// anywhere, and nothing goes back to `new`. Staying put is always allowed.
    pub fn can_transition_to(self, next: ContactStatus) -> bool {
        match (self, next) {
            (current, next) if current == next => true,
            (_, ContactStatus::New) => false,
            (ContactStatus::New, ContactStatus::Read) => true,
            (_, ContactStatus::Read) => false,
            (_, ContactStatus::Replied) | (_, ContactStatus::Archived) => true,
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(ContactStatus::New),
            "read" => Ok(ContactStatus::Read),
            "replied" => Ok(ContactStatus::Replied),
            "archived" => Ok(ContactStatus::Archived),
            other => Err(format!("unknown contact status '{}'", other)),
        }
    }
}

/// Column values after a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub status: ContactStatus,
    pub replied_at: Option<DateTime<Utc>>,
    /// False when the submission already had the requested status.
    pub changed: bool,
    /// True when `replied_at` got stamped by this transition.
    pub stamped_reply: bool,
}

/// Computes the next `(status, replied_at)` pair.
///
/// `replied_at` is stamped on the first entry into `replied` and is never
/// cleared or restamped afterwards.
pub fn transition(
    current: ContactStatus,
    replied_at: Option<DateTime<Utc>>,
    next: ContactStatus,
    now: DateTime<Utc>,
) -> Result<StatusChange, LifecycleError> {
    if !current.can_transition_to(next) {
        return Err(LifecycleError::IllegalTransition { from: current, to: next });
    }

    if current == next {
        return Ok(StatusChange { status: current, replied_at, changed: false, stamped_reply: false });
    }

    let stamped_reply = next == ContactStatus::Replied && replied_at.is_none();
    let replied_at = if stamped_reply { Some(now) } else { replied_at };

    Ok(StatusChange { status: next, replied_at, changed: true, stamped_reply })
}
