use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    errors::AppError,
    infrastructure::cache::Identified,
    lifecycle::{ContactStatus, StatusChange},
    repositories::store::Record,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: ContactStatus,
    pub replied_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Identified for ContactSubmission {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Public contact form body.
#[derive(Debug, Deserialize, Validate)]
pub struct NewContactSubmission {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 5, max = 2000))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactSubmissionInsert {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: ContactStatus,
    pub replied_at: Option<DateTime<Utc>>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NewContactSubmission> for ContactSubmissionInsert {
    type Error = AppError;

    fn try_from(value: NewContactSubmission) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(ContactSubmissionInsert {
            id: Uuid::new_v4(),
            name: value.name.trim().to_string(),
            email: value.email.trim().to_string(),
            message: value.message,
            status: ContactStatus::New,
            replied_at: None,
            notes: String::new(),
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ContactSubmissionCreated {
    pub id: Uuid,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: ContactStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NotesUpdateRequest {
    #[validate(length(max = 5000))]
    pub notes: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactListQuery {
    /// `all` or one of the statuses; absent means `all`.
    pub status: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

impl ContactListQuery {
    pub fn status_filter(&self) -> Result<Option<ContactStatus>, AppError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(value) => value
                .parse::<ContactStatus>()
                .map(Some)
                .map_err(|e| AppError::field("status", &e)),
        }
    }
}

impl StatusChange {
    pub fn to_changes(&self) -> Record {
        let mut changes = Record::new();
        changes.insert("status".into(), serde_json::Value::String(self.status.as_str().to_string()));
        changes.insert("replied_at".into(), serde_json::json!(self.replied_at));
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_accepts_all_and_statuses() {
        let query = |s: Option<&str>| ContactListQuery { status: s.map(String::from), refresh: false };

        assert_eq!(query(None).status_filter().unwrap(), None);
        assert_eq!(query(Some("all")).status_filter().unwrap(), None);
        assert_eq!(query(Some("replied")).status_filter().unwrap(), Some(ContactStatus::Replied));
        assert!(query(Some("spam")).status_filter().is_err());
    }

    #[test]
    fn new_submission_starts_as_new_with_empty_notes() {
        let insert = ContactSubmissionInsert::try_from(NewContactSubmission {
            name: " Layla ".into(),
            email: "layla@example.com".into(),
            message: "I need a translation of a short paper.".into(),
        })
        .unwrap();

        assert_eq!(insert.status, ContactStatus::New);
        assert_eq!(insert.notes, "");
        assert_eq!(insert.name, "Layla");
        assert!(insert.replied_at.is_none());
    }

    #[test]
    fn short_message_is_rejected() {
        let result = ContactSubmissionInsert::try_from(NewContactSubmission {
            name: "Sam".into(),
            email: "sam@example.com".into(),
            message: "hi".into(),
        });
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
