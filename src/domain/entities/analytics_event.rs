use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{entities::locale::Locale, errors::AppError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub event_type: String,
    pub page_path: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub locale: Option<Locale>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewAnalyticsEvent {
    #[validate(length(min = 1, max = 64))]
    pub event_type: String,

    #[validate(length(max = 512))]
    pub page_path: Option<String>,

    #[validate(length(max = 1024))]
    pub referrer: Option<String>,

    pub locale: Option<Locale>,

    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl NewAnalyticsEvent {
    /// The user agent comes from the request headers, not the body.
    pub fn into_event(self, user_agent: Option<String>) -> Result<AnalyticsEvent, AppError> {
        self.validate()?;

        Ok(AnalyticsEvent {
            id: Uuid::new_v4(),
            event_type: self.event_type.trim().to_string(),
            page_path: self.page_path,
            referrer: self.referrer,
            user_agent,
            locale: self.locale,
            metadata: self.metadata,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsEventRecorded {
    pub id: Uuid,
}
