use tracing::debug;

use crate::{
    entities::analytics_event::{AnalyticsEventRecorded, NewAnalyticsEvent},
    errors::AppError,
    repositories::store::{to_record, ContentStore, Table},
};

pub struct AnalyticsHandler<S>
where
    S: ContentStore,
{
    pub store: S,
}

impl<S> AnalyticsHandler<S>
where
    S: ContentStore,
{
    pub fn new(store: S) -> Self {
        AnalyticsHandler { store }
    }

    pub async fn record(&self, event: NewAnalyticsEvent, user_agent: Option<String>) -> Result<AnalyticsEventRecorded, AppError> {
        let event = event.into_event(user_agent)?;
        self.store.insert(Table::AnalyticsEvents, to_record(&event)?).await?;

        debug!(event_id = %event.id, event_type = %event.event_type, "Analytics event recorded");
        Ok(AnalyticsEventRecorded { id: event.id })
    }
}
