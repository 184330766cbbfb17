use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::contact_submission::{
        ContactListQuery, ContactSubmission, ContactSubmissionCreated, ContactSubmissionInsert,
        NewContactSubmission, NotesUpdateRequest,
    },
    errors::AppError,
    infrastructure::cache::EntityCache,
    lifecycle::{contact_status, ContactStatus},
    repositories::store::{
        fetch_all, fetch_by_id, insert_as, update_as, ContentStore, Record, SelectQuery, Table,
    },
};

pub struct ContactHandler<S>
where
    S: ContentStore,
{
    pub store: S,
    cache: EntityCache<ContactSubmission>,
}

impl<S> ContactHandler<S>
where
    S: ContentStore,
{
    pub fn new(store: S) -> Self {
        ContactHandler { store, cache: EntityCache::new("contact_submissions") }
    }

    async fn load_all(&self) -> Result<Vec<ContactSubmission>, AppError> {
        let query = SelectQuery::from(Table::ContactSubmissions).order_desc("created_at");
        fetch_all(&self.store, &query).await
    }

    async fn require(&self, id: Uuid) -> Result<ContactSubmission, AppError> {
        fetch_by_id(&self.store, Table::ContactSubmissions, id)
            .await?
            .ok_or_else(|| AppError::Store(format!("no contact submission with id {}", id)))
    }

    /// Public contact form intake.
    pub async fn submit(&self, request: NewContactSubmission) -> Result<ContactSubmissionCreated, AppError> {
        let insert = ContactSubmissionInsert::try_from(request)?;
        let submission: ContactSubmission = insert_as(&self.store, Table::ContactSubmissions, &insert).await?;

        info!(submission_id = %submission.id, "Contact submission received");
        if self.cache.is_loaded() {
            self.cache.refresh_with(|| self.load_all()).await;
        }

        Ok(ContactSubmissionCreated {
            id: submission.id,
            message: "Your message has been received.".to_string(),
        })
    }

    /// Newest first, optionally narrowed to one status.
    pub async fn admin_list(&self, query: &ContactListQuery) -> Result<Vec<ContactSubmission>, AppError> {
        let status = query.status_filter()?;
        let submissions = self.cache.list_or_load(query.refresh, || self.load_all()).await?;

        Ok(submissions
            .into_iter()
            .filter(|s| status.is_none_or(|wanted| s.status == wanted))
            .collect())
    }

    /// Moves a submission through the status machine. Asking for the status
    /// it already has writes nothing.
    pub async fn change_status(&self, id: Uuid, next: ContactStatus) -> Result<ContactSubmission, AppError> {
        let current = self.require(id).await?;
        let change = contact_status::transition(current.status, current.replied_at, next, Utc::now())?;

        if !change.changed {
            return Ok(current);
        }

        if current.status == ContactStatus::Archived {
            info!(submission_id = %id, to = %next, "Archived contact submission reopened");
        }

        let submission: ContactSubmission =
            update_as(&self.store, Table::ContactSubmissions, id, change.to_changes()).await?;

        info!(
            submission_id = %id,
            from = %current.status,
            to = %submission.status,
            stamped_reply = change.stamped_reply,
            "Contact submission status changed"
        );
        self.cache.refresh_with(|| self.load_all()).await;
        Ok(submission)
    }

    pub async fn update_notes(&self, id: Uuid, request: NotesUpdateRequest) -> Result<ContactSubmission, AppError> {
        request.validate()?;

        let mut changes = Record::new();
        changes.insert("notes".into(), json!(request.notes));
        let submission: ContactSubmission = update_as(&self.store, Table::ContactSubmissions, id, changes).await?;

        self.cache.refresh_with(|| self.load_all()).await;
        Ok(submission)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.store.delete(Table::ContactSubmissions, id).await?;

        info!(submission_id = %id, "Contact submission deleted");
        self.cache.refresh_with(|| self.load_all()).await;
        Ok(())
    }
}
