use chrono::{DateTime, Utc};
use serde::Serialize;

/// Publish state of a blog post, folded from the `published` and
/// `published_at` columns.
///
/// A draft remembers when it was first published so that publishing it again
/// keeps the original date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Publication {
    Draft { first_published_at: Option<DateTime<Utc>> },
    Published { at: DateTime<Utc> },
}

impl Publication {
    /// `fallback` stands in for a row flagged published without a timestamp.
    pub fn from_columns(
        published: bool,
        published_at: Option<DateTime<Utc>>,
        fallback: DateTime<Utc>,
    ) -> Self {
        if published {
            Publication::Published { at: published_at.unwrap_or(fallback) }
        } else {
            Publication::Draft { first_published_at: published_at }
        }
    }

    pub fn columns(&self) -> (bool, Option<DateTime<Utc>>) {
        match *self {
            Publication::Draft { first_published_at } => (false, first_published_at),
            Publication::Published { at } => (true, Some(at)),
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, Publication::Published { .. })
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.columns().1
    }

    pub fn publish(self, now: DateTime<Utc>) -> Self {
        match self {
            Publication::Published { .. } => self,
            Publication::Draft { first_published_at } => Publication::Published {
                at: first_published_at.unwrap_or(now),
            },
        }
    }

    pub fn unpublish(self) -> Self {
        match self {
            Publication::Published { at } => Publication::Draft { first_published_at: Some(at) },
            draft => draft,
        }
    }

    pub fn set(self, published: bool, now: DateTime<Utc>) -> Self {
        if published { self.publish(now) } else { self.unpublish() }
    }

    pub fn toggle(self, now: DateTime<Utc>) -> Self {
        let published = !self.is_published();
        self.set(published, now)
    }
}

impl Default for Publication {
    fn default() -> Self {
        Publication::Draft { first_published_at: None }
    }
}
