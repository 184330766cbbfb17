//! State rules for the four content kinds.
//!
//! Everything in here is pure: callers load the current record, ask the
//! lifecycle for the next column values and write those back to the store.

use derive_more::Display;

pub mod contact_status;
pub mod moderation;
pub mod publication;
pub mod slug;
pub mod tags;

pub use contact_status::{ContactStatus, StatusChange};
pub use moderation::Moderation;
pub use publication::Publication;
pub use slug::{derive_slug, resolve_slug, resolve_slug_for_update};
pub use tags::{join_tags, parse_tags, TagInput};

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[display("cannot move a contact submission from '{from}' to '{to}'")]
    IllegalTransition { from: ContactStatus, to: ContactStatus },

    #[display("slug derived from '{_0}' is empty, provide one explicitly")]
    EmptySlug(String),
}
