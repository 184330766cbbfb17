use serde::Deserialize;

use crate::errors::AppError;

/// `?refresh=true` forces the admin cache to re-fetch.
#[derive(Debug, Default, Deserialize)]
pub struct AdminListQuery {
    #[serde(default)]
    pub refresh: bool,
}

/// Deletes are irreversible and need `?confirm=true`.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

impl DeleteQuery {
    pub fn ensure_confirmed(&self) -> Result<(), AppError> {
        if self.confirm {
            Ok(())
        } else {
            Err(AppError::field("confirm", "Deletion cannot be undone; repeat the request with confirm=true"))
        }
    }
}
