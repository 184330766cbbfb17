use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidateLength;

use crate::{errors::AppError, repositories::store::Record};

/// Represents optional field semantics in PATCH requests.
///
/// - `Unchanged` → key absent from the body
/// - `SetToNull` → key present with `null`
/// - `SetToValue` → key present with a value
///
/// Containing structs must carry `#[serde(default)]` so absent keys land on
/// `Unchanged`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub enum OptionField<T> {
    #[default]
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<'de, T> Deserialize<'de> for OptionField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => OptionField::SetToValue(value),
            None => OptionField::SetToNull,
        })
    }
}

// ---------------------- Validation support ----------------------

impl<T> ValidateLength<u64> for OptionField<T>
where
    T: ValidateLength<u64>
{
    fn length(&self) -> Option<u64> {
        match self {
            OptionField::SetToValue(value) => value.length(),
            _ => None,
        }
    }
    fn validate_length(&self, min: Option<u64>, max: Option<u64>, equal: Option<u64>) -> bool {
        match self {
            OptionField::SetToValue(value) => value.validate_length(min, max, equal),
            _ => true,
        }
    }
}

// ---------------------- Core helpers ----------------------

impl<T> OptionField<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// If `SetToValue`, returns a reference to inner value.
    pub fn value_ref(&self) -> Option<&T> {
        if let Self::SetToValue(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Transform inner value if `SetToValue`
    pub fn map_value<U, F: FnOnce(T) -> U>(self, f: F) -> OptionField<U> {
        match self {
            Self::Unchanged => OptionField::Unchanged,
            Self::SetToNull => OptionField::SetToNull,
            Self::SetToValue(v) => OptionField::SetToValue(f(v)),
        }
    }
}

impl<T: Serialize> OptionField<T> {
    /// Writes the field into a change record: unchanged fields are skipped,
    /// explicit nulls become JSON `null`.
    pub fn write_to(&self, key: &str, changes: &mut Record) -> Result<(), serde_json::Error> {
        match self {
            OptionField::Unchanged => {}
            OptionField::SetToNull => {
                changes.insert(key.to_string(), serde_json::Value::Null);
            }
            OptionField::SetToValue(value) => {
                changes.insert(key.to_string(), serde_json::to_value(value)?);
            }
        }
        Ok(())
    }

    /// Like [`write_to`](Self::write_to) for NOT NULL columns: an explicit
    /// `null` is a field error instead of a write the store will refuse.
    pub fn write_required(&self, key: &str, changes: &mut Record) -> Result<(), AppError> {
        if let OptionField::SetToNull = self {
            return Err(AppError::field(key, &format!("{} cannot be null", key)));
        }
        self.write_to(key, changes)
            .map_err(|e| AppError::InternalError(format!("encoding {}: {}", key, e)))
    }
}

// ---------------------- Aliases ----------------------

pub type PatchString = OptionField<String>;
