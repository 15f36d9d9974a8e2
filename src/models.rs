//! Grocery Models
//!
//! The grocery entity held in the local lists, and the records exchanged
//! with the Everlive backend.

use serde::{Deserialize, Serialize};

/// Core trait for list entities
///
/// All entities must have an identifier that is unique within a list.
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Clone + Eq + std::hash::Hash + std::fmt::Debug + Send + Sync;

    /// Returns the entity's unique identifier
    fn id(&self) -> &Self::Id;
}

/// A grocery item in either the active list or the history list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryItem {
    /// Backend-assigned identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// True iff the item lives in the history list
    pub deleted: bool,
    /// Active list: marked complete. History list: selected for restore.
    pub done: bool,
}

impl GroceryItem {
    /// Create an active, not-done item
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            deleted: false,
            done: false,
        }
    }

    /// Build a local item from a backend record
    ///
    /// Deleted records never keep their remote `Done` value; in the history
    /// list `done` means "selected for restore" and starts cleared.
    pub fn from_record(record: GroceryRecord) -> Self {
        let deleted = record.deleted.unwrap_or(false);
        Self {
            id: record.id,
            name: record.name,
            deleted,
            done: if deleted { false } else { record.done.unwrap_or(false) },
        }
    }

    /// History item the user picked for restoration
    pub fn is_selected_for_restore(&self) -> bool {
        self.deleted && self.done
    }
}

impl Entity for GroceryItem {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

// ========================
// Wire Records
// ========================

/// Everlive response envelope: `{ "Result": ..., "Count": ... }`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope<T> {
    pub result: T,
    #[serde(default)]
    pub count: Option<u64>,
}

/// A `Groceries` record as returned by the backend
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroceryRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub deleted: Option<bool>,
    #[serde(default)]
    pub done: Option<bool>,
}

/// Result of a create request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatedRecord {
    pub id: String,
}

/// Result of `oauth/token`
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_creation() {
        let item = GroceryItem::new("a1", "Milk");
        assert_eq!(item.id(), "a1");
        assert_eq!(item.name, "Milk");
        assert!(!item.deleted);
        assert!(!item.done);
    }

    #[test]
    fn test_deleted_record_drops_done() {
        let record = GroceryRecord {
            id: "a1".to_string(),
            name: "Eggs".to_string(),
            deleted: Some(true),
            done: Some(true),
        };
        let item = GroceryItem::from_record(record);
        assert!(item.deleted);
        assert!(!item.done);
    }

    #[test]
    fn test_missing_flags_default_to_false() {
        let records: Envelope<Vec<GroceryRecord>> =
            serde_json::from_str(r#"{"Result":[{"Id":"a1","Name":"Bread","Done":null}],"Count":1}"#)
                .unwrap();
        assert_eq!(records.count, Some(1));

        let item = GroceryItem::from_record(records.result[0].clone());
        assert!(!item.deleted);
        assert!(!item.done);
    }

    #[test]
    fn test_active_record_keeps_done() {
        let record: GroceryRecord =
            serde_json::from_str(r#"{"Id":"a2","Name":"Tea","Deleted":false,"Done":true}"#).unwrap();
        let item = GroceryItem::from_record(record);
        assert!(item.done);
        assert!(!item.is_selected_for_restore());
    }
}
