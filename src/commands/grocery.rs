//! Grocery Commands
//!
//! Bindings for the `Groceries` content type.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::json;

use super::{send_authorized, ApiRequest, Transport};
use crate::context::Session;
use crate::error::GroceryResult;
use crate::models::{CreatedRecord, Envelope, GroceryRecord};

pub const GROCERIES: &str = "Groceries";

/// Everlive header scoping a bulk update to matching records
pub const FILTER_HEADER: &str = "X-Everlive-Filter";

/// Characters left unescaped in an id path segment
const ID_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateGroceryArgs<'a> {
    name: &'a str,
}

/// Partial update of a grocery; `None` fields are left out of the body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroceryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

impl GroceryPatch {
    /// `{Deleted: true}`
    pub fn soft_delete() -> Self {
        Self {
            deleted: Some(true),
            done: None,
        }
    }

    /// `{Done: done}`
    pub fn done(done: bool) -> Self {
        Self {
            deleted: None,
            done: Some(done),
        }
    }

    /// `{Deleted: false, Done: false}`
    pub fn restore() -> Self {
        Self {
            deleted: Some(false),
            done: Some(false),
        }
    }
}

fn grocery_path(id: &str) -> String {
    format!("{}/{}", GROCERIES, utf8_percent_encode(id, ID_SEGMENT))
}

/// `{"Id": {"$in": [ids...]}}`
pub fn id_filter(ids: &[String]) -> String {
    json!({ "Id": { "$in": ids } }).to_string()
}

// ========================
// Commands
// ========================

/// Fetch every grocery record of the signed-in user
pub async fn list_groceries(
    transport: &dyn Transport,
    session: &Session,
) -> GroceryResult<Vec<GroceryRecord>> {
    let response = send_authorized(transport, session, ApiRequest::get(GROCERIES)).await?;
    let envelope: Envelope<Vec<GroceryRecord>> = response.json()?;
    Ok(envelope.result)
}

/// Create a grocery, returning its backend id
pub async fn create_grocery(
    transport: &dyn Transport,
    session: &Session,
    name: &str,
) -> GroceryResult<String> {
    let body = serde_json::to_value(CreateGroceryArgs { name })?;
    let response = send_authorized(transport, session, ApiRequest::post(GROCERIES, body)).await?;
    let envelope: Envelope<CreatedRecord> = response.json()?;
    Ok(envelope.result.id)
}

/// Update one grocery by id
pub async fn update_grocery(
    transport: &dyn Transport,
    session: &Session,
    id: &str,
    patch: GroceryPatch,
) -> GroceryResult<()> {
    let body = serde_json::to_value(patch)?;
    send_authorized(transport, session, ApiRequest::put(grocery_path(id), body)).await?;
    Ok(())
}

/// Update every grocery whose id is in `ids` with one request
///
/// Returns the backend's updated-record count when it reports one.
pub async fn update_groceries_in(
    transport: &dyn Transport,
    session: &Session,
    ids: &[String],
    patch: GroceryPatch,
) -> GroceryResult<Option<u64>> {
    let body = serde_json::to_value(patch)?;
    let request = ApiRequest::put(GROCERIES, body).with_header(FILTER_HEADER, id_filter(ids));
    let response = send_authorized(transport, session, request).await?;
    Ok(response.json::<Envelope<u64>>().ok().map(|envelope| envelope.result))
}
