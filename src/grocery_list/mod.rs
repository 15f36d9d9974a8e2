//! Grocery List
//!
//! The active and history lists, kept in step with the backend. Each
//! operation does at most one request; `delete` and `toggle_done` mutate
//! local state before the request and do not roll back if it fails.


use std::sync::Arc;

use crate::commands::{self, GroceryPatch, Transport};
use crate::context::Session;
use crate::error::{GroceryError, GroceryResult};
use crate::models::GroceryItem;
use crate::store::ItemList;

/// Active and history lists for the signed-in user
pub struct GroceryList {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    items: ItemList<GroceryItem>,
    history: ItemList<GroceryItem>,
}

impl GroceryList {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<Session>) -> Self {
        Self::with_items(transport, session, Vec::new())
    }

    /// Start with a pre-filled active list
    pub fn with_items(
        transport: Arc<dyn Transport>,
        session: Arc<Session>,
        items: Vec<GroceryItem>,
    ) -> Self {
        Self {
            transport,
            session,
            items: items.into_iter().collect(),
            history: ItemList::new(),
        }
    }

    /// Items still to buy
    pub fn items(&self) -> &ItemList<GroceryItem> {
        &self.items
    }

    /// Soft-deleted items
    pub fn history(&self) -> &ItemList<GroceryItem> {
        &self.history
    }

    /// Empty both lists
    pub fn clear(&mut self) {
        self.items.clear();
        self.history.clear();
    }

    /// Replace both lists with the backend's current state
    pub async fn load(&mut self) -> GroceryResult<()> {
        let records = commands::list_groceries(&*self.transport, &self.session).await?;

        self.clear();
        for record in records {
            let item = GroceryItem::from_record(record);
            if item.deleted {
                self.history.push(item);
            } else {
                self.items.push(item);
            }
        }

        log::info!(
            "Loaded {} active and {} history groceries",
            self.items.len(),
            self.history.len()
        );
        Ok(())
    }

    /// Create a grocery and append it once the backend confirms
    pub async fn add(&mut self, name: &str) -> GroceryResult<GroceryItem> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GroceryError::EmptyName);
        }

        let id = commands::create_grocery(&*self.transport, &self.session, name).await?;
        let item = GroceryItem::new(id, name);
        self.items.push(item.clone());

        log::info!("Added grocery {} ({})", item.name, item.id);
        Ok(item)
    }

    /// Move the active item at `index` to the history tail, then soft-delete it remotely
    pub async fn delete(&mut self, index: usize) -> GroceryResult<()> {
        self.session.bearer().await?;

        let mut item = self
            .items
            .remove(index)
            .ok_or_else(|| out_of_range(index, &self.items))?;
        item.done = false;
        item.deleted = true;
        let id = item.id.clone();
        self.history.push(item);

        commands::update_grocery(&*self.transport, &self.session, &id, GroceryPatch::soft_delete())
            .await
            .inspect_err(|e| log::warn!("Delete of {} not confirmed, local list kept: {}", id, e))
    }

    /// Flip `done` on the active item at `index`, then send the new value
    ///
    /// Returns the new `done` value.
    pub async fn toggle_done(&mut self, index: usize) -> GroceryResult<bool> {
        self.session.bearer().await?;

        let mut item = self
            .items
            .get(index)
            .cloned()
            .ok_or_else(|| out_of_range(index, &self.items))?;
        item.done = !item.done;
        let (id, done) = (item.id.clone(), item.done);
        self.items.set(index, item);

        commands::update_grocery(&*self.transport, &self.session, &id, GroceryPatch::done(done))
            .await
            .inspect_err(|e| log::warn!("Done toggle of {} not confirmed, local list kept: {}", id, e))?;
        Ok(done)
    }

    /// Flip the restore selection of the history item at `index`; local only
    pub fn toggle_done_history(&mut self, index: usize) -> GroceryResult<bool> {
        let mut item = self
            .history
            .get(index)
            .cloned()
            .ok_or_else(|| out_of_range(index, &self.history))?;
        item.deleted = true;
        item.done = !item.done;
        let done = item.done;
        self.history.set(index, item);
        Ok(done)
    }

    /// Restore every selected history item with one bulk request
    ///
    /// With nothing selected no request is sent. Returns the number of
    /// items moved back to the active list.
    pub async fn restore(&mut self) -> GroceryResult<usize> {
        let selected: Vec<String> = self
            .history
            .iter()
            .filter(|item| item.is_selected_for_restore())
            .map(|item| item.id.clone())
            .collect();

        if selected.is_empty() {
            log::debug!("Restore requested with no history items selected");
            return Ok(0);
        }

        let updated = commands::update_groceries_in(
            &*self.transport,
            &self.session,
            &selected,
            GroceryPatch::restore(),
        )
        .await?;
        if let Some(count) = updated.filter(|count| *count != selected.len() as u64) {
            log::warn!("Restore of {} groceries updated {} records", selected.len(), count);
        }

        let mut restored = 0;
        for id in &selected {
            if let Some(mut item) = self.history.remove_by_id(id) {
                item.deleted = false;
                item.done = false;
                self.items.push(item);
                restored += 1;
            }
        }

        log::info!("Restored {} groceries from history", restored);
        Ok(restored)
    }

    /// Active item names, comma separated, for sharing
    pub fn share_text(&self) -> String {
        self.items
            .iter()
            .map(|item| item.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
            .trim()
            .to_string()
    }
}

fn out_of_range(index: usize, list: &ItemList<GroceryItem>) -> GroceryError {
    GroceryError::IndexOutOfRange {
        index,
        len: list.len(),
    }
}
