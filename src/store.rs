//! Item Lists
//!
//! Ordered in-memory sequences backing the active and history lists.
//! Order is insertion order; nothing here ever sorts.

use crate::models::Entity;

/// An ordered list of entities with index and id based access
#[derive(Debug, Clone, PartialEq)]
pub struct ItemList<T: Entity> {
    items: Vec<T>,
}

impl<T: Entity> Default for ItemList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> ItemList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Replace the entry at `index`, returning the previous one
    pub fn set(&mut self, index: usize, item: T) -> Option<T> {
        self.items
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, item))
    }

    /// Remove the entry at `index`, shifting later entries down
    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Append to the tail
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Position of the entry with the given id
    ///
    /// Linear scan from the head; the first match wins.
    pub fn position_of(&self, id: &T::Id) -> Option<usize> {
        let position = self.items.iter().position(|item| item.id() == id);
        debug_assert!(
            position.map_or(true, |p| !self.items[p + 1..].iter().any(|item| item.id() == id)),
            "duplicate id {:?} in item list",
            id
        );
        position
    }

    pub fn contains_id(&self, id: &T::Id) -> bool {
        self.position_of(id).is_some()
    }

    /// Remove the entry with the given id
    pub fn remove_by_id(&mut self, id: &T::Id) -> Option<T> {
        self.position_of(id).map(|index| self.items.remove(index))
    }
}

impl<T: Entity> FromIterator<T> for ItemList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T: Entity> IntoIterator for &'a ItemList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroceryItem;

    fn sample() -> ItemList<GroceryItem> {
        vec![
            GroceryItem::new("1", "Milk"),
            GroceryItem::new("2", "Bread"),
            GroceryItem::new("3", "Eggs"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_position_of() {
        let list = sample();
        assert_eq!(list.position_of(&"2".to_string()), Some(1));
        assert_eq!(list.position_of(&"9".to_string()), None);
        assert!(list.contains_id(&"3".to_string()));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut list = sample();
        let removed = list.remove(0).unwrap();
        assert_eq!(removed.name, "Milk");
        assert_eq!(list.get(0).unwrap().name, "Bread");
        assert_eq!(list.get(1).unwrap().name, "Eggs");
        assert!(list.remove(5).is_none());
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut list = sample();
        let mut item = list.get(1).unwrap().clone();
        item.done = true;

        let previous = list.set(1, item).unwrap();
        assert!(!previous.done);
        assert!(list.get(1).unwrap().done);
        assert_eq!(list.len(), 3);
        assert!(list.set(3, GroceryItem::new("4", "Tea")).is_none());
    }

    #[test]
    fn test_remove_by_id() {
        let mut list = sample();
        let removed = list.remove_by_id(&"1".to_string()).unwrap();
        assert_eq!(removed.name, "Milk");
        assert_eq!(list.len(), 2);
        assert!(list.remove_by_id(&"1".to_string()).is_none());
    }

    #[test]
    fn test_push_appends_to_tail() {
        let mut list = ItemList::new();
        assert!(list.is_empty());
        list.push(GroceryItem::new("1", "Milk"));
        list.push(GroceryItem::new("2", "Bread"));
        let names: Vec<&str> = list.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["Milk", "Bread"]);
        list.clear();
        assert!(list.is_empty());
    }
}
