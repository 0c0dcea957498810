//! In-memory lists that are patched after a confirmed mutation rather than
//! refetched.

/// Anything with a stable server id.
pub trait Identified {
    fn id(&self) -> &str;
}

/// A list as last rendered. Callers only touch it once the server has
/// confirmed a mutation; on failure they leave it as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalList<T> {
    items: Vec<T>,
}

impl<T> Default for LocalList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Identified> LocalList<T> {
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replaces the item with the same id in place, or prepends it when new
    /// (lists are shown newest first).
    pub fn upsert(&mut self, item: T) {
        match self.items.iter().position(|existing| existing.id() == item.id()) {
            Some(index) => self.items[index] = item,
            None => self.items.insert(0, item),
        }
    }

    /// Removes and returns the item with `id`, if present.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row {
        id: String,
        label: &'static str,
    }

    impl Identified for Row {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn row(id: &str, label: &'static str) -> Row {
        Row {
            id: id.to_string(),
            label,
        }
    }

    #[test]
    fn upsert_replaces_in_place_and_prepends_new() {
        let mut list = LocalList::new(vec![row("a", "one"), row("b", "two")]);
        list.upsert(row("b", "updated"));
        assert_eq!(list.items()[1].label, "updated");

        list.upsert(row("c", "new"));
        assert_eq!(list.items()[0].id, "c");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn remove_reports_missing_ids() {
        let mut list = LocalList::new(vec![row("a", "one")]);
        assert!(list.remove("zzz").is_none());
        assert_eq!(list.len(), 1);

        assert_eq!(list.remove("a").map(|r| r.label), Some("one"));
        assert!(list.is_empty());
    }
}
