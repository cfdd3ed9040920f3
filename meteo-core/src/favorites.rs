//! Favorite cities.
//!
//! An insertion-ordered, duplicate-free list of city names. Every mutation
//! rewrites the whole list under [`FAVORITES_KEY`] as a JSON array of strings.
//! Write failures are logged and otherwise ignored; the in-memory list stays
//! authoritative for the rest of the session.

use anyhow::{Context, Result};

use crate::storage::KeyValueStore;

pub const FAVORITES_KEY: &str = "favorites";

#[derive(Debug)]
pub struct Favorites {
    names: Vec<String>,
    storage: Box<dyn KeyValueStore>,
}

impl Favorites {
    /// Load the stored list. A missing, unreadable or corrupt entry yields an
    /// empty list.
    pub fn load(storage: Box<dyn KeyValueStore>) -> Self {
        let stored = storage
            .get(FAVORITES_KEY)
            .and_then(|raw| raw.map(|s| decode(&s)).transpose());

        let names = match stored {
            Ok(names) => names.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Ignoring stored favorites: {e:#}");
                Vec::new()
            }
        };

        Self { names, storage }
    }

    /// Append `name` unless it is already present. Returns whether it was added.
    pub fn add(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        self.persist();
        true
    }

    /// Remove `name` if present. The list is persisted either way.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|fav| fav != name);
        let removed = self.names.len() != before;
        self.persist();
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|fav| fav == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    fn persist(&mut self) {
        let result = encode(&self.names).and_then(|raw| self.storage.set(FAVORITES_KEY, &raw));
        if let Err(e) = result {
            tracing::warn!("Failed to persist favorites: {e:#}");
        }
    }
}

pub fn encode(names: &[String]) -> Result<String> {
    serde_json::to_string(names).context("Failed to serialize favorites")
}

/// Parse a stored list, dropping later duplicates.
pub fn decode(raw: &str) -> Result<Vec<String>> {
    let parsed: Vec<String> = serde_json::from_str(raw).context("Failed to parse stored favorites")?;

    let mut names: Vec<String> = Vec::with_capacity(parsed.len());
    for name in parsed {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};

    #[derive(Debug)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow::anyhow!("disk on fire"))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        }
    }

    fn empty() -> Favorites {
        Favorites::load(Box::new(MemoryStore::new()))
    }

    fn stored(favorites: &Favorites) -> Option<String> {
        favorites.storage().get(FAVORITES_KEY).unwrap()
    }

    #[test]
    fn add_keeps_names_unique() {
        let mut favorites = empty();

        assert!(favorites.add("Paris"));
        assert!(!favorites.add("Paris"));
        assert!(favorites.add("Lyon"));
        assert!(!favorites.add("Paris"));

        assert_eq!(favorites.names(), ["Paris", "Lyon"]);
    }

    #[test]
    fn equality_is_case_sensitive() {
        let mut favorites = empty();
        favorites.add("Paris");
        favorites.add("paris");
        assert_eq!(favorites.len(), 2);
    }

    #[test]
    fn add_and_remove_keep_insertion_order() {
        let mut favorites = empty();
        favorites.add("Paris");
        favorites.add("Lyon");
        assert_eq!(favorites.names(), ["Paris", "Lyon"]);

        assert!(favorites.remove("Paris"));
        assert_eq!(favorites.names(), ["Lyon"]);
        assert_eq!(stored(&favorites).as_deref(), Some(r#"["Lyon"]"#));
    }

    #[test]
    fn removing_absent_name_leaves_list_unchanged() {
        let mut favorites = empty();
        favorites.add("Paris");
        favorites.add("Lyon");

        assert!(!favorites.remove("Berlin"));
        assert_eq!(favorites.names(), ["Paris", "Lyon"]);
        assert_eq!(stored(&favorites).as_deref(), Some(r#"["Paris","Lyon"]"#));
    }

    #[test]
    fn every_mutation_rewrites_full_list() {
        let mut favorites = empty();
        assert_eq!(stored(&favorites), None);

        favorites.add("Nice");
        assert_eq!(stored(&favorites).as_deref(), Some(r#"["Nice"]"#));

        favorites.add("Lille");
        assert_eq!(stored(&favorites).as_deref(), Some(r#"["Nice","Lille"]"#));
    }

    #[test]
    fn encode_decode_preserves_order() {
        let names = vec!["Toulouse".to_string(), "Brest".to_string(), "Nantes".to_string()];
        assert_eq!(decode(&encode(&names).unwrap()).unwrap(), names);
    }

    #[test]
    fn load_reads_previous_list() {
        let mut store = MemoryStore::new();
        store.set(FAVORITES_KEY, r#"["Rennes","Dijon","Rennes"]"#).unwrap();

        let favorites = Favorites::load(Box::new(store));
        assert_eq!(favorites.names(), ["Rennes", "Dijon"]);
    }

    #[test]
    fn corrupt_storage_loads_empty() {
        let mut store = MemoryStore::new();
        store.set(FAVORITES_KEY, "{not json").unwrap();

        assert!(Favorites::load(Box::new(store)).is_empty());
    }

    #[test]
    fn storage_failures_do_not_block_mutations() {
        let mut favorites = Favorites::load(Box::new(BrokenStore));
        assert!(favorites.is_empty());

        assert!(favorites.add("Metz"));
        assert!(favorites.remove("Metz"));
        assert!(favorites.is_empty());
    }

    #[test]
    fn favorites_survive_reload_from_disk() {
        let dir = tempfile::tempdir().unwrap();

        let mut favorites = Favorites::load(Box::new(FileStore::new(dir.path())));
        favorites.add("Paris");
        favorites.add("Lyon");
        favorites.add("Nice");
        favorites.remove("Lyon");
        drop(favorites);

        let reloaded = Favorites::load(Box::new(FileStore::new(dir.path())));
        assert_eq!(reloaded.names(), ["Paris", "Nice"]);
    }
}
