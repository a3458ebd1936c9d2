use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Process-local store. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with raw values.
    pub fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = items
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            items: Arc::new(Mutex::new(map)),
        }
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        let map = self.items.lock().unwrap_or_else(|e| e.into_inner());
        map.get(key).cloned()
    }

    pub fn set_item(&self, key: &str, value: &str) {
        let mut map = self.items.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_items() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.set_item("affiliates", "[]");
        assert_eq!(b.get_item("affiliates").as_deref(), Some("[]"));
        assert!(a.get_item("adminData").is_none());
    }

    #[test]
    fn set_overwrites_previous_value() {
        let store = MemoryStore::with_items([("adminData", "{}")]);
        store.set_item("adminData", r#"{"logo":"x"}"#);
        assert_eq!(store.get_item("adminData").as_deref(), Some(r#"{"logo":"x"}"#));
    }
}
