use std::cell::RefCell;
use std::collections::BTreeMap;

/// Durable string key-value storage, the shape of the browser's `localStorage`.
///
/// Methods take `&self`: browser storage is a shared handle, and the in-memory
/// stores use interior mutability to match.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set_item(key, value)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use anyhow::Context as _;

    use super::KeyValueStore;

    /// Storage backed by a JSON object on disk (`{"theme":"dark"}`).
    ///
    /// Every write rewrites the whole file, so state survives across processes.
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        fn load(&self) -> anyhow::Result<BTreeMap<String, String>> {
            let bytes = match std::fs::read(&self.path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
                Err(e) => {
                    return Err(e).with_context(|| format!("read {}", self.path.display()));
                }
            };
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(BTreeMap::new());
            }
            serde_json::from_slice(&bytes)
                .with_context(|| format!("parse state file {}", self.path.display()))
        }
    }

    impl KeyValueStore for FileStore {
        fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
            Ok(self.load()?.remove(key))
        }

        fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
            let mut items = self.load()?;
            items.insert(key.to_string(), value.to_string());

            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("create {}", parent.display()))?;
                }
            }
            let json = serde_json::to_vec_pretty(&items).context("serialize state")?;
            std::fs::write(&self.path, json)
                .with_context(|| format!("write {}", self.path.display()))?;
            tracing::debug!(path = %self.path.display(), key, "state file updated");
            Ok(())
        }
    }
}
