use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use crate::error::StoreError;
use crate::todo_list::TodoList;

/// Key under which the whole list is stored.
pub const TODOS_KEY: &str = "todos";

/// Synchronous string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Keeps each key in its own `<key>.json` file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::io(path, err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|err| StoreError::io(&self.dir, err))?;
        fs::write(&path, value).map_err(|err| StoreError::io(path, err))
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and writes the whole todo list under [`TODOS_KEY`].
#[derive(Debug)]
pub struct TodoStore<S> {
    inner: S,
}

impl<S: KeyValueStore> TodoStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Raw stored text, or `None` when the key was never written.
    pub fn raw(&self) -> Result<Option<String>, StoreError> {
        self.inner.get(TODOS_KEY)
    }

    pub fn load(&self) -> Result<TodoList, StoreError> {
        let raw = self.raw()?;
        parse(raw.as_deref())
    }

    /// Overwrites the stored list and returns the text that was written.
    pub fn save(&mut self, list: &TodoList) -> Result<String, StoreError> {
        let data = serde_json::to_string_pretty(list).map_err(StoreError::Serialize)?;
        self.inner.set(TODOS_KEY, &data)?;
        debug!(items = list.len(), "saved todo list");
        Ok(data)
    }
}

/// A missing value is an empty list.
pub fn parse(raw: Option<&str>) -> Result<TodoList, StoreError> {
    serde_json::from_str(raw.unwrap_or("[]")).map_err(StoreError::Parse)
}
