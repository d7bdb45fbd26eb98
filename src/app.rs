use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::store::{self, KeyValueStore, TodoStore};
use crate::todo::TodoId;
use crate::todo_list::TodoList;

/// What the last handler changed, sent to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    InputChanged,
    Added(TodoId),
    Toggled(TodoId),
    Removed(TodoId),
    Moved { from: usize, to: usize },
    DeleteRequested(TodoId),
    DeleteCancelled(TodoId),
    Hydrated,
}

type Observer = Box<dyn FnMut(&Change)>;

/// Owns the input buffer and the current list, and writes every mutation back to the store.
pub struct App<S> {
    input: String,
    todos: TodoList,
    store: TodoStore<S>,
    clock: Box<dyn Clock>,
    confirm_delete: bool,
    pending_delete: Option<TodoId>,
    hydrated: bool,
    last_raw: Option<String>,
    observers: Vec<Observer>,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(store: S, confirm_delete: bool) -> Self {
        Self::with_clock(store, confirm_delete, Box::new(SystemClock))
    }

    pub fn with_clock(store: S, confirm_delete: bool, clock: Box<dyn Clock>) -> Self {
        Self {
            input: String::new(),
            todos: TodoList::new(),
            store: TodoStore::new(store),
            clock,
            confirm_delete,
            pending_delete: None,
            hydrated: false,
            last_raw: None,
            observers: Vec::new(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn todos(&self) -> &TodoList {
        &self.todos
    }

    pub fn pending_delete(&self) -> Option<TodoId> {
        self.pending_delete
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    pub fn can_create(&self) -> bool {
        !self.input.is_empty()
    }

    pub fn store(&self) -> &TodoStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TodoStore<S> {
        &mut self.store
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&Change) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, change: Change) {
        for observer in &mut self.observers {
            observer(&change);
        }
    }

    /// Reads the stored list. Unreadable or malformed data leaves an empty list and is logged;
    /// the stored text stays as it is until the next mutation overwrites it.
    pub fn hydrate(&mut self) {
        let raw = match self.store.raw() {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "could not read stored todos, starting empty");
                None
            }
        };
        self.hydrate_from(raw);
    }

    fn hydrate_from(&mut self, raw: Option<String>) {
        self.todos = match store::parse(raw.as_deref()) {
            Ok(list) => list,
            Err(err) => {
                warn!(error = %err, "discarding malformed stored todos");
                TodoList::new()
            }
        };
        self.last_raw = raw;
        self.hydrated = true;
        if self
            .pending_delete
            .is_some_and(|id| self.todos.get(id).is_none())
        {
            self.pending_delete = None;
        }
        info!(items = self.todos.len(), "hydrated todo list");
        self.notify(Change::Hydrated);
    }

    /// Re-hydrates when the stored text differs from what this controller last read or wrote.
    /// Returns whether it did.
    pub fn sync_external(&mut self) -> bool {
        let raw = match self.store.raw() {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "could not check stored todos");
                return false;
            }
        };
        if self.hydrated && raw == self.last_raw {
            return false;
        }
        debug!("stored todos changed outside this session");
        self.hydrate_from(raw);
        true
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let written = self.store.save(&self.todos)?;
        self.last_raw = Some(written);
        Ok(())
    }

    pub fn on_input_change(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.notify(Change::InputChanged);
    }

    pub fn on_create(&mut self) -> Result<(), StoreError> {
        if self.input.is_empty() {
            return Ok(());
        }
        let title = std::mem::take(&mut self.input);
        self.todos = self.todos.add(title, self.clock.as_ref());
        let id = self.todos.items().last().map(|t| t.id);
        debug!(?id, "created todo");
        self.notify(Change::InputChanged);
        if let Some(id) = id {
            self.notify(Change::Added(id));
        }
        self.persist()
    }

    pub fn on_toggle(&mut self, id: TodoId) -> Result<(), StoreError> {
        if self.todos.get(id).is_none() {
            return Ok(());
        }
        self.todos = self.todos.toggle(id);
        debug!(id, "toggled todo");
        self.notify(Change::Toggled(id));
        self.persist()
    }

    /// Removes the item, or stages it for [`App::resolve_delete`] when confirmation is on.
    pub fn on_delete(&mut self, id: TodoId) -> Result<(), StoreError> {
        if self.todos.get(id).is_none() {
            return Ok(());
        }
        if self.confirm_delete {
            self.pending_delete = Some(id);
            self.notify(Change::DeleteRequested(id));
            return Ok(());
        }
        self.delete_now(id)
    }

    /// Answers the "Delete this?" prompt.
    pub fn resolve_delete(&mut self, confirmed: bool) -> Result<(), StoreError> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(());
        };
        if !confirmed {
            debug!(id, "delete declined");
            self.notify(Change::DeleteCancelled(id));
            return Ok(());
        }
        if self.todos.get(id).is_none() {
            return Ok(());
        }
        self.delete_now(id)
    }

    fn delete_now(&mut self, id: TodoId) -> Result<(), StoreError> {
        self.todos = self.todos.remove(id);
        debug!(id, "deleted todo");
        self.notify(Change::Removed(id));
        self.persist()
    }

    /// `None` as the destination is a cancelled drag.
    pub fn on_reorder(&mut self, from: usize, to: Option<usize>) -> Result<(), StoreError> {
        let Some(to) = to else {
            return Ok(());
        };
        let len = self.todos.len();
        if from >= len || to >= len || from == to {
            return Ok(());
        }
        self.todos = self.todos.move_item(from, to);
        debug!(from, to, "reordered todo");
        self.notify(Change::Moved { from, to });
        self.persist()
    }
}
