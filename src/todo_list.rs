use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::todo::{TodoId, TodoItem};

/// Ordered todo items. Every operation returns a new list and leaves `self` untouched.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoList {
    items: Vec<TodoItem>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: TodoId) -> Option<usize> {
        self.items.iter().position(|t| t.id == id)
    }

    /// Id for an item created now: the clock reading, bumped past the current
    /// maximum so ids stay distinct when two items land in the same millisecond.
    pub fn next_id(&self, clock: &dyn Clock) -> TodoId {
        let now = clock.now_millis();
        match self.items.iter().map(|t| t.id).max() {
            Some(max) if now <= max => max
                .checked_add(1)
                .unwrap_or_else(|| self.unused_id_from(now)),
            _ => now,
        }
    }

    /// `start` if free, otherwise the smallest non-negative id not in the list.
    fn unused_id_from(&self, start: TodoId) -> TodoId {
        let taken: HashSet<TodoId> = self.items.iter().map(|t| t.id).collect();
        if !taken.contains(&start) {
            return start;
        }
        // at most len + 1 candidates before a gap
        (0..).find(|id| !taken.contains(id)).unwrap_or(start)
    }

    /// Appends a new, not-done item. The title is not validated here.
    pub fn add(&self, title: impl Into<String>, clock: &dyn Clock) -> TodoList {
        let mut items = self.items.clone();
        items.push(TodoItem::new(self.next_id(clock), title));
        TodoList { items }
    }

    pub fn toggle(&self, id: TodoId) -> TodoList {
        let items = self
            .items
            .iter()
            .map(|t| {
                if t.id == id {
                    TodoItem {
                        is_done: !t.is_done,
                        ..t.clone()
                    }
                } else {
                    t.clone()
                }
            })
            .collect();
        TodoList { items }
    }

    pub fn remove(&self, id: TodoId) -> TodoList {
        let mut items = self.items.clone();
        if let Some(index) = self.position(id) {
            items.remove(index);
        }
        TodoList { items }
    }

    /// Takes the item at `from` out and reinserts it at `to`. Out-of-range indices leave
    /// the list as it is.
    pub fn move_item(&self, from: usize, to: usize) -> TodoList {
        let mut items = self.items.clone();
        if from < items.len() && to < items.len() && from != to {
            let item = items.remove(from);
            items.insert(to, item);
        }
        TodoList { items }
    }
}

impl From<Vec<TodoItem>> for TodoList {
    fn from(items: Vec<TodoItem>) -> Self {
        Self { items }
    }
}

impl FromIterator<TodoItem> for TodoList {
    fn from_iter<I: IntoIterator<Item = TodoItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
