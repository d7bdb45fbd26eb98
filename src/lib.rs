pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod terminal;
pub mod todo;
pub mod todo_list;
pub mod ui;

pub use app::{App, Change};
pub use error::StoreError;
pub use store::{FileStore, KeyValueStore, MemoryStore, TodoStore, TODOS_KEY};
pub use todo::{TodoId, TodoItem};
pub use todo_list::TodoList;
