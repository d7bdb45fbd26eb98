use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "todos", version, about = "Terminal todo list")]
pub struct Settings {
    /// Directory holding the stored list
    #[arg(long, env = "TODOS_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Ask "Delete this?" before removing an item
    #[arg(long, env = "TODOS_CONFIRM_DELETE")]
    pub confirm_delete: bool,

    #[arg(long, env = "TODOS_LOG_FILE", default_value = "todos.log")]
    pub log_file: PathBuf,

    /// tracing filter directive, e.g. `debug` or `todos=trace`
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// How often to poll for input and for changes to the stored list, in milliseconds
    #[arg(long, default_value_t = 250)]
    pub tick_ms: u64,
}

impl Settings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }
}
