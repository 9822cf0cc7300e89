//! Selection Layer - 文本选区监听

mod source;
mod watcher;

pub use source::InMemorySelectionSource;
pub use watcher::SelectionWatcher;
