pub mod collection;
pub mod store;
pub mod tree;
pub mod watcher;
