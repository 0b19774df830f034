pub mod config;
pub mod error_channel;
pub mod filter;
pub mod http;
pub mod provider;
pub mod store;
pub mod todo;

pub use config::Config;
pub use filter::FilterMode;
pub use store::{AddOutcome, StoreError, TodoStore, TodoView};
pub use todo::{NewTodo, Todo};
