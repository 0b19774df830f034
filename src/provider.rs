use async_trait::async_trait;
use thiserror::Error;

use crate::todo::{NewTodo, Todo};

#[mockall::automock]
#[async_trait]
pub trait TodoProvider {
    async fn get_todos(&self, user_id: i64) -> Result<Vec<Todo>, TransportError>;
    async fn add_todo(&self, todo: &NewTodo) -> Result<Todo, TransportError>;
    async fn delete_todo(&self, id: i64) -> Result<(), TransportError>;
}

/// Any failure talking to the remote todo service. The store does not
/// distinguish between the variants, they only matter for logging.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to build http client: {0}")]
    Client(String),
}
